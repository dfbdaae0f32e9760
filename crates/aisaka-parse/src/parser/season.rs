//! Season/part keyword handlers and the extent handler for counting
//! prefixes (`EP`, `VOL`).

use std::sync::LazyLock;

use regex::Regex;

use super::Parser;
use crate::elements::ElementCategory;
use crate::text;
use crate::token::{TokenCategory, TokenFlags};

/// `S1-2`, `S1&2`, `S1~2` glued into a single token.
pub(super) static SEASON_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Ss](\d{1,2})[-&~](\d{1,2})").unwrap());

static EXTENT_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})[-~&](\d{1,4})$").unwrap());

static EXTENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})[vV](\d)$").unwrap());

impl Parser<'_> {
    /// `Season X`, `Seasons X-Y`, `4th Season`, `S1-2`, ...
    pub(crate) fn check_season_keyword(&mut self, idx: usize) -> bool {
        self.check_prefixed_number(ElementCategory::AnimeSeason, idx)
    }

    /// `Part X`, `Parts 1-2`, `2nd Part`, ...
    pub(crate) fn check_part_keyword(&mut self, idx: usize) -> bool {
        self.check_prefixed_number(ElementCategory::AnimePart, idx)
    }

    fn check_prefixed_number(&mut self, target: ElementCategory, idx: usize) -> bool {
        // Ordinal before the keyword: "4th Season".
        if let Some(prev) = self.tokens.find_previous(idx, TokenFlags::NOT_DELIMITER) {
            let ordinal = self
                .tokens
                .get(prev)
                .and_then(|t| text::ordinal_number(&t.content));
            if let Some(n) = ordinal {
                self.set_number_pair(target, n.to_string(), prev, idx);
                return true;
            }
        }

        let next = self.tokens.find_next(idx, TokenFlags::NOT_DELIMITER);

        // Range glued into the keyword token itself: "S1-2".
        if target == ElementCategory::AnimeSeason {
            let content = self.tokens.get(idx).map(|t| t.content.clone());
            if let Some(content) = content {
                if content.len() > 3 && content.starts_with(['S', 's']) {
                    if let Some(caps) = SEASON_RANGE.captures(&content) {
                        let (a, b) = (caps[1].to_owned(), caps[2].to_owned());
                        let second = next.unwrap_or(idx);
                        self.set_number_pair(target, a, idx, second);
                        self.set_number_pair(target, b, idx, second);
                        return true;
                    }
                }
            }
        }

        let Some(next) = next else { return false };
        let next_content = self
            .tokens
            .get(next)
            .map(|t| t.content.clone())
            .unwrap_or_default();

        // Delimiter-joined range in the next token: "Seasons 1-2".
        if let Some((a, b)) = split_number_range(&next_content) {
            self.set_number_pair(target, a, idx, next);
            self.set_number_pair(target, b, idx, next);
            return true;
        }

        if text::is_numeric(&next_content) {
            // Spaced single-digit range: "Seasons 1 - 2". Wider numbers are
            // left alone so an episode number is not swallowed.
            if let Some(sep) = self.tokens.find_next(next, TokenFlags::NOT_DELIMITER) {
                let is_sep = self
                    .tokens
                    .get(sep)
                    .is_some_and(|t| text::is_separator(&t.content));
                if is_sep {
                    if let Some(next_up) = self.tokens.find_next(sep, TokenFlags::NOT_DELIMITER) {
                        let up_content = self
                            .tokens
                            .get(next_up)
                            .map(|t| t.content.clone())
                            .unwrap_or_default();
                        if next_content.len() == 1
                            && up_content.len() == 1
                            && text::is_numeric(&up_content)
                        {
                            self.set_number_pair(target, next_content, idx, next);
                            self.set_number_pair(target, up_content, idx, next_up);
                            return true;
                        }
                    }
                }
            }

            self.set_number_pair(target, next_content, idx, next);
            return true;
        }

        false
    }

    /// A prefix keyword announces that the following token is the value of
    /// a counting category: a single number, a range, or `Nv2`.
    pub(crate) fn check_extent_keyword(&mut self, category: ElementCategory, idx: usize) -> bool {
        let Some(next) = self.tokens.find_next(idx, TokenFlags::NOT_DELIMITER) else {
            return false;
        };
        let content = self
            .tokens
            .get(next)
            .map(|t| t.content.clone())
            .unwrap_or_default();

        if text::is_numeric(&content) {
            self.set_number_pair(category, content, idx, next);
            return true;
        }
        if let Some(caps) = EXTENT_RANGE.captures(&content) {
            let (a, b) = (caps[1].to_owned(), caps[2].to_owned());
            self.set_number_pair(category, a, idx, next);
            self.set_number_pair(category, b, idx, next);
            return true;
        }
        if let Some(caps) = EXTENT_VERSION.captures(&content) {
            let (number, version) = (caps[1].to_owned(), caps[2].to_owned());
            self.set_number_pair(category, number, idx, next);
            self.elements.insert(ElementCategory::ReleaseVersion, version);
            return true;
        }

        false
    }

    /// Insert the value and consume the keyword/number token pair. Only
    /// tokens still unknown are promoted; brackets stay brackets.
    fn set_number_pair(&mut self, category: ElementCategory, value: String, first: usize, second: usize) {
        self.elements.insert(category, value);
        for idx in [first, second] {
            if let Some(token) = self.tokens.get_mut(idx) {
                if token.category == TokenCategory::Unknown {
                    token.category = TokenCategory::Identifier;
                }
            }
        }
    }
}

/// Split `1-2`, `1~2`, `1&2` into two equal-width numeric halves.
fn split_number_range(content: &str) -> Option<(String, String)> {
    for sep in ['-', '~', '&'] {
        let mut parts = content.splitn(3, sep);
        if let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) {
            if a.len() == b.len() && text::is_numeric(a) && text::is_numeric(b) {
                return Some((a.to_owned(), b.to_owned()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_range_splitting() {
        assert_eq!(
            split_number_range("1-2"),
            Some(("1".to_owned(), "2".to_owned()))
        );
        assert_eq!(
            split_number_range("01~02"),
            Some(("01".to_owned(), "02".to_owned()))
        );
        assert_eq!(
            split_number_range("1&2"),
            Some(("1".to_owned(), "2".to_owned()))
        );
        // Width mismatch is rejected.
        assert_eq!(split_number_range("1-10"), None);
        assert_eq!(split_number_range("abc"), None);
        assert_eq!(split_number_range("1-2-3"), None);
    }
}
