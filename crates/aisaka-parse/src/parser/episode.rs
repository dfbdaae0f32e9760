//! Episode number search: pattern matching on mixed tokens first, then a
//! chain of fallbacks over the purely numeric ones.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::Parser;
use crate::elements::ElementCategory;
use crate::keyword;
use crate::text;
use crate::token::{TokenCategory, TokenFlags};

/// Plain numbers at or above this are years or ids, never episodes.
const EPISODE_NUMBER_MAX: u32 = 1900;

static SEASON_AND_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^S(\d{1,2})E(\d{1,3})(?:V\d)?$").unwrap());

static EPISODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:EPISODE|EPS|EP|E)\.?(\d{1,3})(?:V(\d))?$").unwrap());

static SEASON_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^S(\d{1,2})$").unwrap());

static VOLUME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^VOL(?:UME)?\.?(\d{1,2})$").unwrap());

static NUMBER_SIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d{1,3})(?:[vV](\d))?$").unwrap());

static NUMBER_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})[vV](\d)$").unwrap());

static NUMBER_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})[-~&+](\d{1,3})(?:[vV](\d))?$").unwrap());

static NUMBER_PRIMED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,3})'$").unwrap());

static NUMBER_FRACTIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}\.\d$").unwrap());

static JAPANESE_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^第(\d{1,3})[話回章]?$").unwrap());

impl Parser<'_> {
    /// Pass 5. Sub-steps run until one commits an episode number.
    pub(crate) fn search_for_episode_number(&mut self) {
        let unknowns = self.tokens.get_list_flag(TokenFlags::UNKNOWN);
        if unknowns.is_empty() {
            return;
        }

        let had_episode = self.elements.contains(ElementCategory::EpisodeNumber);
        self.elements.set_check_alt_number(had_episode);

        if self.search_for_episode_patterns(&unknowns) {
            return;
        }
        if self.elements.contains(ElementCategory::EpisodeNumber) {
            return;
        }

        let numeric: Vec<usize> = unknowns
            .into_iter()
            .filter(|&idx| {
                self.tokens
                    .get(idx)
                    .is_some_and(|t| t.category == TokenCategory::Unknown && text::is_numeric(&t.content))
            })
            .collect();
        if numeric.is_empty() {
            return;
        }

        if self.search_for_equivalent_numbers(&numeric) {
            return;
        }
        if self.search_for_separated_numbers(&numeric) {
            return;
        }
        if self.search_for_isolated_episode_number(&numeric) {
            return;
        }
        self.search_for_last_number(&numeric);
    }

    /// Step 1: structured patterns on tokens that mix digits with anything
    /// else. Purely numeric tokens belong to the fallback steps.
    fn search_for_episode_patterns(&mut self, unknowns: &[usize]) -> bool {
        for &idx in unknowns {
            let Some(token) = self.tokens.get(idx) else { continue };
            if token.category != TokenCategory::Unknown {
                continue;
            }
            let word = token.content.clone();
            if !word.chars().any(|c| c.is_ascii_digit()) || text::is_numeric(&word) {
                continue;
            }
            if self.match_episode_patterns(idx, &word) {
                trace!(token = %word, "episode pattern match");
                return true;
            }
        }
        false
    }

    fn match_episode_patterns(&mut self, idx: usize, word: &str) -> bool {
        if let Some(caps) = SEASON_AND_EPISODE.captures(word) {
            let (season, episode) = (caps[1].to_owned(), caps[2].to_owned());
            self.elements.insert(ElementCategory::AnimeSeason, season);
            self.set_episode_number(episode, idx);
            return true;
        }

        if let Some(caps) = EPISODE_PREFIX.captures(word) {
            let episode = caps[1].to_owned();
            let version = caps.get(2).map(|m| m.as_str().to_owned());
            self.set_episode_number(episode, idx);
            if let Some(version) = version {
                self.elements.insert(ElementCategory::ReleaseVersion, version);
            }
            return true;
        }

        // Glued season/volume prefixes consume the token but are not
        // episode matches; the search keeps going.
        if let Some(caps) = SEASON_PREFIX.captures(word) {
            let season = caps[1].to_owned();
            self.elements.insert(ElementCategory::AnimeSeason, season);
            self.set_identifier(idx);
            return false;
        }
        if let Some(caps) = VOLUME_PREFIX.captures(word) {
            let volume = caps[1].to_owned();
            self.elements.insert(ElementCategory::VolumeNumber, volume);
            self.set_identifier(idx);
            return false;
        }

        if let Some(caps) = NUMBER_SIGN.captures(word) {
            let episode = caps[1].to_owned();
            let version = caps.get(2).map(|m| m.as_str().to_owned());
            self.set_episode_number(episode, idx);
            if let Some(version) = version {
                self.elements.insert(ElementCategory::ReleaseVersion, version);
            }
            return true;
        }

        if let Some(caps) = NUMBER_VERSION.captures(word) {
            let (episode, version) = (caps[1].to_owned(), caps[2].to_owned());
            self.set_episode_number(episode, idx);
            self.elements.insert(ElementCategory::ReleaseVersion, version);
            return true;
        }

        if let Some(caps) = NUMBER_RANGE.captures(word) {
            let (a, b) = (caps[1].to_owned(), caps[2].to_owned());
            let version = caps.get(3).map(|m| m.as_str().to_owned());
            let (lower, upper) = match (text::leading_number(&a), text::leading_number(&b)) {
                (Some(na), Some(nb)) if nb < na => (b, a),
                _ => (a, b),
            };
            self.set_episode_number(lower.clone(), idx);
            if upper != lower {
                self.set_episode_number(upper, idx);
            }
            if let Some(version) = version {
                self.elements.insert(ElementCategory::ReleaseVersion, version);
            }
            return true;
        }

        if let Some(caps) = NUMBER_PRIMED.captures(word) {
            let episode = caps[1].to_owned();
            self.set_episode_number(episode, idx);
            return true;
        }

        if NUMBER_FRACTIONAL.is_match(word) {
            // Fractional episodes ("07.5") are stored verbatim.
            self.set_episode_number(word.to_owned(), idx);
            return true;
        }

        if let Some(caps) = JAPANESE_COUNTER.captures(word) {
            let episode = caps[1].to_owned();
            self.set_episode_number(episode, idx);
            return true;
        }

        false
    }

    /// Step 2: two numeric tokens of the same width carrying the same value
    /// (or the immediate successor): the first is the episode.
    fn search_for_equivalent_numbers(&mut self, numeric: &[usize]) -> bool {
        for pair in numeric.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(ta), Some(tb)) = (self.tokens.get(a), self.tokens.get(b)) else {
                continue;
            };
            if ta.content.len() != tb.content.len() {
                continue;
            }
            let (Some(va), Some(vb)) = (
                text::leading_number(&ta.content),
                text::leading_number(&tb.content),
            ) else {
                continue;
            };
            if (vb == va || vb == va + 1) && va < EPISODE_NUMBER_MAX {
                let episode = ta.content.clone();
                self.set_episode_number(episode, a);
                return true;
            }
        }
        false
    }

    /// Step 3: a number right after a dash ("Title - 05").
    fn search_for_separated_numbers(&mut self, numeric: &[usize]) -> bool {
        for &idx in numeric {
            let Some(prev) = self.tokens.find_previous(idx, TokenFlags::NOT_DELIMITER) else {
                continue;
            };
            let prev_is_dash = self
                .tokens
                .get(prev)
                .is_some_and(|t| text::is_dash(&t.content));
            if !prev_is_dash {
                continue;
            }
            let Some(content) = self.tokens.get(idx).map(|t| t.content.clone()) else {
                continue;
            };
            if is_valid_episode_number(&content) {
                self.set_episode_number(content, idx);
                return true;
            }
        }
        false
    }

    /// Step 4: isolated numbers left over after the year/resolution pass.
    fn search_for_isolated_episode_number(&mut self, numeric: &[usize]) -> bool {
        for &idx in numeric {
            if !self.tokens.is_isolated(idx) {
                continue;
            }
            let Some(content) = self.tokens.get(idx).map(|t| t.content.clone()) else {
                continue;
            };
            if is_valid_episode_number(&content) {
                self.set_episode_number(content, idx);
                return true;
            }
        }
        false
    }

    /// Step 5: the last numeric token, unless it opens the filename or
    /// trails a "Movie"/"Part" word.
    fn search_for_last_number(&mut self, numeric: &[usize]) -> bool {
        for &idx in numeric.iter().rev() {
            if idx == 0 {
                continue;
            }
            let Some(token) = self.tokens.get(idx) else { continue };
            if token.enclosed {
                continue;
            }
            // The number must come after some title text.
            if self
                .tokens
                .find_previous(idx, TokenFlags::NOT_DELIMITER | TokenFlags::NOT_ENCLOSED)
                .is_none()
            {
                continue;
            }
            if let Some(prev) = self.tokens.find_previous(idx, TokenFlags::NOT_DELIMITER) {
                let prev_word = self
                    .tokens
                    .get(prev)
                    .map(|t| keyword::normalize(&t.content))
                    .unwrap_or_default();
                if prev_word == "MOVIE" || prev_word == "PART" {
                    continue;
                }
            }
            let content = token.content.clone();
            if is_valid_episode_number(&content) {
                self.set_episode_number(content, idx);
                return true;
            }
        }
        false
    }

    fn set_episode_number(&mut self, value: String, idx: usize) {
        self.elements.insert(ElementCategory::EpisodeNumber, value);
        self.set_identifier(idx);
    }
}

fn is_valid_episode_number(content: &str) -> bool {
    text::leading_number(content).is_some_and(|n| n < EPISODE_NUMBER_MAX)
}
