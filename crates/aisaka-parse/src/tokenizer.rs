//! Filename tokenization: bracket pairs, canonical-pattern carving, and
//! delimiter inference.

use tracing::trace;

use crate::elements::Elements;
use crate::keyword;
use crate::options::Options;
use crate::token::{Token, TokenCategory, Tokens};

/// Recognized bracket pairs, including the CJK ones.
const BRACKET_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('\u{300C}', '\u{300D}'), // 「」
    ('\u{300E}', '\u{300F}'), // 『』
    ('\u{3010}', '\u{3011}'), // 【】
    ('\u{FF08}', '\u{FF09}'), // （）
];

/// Candidate characters for primary-delimiter inference and for the
/// keyword-alignment refinement splits.
const DELIMITER_CANDIDATES: &[char] = &[' ', '_', '.'];

fn matching_bracket(open: char) -> Option<char> {
    BRACKET_PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

/// Tokenize a filename (extension already stripped) into the token stream
/// the parser passes operate on. `peek` matches found inside brackets are
/// inserted into `elements` right away.
pub fn tokenize(input: &str, options: &Options, elements: &mut Elements) -> Tokens {
    let mut tokens = Tokens::new();
    if input.is_empty() {
        return tokens;
    }

    let primary = infer_primary_delimiter(input, options);
    trace!(delimiter = ?primary, "inferred primary delimiter");

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut region = String::new();

    while i < chars.len() {
        let c = chars[i];
        if let Some(close) = matching_bracket(c) {
            flush_region(&mut region, false, primary, &mut tokens);
            tokens.push(Token::new(TokenCategory::Bracket, c.to_string(), true));
            i += 1;
            let start = i;
            while i < chars.len() && chars[i] != close {
                i += 1;
            }
            let span: String = chars[start..i].iter().collect();
            tokenize_enclosed(&span, primary, &mut tokens, elements);
            if i < chars.len() {
                // Unmatched brackets close implicitly at end of input.
                tokens.push(Token::new(TokenCategory::Bracket, close.to_string(), true));
                i += 1;
            }
        } else {
            region.push(c);
            i += 1;
        }
    }
    flush_region(&mut region, false, primary, &mut tokens);

    tokens
}

/// Most frequent allowed delimiter in the non-bracket regions of the input.
/// Ties resolve in `allowed_delimiters` order; an input with no delimiters
/// at all falls back to space.
fn infer_primary_delimiter(input: &str, options: &Options) -> char {
    let mut depth_close: Option<char> = None;
    let mut counts: Vec<(char, usize)> = options
        .allowed_delimiters
        .chars()
        .map(|c| (c, 0usize))
        .collect();

    for c in input.chars() {
        match depth_close {
            Some(close) => {
                if c == close {
                    depth_close = None;
                }
            }
            None => {
                if let Some(close) = matching_bracket(c) {
                    depth_close = Some(close);
                } else if let Some(entry) = counts.iter_mut().find(|(d, _)| *d == c) {
                    entry.1 += 1;
                }
            }
        }
    }

    let mut best: Option<(char, usize)> = None;
    for (c, n) in counts {
        if n > 0 && best.map_or(true, |(_, bn)| n > bn) {
            best = Some((c, n));
        }
    }
    best.map(|(c, _)| c).unwrap_or(' ')
}

fn flush_region(region: &mut String, enclosed: bool, primary: char, tokens: &mut Tokens) {
    if !region.is_empty() {
        split_region(region.as_str(), enclosed, primary, tokens);
        region.clear();
    }
}

/// Bracketed spans are carved by `peek` and otherwise kept whole when the
/// span as a whole is a known keyword (multi-word entries like
/// `Multiple Subtitle` match this way). Everything else goes through the
/// regular delimiter split.
fn tokenize_enclosed(span: &str, primary: char, tokens: &mut Tokens, elements: &mut Elements) {
    if span.is_empty() {
        return;
    }

    let whole = keyword::normalize(span.trim());
    if !whole.is_empty() && keyword::find_without_category(&whole).is_some() {
        tokens.push(Token::new(TokenCategory::Unknown, span, true));
        return;
    }

    let consumed = keyword::peek(span, elements);
    let mut pos = 0;
    for (begin, end) in consumed {
        if begin < pos || end > span.len() {
            continue;
        }
        if begin > pos {
            split_region(&span[pos..begin], true, primary, tokens);
        }
        tokens.push(Token::new(TokenCategory::Identifier, &span[begin..end], true));
        pos = end;
    }
    if pos < span.len() {
        split_region(&span[pos..], true, primary, tokens);
    }
}

/// Split a bracket-free region on the primary delimiter, then apply the
/// keyword-alignment refinement to each word.
fn split_region(region: &str, enclosed: bool, primary: char, tokens: &mut Tokens) {
    let chars: Vec<char> = region.chars().collect();
    let mut word = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == primary && !keep_dot_between_digits(&chars, i, primary) {
            push_word(&word, enclosed, primary, tokens);
            word.clear();
            tokens.push(Token::new(TokenCategory::Delimiter, c.to_string(), enclosed));
        } else {
            word.push(c);
        }
        i += 1;
    }
    push_word(&word, enclosed, primary, tokens);
}

/// A dot between two digits is part of the token (`07.5`, `5.1`), even when
/// dot is the primary delimiter.
fn keep_dot_between_digits(chars: &[char], i: usize, primary: char) -> bool {
    primary == '.'
        && i > 0
        && i + 1 < chars.len()
        && chars[i - 1].is_ascii_digit()
        && chars[i + 1].is_ascii_digit()
}

fn push_word(word: &str, enclosed: bool, primary: char, tokens: &mut Tokens) {
    if word.trim().is_empty() {
        return;
    }

    // Refinement: split on a rarer delimiter candidate only when that
    // exposes a known keyword (`Vol.3` splits, `07.5` does not).
    for &candidate in DELIMITER_CANDIDATES {
        if candidate == primary || !word.contains(candidate) {
            continue;
        }
        let parts: Vec<&str> = word.split(candidate).collect();
        let aligned = parts.iter().any(|p| {
            !p.is_empty() && keyword::find_without_category(&keyword::normalize(p)).is_some()
        });
        if aligned {
            for (n, part) in parts.iter().enumerate() {
                if n > 0 {
                    tokens.push(Token::new(
                        TokenCategory::Delimiter,
                        candidate.to_string(),
                        enclosed,
                    ));
                }
                if !part.is_empty() {
                    tokens.push(Token::new(TokenCategory::Unknown, *part, enclosed));
                }
            }
            return;
        }
    }

    tokens.push(Token::new(TokenCategory::Unknown, word, enclosed));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(tokens: &Tokens) -> Vec<(&str, TokenCategory, bool)> {
        tokens
            .iter()
            .map(|t| (t.content.as_str(), t.category, t.enclosed))
            .collect()
    }

    fn run(input: &str) -> (Tokens, Elements) {
        let mut elements = Elements::new();
        let tokens = tokenize(input, &Options::default(), &mut elements);
        (tokens, elements)
    }

    #[test]
    fn brackets_and_spaces() {
        let (tokens, _) = run("[SubsPlease] Title - 01");
        let got = contents(&tokens);
        assert_eq!(got[0], ("[", TokenCategory::Bracket, true));
        assert_eq!(got[1], ("SubsPlease", TokenCategory::Unknown, true));
        assert_eq!(got[2], ("]", TokenCategory::Bracket, true));
        assert!(got.contains(&("Title", TokenCategory::Unknown, false)));
        assert!(got.contains(&("-", TokenCategory::Unknown, false)));
        assert!(got.contains(&("01", TokenCategory::Unknown, false)));
    }

    #[test]
    fn underscore_filenames_pick_underscore() {
        let (tokens, _) = run("[Group]_Naruto_Shippuuden_-_500_[720p]");
        let got = contents(&tokens);
        assert!(got.contains(&("Naruto", TokenCategory::Unknown, false)));
        assert!(got.contains(&("Shippuuden", TokenCategory::Unknown, false)));
        assert!(got.contains(&("500", TokenCategory::Unknown, false)));
        assert!(got.contains(&("_", TokenCategory::Delimiter, false)));
    }

    #[test]
    fn peek_carves_inside_brackets() {
        let (tokens, elements) = run("Seasons 1-2 [BD 1080p]");
        assert_eq!(elements.video_resolution(), Some("1080p"));
        let got = contents(&tokens);
        assert!(got.contains(&("1080p", TokenCategory::Identifier, true)));
        assert!(got.contains(&("BD", TokenCategory::Unknown, true)));
    }

    #[test]
    fn whole_bracket_keyword_stays_one_token() {
        let (tokens, _) = run("[1080p][Multiple Subtitle]");
        let got = contents(&tokens);
        assert!(got.contains(&("Multiple Subtitle", TokenCategory::Unknown, true)));
    }

    #[test]
    fn cjk_brackets() {
        let (tokens, _) = run("【GroupName】タイトル");
        let got = contents(&tokens);
        assert_eq!(got[0], ("\u{3010}", TokenCategory::Bracket, true));
        assert_eq!(got[1], ("GroupName", TokenCategory::Unknown, true));
        assert_eq!(got[2], ("\u{3011}", TokenCategory::Bracket, true));
    }

    #[test]
    fn unmatched_bracket_closes_at_end() {
        let (tokens, _) = run("[Group incomplete");
        let got = contents(&tokens);
        assert_eq!(got[0], ("[", TokenCategory::Bracket, true));
        assert!(got.contains(&("Group", TokenCategory::Unknown, true)));
        assert!(got.contains(&("incomplete", TokenCategory::Unknown, true)));
        // No closing bracket token is fabricated.
        assert!(!got.contains(&("]", TokenCategory::Bracket, true)));
    }

    #[test]
    fn refinement_splits_on_keyword_alignment() {
        // Space wins as primary; the dot in "Vol.3" still splits because
        // "VOL" is a keyword.
        let (tokens, _) = run("Title Vol.3 something");
        let got = contents(&tokens);
        assert!(got.contains(&("Vol", TokenCategory::Unknown, false)));
        assert!(got.contains(&("3", TokenCategory::Unknown, false)));
    }

    #[test]
    fn fractional_number_not_split() {
        let (tokens, _) = run("Title - 07.5");
        let got = contents(&tokens);
        assert!(got.contains(&("07.5", TokenCategory::Unknown, false)));
    }

    #[test]
    fn plus_stays_inside_token() {
        let (tokens, _) = run("Title - 1+OVA");
        let got = contents(&tokens);
        assert!(got.contains(&("1+OVA", TokenCategory::Unknown, false)));
    }

    #[test]
    fn reconstruction_without_peek_or_refinement() {
        let input = "[Group] Some Title - 01";
        let (tokens, _) = run(input);
        let rebuilt: String = tokens.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn empty_input() {
        let (tokens, elements) = run("");
        assert!(tokens.is_empty());
        assert!(elements.is_empty());
    }

    #[test]
    fn dot_delimited_filenames() {
        let (tokens, _) = run("Some.Show.Title.01");
        let got = contents(&tokens);
        assert!(got.contains(&("Some", TokenCategory::Unknown, false)));
        assert!(got.contains(&("Show", TokenCategory::Unknown, false)));
        assert!(got.contains(&("01", TokenCategory::Unknown, false)));
    }
}
