//! Character and string predicates shared by the tokenizer and parser passes.

/// Dash-family characters. Dashes are never delimiters; they survive as
/// `Unknown` tokens so the separated-number pass can see them.
pub const DASHES: &[char] = &[
    '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}',
];

/// Range separators accepted between two numbers (`1-2`, `1~2`, `1&2`).
pub const SEPARATORS: &[char] = &[
    '&', '~', '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}',
];

pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn is_dash(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if DASHES.contains(&c))
}

pub fn is_separator(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if SEPARATORS.contains(&c))
}

pub fn is_crc32(s: &str) -> bool {
    s.len() == 8 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether more than half of the characters belong to the Latin script.
/// Used by the title pass to pick the romanized group among bracketed
/// alternatives.
pub fn is_mostly_latin(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut latin = 0usize;
    let mut other = 0usize;
    for c in s.chars() {
        if is_latin_char(c) {
            latin += 1;
        } else {
            other += 1;
        }
    }
    latin > other
}

fn is_latin_char(c: char) -> bool {
    // Basic Latin letters plus the Latin-1/Extended blocks cover what shows
    // up in romanized titles; digits and punctuation count as non-Latin so a
    // numeric group is not mistaken for a romanized title.
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c)
}

/// `"1st"`/`"first"` .. `"9th"`/`"ninth"` to their numeric value.
pub fn ordinal_number(s: &str) -> Option<u32> {
    let n = match s.to_lowercase().as_str() {
        "1st" | "first" => 1,
        "2nd" | "second" => 2,
        "3rd" | "third" => 3,
        "4th" | "fourth" => 4,
        "5th" | "fifth" => 5,
        "6th" | "sixth" => 6,
        "7th" | "seventh" => 7,
        "8th" | "eighth" => 8,
        "9th" | "ninth" => 9,
        _ => return None,
    };
    Some(n)
}

/// Leading integer value of a string, ignoring any fractional tail
/// (`"07.5"` → 7). Returns `None` when the string does not start with a
/// digit.
pub fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Extract the first digit run from a string (`"- 05."` → `"05"`).
pub fn first_number_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Trim the spaces and dash characters the passes treat as noise.
pub fn trim_spaces_and_dashes(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || DASHES.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_detection() {
        assert!(is_numeric("05"));
        assert!(is_numeric("1080"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("05v2"));
        assert!(!is_numeric("第5"));
    }

    #[test]
    fn dash_detection() {
        assert!(is_dash("-"));
        assert!(is_dash("\u{2014}"));
        assert!(!is_dash("--"));
        assert!(!is_dash("~"));
        assert!(is_separator("~"));
        assert!(is_separator("&"));
    }

    #[test]
    fn crc32_detection() {
        assert!(is_crc32("F609B947"));
        assert!(is_crc32("deadbeef"));
        assert!(!is_crc32("F609B94"));
        assert!(!is_crc32("F609B94Z"));
    }

    #[test]
    fn mostly_latin() {
        assert!(is_mostly_latin("Frieren"));
        assert!(!is_mostly_latin("葬送のフリーレン"));
        assert!(!is_mostly_latin(""));
        // Mixed, Latin-dominant.
        assert!(is_mostly_latin("Frieren 2期"));
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal_number("2nd"), Some(2));
        assert_eq!(ordinal_number("Fourth"), Some(4));
        assert_eq!(ordinal_number("10th"), None);
        assert_eq!(ordinal_number("season"), None);
    }

    #[test]
    fn number_extraction() {
        assert_eq!(leading_number("07.5"), Some(7));
        assert_eq!(leading_number("x07"), None);
        assert_eq!(first_number_run("- 05."), Some("05"));
        assert_eq!(first_number_run("abc"), None);
    }

    #[test]
    fn trimming() {
        assert_eq!(trim_spaces_and_dashes(" - Title - "), "Title");
        assert_eq!(trim_spaces_and_dashes("\u{2013} 05"), "05");
    }
}
