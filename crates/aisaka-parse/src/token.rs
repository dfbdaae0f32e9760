//! Token sequence and the flag-filtered traversal the parser passes use.

use bitflags::bitflags;

/// What a token currently is. Passes promote `Unknown` tokens to
/// `Identifier` once their content has been consumed; `Invalid` tokens are
/// dead and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Unknown,
    Bracket,
    Delimiter,
    Identifier,
    Invalid,
}

bitflags! {
    /// Search masks for the find operations. Flags within the category
    /// group combine as alternatives (`BRACKET | IDENTIFIER` matches
    /// either); the enclosure flags constrain independently.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TokenFlags: u16 {
        const BRACKET = 1 << 0;
        const NOT_BRACKET = 1 << 1;
        const DELIMITER = 1 << 2;
        const NOT_DELIMITER = 1 << 3;
        const IDENTIFIER = 1 << 4;
        const UNKNOWN = 1 << 5;
        const NOT_ENCLOSED = 1 << 6;
        const ENCLOSED = 1 << 7;
        /// Any non-invalid token.
        const VALID = 1 << 8;
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub category: TokenCategory,
    pub content: String,
    /// Lies between a matched bracket pair.
    pub enclosed: bool,
}

impl Token {
    pub fn new(category: TokenCategory, content: impl Into<String>, enclosed: bool) -> Self {
        Self {
            category,
            content: content.into(),
            enclosed,
        }
    }

    pub fn matches(&self, flags: TokenFlags) -> bool {
        const ENCLOSURE: TokenFlags = TokenFlags::ENCLOSED.union(TokenFlags::NOT_ENCLOSED);
        if flags.intersects(ENCLOSURE) {
            let ok = (flags.contains(TokenFlags::ENCLOSED) && self.enclosed)
                || (flags.contains(TokenFlags::NOT_ENCLOSED) && !self.enclosed);
            if !ok {
                return false;
            }
        }

        const CATEGORY: TokenFlags = TokenFlags::BRACKET
            .union(TokenFlags::NOT_BRACKET)
            .union(TokenFlags::DELIMITER)
            .union(TokenFlags::NOT_DELIMITER)
            .union(TokenFlags::IDENTIFIER)
            .union(TokenFlags::UNKNOWN)
            .union(TokenFlags::VALID);
        if flags.intersects(CATEGORY) {
            let cat = self.category;
            let ok = (flags.contains(TokenFlags::BRACKET) && cat == TokenCategory::Bracket)
                || (flags.contains(TokenFlags::NOT_BRACKET) && cat != TokenCategory::Bracket)
                || (flags.contains(TokenFlags::DELIMITER) && cat == TokenCategory::Delimiter)
                || (flags.contains(TokenFlags::NOT_DELIMITER) && cat != TokenCategory::Delimiter)
                || (flags.contains(TokenFlags::IDENTIFIER) && cat == TokenCategory::Identifier)
                || (flags.contains(TokenFlags::UNKNOWN) && cat == TokenCategory::Unknown)
                || (flags.contains(TokenFlags::VALID) && cat != TokenCategory::Invalid);
            if !ok {
                return false;
            }
        }

        true
    }
}

/// Owning token container. Traversal helpers return indices so passes can
/// freely mutate tokens they located earlier.
#[derive(Debug, Default)]
pub struct Tokens {
    items: Vec<Token>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.items.push(token);
    }

    pub fn insert(&mut self, index: usize, token: Token) {
        let index = index.min(self.items.len());
        self.items.insert(index, token);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.items.iter()
    }

    /// First token matching the mask.
    pub fn find(&self, flags: TokenFlags) -> Option<usize> {
        self.items.iter().position(|t| t.matches(flags))
    }

    /// First match strictly after `from`.
    pub fn find_next(&self, from: usize, flags: TokenFlags) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .skip(from + 1)
            .find(|(_, t)| t.matches(flags))
            .map(|(i, _)| i)
    }

    /// First match strictly before `from`, scanning backwards.
    pub fn find_previous(&self, from: usize, flags: TokenFlags) -> Option<usize> {
        self.items[..from]
            .iter()
            .rposition(|t| t.matches(flags))
    }

    /// Matching indices in `[begin, end]`.
    pub fn get_list(&self, flags: TokenFlags, begin: usize, end: usize) -> Vec<usize> {
        if self.items.is_empty() || begin > end {
            return Vec::new();
        }
        let end = end.min(self.items.len() - 1);
        (begin..=end)
            .filter(|&i| flags.is_empty() || self.items[i].matches(flags))
            .collect()
    }

    /// Matching indices over the whole store.
    pub fn get_list_flag(&self, flags: TokenFlags) -> Vec<usize> {
        if self.items.is_empty() {
            return Vec::new();
        }
        self.get_list(flags, 0, self.items.len() - 1)
    }

    /// Number of steps between two indices.
    pub fn distance(&self, a: usize, b: usize) -> usize {
        b.saturating_sub(a)
    }

    /// A token is isolated when its nearest non-delimiter neighbors on both
    /// sides are brackets or absent.
    pub fn is_isolated(&self, index: usize) -> bool {
        let prev_ok = match self.find_previous(index, TokenFlags::NOT_DELIMITER) {
            Some(i) => self.items[i].category == TokenCategory::Bracket,
            None => true,
        };
        if !prev_ok {
            return false;
        }
        match self.find_next(index, TokenFlags::NOT_DELIMITER) {
            Some(i) => self.items[i].category == TokenCategory::Bracket,
            None => true,
        }
    }
}
