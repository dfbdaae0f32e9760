//! Parser options.

use serde::{Deserialize, Serialize};

/// Knobs for a single parse. The defaults match what release filenames
/// need in practice; turning a `parse_*` flag off suppresses the
/// corresponding passes and their output categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Characters the tokenizer may treat as delimiters. The most frequent
    /// one in the input becomes the primary delimiter.
    pub allowed_delimiters: String,
    pub parse_episode_number: bool,
    pub parse_episode_title: bool,
    pub parse_file_extension: bool,
    pub parse_release_group: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allowed_delimiters: " _.&+,|".to_owned(),
            parse_episode_number: true,
            parse_episode_title: true,
            parse_file_extension: true,
            parse_release_group: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.allowed_delimiters, " _.&+,|");
        assert!(options.parse_episode_number);
        assert!(options.parse_episode_title);
        assert!(options.parse_file_extension);
        assert!(options.parse_release_group);
    }
}
