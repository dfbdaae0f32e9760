//! Structured metadata extraction from anime release filenames.
//!
//! Turns a string like `[SubsPlease] Kanojo, Okarishimasu - 01 (1080p)
//! [F609B947].mkv` into a map of elements: title, episode number, release
//! group, resolution, checksum, extension, and so on. Parsing never fails;
//! whatever cannot be recognized is simply left out of the result.
//!
//! ```
//! use aisaka_parse::ElementCategory;
//!
//! let e = aisaka_parse::parse("[SubsPlease] Sousou no Frieren - 05 (1080p) [ABCD1234].mkv");
//! assert_eq!(e.anime_title(), Some("Sousou no Frieren"));
//! assert_eq!(e.episode_number(), Some("05"));
//! assert_eq!(e.release_group(), Some("SubsPlease"));
//! assert_eq!(e.get(ElementCategory::VideoResolution), Some("1080p"));
//! assert_eq!(e.file_checksum(), Some("ABCD1234"));
//! ```

pub mod elements;
pub mod keyword;
pub mod options;
pub mod parser;
mod text;
pub mod token;
pub mod tokenizer;

pub use elements::{ElementCategory, Elements};
pub use options::Options;
pub use parser::Parser;

/// Parse a filename with the default options.
pub fn parse(filename: &str) -> Elements {
    parse_with_options(filename, &Options::default())
}

/// Parse a filename with explicit options.
pub fn parse_with_options(filename: &str, options: &Options) -> Elements {
    Parser::new(options).parse(filename)
}
