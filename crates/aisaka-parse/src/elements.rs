//! Element categories and the category → values store the parser fills in.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::text;

/// Everything the parser can extract from a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    AnimeSeason,
    AnimeSeasonPrefix,
    AnimePart,
    AnimePartPrefix,
    AnimeTitle,
    AnimeType,
    AnimeYear,
    AudioTerm,
    DeviceCompatibility,
    EpisodeNumber,
    EpisodeNumberAlt,
    EpisodePrefix,
    EpisodeTitle,
    FileChecksum,
    FileExtension,
    FileName,
    Language,
    Other,
    ReleaseGroup,
    ReleaseInformation,
    ReleaseVersion,
    Source,
    Subtitles,
    VideoResolution,
    VideoTerm,
    VolumeNumber,
    VolumePrefix,
    Unknown,
}

/// Enum order, used for stable serialization output.
const ALL_CATEGORIES: &[ElementCategory] = &[
    ElementCategory::AnimeSeason,
    ElementCategory::AnimeSeasonPrefix,
    ElementCategory::AnimePart,
    ElementCategory::AnimePartPrefix,
    ElementCategory::AnimeTitle,
    ElementCategory::AnimeType,
    ElementCategory::AnimeYear,
    ElementCategory::AudioTerm,
    ElementCategory::DeviceCompatibility,
    ElementCategory::EpisodeNumber,
    ElementCategory::EpisodeNumberAlt,
    ElementCategory::EpisodePrefix,
    ElementCategory::EpisodeTitle,
    ElementCategory::FileChecksum,
    ElementCategory::FileExtension,
    ElementCategory::FileName,
    ElementCategory::Language,
    ElementCategory::Other,
    ElementCategory::ReleaseGroup,
    ElementCategory::ReleaseInformation,
    ElementCategory::ReleaseVersion,
    ElementCategory::Source,
    ElementCategory::Subtitles,
    ElementCategory::VideoResolution,
    ElementCategory::VideoTerm,
    ElementCategory::VolumeNumber,
    ElementCategory::VolumePrefix,
];

impl ElementCategory {
    /// Whether the keyword-search pass may assign this category.
    pub fn is_searchable(self) -> bool {
        matches!(
            self,
            Self::AnimeSeasonPrefix
                | Self::AnimePartPrefix
                | Self::AnimeType
                | Self::AudioTerm
                | Self::DeviceCompatibility
                | Self::EpisodePrefix
                | Self::FileChecksum
                | Self::Language
                | Self::Other
                | Self::ReleaseGroup
                | Self::ReleaseInformation
                | Self::ReleaseVersion
                | Self::Source
                | Self::Subtitles
                | Self::VideoResolution
                | Self::VideoTerm
                | Self::VolumePrefix
        )
    }

    /// Whether at most one value may be stored. Seasons, episode numbers and
    /// the term-like categories collect multiple values (ranges emit both
    /// endpoints).
    pub fn is_singular(self) -> bool {
        !matches!(
            self,
            Self::AnimeSeason
                | Self::AnimeType
                | Self::AudioTerm
                | Self::DeviceCompatibility
                | Self::EpisodeNumber
                | Self::Language
                | Self::Other
                | Self::ReleaseInformation
                | Self::Source
                | Self::VideoTerm
        )
    }
}

/// Ordered multimap of parsed elements.
///
/// Values keep discovery order within a category. Singular categories keep
/// the first value inserted; once an episode number is committed and
/// [`Elements::set_check_alt_number`] has been called, later distinct episode
/// numbers are routed to [`ElementCategory::EpisodeNumberAlt`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elements {
    entries: Vec<(ElementCategory, String)>,
    check_alt_number: bool,
}

impl Elements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, honoring singularity and the alt-number rules.
    pub fn insert(&mut self, category: ElementCategory, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }

        if category == ElementCategory::EpisodeNumber && self.check_alt_number {
            let existing = self.get(ElementCategory::EpisodeNumber).map(str::to_owned);
            if let Some(existing) = existing {
                let old = text::leading_number(&existing);
                let new = text::leading_number(&value);
                match (old, new) {
                    (Some(old), Some(new)) if new == old => return,
                    (Some(old), Some(new)) if new < old => {
                        // Keep the lower value as the episode, demote the
                        // higher one to the alt slot.
                        self.erase(ElementCategory::EpisodeNumber);
                        self.entries.push((ElementCategory::EpisodeNumber, value));
                        self.insert(ElementCategory::EpisodeNumberAlt, existing);
                        return;
                    }
                    _ => {
                        self.insert(ElementCategory::EpisodeNumberAlt, value);
                        return;
                    }
                }
            }
        }

        if category.is_singular() && self.contains(category) {
            return;
        }
        self.entries.push((category, value));
    }

    pub fn contains(&self, category: ElementCategory) -> bool {
        self.entries.iter().any(|(c, _)| *c == category)
    }

    /// First value stored under a category.
    pub fn get(&self, category: ElementCategory) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under a category, in discovery order.
    pub fn get_all(&self, category: ElementCategory) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Remove every value stored under a category.
    pub fn erase(&mut self, category: ElementCategory) {
        self.entries.retain(|(c, _)| *c != category);
    }

    /// Remove a single category/value pair.
    pub fn remove(&mut self, category: ElementCategory, value: &str) {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|(c, v)| *c == category && v == value)
        {
            self.entries.remove(pos);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_check_alt_number(&mut self, value: bool) {
        self.check_alt_number = value;
    }

    pub fn check_alt_number(&self) -> bool {
        self.check_alt_number
    }

    // Lookup helpers for the common categories.

    pub fn anime_title(&self) -> Option<&str> {
        self.get(ElementCategory::AnimeTitle)
    }

    pub fn episode_number(&self) -> Option<&str> {
        self.get(ElementCategory::EpisodeNumber)
    }

    pub fn anime_season(&self) -> Option<&str> {
        self.get(ElementCategory::AnimeSeason)
    }

    pub fn release_group(&self) -> Option<&str> {
        self.get(ElementCategory::ReleaseGroup)
    }

    pub fn video_resolution(&self) -> Option<&str> {
        self.get(ElementCategory::VideoResolution)
    }

    pub fn file_checksum(&self) -> Option<&str> {
        self.get(ElementCategory::FileChecksum)
    }

    pub fn file_extension(&self) -> Option<&str> {
        self.get(ElementCategory::FileExtension)
    }

    pub fn episode_title(&self) -> Option<&str> {
        self.get(ElementCategory::EpisodeTitle)
    }
}

impl Serialize for Elements {
    /// Serializes as a map of category tag → list of values, skipping empty
    /// categories.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for &category in ALL_CATEGORIES {
            let values = self.get_all(category);
            if !values.is_empty() {
                map.serialize_entry(&category, &values)?;
            }
        }
        map.end()
    }
}
