//! Static keyword vocabulary: normalized token → (category, options).
//!
//! Keys are NFKC-normalized and uppercased; [`normalize`] applies the same
//! transform to lookup words. File extensions live in their own table so an
//! extension like `TS` never shadows the `Other` keyword of the same spelling.

use bitflags::bitflags;
use phf::phf_map;
use unicode_normalization::UnicodeNormalization;

use crate::elements::{ElementCategory, Elements};

bitflags! {
    /// Behavior flags attached to each vocabulary entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeywordOptions: u8 {
        /// Matching the keyword promotes the token to identifier status.
        const IDENTIFIABLE = 0b0000_0001;
        /// The keyword participates in the keyword-search pass.
        const SEARCHABLE = 0b0000_0010;
        /// The keyword's content is accepted as a stored value. An invalid
        /// entry still consumes the token but emits nothing.
        const VALID = 0b0000_0100;
    }
}

/// A vocabulary entry.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub category: ElementCategory,
    pub options: KeywordOptions,
}

impl KeywordEntry {
    const fn new(category: ElementCategory) -> Self {
        Self {
            category,
            options: KeywordOptions::IDENTIFIABLE
                .union(KeywordOptions::SEARCHABLE)
                .union(KeywordOptions::VALID),
        }
    }

    const fn invalid(category: ElementCategory) -> Self {
        Self {
            category,
            options: KeywordOptions::IDENTIFIABLE.union(KeywordOptions::SEARCHABLE),
        }
    }

    const fn unidentifiable(category: ElementCategory) -> Self {
        Self {
            category,
            options: KeywordOptions::SEARCHABLE.union(KeywordOptions::VALID),
        }
    }

    const fn unidentifiable_invalid(category: ElementCategory) -> Self {
        Self {
            category,
            options: KeywordOptions::SEARCHABLE,
        }
    }

    const fn unsearchable(category: ElementCategory) -> Self {
        Self {
            category,
            options: KeywordOptions::VALID,
        }
    }

    pub fn is_identifiable(&self) -> bool {
        self.options.contains(KeywordOptions::IDENTIFIABLE)
    }

    pub fn is_searchable(&self) -> bool {
        self.options.contains(KeywordOptions::SEARCHABLE)
    }

    pub fn is_valid(&self) -> bool {
        self.options.contains(KeywordOptions::VALID)
    }
}

use crate::elements::ElementCategory as C;

static KEYWORDS: phf::Map<&'static str, KeywordEntry> = phf_map! {
    // ── Season / part prefixes ───────────────────────────────────
    "S" => KeywordEntry::unidentifiable(C::AnimeSeasonPrefix),
    "SAISON" => KeywordEntry::unidentifiable(C::AnimeSeasonPrefix),
    "SAISONS" => KeywordEntry::unidentifiable(C::AnimeSeasonPrefix),
    "SEASON" => KeywordEntry::unidentifiable(C::AnimeSeasonPrefix),
    "SEASONS" => KeywordEntry::unidentifiable(C::AnimeSeasonPrefix),
    "PART" => KeywordEntry::unidentifiable(C::AnimePartPrefix),
    "PARTS" => KeywordEntry::unidentifiable(C::AnimePartPrefix),

    // ── Anime type ───────────────────────────────────────────────
    "GEKIJOUBAN" => KeywordEntry::unidentifiable(C::AnimeType),
    "MOVIE" => KeywordEntry::unidentifiable(C::AnimeType),
    "OAD" => KeywordEntry::unidentifiable(C::AnimeType),
    "OAV" => KeywordEntry::unidentifiable(C::AnimeType),
    "ONA" => KeywordEntry::unidentifiable(C::AnimeType),
    "OVA" => KeywordEntry::unidentifiable(C::AnimeType),
    "SPECIAL" => KeywordEntry::unidentifiable(C::AnimeType),
    "SPECIALS" => KeywordEntry::unidentifiable(C::AnimeType),
    "TV" => KeywordEntry::unidentifiable(C::AnimeType),
    "番外編" => KeywordEntry::unidentifiable(C::AnimeType),
    "總集編" => KeywordEntry::unidentifiable(C::AnimeType),
    "映像特典" => KeywordEntry::unidentifiable(C::AnimeType),
    "特典" => KeywordEntry::unidentifiable(C::AnimeType),
    "特典アニメ" => KeywordEntry::unidentifiable(C::AnimeType),
    // e.g. "Yumeiro Patissiere SP Professional"
    "SP" => KeywordEntry::unsearchable(C::AnimeType),
    "ED" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "ENDING" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "NCED" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "NCOP" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "OP" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "OPED" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "OPENING" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "PREVIEW" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "PV" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "EVENT" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "TOKUTEN" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "LOGO" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "CM" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "SPOT" => KeywordEntry::unidentifiable_invalid(C::AnimeType),
    "MENU" => KeywordEntry::unidentifiable_invalid(C::AnimeType),

    // ── Audio terms ──────────────────────────────────────────────
    "2.0CH" => KeywordEntry::new(C::AudioTerm),
    "2CH" => KeywordEntry::new(C::AudioTerm),
    "5.1" => KeywordEntry::new(C::AudioTerm),
    "5.1CH" => KeywordEntry::new(C::AudioTerm),
    "DTS" => KeywordEntry::new(C::AudioTerm),
    "DTS-ES" => KeywordEntry::new(C::AudioTerm),
    "DTS5.1" => KeywordEntry::new(C::AudioTerm),
    "TRUEHD5.1" => KeywordEntry::new(C::AudioTerm),
    "AAC" => KeywordEntry::new(C::AudioTerm),
    "AACX2" => KeywordEntry::new(C::AudioTerm),
    "AACX3" => KeywordEntry::new(C::AudioTerm),
    "AACX4" => KeywordEntry::new(C::AudioTerm),
    "AC3" => KeywordEntry::new(C::AudioTerm),
    "EAC3" => KeywordEntry::new(C::AudioTerm),
    "E-AC-3" => KeywordEntry::new(C::AudioTerm),
    "FLAC" => KeywordEntry::new(C::AudioTerm),
    "FLACX2" => KeywordEntry::new(C::AudioTerm),
    "FLACX3" => KeywordEntry::new(C::AudioTerm),
    "FLACX4" => KeywordEntry::new(C::AudioTerm),
    "LOSSLESS" => KeywordEntry::new(C::AudioTerm),
    "MP3" => KeywordEntry::new(C::AudioTerm),
    "OGG" => KeywordEntry::new(C::AudioTerm),
    "VORBIS" => KeywordEntry::new(C::AudioTerm),
    "DD2" => KeywordEntry::new(C::AudioTerm),
    "DD2.0" => KeywordEntry::new(C::AudioTerm),
    "DUALAUDIO" => KeywordEntry::new(C::AudioTerm),
    "DUAL-AUDIO" => KeywordEntry::new(C::AudioTerm),

    // ── Device compatibility ─────────────────────────────────────
    "IPAD3" => KeywordEntry::new(C::DeviceCompatibility),
    "IPHONE5" => KeywordEntry::new(C::DeviceCompatibility),
    "IPOD" => KeywordEntry::new(C::DeviceCompatibility),
    "PS3" => KeywordEntry::new(C::DeviceCompatibility),
    "XBOX" => KeywordEntry::new(C::DeviceCompatibility),
    "XBOX360" => KeywordEntry::new(C::DeviceCompatibility),
    // e.g. "Android no Ano Musume"
    "ANDROID" => KeywordEntry::unidentifiable(C::DeviceCompatibility),

    // ── Episode prefixes ─────────────────────────────────────────
    "EP" => KeywordEntry::new(C::EpisodePrefix),
    "EP." => KeywordEntry::new(C::EpisodePrefix),
    "EPS" => KeywordEntry::new(C::EpisodePrefix),
    "EPS." => KeywordEntry::new(C::EpisodePrefix),
    "EPISODE" => KeywordEntry::new(C::EpisodePrefix),
    "EPISODE." => KeywordEntry::new(C::EpisodePrefix),
    "EPISODES" => KeywordEntry::new(C::EpisodePrefix),
    "CAPITULO" => KeywordEntry::new(C::EpisodePrefix),
    "EPISODIO" => KeywordEntry::new(C::EpisodePrefix),
    "EPISÓDIO" => KeywordEntry::new(C::EpisodePrefix),
    "FOLGE" => KeywordEntry::new(C::EpisodePrefix),
    // Single-letter episode markers are not valid standalone tokens.
    "E" => KeywordEntry::invalid(C::EpisodePrefix),
    "第" => KeywordEntry::invalid(C::EpisodePrefix),

    // ── Language ─────────────────────────────────────────────────
    "ENG" => KeywordEntry::new(C::Language),
    "ENGLISH" => KeywordEntry::new(C::Language),
    "ESPANOL" => KeywordEntry::new(C::Language),
    "JAP" => KeywordEntry::new(C::Language),
    "PT-BR" => KeywordEntry::new(C::Language),
    "SPANISH" => KeywordEntry::new(C::Language),
    "VOSTFR" => KeywordEntry::new(C::Language),
    // e.g. "Tokyo ESP", "Bokura ga Ita"
    "ESP" => KeywordEntry::unidentifiable(C::Language),
    "ITA" => KeywordEntry::unidentifiable(C::Language),

    // ── Other ────────────────────────────────────────────────────
    "REMASTER" => KeywordEntry::new(C::Other),
    "REMASTERED" => KeywordEntry::new(C::Other),
    "UNCENSORED" => KeywordEntry::new(C::Other),
    "UNCUT" => KeywordEntry::new(C::Other),
    "TS" => KeywordEntry::new(C::Other),
    "VFR" => KeywordEntry::new(C::Other),
    "WIDESCREEN" => KeywordEntry::new(C::Other),
    "WS" => KeywordEntry::new(C::Other),

    // ── Release groups ───────────────────────────────────────────
    "THORA" => KeywordEntry::new(C::ReleaseGroup),
    "HORRIBLESUBS" => KeywordEntry::new(C::ReleaseGroup),
    "ERAI-RAWS" => KeywordEntry::new(C::ReleaseGroup),
    "SUBSPLEASE" => KeywordEntry::new(C::ReleaseGroup),

    // ── Release information ──────────────────────────────────────
    "BATCH" => KeywordEntry::new(C::ReleaseInformation),
    "COMPLETE" => KeywordEntry::new(C::ReleaseInformation),
    "PATCH" => KeywordEntry::new(C::ReleaseInformation),
    "REMUX" => KeywordEntry::new(C::ReleaseInformation),
    // e.g. "The End of Evangelion", "Final Approach"
    "END" => KeywordEntry::unidentifiable(C::ReleaseInformation),
    "FINAL" => KeywordEntry::unidentifiable(C::ReleaseInformation),

    // ── Release version ──────────────────────────────────────────
    "V0" => KeywordEntry::new(C::ReleaseVersion),
    "V1" => KeywordEntry::new(C::ReleaseVersion),
    "V2" => KeywordEntry::new(C::ReleaseVersion),
    "V3" => KeywordEntry::new(C::ReleaseVersion),
    "V4" => KeywordEntry::new(C::ReleaseVersion),

    // ── Source ───────────────────────────────────────────────────
    "BD" => KeywordEntry::new(C::Source),
    "BDRIP" => KeywordEntry::new(C::Source),
    "BLURAY" => KeywordEntry::new(C::Source),
    "BLU-RAY" => KeywordEntry::new(C::Source),
    "DVD" => KeywordEntry::new(C::Source),
    "DVD5" => KeywordEntry::new(C::Source),
    "DVD9" => KeywordEntry::new(C::Source),
    "DVD-R2J" => KeywordEntry::new(C::Source),
    "DVDRIP" => KeywordEntry::new(C::Source),
    "DVD-RIP" => KeywordEntry::new(C::Source),
    "R2DVD" => KeywordEntry::new(C::Source),
    "R2J" => KeywordEntry::new(C::Source),
    "R2JDVD" => KeywordEntry::new(C::Source),
    "R2JDVDRIP" => KeywordEntry::new(C::Source),
    "HDTV" => KeywordEntry::new(C::Source),
    "HDTVRIP" => KeywordEntry::new(C::Source),
    "TVRIP" => KeywordEntry::new(C::Source),
    "TV-RIP" => KeywordEntry::new(C::Source),
    "WEBCAST" => KeywordEntry::new(C::Source),
    "WEBRIP" => KeywordEntry::new(C::Source),

    // ── Subtitles ────────────────────────────────────────────────
    "ASS" => KeywordEntry::new(C::Subtitles),
    "BIG5" => KeywordEntry::new(C::Subtitles),
    "DUB" => KeywordEntry::new(C::Subtitles),
    "DUBBED" => KeywordEntry::new(C::Subtitles),
    "HARDSUB" => KeywordEntry::new(C::Subtitles),
    "HARDSUBS" => KeywordEntry::new(C::Subtitles),
    "RAW" => KeywordEntry::new(C::Subtitles),
    "SOFTSUB" => KeywordEntry::new(C::Subtitles),
    "SOFTSUBS" => KeywordEntry::new(C::Subtitles),
    "SUB" => KeywordEntry::new(C::Subtitles),
    "SUBBED" => KeywordEntry::new(C::Subtitles),
    "SUBTITLED" => KeywordEntry::new(C::Subtitles),
    "MULTISUB" => KeywordEntry::new(C::Subtitles),
    "MULTI SUBS" => KeywordEntry::new(C::Subtitles),
    "MULTIPLE SUBTITLE" => KeywordEntry::new(C::Subtitles),
    "MULTIPLE SUBTITLES" => KeywordEntry::new(C::Subtitles),

    // ── Video terms ──────────────────────────────────────────────
    "23.976FPS" => KeywordEntry::new(C::VideoTerm),
    "24FPS" => KeywordEntry::new(C::VideoTerm),
    "29.97FPS" => KeywordEntry::new(C::VideoTerm),
    "30FPS" => KeywordEntry::new(C::VideoTerm),
    "60FPS" => KeywordEntry::new(C::VideoTerm),
    "120FPS" => KeywordEntry::new(C::VideoTerm),
    "8BIT" => KeywordEntry::new(C::VideoTerm),
    "8-BIT" => KeywordEntry::new(C::VideoTerm),
    "10BIT" => KeywordEntry::new(C::VideoTerm),
    "10BITS" => KeywordEntry::new(C::VideoTerm),
    "10-BIT" => KeywordEntry::new(C::VideoTerm),
    "10-BITS" => KeywordEntry::new(C::VideoTerm),
    "HI10" => KeywordEntry::new(C::VideoTerm),
    "HI10P" => KeywordEntry::new(C::VideoTerm),
    "HI444" => KeywordEntry::new(C::VideoTerm),
    "HI444P" => KeywordEntry::new(C::VideoTerm),
    "HI444PP" => KeywordEntry::new(C::VideoTerm),
    "H264" => KeywordEntry::new(C::VideoTerm),
    "H265" => KeywordEntry::new(C::VideoTerm),
    "H.264" => KeywordEntry::new(C::VideoTerm),
    "H.265" => KeywordEntry::new(C::VideoTerm),
    "X264" => KeywordEntry::new(C::VideoTerm),
    "X265" => KeywordEntry::new(C::VideoTerm),
    "X.264" => KeywordEntry::new(C::VideoTerm),
    "AVC" => KeywordEntry::new(C::VideoTerm),
    "HEVC" => KeywordEntry::new(C::VideoTerm),
    "HEVC2" => KeywordEntry::new(C::VideoTerm),
    "DIVX" => KeywordEntry::new(C::VideoTerm),
    "DIVX5" => KeywordEntry::new(C::VideoTerm),
    "DIVX6" => KeywordEntry::new(C::VideoTerm),
    "XVID" => KeywordEntry::new(C::VideoTerm),
    "AV1" => KeywordEntry::new(C::VideoTerm),
    "HDR" => KeywordEntry::new(C::VideoTerm),
    "DV" => KeywordEntry::new(C::VideoTerm),
    "DOLBY VISION" => KeywordEntry::new(C::VideoTerm),
    "AVI" => KeywordEntry::new(C::VideoTerm),
    "RMVB" => KeywordEntry::new(C::VideoTerm),
    "WMV" => KeywordEntry::new(C::VideoTerm),
    "WMV3" => KeywordEntry::new(C::VideoTerm),
    "WMV9" => KeywordEntry::new(C::VideoTerm),
    "HQ" => KeywordEntry::new(C::VideoTerm),
    "LQ" => KeywordEntry::new(C::VideoTerm),
    "HD" => KeywordEntry::new(C::VideoTerm),
    "SD" => KeywordEntry::new(C::VideoTerm),
    "4K" => KeywordEntry::new(C::VideoTerm),

    // ── Volume prefixes ──────────────────────────────────────────
    "VOL" => KeywordEntry::new(C::VolumePrefix),
    "VOL." => KeywordEntry::new(C::VolumePrefix),
    "VOLUME" => KeywordEntry::new(C::VolumePrefix),
    "VOLUMES" => KeywordEntry::new(C::VolumePrefix),
};

/// File extensions. Invalid entries are recognized (and stripped from the
/// filename) but never emitted as a `FileExtension` element.
static FILE_EXTENSIONS: phf::Map<&'static str, KeywordEntry> = phf_map! {
    "3GP" => KeywordEntry::new(C::FileExtension),
    "AVI" => KeywordEntry::new(C::FileExtension),
    "DIVX" => KeywordEntry::new(C::FileExtension),
    "FLV" => KeywordEntry::new(C::FileExtension),
    "M2TS" => KeywordEntry::new(C::FileExtension),
    "MKV" => KeywordEntry::new(C::FileExtension),
    "MOV" => KeywordEntry::new(C::FileExtension),
    "MP4" => KeywordEntry::new(C::FileExtension),
    "MPG" => KeywordEntry::new(C::FileExtension),
    "OGM" => KeywordEntry::new(C::FileExtension),
    "RM" => KeywordEntry::new(C::FileExtension),
    "RMVB" => KeywordEntry::new(C::FileExtension),
    "TS" => KeywordEntry::new(C::FileExtension),
    "WEBM" => KeywordEntry::new(C::FileExtension),
    "WMV" => KeywordEntry::new(C::FileExtension),
    "AAC" => KeywordEntry::invalid(C::FileExtension),
    "AIFF" => KeywordEntry::invalid(C::FileExtension),
    "FLAC" => KeywordEntry::invalid(C::FileExtension),
    "M4A" => KeywordEntry::invalid(C::FileExtension),
    "MP3" => KeywordEntry::invalid(C::FileExtension),
    "MKA" => KeywordEntry::invalid(C::FileExtension),
    "OGG" => KeywordEntry::invalid(C::FileExtension),
    "WAV" => KeywordEntry::invalid(C::FileExtension),
    "WMA" => KeywordEntry::invalid(C::FileExtension),
    "7Z" => KeywordEntry::invalid(C::FileExtension),
    "RAR" => KeywordEntry::invalid(C::FileExtension),
    "ZIP" => KeywordEntry::invalid(C::FileExtension),
    "ASS" => KeywordEntry::invalid(C::FileExtension),
    "SRT" => KeywordEntry::invalid(C::FileExtension),
};

/// Canonical multi-word/glued forms that `peek` carves out of bracketed
/// spans before delimiter handling. Matching is case-sensitive; the entry
/// string itself is emitted, so it doubles as the canonical stored value.
const PEEK_ENTRIES: &[(ElementCategory, &[&str])] = &[
    (C::AudioTerm, &["Dual Audio", "DualAudio"]),
    (C::VideoTerm, &["H264", "H.264", "h264", "h.264"]),
    (C::VideoResolution, &["480p", "720p", "1080p", "2160p"]),
    (C::Source, &["Blu-Ray"]),
];

/// NFKC-normalize and uppercase a lookup word.
pub fn normalize(word: &str) -> String {
    word.nfkc().collect::<String>().to_uppercase()
}

/// Exact lookup constrained to a category. `ElementCategory::Unknown` acts
/// as an open query. File extensions match their own table unconditionally.
pub fn find(word: &str, category: ElementCategory) -> Option<&'static KeywordEntry> {
    if category == ElementCategory::FileExtension {
        return FILE_EXTENSIONS.get(word);
    }
    let entry = KEYWORDS.get(word)?;
    if category == ElementCategory::Unknown || entry.category == category {
        Some(entry)
    } else {
        None
    }
}

/// Lookup probing both tables.
pub fn find_without_category(word: &str) -> Option<&'static KeywordEntry> {
    KEYWORDS.get(word).or_else(|| FILE_EXTENSIONS.get(word))
}

/// Scan a word for canonical substring forms, emit them as elements, and
/// return the consumed byte ranges sorted by position so the tokenizer can
/// split around them.
pub fn peek(word: &str, elements: &mut Elements) -> Vec<(usize, usize)> {
    let mut consumed = Vec::new();
    for (category, keywords) in PEEK_ENTRIES {
        for kw in *keywords {
            if let Some(begin) = word.find(kw) {
                elements.insert(*category, *kw);
                consumed.push((begin, begin + kw.len()));
            }
        }
    }
    consumed.sort_by_key(|(begin, end)| begin + end);
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_nfkc_and_uppercase() {
        assert_eq!(normalize("SubsPlease"), "SUBSPLEASE");
        // Fullwidth forms compose down to ASCII.
        assert_eq!(normalize("ＢＤＲｉｐ"), "BDRIP");
        assert_eq!(normalize("第"), "第");
    }

    #[test]
    fn category_constrained_find() {
        assert!(find("BD", C::Source).is_some());
        assert!(find("BD", C::AnimeType).is_none());
        assert!(find("BD", C::Unknown).is_some());
        // Extensions only come from their own table.
        assert!(find("MKV", C::FileExtension).is_some());
        assert!(find("MKV", C::Unknown).is_none());
    }

    #[test]
    fn find_without_category_probes_both_tables() {
        assert!(find_without_category("HORRIBLESUBS").is_some());
        assert!(find_without_category("MKV").is_some());
        assert!(find_without_category("NOSUCHWORD").is_none());
    }

    #[test]
    fn option_combinations() {
        let sp = find_without_category("SP").unwrap();
        assert!(!sp.is_searchable());
        assert!(!sp.is_identifiable());

        let ita = find_without_category("ITA").unwrap();
        assert!(ita.is_searchable());
        assert!(!ita.is_identifiable());
        assert!(ita.is_valid());

        let ed = find_without_category("ED").unwrap();
        assert!(!ed.is_valid());

        let rar = find_without_category("RAR").unwrap();
        assert!(!rar.is_valid());
    }

    #[test]
    fn peek_carves_known_patterns() {
        let mut e = Elements::new();
        let ranges = peek("BD 1080p", &mut e);
        assert_eq!(ranges, vec![(3, 8)]);
        assert_eq!(e.video_resolution(), Some("1080p"));

        let mut e = Elements::new();
        let ranges = peek("Hi10P Dual Audio", &mut e);
        assert_eq!(ranges, vec![(6, 16)]);
        assert_eq!(e.get(ElementCategory::AudioTerm), Some("Dual Audio"));
    }

    #[test]
    fn peek_is_case_sensitive() {
        let mut e = Elements::new();
        assert!(peek("1080P", &mut e).is_empty());
        assert!(e.is_empty());
    }
}
