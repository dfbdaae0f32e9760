//! The pass pipeline. Each pass reads tokens still flagged `Unknown`,
//! commits identifiers, and fills the element store; the ordering below is
//! load-bearing because later passes rely on what earlier ones consumed.

mod episode;
mod season;

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::elements::{ElementCategory, Elements};
use crate::keyword;
use crate::options::Options;
use crate::text;
use crate::token::{Token, TokenCategory, TokenFlags, Tokens};
use crate::tokenizer;

static RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}(?:[pP]|[xX×]\d{3,4})$").unwrap());

static DANGLING_EPISODE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-~]\s(\d{1,2})$").unwrap());

static LONE_DASH_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s?[-~]\s?$").unwrap());

static DASH_PREFIXED_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^- (.+)$").unwrap());

static NUMBER_ONLY_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[._+-]?\d+[._+-]$").unwrap());

static SEASON_EPISODE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[Ss](\d{1,2}))?E?(\d{1,2})-(.+)$").unwrap());

const ANIME_YEAR_MIN: u32 = 1900;
const ANIME_YEAR_MAX: u32 = 2050;

/// One parse of one filename. Owns the token stream and the element store.
pub struct Parser<'a> {
    pub(crate) options: &'a Options,
    pub(crate) tokens: Tokens,
    pub(crate) elements: Elements,
}

impl<'a> Parser<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            tokens: Tokens::new(),
            elements: Elements::new(),
        }
    }

    /// Run the whole pipeline and hand back the elements.
    pub fn parse(mut self, filename: &str) -> Elements {
        let basename = self.remove_extension(filename);
        if !basename.is_empty() {
            self.elements.insert(ElementCategory::FileName, basename.clone());
        }
        self.tokens = tokenizer::tokenize(&basename, self.options, &mut self.elements);

        self.pre_process();
        self.search_for_shortened_range();
        self.search_for_keywords();
        self.search_for_isolated_numbers();
        if self.options.parse_episode_number {
            self.search_for_episode_number();
            self.search_for_episode_number_at_start();
        }
        self.search_for_anime_title();
        if self.options.parse_release_group && !self.elements.contains(ElementCategory::ReleaseGroup)
        {
            self.search_for_release_group();
        }
        if self.options.parse_episode_title
            && self.elements.contains(ElementCategory::EpisodeNumber)
        {
            self.search_for_episode_title();
        }
        self.post_process();

        self.elements
    }

    /// Split off a trailing extension found in the extension table. Invalid
    /// extensions (archives, subtitle files) are stripped but not emitted.
    fn remove_extension(&mut self, filename: &str) -> String {
        if !self.options.parse_file_extension {
            return filename.to_owned();
        }
        if let Some((base, ext)) = filename.rsplit_once('.') {
            if !base.is_empty() && !ext.is_empty() {
                let normalized = keyword::normalize(ext);
                if let Some(entry) = keyword::find(&normalized, ElementCategory::FileExtension) {
                    if entry.is_valid() {
                        self.elements.insert(ElementCategory::FileExtension, ext);
                    }
                    return base.to_owned();
                }
            }
        }
        filename.to_owned()
    }

    /// Pass 1: split tokens like `1+OVA` that glue a short number to a word.
    fn pre_process(&mut self) {
        for idx in self.tokens.get_list_flag(TokenFlags::UNKNOWN) {
            let content = self.tokens.get(idx).map(|t| t.content.clone());
            let Some(content) = content else { continue };
            let mut parts = content.splitn(3, '+');
            let (Some(left), Some(right), None) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            if text::is_numeric(left) && left.len() <= 2 && !text::is_numeric(right) {
                let right = right.to_owned();
                if let Some(token) = self.tokens.get_mut(idx) {
                    token.content.truncate(left.len());
                }
                self.tokens
                    .push(Token::new(TokenCategory::Unknown, right, true));
            }
        }
    }

    /// Pass 2: `S1-2` style shortened season ranges.
    fn search_for_shortened_range(&mut self) {
        for idx in self.tokens.get_list_flag(TokenFlags::UNKNOWN) {
            let Some(token) = self.tokens.get(idx) else { continue };
            if token.content.len() > 3
                && token.content.starts_with(['S', 's'])
                && season::SEASON_RANGE.is_match(&token.content)
            {
                self.check_season_keyword(idx);
            }
        }
    }

    /// Pass 3: keyword search over every unknown token.
    fn search_for_keywords(&mut self) {
        for idx in self.tokens.get_list_flag(TokenFlags::UNKNOWN) {
            let Some(token) = self.tokens.get(idx) else { continue };
            if token.category != TokenCategory::Unknown {
                continue; // a handler further ahead may have consumed it
            }
            let word = text::trim_spaces_and_dashes(&token.content).to_owned();
            if word.is_empty() {
                continue;
            }
            // A number can only be a CRC32 checksum at exactly 8 digits.
            if word.len() != 8 && text::is_numeric(&word) {
                continue;
            }

            let normalized = keyword::normalize(&word);
            let entry = keyword::find_without_category(&normalized);
            let mut category = ElementCategory::Unknown;
            let mut value = word.clone();

            if let Some(entry) = entry {
                category = entry.category;
                if !self.options.parse_release_group && category == ElementCategory::ReleaseGroup {
                    continue;
                }
                if !category.is_searchable() || !entry.is_searchable() {
                    continue;
                }
                if category.is_singular() && self.elements.contains(category) {
                    continue;
                }
                match category {
                    ElementCategory::AnimeSeasonPrefix => {
                        self.check_season_keyword(idx);
                        continue;
                    }
                    ElementCategory::AnimePartPrefix => {
                        self.check_part_keyword(idx);
                        continue;
                    }
                    ElementCategory::EpisodePrefix => {
                        if entry.is_valid() && self.options.parse_episode_number {
                            self.check_extent_keyword(ElementCategory::EpisodeNumber, idx);
                        }
                        continue;
                    }
                    ElementCategory::VolumePrefix => {
                        if self.options.parse_episode_number {
                            self.check_extent_keyword(ElementCategory::VolumeNumber, idx);
                        }
                        continue;
                    }
                    ElementCategory::ReleaseVersion => {
                        value = word.chars().skip(1).collect(); // number without "v"
                    }
                    _ => {}
                }
            } else if !self.elements.contains(ElementCategory::FileChecksum)
                && text::is_crc32(&word)
            {
                category = ElementCategory::FileChecksum;
            } else if !self.elements.contains(ElementCategory::VideoResolution)
                && RESOLUTION.is_match(&word)
            {
                category = ElementCategory::VideoResolution;
            }

            if category != ElementCategory::Unknown {
                trace!(token = %word, ?category, "keyword match");
                if entry.map_or(true, |e| e.is_valid()) {
                    self.elements.insert(category, value);
                }
                if entry.map_or(true, |e| e.is_identifiable()) {
                    self.set_identifier(idx);
                }
            }
        }
    }

    /// Pass 4: isolated numbers are years or resolutions.
    fn search_for_isolated_numbers(&mut self) {
        for idx in self.tokens.get_list_flag(TokenFlags::UNKNOWN) {
            let Some(token) = self.tokens.get(idx) else { continue };
            if !text::is_numeric(&token.content) || !self.tokens.is_isolated(idx) {
                continue;
            }
            let Some(n) = text::leading_number(&token.content) else {
                continue;
            };

            if (ANIME_YEAR_MIN..=ANIME_YEAR_MAX).contains(&n)
                && !self.elements.contains(ElementCategory::AnimeYear)
            {
                let content = token.content.clone();
                self.elements.insert(ElementCategory::AnimeYear, content);
                self.set_identifier(idx);
                continue;
            }

            if matches!(n, 480 | 720 | 1080)
                && !self.elements.contains(ElementCategory::VideoResolution)
            {
                let content = token.content.clone();
                self.elements
                    .insert(ElementCategory::VideoResolution, content);
                self.set_identifier(idx);
            }
        }
    }

    /// Pass 6: `05 - Episode title.mkv`. A leading number with nothing
    /// before it is the episode.
    fn search_for_episode_number_at_start(&mut self) {
        if self.elements.contains(ElementCategory::EpisodeNumber) {
            return;
        }
        let Some(first) = self.tokens.get(0) else { return };
        if first.category == TokenCategory::Unknown
            && first.content.len() > 1
            && text::is_numeric(&first.content)
        {
            let content = first.content.clone();
            self.elements.insert(ElementCategory::EpisodeNumber, content);
            self.set_identifier(0);
        }
    }

    /// Pass 7: anime title span detection.
    fn search_for_anime_title(&mut self) {
        let mut enclosed_title = false;

        let mut token_begin = self
            .tokens
            .find(TokenFlags::NOT_ENCLOSED | TokenFlags::UNKNOWN);

        // Everything is inside brackets: pick the first Latin-dominant
        // unknown after at least one skipped group.
        if token_begin.is_none() {
            enclosed_title = true;
            let mut skipped_previous_group = false;
            let mut cursor = if self.tokens.is_empty() { None } else { Some(0) };
            while let Some(at) = cursor {
                let Some(unknown) = self.tokens.find_next(at, TokenFlags::UNKNOWN) else {
                    break;
                };
                let latin = self
                    .tokens
                    .get(unknown)
                    .is_some_and(|t| text::is_mostly_latin(&t.content));
                if latin && skipped_previous_group {
                    token_begin = Some(unknown);
                    break;
                }
                cursor = self.tokens.find_next(unknown, TokenFlags::BRACKET);
                skipped_previous_group = true;
            }
        }

        let Some(begin) = token_begin else { return };

        let mut end_flags = TokenFlags::IDENTIFIER;
        if enclosed_title {
            end_flags |= TokenFlags::BRACKET;
        }

        let Some(mut end) = self.tokens.find_next(begin, end_flags) else {
            // No boundary: the rest of the stream is the title. Delimiters
            // are kept so post-processing can still recognize a leading
            // dash (`- Episode title`).
            if let Some(last) = self.last_valid_token() {
                self.build_element(ElementCategory::AnimeTitle, begin, last, true);
            }
            return;
        };

        if !enclosed_title {
            // Keep bracket pairs inside the span balanced.
            if end > 0 {
                let brackets = self.tokens.get_list(TokenFlags::BRACKET, begin, end - 1);
                if brackets.len() % 2 == 1 {
                    if let Some(&last) = brackets.last() {
                        end = last;
                    }
                }
            }

            // Walk back over trailing bracketed groups, `)` excepted so a
            // parenthesized year stays attached.
            let Some(mut back) = self.tokens.find_previous(end, TokenFlags::NOT_DELIMITER) else {
                return;
            };
            while self
                .tokens
                .get(back)
                .is_some_and(|t| t.category == TokenCategory::Bracket && t.content != ")")
            {
                let Some(bracket) = self.tokens.find_previous(back, TokenFlags::BRACKET) else {
                    break;
                };
                end = bracket;
                match self.tokens.find_previous(end, TokenFlags::NOT_DELIMITER) {
                    Some(prev) => back = prev,
                    None => break,
                }
            }
        }

        let Some(end) = self.tokens.find_previous(end, TokenFlags::VALID) else {
            return;
        };
        self.build_element(ElementCategory::AnimeTitle, begin, end, false);
    }

    /// Pass 8: release group from the first fully bracketed unknown group.
    fn search_for_release_group(&mut self) {
        let mut token_end: Option<usize> = None;
        loop {
            let token_begin = match token_end {
                Some(end) => self
                    .tokens
                    .find_next(end, TokenFlags::ENCLOSED | TokenFlags::UNKNOWN),
                None => self.tokens.find(TokenFlags::ENCLOSED | TokenFlags::UNKNOWN),
            };
            let Some(begin) = token_begin else { return };

            let Some(end) = self
                .tokens
                .find_next(begin, TokenFlags::BRACKET | TokenFlags::IDENTIFIER)
            else {
                return;
            };
            token_end = Some(end);

            if self.tokens.get(end).map(|t| t.category) != Some(TokenCategory::Bracket) {
                continue;
            }
            if let Some(prev) = self.tokens.find_previous(begin, TokenFlags::NOT_DELIMITER) {
                if self.tokens.get(prev).map(|t| t.category) != Some(TokenCategory::Bracket) {
                    continue;
                }
            }

            let Some(end) = self.tokens.find_previous(end, TokenFlags::VALID) else {
                return;
            };

            // A bracketed group that actually says "Season 2"/"Part 1"/"OVA"
            // is not a release group; dispatch it instead.
            if self.dispatch_bracketed_keyword(begin, end) {
                return;
            }

            self.build_element(ElementCategory::ReleaseGroup, begin, end, true);
            return;
        }
    }

    fn dispatch_bracketed_keyword(&mut self, begin: usize, end: usize) -> bool {
        for idx in self.tokens.get_list(TokenFlags::VALID, begin, end) {
            let Some(token) = self.tokens.get(idx) else { continue };
            let normalized = keyword::normalize(&token.content);
            let season = keyword::find(&normalized, ElementCategory::AnimeSeasonPrefix).is_some();
            let part = keyword::find(&normalized, ElementCategory::AnimePartPrefix).is_some();
            let episode = keyword::find(&normalized, ElementCategory::EpisodePrefix).is_some();
            let anime_type = keyword::find(&normalized, ElementCategory::AnimeType).is_some();
            if !(season || part || episode || anime_type) {
                continue;
            }

            if let Some(t) = self.tokens.get_mut(begin) {
                t.category = TokenCategory::Invalid;
            }
            if let Some(t) = self.tokens.get_mut(end) {
                t.category = TokenCategory::Invalid;
            }

            if season {
                self.check_season_keyword(idx);
            } else if part {
                self.check_part_keyword(idx);
            } else if episode {
                if self.options.parse_episode_number {
                    self.search_for_episode_number();
                }
            } else {
                let content = self
                    .tokens
                    .get(idx)
                    .map(|t| t.content.clone())
                    .unwrap_or_default();
                self.elements.insert(ElementCategory::AnimeType, content);
                self.set_identifier(idx);
            }
            return true;
        }
        false
    }

    /// Pass 9: episode title from the leftover free text after the episode.
    fn search_for_episode_title(&mut self) {
        let mut token_end: Option<usize> = None;
        loop {
            let token_begin = match token_end {
                Some(end) => self
                    .tokens
                    .find_next(end, TokenFlags::NOT_ENCLOSED | TokenFlags::UNKNOWN),
                None => self
                    .tokens
                    .find(TokenFlags::NOT_ENCLOSED | TokenFlags::UNKNOWN),
            };
            let Some(begin) = token_begin else { return };

            let end = self
                .tokens
                .find_next(begin, TokenFlags::BRACKET | TokenFlags::IDENTIFIER)
                .unwrap_or(self.tokens.len().saturating_sub(1));
            token_end = Some(end);

            let is_dash_begin = self
                .tokens
                .get(begin)
                .is_some_and(|t| text::is_dash(&t.content));
            if self.tokens.distance(begin, end) <= 2 && is_dash_begin {
                continue;
            }

            let mut end = end;
            if self.tokens.get(end).map(|t| t.category) == Some(TokenCategory::Bracket) {
                if let Some(prev) = self.tokens.find_previous(end, TokenFlags::VALID) {
                    end = prev;
                }
            }

            self.build_element(ElementCategory::EpisodeTitle, begin, end, false);
            return;
        }
    }

    /// Pass 10: clean up titles that swallowed numbers or type keywords.
    fn post_process(&mut self) {
        // "- 05" stored as an episode title is really an episode number.
        if let Some(title) = self.elements.get(ElementCategory::EpisodeTitle) {
            if let Some(caps) = DANGLING_EPISODE_TITLE.captures(title) {
                let number = caps[1].to_owned();
                self.elements.erase(ElementCategory::EpisodeTitle);
                if self.options.parse_episode_number {
                    self.elements.insert(ElementCategory::EpisodeNumber, number);
                }
            }
        }

        // A bare dash is not a title.
        if let Some(title) = self.elements.get(ElementCategory::EpisodeTitle) {
            if LONE_DASH_TITLE.is_match(title) {
                self.elements.erase(ElementCategory::EpisodeTitle);
            }
        }

        // An episode title that is (or contains) an anime-type keyword wins
        // over the type element.
        if self.elements.contains(ElementCategory::AnimeType)
            && self.elements.contains(ElementCategory::EpisodeTitle)
        {
            let episode_title = self
                .elements
                .get(ElementCategory::EpisodeTitle)
                .unwrap_or_default()
                .to_owned();
            let anime_types: Vec<String> = self
                .elements
                .get_all(ElementCategory::AnimeType)
                .into_iter()
                .map(str::to_owned)
                .collect();
            for anime_type in anime_types {
                if anime_type == episode_title {
                    self.elements.erase(ElementCategory::EpisodeTitle);
                } else if episode_title.contains(&anime_type) {
                    let normalized = keyword::normalize(&anime_type);
                    if keyword::find(&normalized, ElementCategory::AnimeType).is_some() {
                        self.elements.remove(ElementCategory::AnimeType, &anime_type);
                    }
                }
            }
        }

        // Episode title mistaken for the anime title.
        if self.elements.contains(ElementCategory::AnimeTitle)
            && !self.elements.contains(ElementCategory::EpisodeTitle)
        {
            let title = self
                .elements
                .get(ElementCategory::AnimeTitle)
                .unwrap_or_default()
                .to_owned();
            if let Some(caps) = DASH_PREFIXED_TITLE.captures(&title) {
                let tail = caps[1].to_owned();
                self.elements.erase(ElementCategory::AnimeTitle);
                self.elements.insert(ElementCategory::EpisodeTitle, tail);
            } else if NUMBER_ONLY_TITLE.is_match(&title) {
                if let Some(number) = text::first_number_run(&title) {
                    let number = number.to_owned();
                    self.elements.erase(ElementCategory::AnimeTitle);
                    if self.options.parse_episode_number {
                        self.elements.insert(ElementCategory::EpisodeNumber, number);
                    }
                }
            }
        }

        // "S01E01-Episode title" that ended up as the anime title. Skipped
        // when both season and episode are already known.
        if self.options.parse_episode_number
            && self.elements.contains(ElementCategory::AnimeTitle)
            && !(self.elements.contains(ElementCategory::AnimeSeason)
                && self.elements.contains(ElementCategory::EpisodeNumber))
        {
            let title = self
                .elements
                .get(ElementCategory::AnimeTitle)
                .unwrap_or_default()
                .to_owned();
            if let Some(caps) = SEASON_EPISODE_TITLE.captures(&title) {
                if let Some(season) = caps.get(1) {
                    self.elements
                        .insert(ElementCategory::AnimeSeason, season.as_str());
                }
                let episode = caps[2].to_owned();
                let episode_title = caps[3].to_owned();
                self.elements.insert(ElementCategory::EpisodeNumber, episode);
                self.elements
                    .insert(ElementCategory::EpisodeTitle, episode_title);
                self.elements.erase(ElementCategory::AnimeTitle);
            }
        }
    }

    /// Concatenate the tokens in `[begin, end]` into one element value.
    /// Unknown tokens are consumed, brackets pass through, and delimiters
    /// collapse to spaces unless `keep_delimiters` (commas and ampersands
    /// always survive).
    pub(crate) fn build_element(
        &mut self,
        category: ElementCategory,
        begin: usize,
        end: usize,
        keep_delimiters: bool,
    ) {
        let mut value = String::new();
        for idx in self.tokens.get_list(TokenFlags::empty(), begin, end) {
            let Some(token) = self.tokens.get(idx) else { continue };
            match token.category {
                TokenCategory::Unknown => {
                    value.push_str(&token.content);
                    self.set_identifier(idx);
                }
                TokenCategory::Bracket => value.push_str(&token.content),
                TokenCategory::Delimiter => {
                    let delimiter = token.content.as_str();
                    if keep_delimiters {
                        value.push_str(delimiter);
                    } else if idx != begin && idx != end {
                        match delimiter {
                            "," | "&" => value.push_str(delimiter),
                            _ => value.push(' '),
                        }
                    }
                }
                _ => {}
            }
        }

        if !keep_delimiters {
            value = text::trim_spaces_and_dashes(&value).to_owned();
        }

        let value = value.trim_matches(' ');
        if !value.is_empty() {
            self.elements.insert(category, value);
        }
    }

    pub(crate) fn set_identifier(&mut self, idx: usize) {
        if let Some(token) = self.tokens.get_mut(idx) {
            token.category = TokenCategory::Identifier;
        }
    }

    fn last_valid_token(&self) -> Option<usize> {
        (0..self.tokens.len())
            .rev()
            .find(|&i| self.tokens.get(i).is_some_and(|t| t.matches(TokenFlags::VALID)))
    }
}

#[cfg(test)]
mod tests {
    use crate::elements::ElementCategory;
    use crate::{parse, parse_with_options, Options};

    const SINGULAR_SPOT_CHECKS: &[ElementCategory] = &[
        ElementCategory::AnimeTitle,
        ElementCategory::EpisodeTitle,
        ElementCategory::AnimeYear,
        ElementCategory::FileChecksum,
        ElementCategory::FileExtension,
        ElementCategory::ReleaseGroup,
        ElementCategory::ReleaseVersion,
        ElementCategory::VideoResolution,
    ];

    fn assert_singular_invariant(filename: &str) {
        let e = parse(filename);
        for &category in SINGULAR_SPOT_CHECKS {
            assert!(
                e.get_all(category).len() <= 1,
                "{category:?} held more than one value for {filename}"
            );
        }
    }

    // ── End-to-end scenarios ─────────────────────────────────────

    #[test]
    fn subsplease_standard_format() {
        let e = parse("[SubsPlease] Kanojo, Okarishimasu - 01 (1080p) [F609B947].mkv");
        assert_eq!(e.anime_title(), Some("Kanojo, Okarishimasu"));
        assert_eq!(e.episode_number(), Some("01"));
        assert_eq!(e.video_resolution(), Some("1080p"));
        assert_eq!(e.file_checksum(), Some("F609B947"));
        assert_eq!(e.release_group(), Some("SubsPlease"));
        assert_eq!(e.file_extension(), Some("mkv"));
    }

    #[test]
    fn erai_raws_with_season_episode_and_subs() {
        let e = parse("[Erai-raws] Sono Bisque Doll wa Koi wo Suru - S01E02 [1080p][Multiple Subtitle].mkv");
        assert_eq!(e.anime_title(), Some("Sono Bisque Doll wa Koi wo Suru"));
        assert_eq!(e.anime_season(), Some("01"));
        assert_eq!(e.episode_number(), Some("02"));
        assert_eq!(e.release_group(), Some("Erai-raws"));
        assert_eq!(e.video_resolution(), Some("1080p"));
        assert_eq!(
            e.get(ElementCategory::Subtitles),
            Some("Multiple Subtitle")
        );
    }

    #[test]
    fn unidentifiable_language_stays_in_title() {
        let e = parse("Bokura ga Ita - 01.mkv");
        assert_eq!(e.anime_title(), Some("Bokura ga Ita"));
        assert_eq!(e.episode_number(), Some("01"));
        assert_eq!(e.file_extension(), Some("mkv"));
    }

    #[test]
    fn unsearchable_sp_stays_in_title() {
        let e = parse("Yumeiro Patissiere SP Professional - 01.mkv");
        assert_eq!(e.anime_title(), Some("Yumeiro Patissiere SP Professional"));
        assert_eq!(e.episode_number(), Some("01"));
        assert!(!e.contains(ElementCategory::AnimeType));
    }

    #[test]
    fn horriblesubs_720p() {
        let e = parse("[HorribleSubs] Shigatsu wa Kimi no Uso - 07 [720p].mkv");
        assert_eq!(e.anime_title(), Some("Shigatsu wa Kimi no Uso"));
        assert_eq!(e.episode_number(), Some("07"));
        assert_eq!(e.video_resolution(), Some("720p"));
        assert_eq!(e.release_group(), Some("HorribleSubs"));
    }

    #[test]
    fn season_range_with_source() {
        let e = parse("Seasons 1-2 [BD 1080p]");
        assert_eq!(e.get_all(ElementCategory::AnimeSeason), vec!["1", "2"]);
        assert_eq!(e.get(ElementCategory::Source), Some("BD"));
        assert_eq!(e.video_resolution(), Some("1080p"));
    }

    // ── Tokenizer/delimiter variants ─────────────────────────────

    #[test]
    fn underscore_delimited_filename() {
        let e = parse("[HorribleSubs]_Naruto_Shippuuden_-_500_[720p].mkv");
        assert_eq!(e.anime_title(), Some("Naruto Shippuuden"));
        assert_eq!(e.episode_number(), Some("500"));
        assert_eq!(e.release_group(), Some("HorribleSubs"));
    }

    #[test]
    fn semicolon_is_not_a_delimiter() {
        let e = parse("Steins;Gate - 01 [1080p].mkv");
        assert_eq!(e.anime_title(), Some("Steins;Gate"));
        assert_eq!(e.episode_number(), Some("01"));
    }

    #[test]
    fn cjk_bracket_group() {
        let e = parse("【SubGroup】 Title - 05.mkv");
        assert_eq!(e.release_group(), Some("SubGroup"));
        assert_eq!(e.episode_number(), Some("05"));
    }

    // ── Episode patterns ─────────────────────────────────────────

    #[test]
    fn combined_season_and_episode() {
        let e = parse("[Group] Title S01E05 [1080p].mkv");
        assert_eq!(e.anime_season(), Some("01"));
        assert_eq!(e.episode_number(), Some("05"));
        assert_eq!(e.anime_title(), Some("Title"));
    }

    #[test]
    fn version_suffix() {
        let e = parse("[Group] Title - 05v2 [720p].mkv");
        assert_eq!(e.episode_number(), Some("05"));
        assert_eq!(e.get(ElementCategory::ReleaseVersion), Some("2"));
    }

    #[test]
    fn episode_range() {
        let e = parse("[Group] Title - 01-13 [1080p].mkv");
        assert_eq!(
            e.get_all(ElementCategory::EpisodeNumber),
            vec!["01", "13"]
        );
    }

    #[test]
    fn fractional_episode_stored_verbatim() {
        let e = parse("[Group] Title - 07.5 [1080p].mkv");
        assert_eq!(e.episode_number(), Some("07.5"));
    }

    #[test]
    fn hash_prefixed_episode() {
        let e = parse("Title #03.mkv");
        assert_eq!(e.episode_number(), Some("03"));
    }

    #[test]
    fn japanese_counter() {
        let e = parse("[Group] Title 第05話 [1080p].mkv");
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn glued_episode_prefix() {
        let e = parse("[Group] Title EP05 [1080p].mkv");
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn episode_prefix_keyword_with_separate_number() {
        let e = parse("[Group] Title Episode 12 [1080p].mkv");
        assert_eq!(e.episode_number(), Some("12"));
    }

    #[test]
    fn glued_season_prefix() {
        let e = parse("[Group] Title S2 - 05 [1080p].mkv");
        assert_eq!(e.anime_season(), Some("2"));
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn alt_number_from_versioned_second_value() {
        let e = parse("Title Ep.5 - 12v2 [720p].mkv");
        assert_eq!(e.episode_number(), Some("5"));
        assert_eq!(e.get(ElementCategory::EpisodeNumberAlt), Some("12"));
        assert_eq!(e.get(ElementCategory::ReleaseVersion), Some("2"));
    }

    #[test]
    fn episode_at_start() {
        let e = parse("05 - Episode title.mkv");
        assert_eq!(e.episode_number(), Some("05"));
        assert_eq!(e.episode_title(), Some("Episode title"));
        assert!(!e.contains(ElementCategory::AnimeTitle));
    }

    #[test]
    fn number_in_title_not_taken_as_episode() {
        let e = parse("86 - Eighty Six - 01.mkv");
        assert_eq!(e.anime_title(), Some("86 - Eighty Six"));
        assert_eq!(e.episode_number(), Some("01"));
    }

    // ── Season and part keywords ─────────────────────────────────

    #[test]
    fn ordinal_season() {
        let e = parse("[Group] Title 4th Season - 05 [1080p].mkv");
        assert_eq!(e.anime_season(), Some("4"));
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn season_word_with_number() {
        let e = parse("[Group] Title Season 2 - 05 [1080p].mkv");
        assert_eq!(e.anime_season(), Some("2"));
    }

    #[test]
    fn shortened_season_range() {
        let e = parse("Title S1-2 [BD].mkv");
        assert_eq!(e.get_all(ElementCategory::AnimeSeason), vec!["1", "2"]);
    }

    #[test]
    fn part_keyword() {
        let e = parse("[Group] Title Part 2 - 05 [1080p].mkv");
        assert_eq!(e.get(ElementCategory::AnimePart), Some("2"));
    }

    #[test]
    fn volume_prefix() {
        let e = parse("[Group] Title Vol.3 - 05 [1080p].mkv");
        assert_eq!(e.get(ElementCategory::VolumeNumber), Some("3"));
        assert_eq!(e.episode_number(), Some("05"));
    }

    // ── Isolated numbers ─────────────────────────────────────────

    #[test]
    fn isolated_year() {
        let e = parse("[Group] Title (2016) - 05 [1080p].mkv");
        assert_eq!(e.get(ElementCategory::AnimeYear), Some("2016"));
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn isolated_resolution_number() {
        let e = parse("[Group] Title - 05 [1080].mkv");
        assert_eq!(e.video_resolution(), Some("1080"));
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn resolution_width_x_height() {
        let e = parse("[Group] Title - 05 [1920x1080].mkv");
        assert_eq!(e.video_resolution(), Some("1920x1080"));
    }

    // ── Keyword handling ─────────────────────────────────────────

    #[test]
    fn keywords_keep_original_case() {
        let e = parse("[Group] Title - 05 [BDRip][Hi10P].mkv");
        assert_eq!(e.get(ElementCategory::Source), Some("BDRip"));
        assert_eq!(e.get_all(ElementCategory::VideoTerm), vec!["Hi10P"]);
    }

    #[test]
    fn plus_glued_type_is_split() {
        let e = parse("[Group] Title - 1+OVA [720p].mkv");
        assert!(e
            .get_all(ElementCategory::AnimeType)
            .contains(&"OVA"));
        assert_eq!(e.episode_number(), Some("1"));
    }

    #[test]
    fn invalid_extension_stripped_but_not_emitted() {
        let e = parse("[Group] Title - 05.ass");
        assert!(!e.contains(ElementCategory::FileExtension));
        assert_eq!(e.get(ElementCategory::FileName), Some("[Group] Title - 05"));
    }

    #[test]
    fn standalone_release_version() {
        let e = parse("[Group] Title - 05 v2 [720p].mkv");
        assert_eq!(e.get(ElementCategory::ReleaseVersion), Some("2"));
    }

    // ── Options ──────────────────────────────────────────────────

    #[test]
    fn episode_number_parsing_disabled() {
        let options = Options {
            parse_episode_number: false,
            ..Options::default()
        };
        let e = parse_with_options("[Group] Title - 05 Vol.3 EP06 [720p].mkv", &options);
        assert!(!e.contains(ElementCategory::EpisodeNumber));
        assert!(!e.contains(ElementCategory::EpisodeNumberAlt));
        assert!(!e.contains(ElementCategory::VolumeNumber));
    }

    #[test]
    fn release_group_parsing_disabled() {
        let options = Options {
            parse_release_group: false,
            ..Options::default()
        };
        let e = parse_with_options("[SomeGroup] Title - 05 [720p].mkv", &options);
        assert!(!e.contains(ElementCategory::ReleaseGroup));
    }

    #[test]
    fn episode_title_parsing_disabled() {
        let options = Options {
            parse_episode_title: false,
            ..Options::default()
        };
        let e = parse_with_options("[Group] Title - 05 - The Episode Name [720p].mkv", &options);
        assert!(!e.contains(ElementCategory::EpisodeTitle));
    }

    #[test]
    fn file_extension_parsing_disabled() {
        let options = Options {
            parse_file_extension: false,
            ..Options::default()
        };
        let e = parse_with_options("[Group] Title - 05.mkv", &options);
        assert!(!e.contains(ElementCategory::FileExtension));
    }

    // ── Episode/release-group interplay ──────────────────────────

    #[test]
    fn episode_title_extraction() {
        let e = parse("[Group] Title - 05 - The Episode Name [720p].mkv");
        assert_eq!(e.anime_title(), Some("Title"));
        assert_eq!(e.episode_number(), Some("05"));
        assert_eq!(e.episode_title(), Some("The Episode Name"));
    }

    #[test]
    fn unbracketed_group_is_not_claimed() {
        let e = parse("Title - 05 [720p].mkv");
        assert!(!e.contains(ElementCategory::ReleaseGroup));
    }

    #[test]
    fn title_inside_brackets() {
        let e = parse("[不明][Anime Title][01][1080p]");
        assert_eq!(e.anime_title(), Some("Anime Title"));
        assert_eq!(e.episode_number(), Some("01"));
    }

    // ── Degradation and invariants ───────────────────────────────

    #[test]
    fn empty_input_yields_empty_elements() {
        let e = parse("");
        assert!(e.is_empty());
    }

    #[test]
    fn delimiter_only_input() {
        let e = parse("___");
        assert!(!e.contains(ElementCategory::AnimeTitle));
    }

    #[test]
    fn unmatched_bracket_closes_at_end() {
        let e = parse("[Group Title - 05");
        assert_eq!(e.episode_number(), Some("05"));
    }

    #[test]
    fn parsing_is_pure() {
        let input = "[SubsPlease] Kanojo, Okarishimasu - 01 (1080p) [F609B947].mkv";
        assert_eq!(parse(input), parse(input));
    }

    #[test]
    fn singular_categories_hold_at_most_one_value() {
        for filename in [
            "[SubsPlease] Kanojo, Okarishimasu - 01 (1080p) [F609B947].mkv",
            "[Erai-raws] Sono Bisque Doll wa Koi wo Suru - S01E02 [1080p][Multiple Subtitle].mkv",
            "Seasons 1-2 [BD 1080p]",
            "[Group] Title - 01-13 [1080p].mkv",
        ] {
            assert_singular_invariant(filename);
        }
    }

    #[test]
    fn filename_element_always_present() {
        let e = parse("[Group] Title - 05 [720p].mkv");
        assert_eq!(
            e.get(ElementCategory::FileName),
            Some("[Group] Title - 05 [720p]")
        );
    }
}
