//! Media catalog
//!
//! The catalog owns the classified contents of one folder and the current
//! selection. It is a plain value: whoever owns it serializes calls to
//! `load` and the `select*` methods.

use std::cmp::Ordering;
use std::fmt;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::error::OutOfRangeError;
use crate::index::ExtensionPolicy;
use crate::subtitle::{convert_matches, find_matches, TrackSet};
use crate::types::{Category, FileEntry};

/// A selected video and the subtitles paired with it
#[derive(Debug, Clone)]
pub struct SelectedVideo {
    pub index: usize,
    pub video: FileEntry,
    /// Matched subtitles, in discovery order
    pub matches: Vec<FileEntry>,
}

impl SelectedVideo {
    /// Read and convert the matched subtitles.
    ///
    /// Returns a fresh value and never touches the catalog, so a caller that
    /// has moved on can simply drop the result.
    pub async fn convert_tracks(&self) -> TrackSet {
        convert_matches(self.video.base_name(), &self.matches).await
    }
}

/// Notice for the presentation layer after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogNotice {
    /// Nothing playable or unsupported was found
    NoPlayableMedia,
    /// Only videos in formats the browser cannot play were found
    OnlyUnsupported { count: usize },
    /// Some videos were left out of the list
    SkippedUnsupported { count: usize },
}

impl fmt::Display for CatalogNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogNotice::NoPlayableMedia => write!(f, "No videos found in this folder."),
            CatalogNotice::OnlyUnsupported { count } => write!(
                f,
                "Found {} video(s) in formats the browser cannot play (MKV, AVI, WMV, FLV). \
                 Convert them to MP4, WebM, or M4V first.",
                count
            ),
            CatalogNotice::SkippedUnsupported { count } => write!(
                f,
                "{} video(s) skipped (format not supported by the browser)",
                count
            ),
        }
    }
}

/// Counts reported after a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub session_id: String,
    pub video_count: usize,
    pub subtitle_count: usize,
    pub unsupported_count: usize,
    pub ignored_count: usize,
}

impl CatalogSummary {
    pub fn notice(&self) -> Option<CatalogNotice> {
        match (self.video_count, self.unsupported_count) {
            (0, 0) => Some(CatalogNotice::NoPlayableMedia),
            (0, count) => Some(CatalogNotice::OnlyUnsupported { count }),
            (_, 0) => None,
            (_, count) => Some(CatalogNotice::SkippedUnsupported { count }),
        }
    }
}

/// Classified folder contents plus the current selection
#[derive(Debug, Clone)]
pub struct Catalog {
    policy: ExtensionPolicy,
    session_id: String,
    videos: Vec<FileEntry>,
    subtitles: Vec<FileEntry>,
    unsupported: Vec<FileEntry>,
    ignored_count: usize,
    selected: Option<usize>,
}

impl Catalog {
    /// Create an empty catalog classifying with `policy`
    pub fn new(policy: ExtensionPolicy) -> Self {
        Self {
            policy,
            session_id: Uuid::new_v4().to_string(),
            videos: Vec::new(),
            subtitles: Vec::new(),
            unsupported: Vec::new(),
            ignored_count: 0,
            selected: None,
        }
    }

    /// Create a catalog and load `files` into it
    pub fn from_files<I>(policy: ExtensionPolicy, files: I) -> Self
    where
        I: IntoIterator<Item = FileEntry>,
    {
        let mut catalog = Self::new(policy);
        catalog.load(files);
        catalog
    }

    /// Replace the contents with `files` and clear the selection.
    ///
    /// Videos are sorted by name; subtitles keep discovery order.
    pub fn load<I>(&mut self, files: I) -> CatalogSummary
    where
        I: IntoIterator<Item = FileEntry>,
    {
        self.videos.clear();
        self.subtitles.clear();
        self.unsupported.clear();
        self.ignored_count = 0;
        self.selected = None;
        self.session_id = Uuid::new_v4().to_string();

        for file in files {
            match self.policy.classify(&file.name) {
                Category::Video => self.videos.push(file),
                Category::Subtitle => self.subtitles.push(file),
                Category::UnsupportedVideo => self.unsupported.push(file),
                Category::Ignored => {
                    tracing::debug!("Ignoring {:?}", file.name);
                    self.ignored_count += 1;
                }
            }
        }

        self.videos.sort_by(compare_entries);

        let summary = self.summary();
        tracing::info!(
            "Loaded catalog {}: videos={}, subtitles={}, unsupported={}, ignored={}",
            summary.session_id,
            summary.video_count,
            summary.subtitle_count,
            summary.unsupported_count,
            summary.ignored_count
        );
        summary
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            session_id: self.session_id.clone(),
            video_count: self.videos.len(),
            subtitle_count: self.subtitles.len(),
            unsupported_count: self.unsupported.len(),
            ignored_count: self.ignored_count,
        }
    }

    pub fn policy(&self) -> &ExtensionPolicy {
        &self.policy
    }

    /// Id minted on every load
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn videos(&self) -> &[FileEntry] {
        &self.videos
    }

    pub fn subtitles(&self) -> &[FileEntry] {
        &self.subtitles
    }

    pub fn unsupported(&self) -> &[FileEntry] {
        &self.unsupported
    }

    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_video(&self) -> Option<&FileEntry> {
        self.selected.and_then(|i| self.videos.get(i))
    }

    /// Select the video at `index`
    pub fn select(&mut self, index: usize) -> Result<SelectedVideo, OutOfRangeError> {
        let video = self
            .videos
            .get(index)
            .cloned()
            .ok_or_else(|| OutOfRangeError::new(index, self.videos.len()))?;

        self.selected = Some(index);
        let matches = find_matches(video.base_name(), &self.subtitles);

        tracing::info!(
            "Selected {} {:?} ({} matching subtitles)",
            index,
            video.name,
            matches.len()
        );

        Ok(SelectedVideo {
            index,
            video,
            matches,
        })
    }

    /// Select with a signed index as received from user input
    pub fn select_signed(&mut self, index: i64) -> Result<SelectedVideo, OutOfRangeError> {
        let idx = usize::try_from(index).map_err(|_| OutOfRangeError {
            index,
            len: self.videos.len(),
        })?;
        self.select(idx)
    }

    /// Select the next video; `None` at the end of the list.
    ///
    /// With nothing selected, the first video is selected.
    pub fn select_next(&mut self) -> Option<SelectedVideo> {
        let next = match self.selected {
            Some(i) => i + 1,
            None => 0,
        };
        if next >= self.videos.len() {
            tracing::debug!("No video after {:?}", self.selected);
            return None;
        }
        self.select(next).ok()
    }

    /// Select the previous video; `None` at the start of the list or with
    /// nothing selected.
    pub fn select_previous(&mut self) -> Option<SelectedVideo> {
        let prev = self.selected?.checked_sub(1);
        match prev {
            Some(i) => self.select(i).ok(),
            None => {
                tracing::debug!("No video before {:?}", self.selected);
                None
            }
        }
    }
}

/// Name collation, then size.
fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    compare_names(&a.name, &b.name).then(a.size_bytes.cmp(&b.size_bytes))
}

/// Locale-style name collation.
///
/// Primary: base letters with accents and case removed, where punctuation
/// and symbols sort before digits and digits before letters. Secondary:
/// accents. Tertiary: case, lowercase first. Exact spelling breaks any
/// remaining tie.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| secondary_key(a).cmp(secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(tertiary_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(name: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (char_class(c), c))
}

fn secondary_key(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

fn tertiary_key(name: &str) -> impl Iterator<Item = bool> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| c.is_uppercase())
}

/// Collation class: spaces, punctuation and symbols, then digits, then letters
fn char_class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PolicyProfile;
    use bytes::Bytes;

    fn entry(name: &str) -> FileEntry {
        FileEntry::in_memory(name, Bytes::new())
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn paired(files: &[&str]) -> Catalog {
        Catalog::from_files(
            ExtensionPolicy::from_profile(PolicyProfile::Paired),
            files.iter().map(|n| entry(n)),
        )
    }

    #[test]
    fn test_load_end_to_end_selection() {
        let mut catalog = paired(&["b.mp4", "a.mp4", "a.srt"]);
        assert_eq!(catalog.selected_index(), None);

        let selected = catalog.select(0).unwrap();
        assert_eq!(selected.video.name, "a.mp4");
        assert_eq!(names(&selected.matches), vec!["a.srt"]);
        assert_eq!(catalog.selected_index(), Some(0));
    }

    #[test]
    fn test_load_order_independent() {
        let files = ["Zeta.mp4", "alpha.webm", "Beta.mov", "beta.mp4", "x.srt", "gamma.m4v"];
        let reference = paired(&files);

        let mut reversed = files;
        reversed.reverse();
        assert_eq!(names(paired(&reversed).videos()), names(reference.videos()));

        for shift in 1..files.len() {
            let mut rotated = files;
            rotated.rotate_left(shift);
            assert_eq!(names(paired(&rotated).videos()), names(reference.videos()));
        }

        assert_eq!(
            names(reference.videos()),
            vec!["alpha.webm", "Beta.mov", "beta.mp4", "gamma.m4v", "Zeta.mp4"]
        );
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Banana", "apple"), Ordering::Greater);
        assert_eq!(compare_names("b", "B"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_names_accents() {
        assert_eq!(compare_names("\u{e9}lan.mp4", "zeta.mp4"), Ordering::Less);
        assert_eq!(compare_names("\u{e9}lan.mp4", "elan.mp4"), Ordering::Greater);
        assert_eq!(compare_names("\u{e9}lan.mp4", "elbow.mp4"), Ordering::Less);
        // precomposed and decomposed spellings collate next to each other
        assert_eq!(compare_names("e\u{301}lan.mp4", "\u{c9}lan.mp4"), Ordering::Less);
    }

    #[test]
    fn test_compare_names_punctuation_before_digits() {
        assert_eq!(compare_names("a_b.mp4", "a1.mp4"), Ordering::Less);
        assert_eq!(compare_names("a-b.mp4", "a1.mp4"), Ordering::Less);
        assert_eq!(compare_names("a1.mp4", "ab.mp4"), Ordering::Less);
        assert_eq!(compare_names("a b.mp4", "ab.mp4"), Ordering::Less);
    }

    #[test]
    fn test_load_sorts_accented_names() {
        let catalog = paired(&["zeta.mp4", "\u{c9}lan.mp4", "elan.mp4", "a_b.mp4", "a1.mp4"]);
        assert_eq!(
            names(catalog.videos()),
            vec!["a_b.mp4", "a1.mp4", "elan.mp4", "\u{c9}lan.mp4", "zeta.mp4"]
        );
    }

    #[test]
    fn test_subtitles_keep_discovery_order() {
        let catalog = paired(&["z.srt", "a.mp4", "m.vtt", "b.ass"]);
        assert_eq!(names(catalog.subtitles()), vec!["z.srt", "m.vtt", "b.ass"]);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut catalog = paired(&["a.mp4", "b.mp4"]);

        let err = catalog.select(2).unwrap_err();
        assert_eq!(err, OutOfRangeError { index: 2, len: 2 });

        let err = catalog.select_signed(-1).unwrap_err();
        assert_eq!(err, OutOfRangeError { index: -1, len: 2 });

        assert_eq!(catalog.selected_index(), None);
        assert_eq!(catalog.select_signed(1).unwrap().video.name, "b.mp4");
    }

    #[test]
    fn test_next_and_previous_never_wrap() {
        let mut catalog = paired(&["a.mp4", "b.mp4", "c.mp4"]);

        assert!(catalog.select_previous().is_none());
        assert_eq!(catalog.selected_index(), None);

        assert_eq!(catalog.select_next().unwrap().index, 0);
        assert_eq!(catalog.select_next().unwrap().index, 1);
        assert_eq!(catalog.select_next().unwrap().index, 2);

        assert!(catalog.select_next().is_none());
        assert_eq!(catalog.selected_index(), Some(2));

        assert_eq!(catalog.select_previous().unwrap().index, 1);
        assert_eq!(catalog.select_previous().unwrap().index, 0);
        assert!(catalog.select_previous().is_none());
        assert_eq!(catalog.selected_index(), Some(0));
    }

    #[test]
    fn test_reload_resets_selection_and_session() {
        let mut catalog = paired(&["a.mp4"]);
        catalog.select(0).unwrap();
        let first_session = catalog.session_id().to_string();

        let summary = catalog.load(vec![entry("b.mp4")]);
        assert_eq!(catalog.selected_index(), None);
        assert_ne!(summary.session_id, first_session);
        assert_eq!(names(catalog.videos()), vec!["b.mp4"]);
    }

    #[test]
    fn test_empty_catalog() {
        let mut catalog = paired(&["notes.txt", "readme"]);
        assert!(catalog.is_empty());
        assert!(catalog.select(0).is_err());
        assert!(catalog.select_next().is_none());

        let summary = catalog.summary();
        assert_eq!(summary.ignored_count, 2);
        assert_eq!(summary.notice(), Some(CatalogNotice::NoPlayableMedia));
    }

    #[test]
    fn test_unsupported_notices() {
        let flagged = ExtensionPolicy::from_profile(PolicyProfile::Flagged);

        let catalog = Catalog::from_files(flagged.clone(), vec![entry("a.mkv"), entry("b.avi")]);
        let summary = catalog.summary();
        assert_eq!(summary.video_count, 0);
        assert_eq!(
            summary.notice(),
            Some(CatalogNotice::OnlyUnsupported { count: 2 })
        );

        let catalog = Catalog::from_files(flagged, vec![entry("a.mkv"), entry("b.mp4")]);
        assert_eq!(
            catalog.summary().notice(),
            Some(CatalogNotice::SkippedUnsupported { count: 1 })
        );
        assert_eq!(names(catalog.unsupported()), vec!["a.mkv"]);
        assert_eq!(
            CatalogNotice::SkippedUnsupported { count: 1 }.to_string(),
            "1 video(s) skipped (format not supported by the browser)"
        );
    }

    #[test]
    fn test_no_notice_when_all_playable() {
        let catalog = paired(&["a.mp4"]);
        assert_eq!(catalog.summary().notice(), None);
    }

    #[tokio::test]
    async fn test_selected_video_convert_tracks() {
        let mut catalog = Catalog::from_files(
            ExtensionPolicy::from_profile(PolicyProfile::Paired),
            vec![
                entry("show.mp4"),
                FileEntry::in_memory("show.srt", &b"00:00:01,500 --> 00:00:02,000\nHi"[..]),
            ],
        );

        let selected = catalog.select(0).unwrap();
        let set = selected.convert_tracks().await;
        assert_eq!(set.tracks.len(), 1);
        assert!(set.tracks[0].is_default);
        assert_eq!(
            set.tracks[0].text,
            "WEBVTT\n\n00:00:01.500 --> 00:00:02.000\nHi"
        );
    }
}
