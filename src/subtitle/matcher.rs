//! Subtitle matching by file base name

use crate::types::{split_extension, FileEntry};

/// Whether a subtitle base name belongs to a video base name.
///
/// Equal names match, and so does either name being a prefix of the other.
/// The prefix rule over-matches (`Ep1` also claims `Ep10.srt`); there is no
/// better signal in a plain folder listing.
pub fn is_match(video_base: &str, subtitle_base: &str) -> bool {
    if subtitle_base.is_empty() {
        return false;
    }
    video_base.starts_with(subtitle_base) || subtitle_base.starts_with(video_base)
}

/// Return every subtitle associated with the video, in input order.
pub fn find_matches(video_base: &str, subtitles: &[FileEntry]) -> Vec<FileEntry> {
    subtitles
        .iter()
        .filter(|sub| {
            let sub_base = split_extension(&sub.name).0;
            let matched = is_match(video_base, sub_base);
            tracing::debug!(
                "Subtitle {:?} {} video {:?}",
                sub.name,
                if matched { "matches" } else { "does not match" },
                video_base
            );
            matched
        })
        .cloned()
        .collect()
}
