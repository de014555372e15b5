//! Converted subtitle tracks for a selected video

use crate::error::ConversionError;
use crate::types::{split_extension, FileEntry, SubtitleFormat};

use super::webvtt::{convert, decode_text};

/// A subtitle ready to attach to the player as a WebVTT track
#[derive(Debug, Clone)]
pub struct ConvertedTrack {
    /// The subtitle file this track was built from
    pub source: FileEntry,
    /// Format of the source file
    pub format: SubtitleFormat,
    /// WebVTT text
    pub text: String,
    /// Label shown in the player's track menu
    pub label: String,
    /// Language code guessed from the file name (`movie.en.srt`)
    pub language: Option<String>,
    /// Exactly one track of a non-empty set is the default
    pub is_default: bool,
}

/// A subtitle that matched but could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFailure {
    pub subtitle: String,
    pub error: ConversionError,
}

/// Outcome of converting a MatchSet
#[derive(Debug, Clone, Default)]
pub struct TrackSet {
    pub tracks: Vec<ConvertedTrack>,
    pub failures: Vec<TrackFailure>,
}

impl TrackSet {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn default_track(&self) -> Option<&ConvertedTrack> {
        self.tracks.iter().find(|t| t.is_default)
    }
}

/// Read and convert every matched subtitle, in order.
///
/// Each failure is recorded and that subtitle dropped; the first successful
/// track becomes the default.
pub async fn convert_matches(video_base: &str, matches: &[FileEntry]) -> TrackSet {
    let mut set = TrackSet::default();

    for subtitle in matches {
        match convert_one(video_base, subtitle).await {
            Ok(track) => set.tracks.push(track),
            Err(error) => {
                tracing::warn!("Dropping subtitle {:?}: {}", subtitle.name, error);
                set.failures.push(TrackFailure {
                    subtitle: subtitle.name.clone(),
                    error,
                });
            }
        }
    }

    if let Some(first) = set.tracks.first_mut() {
        first.is_default = true;
    }

    tracing::debug!(
        "Converted {} of {} subtitles for {:?}",
        set.tracks.len(),
        matches.len(),
        video_base
    );
    set
}

async fn convert_one(
    video_base: &str,
    subtitle: &FileEntry,
) -> Result<ConvertedTrack, ConversionError> {
    let format = SubtitleFormat::from_name(&subtitle.name).unwrap_or(SubtitleFormat::Unknown);
    if !matches!(format, SubtitleFormat::SubRip | SubtitleFormat::WebVtt) {
        // no point reading bytes we will not convert
        return Err(ConversionError::UnsupportedFormat(format));
    }

    let bytes = subtitle
        .content
        .read_all()
        .await
        .map_err(|e| ConversionError::ReadError(e.to_string()))?;
    let text = convert(&decode_text(&bytes)?, format)?;
    let (label, language) = derive_label(video_base, &subtitle.name);

    Ok(ConvertedTrack {
        source: subtitle.clone(),
        format,
        text,
        label,
        language,
        is_default: false,
    })
}

/// Label and language for a subtitle file paired with a video.
///
/// The part of the subtitle's base name after the video's base name becomes
/// the label (`movie.en.srt` -> `en`); when nothing is left the file name is
/// used. A trailing 2 or 3 letter segment is taken as the language code.
pub fn derive_label(video_base: &str, subtitle_name: &str) -> (String, Option<String>) {
    let sub_base = split_extension(subtitle_name).0;
    let rest = sub_base
        .strip_prefix(video_base)
        .unwrap_or("")
        .trim_matches(|c: char| matches!(c, '.' | '_' | '-' | ' '));

    if rest.is_empty() {
        return (subtitle_name.to_string(), None);
    }

    let language = rest
        .rsplit(|c: char| matches!(c, '.' | '_' | '-' | ' '))
        .next()
        .filter(|seg| (2..=3).contains(&seg.len()) && seg.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|seg| seg.to_ascii_lowercase());

    (rest.to_string(), language)
}
