//! SRT to WebVTT conversion
//!
//! The conversion is purely syntactic: the header line is prepended and
//! every `HH:MM:SS,mmm` timestamp has its comma replaced by a period. Cue
//! numbers, cue text, blank lines and line endings are left untouched.

use crate::error::ConversionError;
use crate::types::SubtitleFormat;

/// First line of every WebVTT file
pub const WEBVTT_HEADER: &str = "WEBVTT";

const UTF8_BOM: &str = "\u{feff}";

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Normalize subtitle text to WebVTT.
///
/// SRT is rewritten, WebVTT is returned unchanged, ASS/SSA and unknown
/// formats are rejected without being parsed.
pub fn convert(text: &str, format: SubtitleFormat) -> Result<String, ConversionError> {
    match format {
        SubtitleFormat::SubRip => Ok(srt_to_webvtt(text)),
        SubtitleFormat::WebVtt => Ok(text.to_string()),
        SubtitleFormat::Ass | SubtitleFormat::Ssa | SubtitleFormat::Unknown => {
            Err(ConversionError::UnsupportedFormat(format))
        }
    }
}

/// Prepend the WebVTT header and switch SRT timestamps to WebVTT syntax
pub fn srt_to_webvtt(text: &str) -> String {
    let body = regex!(r"([0-9]{2}:[0-9]{2}:[0-9]{2}),([0-9]{3})").replace_all(text, "$1.$2");

    let mut out = String::with_capacity(WEBVTT_HEADER.len() + 2 + body.len());
    out.push_str(WEBVTT_HEADER);
    out.push_str("\n\n");
    out.push_str(&body);
    out
}

/// Decode subtitle bytes as UTF-8, dropping a leading byte-order mark
pub fn decode_text(bytes: &[u8]) -> Result<String, ConversionError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ConversionError::ReadError(format!("not valid UTF-8: {}", e)))?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}
