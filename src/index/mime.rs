//! Extension to MIME type lookup

use crate::types::FileEntry;

/// Fallback for video extensions missing from the table
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// Look up the MIME type for a lowercased video extension
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "webm" => "video/webm",
        "ogg" => "video/ogg",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "3gp" => "video/3gpp",
        "mpg" | "mpeg" => "video/mpeg",
        _ => return None,
    };
    Some(mime)
}

/// MIME type to hand the playback surface for a video entry.
///
/// The source's hint wins unless it is empty or the generic
/// `application/octet-stream`.
pub fn resolve_mime(entry: &FileEntry) -> String {
    let hint = entry.mime_hint.trim();
    if !hint.is_empty() && !hint.eq_ignore_ascii_case("application/octet-stream") {
        return hint.to_string();
    }

    entry
        .extension()
        .and_then(|ext| mime_for_extension(&ext))
        .unwrap_or(DEFAULT_VIDEO_MIME)
        .to_string()
}
