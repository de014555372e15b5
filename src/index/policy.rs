//! Extension policy - maps file names to categories

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{split_extension, Category};

/// Video extensions every browser plays natively
const PLAYABLE_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "m4v"];

/// Containers browsers generally refuse
const CONTAINER_EXTENSIONS: &[&str] = &["mkv", "avi", "wmv", "flv"];

/// Extra video extensions attempted by the permissive profile
const EXTRA_VIDEO_EXTENSIONS: &[&str] = &["3gp", "mpg", "mpeg"];

const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt", "ass", "ssa"];

/// Named starting points for the extension table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyProfile {
    /// Natively playable videos only
    Strict,
    /// Playable videos, plus browser-hostile containers reported as unsupported
    Flagged,
    /// Every known video extension is offered, and subtitles are paired
    Paired,
}

/// A `{extension: Category}` table plus the containers that may carry
/// embedded subtitles.
#[derive(Debug, Clone)]
pub struct ExtensionPolicy {
    profile: PolicyProfile,
    table: HashMap<String, Category>,
    embedded_subtitle_containers: HashSet<String>,
}

impl ExtensionPolicy {
    /// Build the table for a profile
    pub fn from_profile(profile: PolicyProfile) -> Self {
        let mut table = HashMap::new();
        let mut insert = |exts: &[&str], category: Category| {
            for ext in exts {
                table.insert(ext.to_string(), category);
            }
        };

        match profile {
            PolicyProfile::Strict => {
                insert(PLAYABLE_EXTENSIONS, Category::Video);
            }
            PolicyProfile::Flagged => {
                insert(PLAYABLE_EXTENSIONS, Category::Video);
                insert(CONTAINER_EXTENSIONS, Category::UnsupportedVideo);
            }
            PolicyProfile::Paired => {
                insert(PLAYABLE_EXTENSIONS, Category::Video);
                insert(CONTAINER_EXTENSIONS, Category::Video);
                insert(EXTRA_VIDEO_EXTENSIONS, Category::Video);
                insert(SUBTITLE_EXTENSIONS, Category::Subtitle);
            }
        }

        Self {
            profile,
            table,
            embedded_subtitle_containers: HashSet::from(["mkv".to_string()]),
        }
    }

    /// Override the category of one extension
    pub fn with_override(mut self, extension: &str, category: Category) -> Self {
        let ext = normalize_extension(extension);
        if category == Category::Ignored {
            self.table.remove(&ext);
        } else {
            self.table.insert(ext, category);
        }
        self
    }

    /// Replace the set of containers that may carry embedded subtitles
    pub fn with_embedded_subtitle_containers<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.embedded_subtitle_containers = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .collect();
        self
    }

    pub fn profile(&self) -> PolicyProfile {
        self.profile
    }

    /// Classify a file name by its final extension, case-insensitively.
    pub fn classify(&self, name: &str) -> Category {
        match split_extension(name).1 {
            Some(ext) if !ext.is_empty() => self
                .table
                .get(&ext.to_ascii_lowercase())
                .copied()
                .unwrap_or(Category::Ignored),
            _ => Category::Ignored,
        }
    }

    /// Whether any extension is classified as unsupported video
    pub fn distinguishes_unsupported(&self) -> bool {
        self.table
            .values()
            .any(|c| *c == Category::UnsupportedVideo)
    }

    /// Whether the video's container may hold subtitles we cannot extract
    pub fn may_embed_subtitles(&self, name: &str) -> bool {
        split_extension(name)
            .1
            .map(|ext| {
                self.embedded_subtitle_containers
                    .contains(&ext.to_ascii_lowercase())
            })
            .unwrap_or(false)
    }

    /// Extensions mapped to `category`, sorted
    pub fn extensions_for(&self, category: Category) -> Vec<&str> {
        let mut exts: Vec<&str> = self
            .table
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(e, _)| e.as_str())
            .collect();
        exts.sort_unstable();
        exts
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
