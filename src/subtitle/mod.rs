//! Subtitle pairing module
//!
//! This module handles external subtitle files next to a video:
//! - Matching subtitle files to a video by base name
//! - SRT to WebVTT timestamp conversion
//! - Building labelled tracks for the player

pub mod matcher;
pub mod track;
pub mod webvtt;

pub use matcher::find_matches;
pub use track::{convert_matches, ConvertedTrack, TrackFailure, TrackSet};
pub use webvtt::convert;
