//! Integration testing module
//!
//! End-to-end tests across the library:
//! - Folder scanning into a catalog
//! - Subtitle pairing and conversion
//! - Playback coordination

pub mod e2e;
