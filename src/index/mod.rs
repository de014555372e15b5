//! Folder indexing module
//!
//! This module turns a folder into classified file entries:
//! - Directory scanning into `FileEntry` values
//! - Extension classification under a configurable policy
//! - Extension to MIME type lookup for playback

pub mod mime;
pub mod policy;
pub mod scanner;

pub use mime::resolve_mime;
pub use policy::{ExtensionPolicy, PolicyProfile};
pub use scanner::{scan_folder, scan_folder_with_options, ScanOptions};
