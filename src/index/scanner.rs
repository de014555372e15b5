//! Folder scanner - turns a directory into file entries

use std::path::Path;

use crate::error::{Result, ShelfError};
use crate::types::FileEntry;

/// Scanning options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Include files and directories whose name starts with `.`
    pub include_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_hidden: false,
        }
    }
}

/// Scan a folder with default options
pub fn scan_folder<P: AsRef<Path>>(root: P) -> Result<Vec<FileEntry>> {
    scan_folder_with_options(root, &ScanOptions::default())
}

/// Scan a folder and return one entry per regular file, in directory order.
///
/// Entries that cannot be read are skipped with a warning; only a missing or
/// unreadable root is an error.
pub fn scan_folder_with_options<P: AsRef<Path>>(
    root: P,
    options: &ScanOptions,
) -> Result<Vec<FileEntry>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ShelfError::NotAFolder(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    walk(root, options, &mut entries)?;

    tracing::info!("Scanned folder {:?}: {} files", root, entries.len());
    Ok(entries)
}

fn walk(dir: &Path, options: &ScanOptions, out: &mut Vec<FileEntry>) -> Result<()> {
    let mut children: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                None
            }
        })
        .collect();
    // read_dir order is platform dependent
    children.sort_by_key(|e| e.file_name());

    for child in children {
        let name = child.file_name();
        if !options.include_hidden && name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = child.path();
        let file_type = match child.file_type() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };

        if file_type.is_dir() {
            if options.recursive {
                if let Err(e) = walk(&path, options, out) {
                    tracing::warn!("Skipping directory {:?}: {}", path, e);
                }
            }
            continue;
        }

        match FileEntry::from_path(&path) {
            Ok(entry) if path.is_file() => {
                tracing::debug!("Found file {:?} ({} bytes)", path, entry.size_bytes);
                out.push(entry);
            }
            Ok(_) => {
                tracing::debug!("Skipping non-regular file {:?}", path);
            }
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_scan_options_default() {
        let options = ScanOptions::default();
        assert!(options.recursive);
        assert!(!options.include_hidden);
    }

    #[test]
    fn test_scan_flat_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"bb").unwrap();
        std::fs::write(dir.path().join("a.srt"), b"a").unwrap();
        std::fs::write(dir.path().join(".hidden.mp4"), b"h").unwrap();

        let entries = scan_folder(dir.path()).unwrap();
        assert_eq!(names(&entries), vec!["a.srt", "b.mp4"]);
        assert_eq!(entries[1].size_bytes, 2);
        assert!(entries[1].content.path().is_some());
    }

    #[test]
    fn test_scan_recursive_and_flat() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("season1")).unwrap();
        std::fs::write(dir.path().join("top.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("season1").join("ep1.mp4"), b"").unwrap();

        let entries = scan_folder(dir.path()).unwrap();
        assert_eq!(names(&entries), vec!["ep1.mp4", "top.mp4"]);

        let flat = ScanOptions {
            recursive: false,
            ..Default::default()
        };
        let entries = scan_folder_with_options(dir.path(), &flat).unwrap();
        assert_eq!(names(&entries), vec!["top.mp4"]);
    }

    #[test]
    fn test_scan_hidden_included() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".hidden.mp4"), b"").unwrap();

        let options = ScanOptions {
            include_hidden: true,
            ..Default::default()
        };
        let entries = scan_folder_with_options(dir.path(), &options).unwrap();
        assert_eq!(names(&entries), vec![".hidden.mp4"]);
    }

    #[test]
    fn test_scan_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_folder(&missing),
            Err(ShelfError::NotAFolder(_))
        ));

        let file = dir.path().join("file.mp4");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(scan_folder(&file), Err(ShelfError::NotAFolder(_))));
    }
}
