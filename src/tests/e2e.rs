//! End-to-end tests: folder on disk -> catalog -> playback surface

use crate::catalog::{Catalog, CatalogNotice};
use crate::error::ConversionError;
use crate::index::{scan_folder, scan_folder_with_options, ExtensionPolicy, PolicyProfile, ScanOptions};
use crate::playback::{MediaHandle, PlaybackCoordinator, PlaybackStatus, PlaybackSurface};
use crate::subtitle::ConvertedTrack;
use crate::types::SubtitleFormat;

use super::fixtures::{TestFolder, SAMPLE_VTT};

/// Keeps the last load, the way a media element would
#[derive(Debug, Default)]
struct LastLoad {
    media: Option<MediaHandle>,
    tracks: Vec<ConvertedTrack>,
}

impl PlaybackSurface for LastLoad {
    fn load(&mut self, media: MediaHandle, tracks: Vec<ConvertedTrack>) {
        self.media = Some(media);
        self.tracks = tracks;
    }
}

fn names(catalog: &Catalog) -> Vec<&str> {
    catalog.videos().iter().map(|v| v.name.as_str()).collect()
}

#[test]
fn test_season_paired_profile() {
    let folder = TestFolder::season();
    let files = scan_folder(folder.path()).unwrap();
    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Paired), files);

    assert_eq!(
        names(&catalog),
        vec!["Behind.mkv", "Show.E01.mp4", "Show.E02.mp4", "Show.E10.webm"]
    );

    let summary = catalog.summary();
    assert_eq!(summary.subtitle_count, 3);
    assert_eq!(summary.unsupported_count, 0);
    assert_eq!(summary.ignored_count, 2);
    assert_eq!(summary.notice(), None);
}

#[test]
fn test_season_flagged_profile() {
    let folder = TestFolder::season();
    let files = scan_folder(folder.path()).unwrap();
    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Flagged), files);

    assert_eq!(
        names(&catalog),
        vec!["Show.E01.mp4", "Show.E02.mp4", "Show.E10.webm"]
    );
    assert_eq!(
        catalog.summary().notice(),
        Some(CatalogNotice::SkippedUnsupported { count: 1 })
    );
    assert!(catalog.subtitles().is_empty());
}

#[test]
fn test_non_recursive_scan_skips_extras() {
    let folder = TestFolder::season();
    let options = ScanOptions {
        recursive: false,
        ..Default::default()
    };
    let files = scan_folder_with_options(folder.path(), &options).unwrap();
    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Paired), files);
    assert_eq!(
        names(&catalog),
        vec!["Show.E01.mp4", "Show.E02.mp4", "Show.E10.webm"]
    );
}

#[tokio::test]
async fn test_play_episode_with_subtitles() {
    let folder = TestFolder::season();
    let files = scan_folder(folder.path()).unwrap();
    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Paired), files);
    let mut coord = PlaybackCoordinator::new(catalog, LastLoad::default());

    let report = coord.play(1).await.unwrap().unwrap();
    assert_eq!(report.media.name(), "Show.E01.mp4");
    assert_eq!(report.status, PlaybackStatus::Loaded { tracks: 2 });
    assert!(report.failures.is_empty());

    let surface = coord.surface();
    assert_eq!(surface.tracks.len(), 2);

    let english = &surface.tracks[0];
    assert!(english.is_default);
    assert_eq!(english.label, "en");
    assert_eq!(english.language.as_deref(), Some("en"));
    assert_eq!(
        english.text,
        "WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.000\nHello, world\n\n2\n00:00:05.250 --> 00:00:07.000\nSecond line\n"
    );

    let french = &surface.tracks[1];
    assert!(!french.is_default);
    assert_eq!(french.format, SubtitleFormat::WebVtt);
    assert_eq!(french.text, SAMPLE_VTT);
}

#[tokio::test]
async fn test_auto_advance_through_season() {
    let folder = TestFolder::season();
    let files = scan_folder(folder.path()).unwrap();
    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Paired), files);
    let mut coord = PlaybackCoordinator::new(catalog, LastLoad::default());

    let report = coord.play(0).await.unwrap().unwrap();
    assert_eq!(report.status, PlaybackStatus::EmbeddedSubtitlesOnly);

    let pending = coord.on_ended().unwrap();
    let report = coord.complete(pending.resolve().await).unwrap();
    assert_eq!(report.media.name(), "Show.E01.mp4");

    let pending = coord.on_ended().unwrap();
    let report = coord.complete(pending.resolve().await).unwrap();
    assert_eq!(report.media.name(), "Show.E02.mp4");
    // the ASS file matches but cannot be converted
    assert_eq!(report.status, PlaybackStatus::NoSubtitles);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].error,
        ConversionError::UnsupportedFormat(SubtitleFormat::Ass)
    );
    assert!(coord.surface().tracks.is_empty());

    let pending = coord.on_ended().unwrap();
    let report = coord.complete(pending.resolve().await).unwrap();
    assert_eq!(report.media.name(), "Show.E10.webm");
    assert_eq!(report.media.mime_type, "video/webm");

    assert!(coord.on_ended().is_none());
    assert_eq!(coord.catalog().selected_index(), Some(3));
}

#[tokio::test]
async fn test_deleted_subtitle_is_dropped() {
    let folder = TestFolder::new()
        .video("movie.mp4")
        .file("movie.srt", b"00:00:01,000 --> 00:00:02,000\nHi\n")
        .file("movie.en.srt", b"00:00:01,000 --> 00:00:02,000\nHi\n");
    let files = scan_folder(folder.path()).unwrap();
    std::fs::remove_file(folder.join("movie.en.srt")).unwrap();

    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Paired), files);
    let mut coord = PlaybackCoordinator::new(catalog, LastLoad::default());

    let report = coord.play(0).await.unwrap().unwrap();
    assert_eq!(report.status, PlaybackStatus::Loaded { tracks: 1 });
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].subtitle, "movie.en.srt");
    assert!(matches!(
        report.failures[0].error,
        ConversionError::ReadError(_)
    ));
    assert_eq!(coord.surface().tracks[0].label, "movie.srt");
    assert!(coord.surface().tracks[0].is_default);
}

#[test]
fn test_empty_folder_notice() {
    let folder = TestFolder::new().file("readme.txt", b"hi");
    let files = scan_folder(folder.path()).unwrap();
    let catalog = Catalog::from_files(ExtensionPolicy::from_profile(PolicyProfile::Strict), files);
    assert!(catalog.is_empty());
    assert_eq!(
        catalog.summary().notice(),
        Some(CatalogNotice::NoPlayableMedia)
    );
}
