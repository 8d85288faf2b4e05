use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::sink::{probe_duration, resolve_source};
use super::types::{AudioError, PlaybackInfo};

#[test]
fn resolve_source_accepts_paths_and_file_urls() {
    assert_eq!(
        resolve_source("/srv/audio/reel.mp3").unwrap(),
        PathBuf::from("/srv/audio/reel.mp3")
    );
    assert_eq!(
        resolve_source("file:///srv/audio/my%20reel.mp3").unwrap(),
        PathBuf::from("/srv/audio/my reel.mp3")
    );
    assert_eq!(
        resolve_source("audio/reel.ogg").unwrap(),
        PathBuf::from("audio/reel.ogg")
    );
}

#[test]
fn resolve_source_rejects_remote_urls() {
    assert!(matches!(
        resolve_source("https://cdn.example.com/reel.mp3"),
        Err(AudioError::RemoteSource(_))
    ));
    assert!(matches!(
        resolve_source("ftp://example.com/reel.mp3"),
        Err(AudioError::InvalidSource(_))
    ));
}

#[test]
fn probe_duration_fails_for_non_audio_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "definitely not audio").unwrap();
    assert!(probe_duration(file.path()).is_err());

    assert!(matches!(
        probe_duration(&PathBuf::from("/nonexistent/voclip/reel.mp3")),
        Err(AudioError::Open { .. })
    ));
}

#[test]
fn position_advances_only_while_anchored() {
    let t0 = Instant::now();
    let mut info = PlaybackInfo {
        position: Duration::from_secs(5),
        ..PlaybackInfo::default()
    };
    assert_eq!(info.position_at(t0 + Duration::from_secs(3)), Duration::from_secs(5));

    info.start(t0);
    assert!(info.playing);
    assert_eq!(info.position_at(t0 + Duration::from_secs(3)), Duration::from_secs(8));

    info.stop(t0 + Duration::from_secs(2));
    assert!(!info.playing);
    assert_eq!(info.position, Duration::from_secs(7));
    assert_eq!(info.position_at(t0 + Duration::from_secs(60)), Duration::from_secs(7));
}

#[test]
fn position_is_capped_at_duration() {
    let t0 = Instant::now();
    let mut info = PlaybackInfo {
        duration: Some(Duration::from_secs(10)),
        ..PlaybackInfo::default()
    };
    info.start(t0);
    assert_eq!(info.position_at(t0 + Duration::from_secs(30)), Duration::from_secs(10));

    info.seek(Duration::from_secs(999_999), t0);
    assert_eq!(info.position, Duration::from_secs(10));
}

#[test]
fn seek_while_playing_reanchors() {
    let t0 = Instant::now();
    let mut info = PlaybackInfo::default();
    info.start(t0);
    info.seek(Duration::from_secs(42), t0 + Duration::from_secs(5));
    assert_eq!(
        info.position_at(t0 + Duration::from_secs(6)),
        Duration::from_secs(43)
    );
}

#[test]
fn reset_forgets_the_previous_source() {
    let mut info = PlaybackInfo {
        position: Duration::from_secs(3),
        duration: Some(Duration::from_secs(9)),
        playing: true,
        anchor: Some(Instant::now()),
    };
    info.reset();
    assert_eq!(info.position, Duration::ZERO);
    assert_eq!(info.duration, None);
    assert!(!info.playing);
}
