//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread, the playback
//! information it shares with the UI, and the backend's error type.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum AudioCmd {
    /// Load the given source, replacing the current one. Playback is paused.
    Load(String),
    /// Start or resume playback at the current position.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Move the playback position.
    Seek(Duration),
    /// Set the output volume (1.0 = unchanged).
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("remote source {0} is not supported; download it and point the reel at the file")]
    RemoteSource(String),

    #[error("invalid source {0}")]
    InvalidSource(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("no audio output device: {0}")]
    NoOutput(String),
}

/// Runtime playback information shared between the audio thread and the UI.
///
/// The position is stored as an anchor: `position` as of `anchor`, advancing
/// with wall-clock time while `anchor` is set.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    pub position: Duration,
    pub anchor: Option<Instant>,
    /// Media duration, once probed.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
}

impl PlaybackInfo {
    /// Playback position at `now`, never past the known duration.
    pub fn position_at(&self, now: Instant) -> Duration {
        let pos = match self.anchor {
            Some(at) => self.position + now.saturating_duration_since(at),
            None => self.position,
        };
        match self.duration {
            Some(d) => pos.min(d),
            None => pos,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.position = self.position_at(now);
        self.anchor = Some(now);
        self.playing = true;
    }

    pub fn stop(&mut self, now: Instant) {
        self.position = self.position_at(now);
        self.anchor = None;
        self.playing = false;
    }

    pub fn seek(&mut self, to: Duration, now: Instant) {
        self.position = match self.duration {
            Some(d) => to.min(d),
            None => to,
        };
        if self.playing {
            self.anchor = Some(now);
        }
    }

    /// Forget the previous source: position zero, paused, duration unknown.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
