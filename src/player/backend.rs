//! The media contract the clip player drives.

use std::time::Duration;

/// Notifications a backend reports back to the player.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The source finished loading and its duration (seconds) is known.
    LoadedMetadata { source: String, duration: f64 },
    /// The source could not be loaded.
    LoadFailed { source: String, reason: String },
    /// A `play()` request was honoured.
    PlayStarted,
    /// A `play()` request was refused (no output device, undecodable audio...).
    PlayRejected { reason: String },
    /// Playback ran off the end of the media.
    Ended,
}

/// A single audio element: one source, one position, play/pause.
///
/// `play()` is a request; whether it took effect arrives later as
/// `PlayStarted` or `PlayRejected` through `poll_event`.
pub trait MediaBackend {
    /// Start loading `url`, replacing whatever was loaded before.
    fn set_source(&mut self, url: &str);

    fn play(&mut self);

    fn pause(&mut self);

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position. Reads after this return `secs`.
    fn set_current_time(&mut self, secs: f64);

    /// Media duration in seconds, once metadata has loaded.
    fn duration(&self) -> Option<f64>;

    fn poll_event(&mut self) -> Option<MediaEvent>;

    /// Release the output for good, fading out over `fade_out` when playing.
    fn quit(&mut self, _fade_out: Duration) {}
}
