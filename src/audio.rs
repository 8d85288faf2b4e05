//! The `rodio` media backend.
//!
//! Playback runs on a dedicated audio thread that owns the output stream and
//! sink. `AudioPlayer` is the UI-side handle: it sends commands down a
//! channel, reads the shared position, and relays the thread's notifications
//! to the clip player.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
