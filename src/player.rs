//! The clip player: which track is selected, which clip is active, and how
//! playback moves between clips.
//!
//! `ClipPlayer` is a single-owner state machine driven by user commands,
//! media notifications and a per-frame progress callback. It talks to audio
//! only through the `MediaBackend` trait.

mod backend;
mod state;
mod timing;

pub use backend::*;
pub use state::*;
pub use timing::*;
