//! Application module: exposes the app model used by the TUI and runtime.
//!
//! `App` wraps the clip player together with the UI-only state (clip cursor,
//! track picker, share popup, toast); `keys` maps key presses onto it.

mod keys;
mod model;

pub use keys::*;
pub use model::*;

#[cfg(test)]
mod tests;
