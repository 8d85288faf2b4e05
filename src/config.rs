//! Configuration loader and schema types.
//!
//! Settings cover clip timing, the audio backend, share links, the UI, reel
//! discovery and logging. Everything has a default; a config file and
//! `VOCLIP__*` environment variables only override.

mod load;
mod schema;

pub use load::SettingsError;
pub use schema::*;
