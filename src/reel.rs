//! Reel manifests: the tracks and clips the player works from.
//!
//! A reel is one or more TOML manifests listing tracks (one audio file each)
//! and the named clips inside them. Loading resolves relative audio paths and
//! validates clip bounds; the resulting `Track` list is read-only afterwards.

mod load;
mod model;

pub use load::*;
pub use model::*;
