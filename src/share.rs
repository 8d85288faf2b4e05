//! Shareable links: track slugs, the `?track=` parameter and embed snippets.

mod link;
mod slug;

pub use link::*;
pub use slug::*;
