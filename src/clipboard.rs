//! Copying share links and embed snippets to the system clipboard.
//!
//! Platform tools are tried in priority order; when none works the text is
//! handed to the terminal with an OSC 52 escape sequence instead.

mod copy;
mod error;
mod tool;
mod tools;

pub use copy::*;
pub use error::*;
pub use tool::*;
pub use tools::*;
