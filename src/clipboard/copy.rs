//! Copy orchestrator for clipboard operations.

use tracing::{debug, warn};

use super::error::ClipboardError;
use super::tool::{CopyMethod, CopyTool, CopyToolError};
use super::tools::platform_tools;

/// Orchestrates clipboard copy operations using available tools, first
/// success wins.
pub struct Copy {
    tools: Vec<Box<dyn CopyTool>>,
}

impl Copy {
    /// Create with platform-appropriate tools.
    pub fn new() -> Self {
        Self::with_tools(platform_tools())
    }

    /// Create with specific tools, tried in order.
    pub fn with_tools(tools: Vec<Box<dyn CopyTool>>) -> Self {
        Self { tools }
    }

    /// Copy `text`, returning the method that took it.
    pub fn text(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        let mut last_failure: Option<(&'static str, String)> = None;

        for tool in &self.tools {
            if !tool.is_available() {
                continue;
            }
            match tool.try_copy_text(text) {
                Ok(()) => {
                    debug!(tool = tool.name(), bytes = text.len(), "copied to clipboard");
                    return Ok(tool.method());
                }
                Err(CopyToolError::NotFound) => continue,
                Err(CopyToolError::Failed(message)) => {
                    warn!(tool = tool.name(), %message, "clipboard tool failed, trying next");
                    last_failure = Some((tool.name(), message));
                }
            }
        }

        match last_failure {
            Some((tool, message)) => Err(ClipboardError::ToolFailed { tool, message }),
            None => Err(ClipboardError::NoToolAvailable),
        }
    }
}

impl Default for Copy {
    fn default() -> Self {
        Self::new()
    }
}
