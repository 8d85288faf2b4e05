//! CopyTool trait and related error types.

/// A way of putting text on the clipboard.
pub trait CopyTool {
    /// The method identifier for this tool.
    fn method(&self) -> CopyMethod;

    /// Human-readable name for error messages.
    fn name(&self) -> &'static str {
        self.method().name()
    }

    /// Check if this tool can be used here. Should be fast.
    fn is_available(&self) -> bool;

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError>;
}

/// Error from a specific tool operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyToolError {
    /// Tool execution failed
    Failed(String),
    /// Tool not found on system
    NotFound,
}

/// Which tool was used for the copy operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// macOS pasteboard
    Pbcopy,
    /// Linux Wayland
    WlCopy,
    /// Linux X11
    Xclip,
    /// Linux X11 alternative
    Xsel,
    /// Terminal escape sequence, the last resort
    Osc52,
}

impl CopyMethod {
    /// Tool name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pbcopy => "pbcopy",
            Self::WlCopy => "wl-copy",
            Self::Xclip => "xclip",
            Self::Xsel => "xsel",
            Self::Osc52 => "osc52",
        }
    }
}
