//! Clipboard tools: external programs plus the OSC 52 terminal fallback.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

use super::tool::{CopyMethod, CopyTool, CopyToolError};

/// A clipboard program that reads the text to copy from stdin.
pub struct CommandTool {
    method: CopyMethod,
    program: &'static str,
    args: &'static [&'static str],
}

impl CommandTool {
    pub fn pbcopy() -> Self {
        Self {
            method: CopyMethod::Pbcopy,
            program: "pbcopy",
            args: &[],
        }
    }

    pub fn wl_copy() -> Self {
        Self {
            method: CopyMethod::WlCopy,
            program: "wl-copy",
            args: &[],
        }
    }

    pub fn xclip() -> Self {
        Self {
            method: CopyMethod::Xclip,
            program: "xclip",
            args: &["-selection", "clipboard"],
        }
    }

    pub fn xsel() -> Self {
        Self {
            method: CopyMethod::Xsel,
            program: "xsel",
            args: &["--clipboard", "--input"],
        }
    }

    /// Check if the program is installed.
    fn tool_exists(&self) -> bool {
        Command::new("which")
            .arg(self.program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl CopyTool for CommandTool {
    fn method(&self) -> CopyMethod {
        self.method
    }

    fn is_available(&self) -> bool {
        let display_ok = match self.method {
            CopyMethod::WlCopy => env::var_os("WAYLAND_DISPLAY").is_some(),
            CopyMethod::Xclip | CopyMethod::Xsel => env::var_os("DISPLAY").is_some(),
            _ => true,
        };
        display_ok && self.tool_exists()
    }

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CopyToolError::NotFound,
                _ => CopyToolError::Failed(e.to_string()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| CopyToolError::Failed(e.to_string()))?;
        }

        let status = child
            .wait()
            .map_err(|e| CopyToolError::Failed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(CopyToolError::Failed(format!("{} exited with {status}", self.program)))
        }
    }
}

/// Copies through the terminal itself using the OSC 52 escape sequence.
///
/// Works over SSH and inside terminals without a clipboard program, as long as
/// the terminal honours the sequence.
pub struct Osc52;

impl CopyTool for Osc52 {
    fn method(&self) -> CopyMethod {
        CopyMethod::Osc52
    }

    fn is_available(&self) -> bool {
        let dumb = env::var("TERM").map(|t| t == "dumb").unwrap_or(false);
        !dumb && io::stdout().is_terminal()
    }

    fn try_copy_text(&self, text: &str) -> Result<(), CopyToolError> {
        let mut out = io::stdout().lock();
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| CopyToolError::Failed(e.to_string()))
    }
}

pub(crate) fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", base64_encode(text.as_bytes()))
}

fn base64_encode(bytes: &[u8]) -> String {
    const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let n = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);
        for i in 0..4 {
            if i <= chunk.len() {
                out.push(ALPHABET[((n >> (18 - 6 * i)) & 0x3f) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Get the platform-appropriate tools in priority order, OSC 52 last.
pub fn platform_tools() -> Vec<Box<dyn CopyTool>> {
    let mut tools: Vec<Box<dyn CopyTool>> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        tools.push(Box::new(CommandTool::pbcopy()));
    }

    #[cfg(target_os = "linux")]
    {
        tools.push(Box::new(CommandTool::wl_copy()));
        tools.push(Box::new(CommandTool::xclip()));
        tools.push(Box::new(CommandTool::xsel()));
    }

    tools.push(Box::new(Osc52));
    tools
}
