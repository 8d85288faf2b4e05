use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::player::ClipTiming;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/voclip/config.toml` or `~/.config/voclip/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VOCLIP__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub audio: AudioSettings,
    pub share: ShareSettings,
    pub ui: UiSettings,
    pub reel: ReelSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Move to the next clip this many milliseconds before the current one ends.
    pub advance_tolerance_ms: u64,
    /// Clip ends above this many seconds mean "play until the audio ends".
    pub open_end_threshold_secs: f64,
    /// Start the first clip as soon as a track has loaded.
    pub autoplay: bool,
    /// Interval between progress updates while playing (milliseconds).
    pub frame_interval_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            advance_tolerance_ms: 200,
            open_end_threshold_secs: 10_000.0,
            autoplay: true,
            frame_interval_ms: 16,
        }
    }
}

impl PlayerSettings {
    pub fn timing(&self) -> ClipTiming {
        ClipTiming {
            advance_tolerance: self.advance_tolerance_ms as f64 / 1000.0,
            open_end_threshold: self.open_end_threshold_secs,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output volume (1.0 = unchanged).
    pub volume: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    /// Public page the `?track=` parameter is appended to.
    pub base_url: String,
    /// `width` attribute of the embed snippet.
    pub embed_width: String,
    /// `height` attribute of the embed snippet (pixels).
    pub embed_height: u32,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/clips".to_string(),
            embed_width: "100%".to_string(),
            embed_height: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Accent colour for progress fills and highlights (`#rrggbb` or a colour name).
    pub theme_color: String,
    /// How long the "Copied to clipboard!" toast stays up (milliseconds).
    pub toast_ms: u64,
    /// Show each clip's start/end next to its name.
    pub show_clip_times: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ voice clips ~ ".to_string(),
            theme_color: "#6366f1".to_string(),
            toast_ms: 2000,
            show_clip_times: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReelSettings {
    /// Whether to recurse into subdirectories when the reel path is a directory.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Whether to read manifests from hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for ReelSettings {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: None,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Where to write logs. Logging is off when unset (the terminal belongs to the UI).
    pub file: Option<PathBuf>,
    /// Maximum level: `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}
