use std::{env, path::PathBuf};

use url::Url;

use super::schema::Settings;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("player.open_end_threshold_secs must be > 0")]
    OpenEndThreshold,

    #[error("player.advance_tolerance_ms must be < 1000")]
    AdvanceTolerance,

    #[error("audio.volume must be within 0.0..=2.0")]
    Volume,

    #[error("share.base_url is not a valid URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `VOCLIP__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("VOCLIP")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let threshold = self.player.open_end_threshold_secs;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(SettingsError::OpenEndThreshold);
        }
        if self.player.advance_tolerance_ms >= 1000 {
            return Err(SettingsError::AdvanceTolerance);
        }
        if !(0.0..=2.0).contains(&self.audio.volume) {
            return Err(SettingsError::Volume);
        }
        Url::parse(&self.share.base_url)?;
        Ok(())
    }
}

/// Resolve the config path from `VOCLIP_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("VOCLIP_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/voclip/config.toml`
/// or `~/.config/voclip/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };
    config_home.map(|d| d.join("voclip").join("config.toml"))
}
