use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;

use crate::config::LogSettings;

/// Install the file logger. Without a configured file nothing is logged: the
/// terminal belongs to the UI.
pub fn init(settings: &LogSettings) -> anyhow::Result<()> {
    let Some(path) = settings.file.as_ref() else {
        return Ok(());
    };
    let level = LevelFilter::from_str(&settings.level).unwrap_or(LevelFilter::INFO);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;
    Ok(())
}
