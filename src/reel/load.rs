use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;
use walkdir::WalkDir;

use crate::config::ReelSettings;
use crate::share::slugify;

use super::model::{Manifest, ManifestTrack, Track};

#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("track #{index} in {path} has an empty name")]
    EmptyName { path: PathBuf, index: usize },

    #[error("clip '{clip}' of track '{track}' has invalid bounds {start}..{end}")]
    InvalidClip {
        track: String,
        clip: String,
        start: f64,
        end: f64,
    },

    #[error("duplicate track id '{0}'")]
    DuplicateId(String),
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Load every track from `path`, which is either a manifest or a directory of them.
///
/// Directories are walked in sorted path order so the resulting track order is
/// stable across runs. Track ids must be unique across the whole reel.
pub fn load_reel(path: &Path, settings: &ReelSettings) -> Result<Vec<Track>, ReelError> {
    let manifests = if path.is_dir() {
        find_manifests(path, settings)
    } else {
        vec![path.to_path_buf()]
    };

    let mut tracks = Vec::new();
    for manifest in &manifests {
        let text = fs::read_to_string(manifest).map_err(|source| ReelError::Read {
            path: manifest.clone(),
            source,
        })?;
        let parsed = parse_manifest(&text, manifest)?;
        debug!(manifest = %manifest.display(), tracks = parsed.len(), "parsed reel manifest");
        tracks.extend(parsed);
    }

    let mut seen = HashSet::new();
    for t in &tracks {
        if !seen.insert(t.id.as_str()) {
            return Err(ReelError::DuplicateId(t.id.clone()));
        }
    }

    info!(
        manifests = manifests.len(),
        tracks = tracks.len(),
        "loaded reel from {}",
        path.display()
    );
    Ok(tracks)
}

fn find_manifests(dir: &Path, settings: &ReelSettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).sort_by_file_name();

    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_manifest(p))
        .collect()
}

/// Parse one manifest's text; relative audio paths resolve against its directory.
pub(super) fn parse_manifest(text: &str, path: &Path) -> Result<Vec<Track>, ReelError> {
    let manifest: Manifest = toml::from_str(text).map_err(|source| ReelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    manifest
        .tracks
        .into_iter()
        .enumerate()
        .map(|(index, raw)| build_track(index, raw, path, base_dir))
        .collect()
}

fn build_track(
    index: usize,
    raw: ManifestTrack,
    path: &Path,
    base_dir: &Path,
) -> Result<Track, ReelError> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(ReelError::EmptyName {
            path: path.to_path_buf(),
            index,
        });
    }

    if let Some(clip) = raw
        .clips
        .iter()
        .find(|c| !(c.start.is_finite() && c.start >= 0.0 && c.start < c.end))
    {
        return Err(ReelError::InvalidClip {
            track: name,
            clip: clip.name.clone(),
            start: clip.start,
            end: clip.end,
        });
    }

    let id = raw
        .id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&name));

    Ok(Track {
        id,
        url: resolve_url(raw.url.trim(), base_dir),
        name,
        clips: raw.clips,
    })
}

/// Keep URLs and absolute paths as written; anchor relative paths at `base_dir`.
pub(super) fn resolve_url(raw: &str, base_dir: &Path) -> String {
    // A one-letter "scheme" is a Windows drive letter, not a URL.
    let is_url = Url::parse(raw)
        .map(|u| u.scheme().len() > 1)
        .unwrap_or(false);
    if is_url || Path::new(raw).is_absolute() {
        return raw.to_string();
    }
    base_dir.join(raw).display().to_string()
}
