use serde::Deserialize;

/// Nominal end used for clips that play until the media runs out.
///
/// Anything above `ClipTiming::open_end_threshold` is treated the same way;
/// this is just the value a manifest gets when `end` is omitted.
pub const OPEN_END: f64 = 999_999.0;

/// A named, time-bounded segment of a track's audio (seconds).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Clip {
    pub name: String,
    pub start: f64,
    #[serde(default = "open_end")]
    pub end: f64,
}

fn open_end() -> f64 {
    OPEN_END
}

impl Clip {
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }
}

/// A single audio resource and the clips cut from it, in playback order.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub url: String,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn has_clips(&self) -> bool {
        !self.clips.is_empty()
    }
}

/// On-disk shape of a manifest before ids and paths are resolved.
#[derive(Debug, Deserialize)]
pub(super) struct Manifest {
    #[serde(default, rename = "track")]
    pub tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ManifestTrack {
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(default, rename = "clip")]
    pub clips: Vec<Clip>,
}
