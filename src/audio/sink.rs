//! Helpers to turn a reel source into something `rodio` can play.
//!
//! Seeking rebuilds the sink: the file is decoded again and skipped forward to
//! the requested position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};
use url::Url;

use super::types::AudioError;

/// Map a track URL to a local file. Only `file://` URLs and plain paths play.
pub(crate) fn resolve_source(url: &str) -> Result<PathBuf, AudioError> {
    match Url::parse(url) {
        Ok(u) if u.scheme() == "file" => u
            .to_file_path()
            .map_err(|()| AudioError::InvalidSource(url.to_string())),
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {
            Err(AudioError::RemoteSource(url.to_string()))
        }
        // Single-letter schemes are Windows drive letters.
        Ok(u) if u.scheme().len() > 1 => Err(AudioError::InvalidSource(url.to_string())),
        _ => Ok(PathBuf::from(url)),
    }
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Duration of the file at `path`: tag/header data first, the decoder second.
pub(crate) fn probe_duration(path: &Path) -> Result<Option<Duration>, AudioError> {
    if let Ok(tagged) = lofty::read_from_path(path) {
        let d = tagged.properties().duration();
        if !d.is_zero() {
            return Ok(Some(d));
        }
    }
    Ok(open_decoder(path)?.total_duration())
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, AudioError> {
    let source = open_decoder(path)?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
