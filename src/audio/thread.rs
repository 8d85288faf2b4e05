use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::player::MediaEvent;

use super::sink::{create_sink_at, probe_duration, resolve_source};
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackInfo};

/// How often the thread wakes up to notice that a sink ran dry.
const TICK: Duration = Duration::from_millis(50);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut engine = Engine::new(events, playback_info);
        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => engine.check_ended(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread exiting");
    })
}

/// Everything the audio thread owns.
struct Engine {
    events: Sender<MediaEvent>,
    playback_info: PlaybackHandle,
    volume: f32,

    // Opened on the first play request, so a missing device only rejects play.
    stream: Option<OutputStream>,
    source: Option<PathBuf>,
    sink: Option<Sink>,
    paused: bool,
}

impl Engine {
    fn new(events: Sender<MediaEvent>, playback_info: PlaybackHandle) -> Self {
        Self {
            events,
            playback_info,
            volume: 1.0,
            stream: None,
            source: None,
            sink: None,
            paused: true,
        }
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(event);
    }

    fn update_info(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback_info.lock() {
            f(&mut info);
        }
    }

    fn position(&self) -> Duration {
        self.playback_info
            .lock()
            .map(|info| info.position_at(Instant::now()))
            .unwrap_or_default()
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load(url) => self.load(url),
            AudioCmd::Play => {
                if let Err(e) = self.play() {
                    warn!(error = %e, "play rejected");
                    self.emit(MediaEvent::PlayRejected {
                        reason: e.to_string(),
                    });
                }
            }
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(to) => self.seek(to),
            AudioCmd::SetVolume(v) => {
                self.volume = v;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(v);
                }
            }
            AudioCmd::Quit { .. } => {}
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
    }

    fn load(&mut self, url: String) {
        self.stop_sink();
        self.source = None;
        self.update_info(PlaybackInfo::reset);

        let probed = resolve_source(&url).and_then(|path| {
            let duration = probe_duration(&path)?;
            Ok((path, duration))
        });
        match probed {
            Ok((path, Some(duration))) => {
                info!(path = %path.display(), secs = duration.as_secs_f64(), "source loaded");
                self.source = Some(path);
                self.update_info(|info| info.duration = Some(duration));
                self.emit(MediaEvent::LoadedMetadata {
                    source: url,
                    duration: duration.as_secs_f64(),
                });
            }
            Ok((path, None)) => {
                warn!(path = %path.display(), "could not determine duration");
                self.emit(MediaEvent::LoadFailed {
                    source: url,
                    reason: "could not determine the duration".to_string(),
                });
            }
            Err(e) => {
                warn!(%url, error = %e, "failed to load source");
                self.emit(MediaEvent::LoadFailed {
                    source: url,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn ensure_stream(&mut self) -> Result<&OutputStream, AudioError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| AudioError::NoOutput(e.to_string()))?;
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a TUI app.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| AudioError::NoOutput("stream unavailable".to_string()))
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let Some(path) = self.source.clone() else {
            return Err(AudioError::InvalidSource("nothing loaded".to_string()));
        };
        if self.sink.is_none() {
            let start_at = self.position();
            let volume = self.volume;
            let stream = self.ensure_stream()?;
            self.sink = Some(create_sink_at(stream, &path, start_at, volume)?);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.paused = false;
        self.update_info(|info| info.start(Instant::now()));
        self.emit(MediaEvent::PlayStarted);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.paused = true;
        self.update_info(|info| info.stop(Instant::now()));
    }

    fn seek(&mut self, to: Duration) {
        self.update_info(|info| info.seek(to, Instant::now()));
        if self.sink.is_none() {
            // The next play builds a sink at the stored position.
            return;
        }

        // Scrubbing: rebuild the current sink and skip into the file.
        let to = self.position();
        let was_paused = self.paused;
        self.stop_sink();
        let Some(path) = self.source.clone() else {
            return;
        };
        let rebuilt = match self.stream.as_ref() {
            Some(stream) => create_sink_at(stream, &path, to, self.volume),
            None => return,
        };
        match rebuilt {
            Ok(s) => {
                if !was_paused {
                    s.play();
                    self.paused = false;
                }
                self.sink = Some(s);
            }
            Err(e) => {
                warn!(error = %e, "seek failed");
                self.update_info(|info| info.stop(Instant::now()));
                self.emit(MediaEvent::PlayRejected {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Notice a sink that played to the end of the file.
    fn check_ended(&mut self) {
        let drained = !self.paused && self.sink.as_ref().is_some_and(Sink::empty);
        if !drained {
            return;
        }
        debug!("media ended");
        self.stop_sink();
        self.update_info(|info| {
            info.stop(Instant::now());
            if let Some(d) = info.duration {
                info.position = d;
            }
        });
        self.emit(MediaEvent::Ended);
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.as_ref() {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        self.sink = None;
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.update_info(|info| info.stop(Instant::now()));
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
