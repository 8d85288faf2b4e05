use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::AudioSettings;
use crate::player::{MediaBackend, MediaEvent};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// UI-side handle to the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<MediaEvent>,
    // Events synthesized locally when the audio thread is gone.
    local: VecDeque<MediaEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, event_tx, playback_info.clone());

        let player = Self {
            tx,
            events: event_rx,
            local: VecDeque::new(),
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        };
        player.set_volume(audio_settings.volume);
        player
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Output volume, 1.0 being the file's own level.
    pub fn set_volume(&self, volume: f32) {
        let _ = self.send(AudioCmd::SetVolume(volume));
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: u64::try_from(fade_out.as_millis()).unwrap_or(u64::MAX),
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn with_info<T>(&self, f: impl FnOnce(&PlaybackInfo) -> T) -> Option<T> {
        self.playback.lock().ok().map(|info| f(&info))
    }
}

impl MediaBackend for AudioPlayer {
    fn set_source(&mut self, url: &str) {
        if let Ok(mut info) = self.playback.lock() {
            info.reset();
        }
        if self.send(AudioCmd::Load(url.to_string())).is_err() {
            warn!(%url, "audio thread is gone");
            self.local.push_back(MediaEvent::LoadFailed {
                source: url.to_string(),
                reason: "audio thread stopped".to_string(),
            });
        }
    }

    fn play(&mut self) {
        if self.send(AudioCmd::Play).is_err() {
            self.local.push_back(MediaEvent::PlayRejected {
                reason: "audio thread stopped".to_string(),
            });
        }
    }

    fn pause(&mut self) {
        if let Ok(mut info) = self.playback.lock() {
            info.stop(Instant::now());
        }
        let _ = self.send(AudioCmd::Pause);
    }

    fn current_time(&self) -> f64 {
        self.with_info(|info| info.position_at(Instant::now()).as_secs_f64())
            .unwrap_or(0.0)
    }

    fn set_current_time(&mut self, secs: f64) {
        let to = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or_default();
        // Update the shared position now so reads see the target before the
        // audio thread gets to the command.
        if let Ok(mut info) = self.playback.lock() {
            info.seek(to, Instant::now());
        }
        let _ = self.send(AudioCmd::Seek(to));
    }

    fn duration(&self) -> Option<f64> {
        self.with_info(|info| info.duration.map(|d| d.as_secs_f64()))
            .flatten()
    }

    fn quit(&mut self, fade_out: Duration) {
        self.quit_softly(fade_out);
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.local
            .pop_front()
            .or_else(|| self.events.try_recv().ok())
    }
}
