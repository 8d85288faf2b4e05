use std::time::Duration;

use tracing::{debug, info, warn};

use crate::reel::{Clip, Track};
use crate::share::{ShareLink, find_track, slugify};

use super::backend::{MediaBackend, MediaEvent};
use super::timing::ClipTiming;

/// Whether playback is wanted, and whether the backend has confirmed it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Playback {
    #[default]
    Paused,
    /// `play()` was issued; no answer from the backend yet.
    Requested,
    /// The backend reported that playback started.
    Confirmed,
}

/// Coarse player state, derived from the fields of `ClipPlayer`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerPhase {
    NoTrack,
    TrackLoading,
    Idle,
    PlayingClip(usize),
    PausedClip(usize),
}

/// Identifies one scheduled progress callback. Only the most recently issued
/// handle is live; older ones are ignored when they fire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHandle(u64);

pub struct ClipPlayer<B: MediaBackend> {
    backend: B,
    tracks: Vec<Track>,
    link: ShareLink,
    timing: ClipTiming,
    autoplay: bool,

    selected: Option<usize>,
    clip: Option<usize>,
    playback: Playback,
    current_time: f64,
    duration: Option<f64>,
    loading: bool,

    frame: Option<FrameHandle>,
    next_frame_id: u64,
}

impl<B: MediaBackend> ClipPlayer<B> {
    /// Create a player and start loading the initial track.
    ///
    /// The initial track is the one named by the link's `track` parameter when it
    /// matches, else the first track, else none.
    pub fn new(backend: B, tracks: Vec<Track>, link: ShareLink, timing: ClipTiming) -> Self {
        let initial = link
            .track_param()
            .and_then(|param| {
                let found = find_track(&tracks, &param);
                if found.is_none() {
                    warn!(%param, "shared track not found, using the first track");
                }
                found
            })
            .or(if tracks.is_empty() { None } else { Some(0) });

        let mut player = Self {
            backend,
            tracks,
            link,
            timing,
            autoplay: true,
            selected: None,
            clip: None,
            playback: Playback::Paused,
            current_time: 0.0,
            duration: None,
            loading: false,
            frame: None,
            next_frame_id: 0,
        };
        if let Some(i) = initial {
            player.select_track(i);
        }
        player
    }

    /// Whether to start the first clip when a track finishes loading.
    pub fn set_autoplay(&mut self, on: bool) {
        self.autoplay = on;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn current_clip_index(&self) -> Option<usize> {
        self.clip
    }

    pub fn current_clip(&self) -> Option<&Clip> {
        let i = self.clip?;
        self.selected_track()?.clips.get(i)
    }

    fn clips(&self) -> &[Clip] {
        self.selected_track().map(|t| t.clips.as_slice()).unwrap_or(&[])
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback != Playback::Paused
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn link(&self) -> &ShareLink {
        &self.link
    }

    pub fn timing(&self) -> ClipTiming {
        self.timing
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn phase(&self) -> PlayerPhase {
        if self.selected.is_none() {
            return PlayerPhase::NoTrack;
        }
        if self.loading {
            return PlayerPhase::TrackLoading;
        }
        match self.clip {
            None => PlayerPhase::Idle,
            Some(i) if self.is_playing() => PlayerPhase::PlayingClip(i),
            Some(i) => PlayerPhase::PausedClip(i),
        }
    }

    /// Playback controls only make sense for a track with clips.
    pub fn has_controls(&self) -> bool {
        self.selected_track().is_some_and(Track::has_clips)
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(self.clip, Some(i) if i > 0)
    }

    pub fn can_go_next(&self) -> bool {
        matches!(self.clip, Some(i) if i + 1 < self.clips().len())
    }

    /// The handle of the pending progress callback, if one is scheduled.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Switch to track `index` and start loading it. Out-of-range indices fall
    /// back to the first track.
    pub fn select_track(&mut self, index: usize) {
        let index = if index < self.tracks.len() {
            index
        } else if self.tracks.is_empty() {
            return;
        } else {
            warn!(index, "track index out of range, using the first track");
            0
        };

        self.cancel_frame();
        self.backend.pause();
        self.playback = Playback::Paused;
        self.selected = Some(index);
        self.clip = None;
        self.duration = None;
        self.current_time = 0.0;
        self.loading = true;

        let track = &self.tracks[index];
        info!(track = %track.name, url = %track.url, "loading track");
        self.backend.set_source(&track.url);
        let slug = slugify(&track.name);
        self.link.replace_track(&slug);
    }

    /// Space bar / play button: pause when playing, otherwise resume (starting at
    /// the first clip when none is active).
    pub fn toggle_play(&mut self) {
        if !self.has_controls() {
            return;
        }
        if self.is_playing() {
            self.pause();
            return;
        }
        if self.clip.is_none() {
            self.start_clip(0);
            return;
        }
        self.request_play();
    }

    /// Play clip `i` from its start, or pause it when it is already playing.
    pub fn play_clip(&mut self, i: usize) {
        if i >= self.clips().len() {
            return;
        }
        if self.clip == Some(i) && self.is_playing() {
            self.pause();
            return;
        }
        self.start_clip(i);
    }

    /// A click on clip row `i` at `fraction` of its width.
    ///
    /// Another clip starts from its beginning; the active clip seeks when it is
    /// playing and resumes in place when it is paused.
    pub fn click_clip(&mut self, i: usize, fraction: f64) {
        if i >= self.clips().len() {
            return;
        }
        if self.clip != Some(i) {
            self.start_clip(i);
        } else if self.is_playing() {
            self.seek_within_clip(i, fraction);
        } else {
            self.request_play();
        }
    }

    /// Seek to `fraction` of the active, playing clip. Returns whether it seeked.
    pub fn seek_within_clip(&mut self, i: usize, fraction: f64) -> bool {
        if self.clip != Some(i) || !self.is_playing() {
            return false;
        }
        let Some(clip) = self.clips().get(i) else {
            return false;
        };
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = self.timing.seek_target(clip, fraction, self.duration);
        debug!(clip = i, fraction, target, "seek within clip");
        self.seek(target);
        true
    }

    pub fn previous_clip(&mut self) {
        if let Some(i) = self.clip.filter(|_| self.can_go_previous()) {
            self.play_clip(i - 1);
        }
    }

    pub fn next_clip(&mut self) {
        if let Some(i) = self.clip.filter(|_| self.can_go_next()) {
            self.play_clip(i + 1);
        }
    }

    pub fn pause(&mut self) {
        self.backend.pause();
        self.playback = Playback::Paused;
        self.cancel_frame();
    }

    /// Fill percentage for clip `i`; always 0 unless it is the active clip.
    pub fn clip_progress(&self, i: usize) -> f64 {
        if self.clip != Some(i) {
            return 0.0;
        }
        match self.clips().get(i) {
            Some(clip) => self.timing.progress(clip, self.current_time, self.duration),
            None => 0.0,
        }
    }

    pub fn effective_end(&self, i: usize) -> Option<f64> {
        self.clips()
            .get(i)
            .map(|clip| self.timing.effective_end(clip, self.duration))
    }

    /// Progress callback. Reads the position, advances past finished clips and
    /// schedules the next callback while playback continues.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.frame != Some(handle) {
            return;
        }
        self.frame = None;
        if !self.is_playing() {
            return;
        }

        self.current_time = self.backend.current_time();
        let finished = self
            .current_clip()
            .map(|clip| self.timing.reached_end(clip, self.current_time, self.duration))
            .unwrap_or(false);
        if finished {
            self.advance(false);
        }

        if self.is_playing() {
            self.schedule_frame();
        }
    }

    /// Drain and apply every pending backend notification.
    pub fn pump(&mut self) {
        while let Some(event) = self.backend.poll_event() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata { source, duration } => {
                if self.selected_track().map(|t| t.url.as_str()) != Some(source.as_str()) {
                    debug!(%source, "ignoring metadata for a superseded source");
                    return;
                }
                self.loading = false;
                self.duration = Some(duration);
                debug!(duration, "metadata loaded");
                if self.autoplay && self.has_controls() {
                    self.start_clip(0);
                }
            }
            MediaEvent::LoadFailed { source, reason } => {
                if self.selected_track().map(|t| t.url.as_str()) != Some(source.as_str()) {
                    return;
                }
                warn!(%source, %reason, "failed to load track");
                self.loading = false;
            }
            MediaEvent::PlayStarted => {
                if self.playback == Playback::Requested {
                    self.playback = Playback::Confirmed;
                }
            }
            MediaEvent::PlayRejected { reason } => {
                // Blocked playback is not an error for the listener: just stay paused.
                debug!(%reason, clip = ?self.clip, "play request rejected");
                self.playback = Playback::Paused;
                self.cancel_frame();
            }
            MediaEvent::Ended => {
                if self.clip.is_some() {
                    self.advance(true);
                } else {
                    self.pause();
                }
            }
        }
    }

    /// Quit the backend while it is still playing, so it can fade out, then
    /// tear the player down.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.cancel_frame();
        self.backend.quit(fade_out);
        self.teardown();
    }

    /// Stop everything the player has scheduled. Call when the player goes away.
    pub fn teardown(&mut self) {
        self.cancel_frame();
        self.backend.pause();
        self.playback = Playback::Paused;
    }

    fn start_clip(&mut self, i: usize) {
        let Some(start) = self.clips().get(i).map(|c| c.start) else {
            return;
        };
        debug!(clip = i, start, "start clip");
        self.clip = Some(i);
        self.seek(start);
        self.request_play();
    }

    fn seek(&mut self, secs: f64) {
        self.backend.set_current_time(secs);
        self.current_time = secs;
    }

    fn request_play(&mut self) {
        self.backend.play();
        if self.playback == Playback::Paused {
            self.playback = Playback::Requested;
        }
        if self.frame.is_none() {
            self.schedule_frame();
        }
    }

    /// Move to the clip after the active one, or stop after the last clip.
    ///
    /// `media_stopped` is set when the backend itself ran out, in which case the
    /// next clip needs a fresh play request.
    fn advance(&mut self, media_stopped: bool) {
        let Some(i) = self.clip else {
            return;
        };
        let next = i + 1;
        match self.clips().get(next).map(|c| c.start) {
            Some(start) => {
                debug!(from = i, to = next, "auto-advance");
                self.clip = Some(next);
                self.seek(start);
                if media_stopped {
                    self.playback = Playback::Paused;
                    self.request_play();
                }
            }
            None => {
                debug!("reached the last clip");
                self.pause();
                self.clip = None;
            }
        }
    }

    fn schedule_frame(&mut self) {
        self.next_frame_id += 1;
        self.frame = Some(FrameHandle(self.next_frame_id));
    }

    fn cancel_frame(&mut self) {
        self.frame = None;
    }
}
