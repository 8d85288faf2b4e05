use crate::reel::Clip;

/// The two time constants that shape clip playback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipTiming {
    /// How early (seconds) before a clip's end the player moves on. Masks the
    /// jitter between frame callbacks.
    pub advance_tolerance: f64,
    /// Clip ends above this (seconds) mean "until the media ends".
    pub open_end_threshold: f64,
}

impl Default for ClipTiming {
    fn default() -> Self {
        Self {
            advance_tolerance: 0.2,
            open_end_threshold: 10_000.0,
        }
    }
}

impl ClipTiming {
    pub fn is_open_ended(&self, clip: &Clip) -> bool {
        clip.end > self.open_end_threshold
    }

    /// Where `clip` actually stops: the media duration for open-ended clips once
    /// it is known, the nominal end otherwise.
    pub fn effective_end(&self, clip: &Clip, duration: Option<f64>) -> f64 {
        match duration {
            Some(d) if self.is_open_ended(clip) && d.is_finite() && d > 0.0 => d,
            _ => clip.end,
        }
    }

    /// Fill percentage of `clip` at playback position `t`, in `[0, 100]`.
    pub fn progress(&self, clip: &Clip, t: f64, duration: Option<f64>) -> f64 {
        let span = self.effective_end(clip, duration) - clip.start;
        if span <= 0.0 || !span.is_finite() {
            return 0.0;
        }
        (100.0 * (t - clip.start) / span).clamp(0.0, 100.0)
    }

    /// Position for a click at `fraction` of the clip's width.
    pub fn seek_target(&self, clip: &Clip, fraction: f64, duration: Option<f64>) -> f64 {
        let end = self.effective_end(clip, duration);
        let target = clip.start + fraction * (end - clip.start);
        target.max(clip.start).min(end)
    }

    /// Whether position `t` is close enough to the end of `clip` to move on.
    pub fn reached_end(&self, clip: &Clip, t: f64, duration: Option<f64>) -> bool {
        t >= self.effective_end(clip, duration) - self.advance_tolerance
    }
}
