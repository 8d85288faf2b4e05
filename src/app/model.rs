//! Application model: the clip player plus everything the TUI layers on top
//! of it (clip cursor, track picker, share popup, toast).

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::clipboard::{ClipboardError, Copy, CopyMethod};
use crate::config::{ShareSettings, UiSettings};
use crate::player::{ClipPlayer, MediaBackend};

/// Popups drawn over the clip list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    /// Track picker with its type-to-filter input.
    Picker,
    /// Share link and embed code.
    Share,
}

/// Which share field was copied last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CopiedField {
    Link,
    Embed,
}

#[derive(Clone, Debug)]
struct Toast {
    message: String,
    until: Instant,
}

/// The main application model.
pub struct App<B: MediaBackend> {
    pub player: ClipPlayer<B>,
    /// Highlighted row in the clip list.
    pub cursor: usize,
    pub overlay: Overlay,

    pub picker_query: String,
    /// Highlighted row among the picker's visible tracks.
    pub picker_selected: usize,
    lower_names: Vec<String>,

    embed_width: String,
    embed_height: u32,
    toast_for: Duration,
    toast: Option<Toast>,
    copied: Option<(CopiedField, Instant)>,

    // Active clip as of the last `follow_player`.
    followed_clip: Option<usize>,
}

impl<B: MediaBackend> App<B> {
    pub fn new(player: ClipPlayer<B>, share: &ShareSettings, ui: &UiSettings) -> Self {
        let lower_names = player
            .tracks()
            .iter()
            .map(|t| t.name.to_lowercase())
            .collect();
        Self {
            player,
            cursor: 0,
            overlay: Overlay::None,
            picker_query: String::new(),
            picker_selected: 0,
            lower_names,
            embed_width: share.embed_width.clone(),
            embed_height: share.embed_height,
            toast_for: Duration::from_millis(ui.toast_ms),
            toast: None,
            copied: None,
            followed_clip: None,
        }
    }

    fn clip_count(&self) -> usize {
        self.player.selected_track().map_or(0, |t| t.clips.len())
    }

    /// Keep the cursor on the active clip whenever the player moves to another one.
    pub fn follow_player(&mut self) {
        let active = self.player.current_clip_index();
        if active != self.followed_clip {
            if let Some(i) = active {
                self.cursor = i;
            }
            self.followed_clip = active;
        }
        let count = self.clip_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    /// Space bar. Typed into the filter while the picker input has focus,
    /// otherwise toggles playback. Either way the key is consumed.
    pub fn handle_space(&mut self) {
        if self.overlay == Overlay::Picker {
            self.push_filter_char(' ');
        } else {
            self.player.toggle_play();
        }
    }

    pub fn next(&mut self) {
        let count = self.clip_count();
        if count > 0 {
            self.cursor = (self.cursor + 1).min(count - 1);
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Play or pause the clip under the cursor.
    pub fn play_selected(&mut self) {
        self.player.play_clip(self.cursor);
    }

    pub fn click_clip(&mut self, i: usize, fraction: f64) {
        if i < self.clip_count() {
            self.cursor = i;
            self.player.click_clip(i, fraction);
        }
    }

    /// Seek the playing clip to `tenths` × 10 % of its span.
    pub fn seek_tenths(&mut self, tenths: u8) {
        if let Some(i) = self.player.current_clip_index() {
            let fraction = f64::from(tenths.min(10)) / 10.0;
            self.player.seek_within_clip(i, fraction);
        }
    }

    pub fn open_picker(&mut self) {
        self.overlay = Overlay::Picker;
        self.picker_query.clear();
        self.picker_selected = self
            .player
            .selected_index()
            .and_then(|sel| self.picker_indices().iter().position(|&i| i == sel))
            .unwrap_or(0);
    }

    pub fn open_share(&mut self) {
        self.overlay = Overlay::Share;
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Track indices visible in the picker, in reel order.
    pub fn picker_indices(&self) -> Vec<usize> {
        let query = self.picker_query.trim().to_lowercase();
        (0..self.lower_names.len())
            .filter(|&i| fuzzy_match_positions(&self.lower_names[i], &query).is_some())
            .collect()
    }

    /// Character positions of `track_index`'s name matched by the picker query.
    pub fn picker_match_positions(&self, track_index: usize) -> Vec<usize> {
        let query = self.picker_query.trim().to_lowercase();
        self.lower_names
            .get(track_index)
            .and_then(|name| fuzzy_match_positions(name, &query))
            .unwrap_or_default()
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.picker_query.push(c);
        self.picker_selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.picker_query.pop();
        self.picker_selected = 0;
    }

    pub fn picker_next(&mut self) {
        let len = self.picker_indices().len();
        if len > 0 {
            self.picker_selected = (self.picker_selected + 1) % len;
        }
    }

    pub fn picker_prev(&mut self) {
        let len = self.picker_indices().len();
        if len > 0 {
            self.picker_selected = (self.picker_selected + len - 1) % len;
        }
    }

    /// Load the highlighted picker entry and close the picker.
    pub fn confirm_picker(&mut self) {
        let Some(&index) = self.picker_indices().get(self.picker_selected) else {
            return;
        };
        self.overlay = Overlay::None;
        if self.player.selected_index() == Some(index) {
            return;
        }
        debug!(index, "track picked");
        self.player.select_track(index);
        self.cursor = 0;
        self.followed_clip = None;
    }

    pub fn share_link(&self) -> String {
        self.player.link().as_str().to_string()
    }

    pub fn embed_code(&self) -> String {
        self.player
            .link()
            .embed_snippet(&self.embed_width, self.embed_height)
    }

    /// Copy the link or the embed code, then flash the toast and the field.
    pub fn copy_field(
        &mut self,
        field: CopiedField,
        copier: &Copy,
        now: Instant,
    ) -> Result<CopyMethod, ClipboardError> {
        let text = match field {
            CopiedField::Link => self.share_link(),
            CopiedField::Embed => self.embed_code(),
        };
        match copier.text(&text) {
            Ok(method) => {
                debug!(?field, method = method.name(), "copied");
                self.copied = Some((field, now + self.toast_for));
                self.show_toast("Copied to clipboard!", now);
                Ok(method)
            }
            Err(e) => {
                warn!(?field, error = %e, "copy failed");
                Err(e)
            }
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast {
            message: message.into(),
            until: now + self.toast_for,
        });
    }

    pub fn toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now < t.until)
            .map(|t| t.message.as_str())
    }

    pub fn is_copied(&self, field: CopiedField, now: Instant) -> bool {
        matches!(self.copied, Some((f, until)) if f == field && now < until)
    }

    /// Drop an expired toast and copied marker.
    pub fn expire(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.until) {
            self.toast = None;
        }
        if matches!(self.copied, Some((_, until)) if now >= until) {
            self.copied = None;
        }
    }
}

/// Fuzzy/subsequence match: return the character positions in `title`
/// that match `query`, or `None` if not matched. Case-insensitive.
pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut title_iter = title.chars().enumerate();

    for qc in query.chars().flat_map(char::to_lowercase) {
        loop {
            match title_iter.next() {
                Some((ti, tc)) if tc.to_lowercase().eq(std::iter::once(qc)) => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}
