use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};

use super::*;
use crate::clipboard::{Copy, CopyMethod, CopyTool, CopyToolError};
use crate::config::{ShareSettings, UiSettings};
use crate::player::{ClipPlayer, ClipTiming, MediaBackend, MediaEvent};
use crate::reel::{Clip, Track};
use crate::share::ShareLink;

#[derive(Default)]
struct Backend {
    playing: bool,
    position: f64,
    sources: Vec<String>,
}

impl MediaBackend for Backend {
    fn set_source(&mut self, url: &str) {
        self.sources.push(url.to_string());
    }
    fn play(&mut self) {
        self.playing = true;
    }
    fn pause(&mut self) {
        self.playing = false;
    }
    fn current_time(&self) -> f64 {
        self.position
    }
    fn set_current_time(&mut self, secs: f64) {
        self.position = secs;
    }
    fn duration(&self) -> Option<f64> {
        None
    }
    fn poll_event(&mut self) -> Option<MediaEvent> {
        None
    }
}

struct AlwaysCopies;

impl CopyTool for AlwaysCopies {
    fn method(&self) -> CopyMethod {
        CopyMethod::Osc52
    }
    fn is_available(&self) -> bool {
        true
    }
    fn try_copy_text(&self, _text: &str) -> Result<(), CopyToolError> {
        Ok(())
    }
}

fn t(name: &str, clips: usize) -> Track {
    Track {
        id: crate::share::slugify(name),
        name: name.into(),
        url: format!("/audio/{}.mp3", crate::share::slugify(name)),
        clips: (0..clips)
            .map(|i| Clip::new(format!("take {i}"), i as f64 * 10.0, i as f64 * 10.0 + 10.0))
            .collect(),
    }
}

fn app(tracks: Vec<Track>) -> App<Backend> {
    let link = ShareLink::parse("https://voice.example/clips?ref=home").unwrap();
    let mut player = ClipPlayer::new(Backend::default(), tracks, link, ClipTiming::default());
    player.handle_event(MediaEvent::LoadedMetadata {
        source: player.selected_track().unwrap().url.clone(),
        duration: 100.0,
    });
    player.handle_event(MediaEvent::PlayStarted);
    App::new(player, &ShareSettings::default(), &UiSettings::default())
}

fn press(app: &mut App<Backend>, code: KeyCode) -> KeyOutcome {
    let copier = Copy::with_tools(vec![Box::new(AlwaysCopies)]);
    app.handle_key(code, KeyModifiers::NONE, &copier, Instant::now())
}

#[test]
fn fuzzy_match_simple() {
    let title = "Hello World";
    assert!(fuzzy_match_positions(title, "hw").is_some());
    assert!(fuzzy_match_positions(title, "ELLO").is_some());
    assert!(fuzzy_match_positions(title, "xyz").is_none());
    assert_eq!(fuzzy_match_positions("Promo", "pm"), Some(vec![0, 4]));
}

#[test]
fn space_toggles_playback_outside_the_picker() {
    let mut a = app(vec![t("Commercial", 3)]);
    assert!(a.player.is_playing());

    assert_eq!(press(&mut a, KeyCode::Char(' ')), KeyOutcome::Continue);
    assert!(!a.player.is_playing());
    press(&mut a, KeyCode::Char(' '));
    assert!(a.player.is_playing());
}

#[test]
fn space_is_typed_into_the_open_picker() {
    let mut a = app(vec![t("Commercial", 3), t("Hip-Hop Promo", 1)]);
    press(&mut a, KeyCode::Char('t'));
    assert_eq!(a.overlay, Overlay::Picker);

    press(&mut a, KeyCode::Char('h'));
    press(&mut a, KeyCode::Char(' '));
    assert_eq!(a.picker_query, "h ");
    assert!(a.player.is_playing());
}

#[test]
fn picker_filters_and_loads_the_chosen_track() {
    let mut a = app(vec![t("Commercial", 3), t("Hip-Hop Promo", 1), t("Narration", 2)]);
    press(&mut a, KeyCode::Char('t'));
    for c in "hpp".chars() {
        press(&mut a, KeyCode::Char(c));
    }
    assert_eq!(a.picker_indices(), vec![1]);
    assert_eq!(a.picker_match_positions(1), vec![0, 2, 6]);

    press(&mut a, KeyCode::Enter);
    assert_eq!(a.overlay, Overlay::None);
    assert_eq!(a.player.selected_index(), Some(1));
    assert_eq!(a.player.link().track_param().as_deref(), Some("hip-hop-promo"));
    assert_eq!(a.cursor, 0);
}

#[test]
fn picker_opens_on_the_current_track() {
    let mut a = app(vec![t("Commercial", 1), t("Narration", 1)]);
    a.player.select_track(1);
    a.open_picker();
    assert_eq!(a.picker_selected, 1);

    a.picker_next();
    assert_eq!(a.picker_selected, 0);
    a.picker_prev();
    assert_eq!(a.picker_selected, 1);
}

#[test]
fn escape_closes_picker_without_switching() {
    let mut a = app(vec![t("Commercial", 1), t("Narration", 1)]);
    press(&mut a, KeyCode::Char('t'));
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Esc);
    assert_eq!(a.overlay, Overlay::None);
    assert_eq!(a.player.selected_index(), Some(0));
}

#[test]
fn cursor_moves_within_the_clip_list_and_follows_playback() {
    let mut a = app(vec![t("Commercial", 3)]);
    press(&mut a, KeyCode::Char('k'));
    assert_eq!(a.cursor, 0);
    press(&mut a, KeyCode::Char('j'));
    press(&mut a, KeyCode::Char('j'));
    press(&mut a, KeyCode::Char('j'));
    assert_eq!(a.cursor, 2);

    press(&mut a, KeyCode::Enter);
    assert_eq!(a.player.current_clip_index(), Some(2));

    a.player.previous_clip();
    a.follow_player();
    assert_eq!(a.cursor, 1);
}

#[test]
fn digit_keys_seek_within_the_active_clip() {
    let mut a = app(vec![t("Commercial", 3)]);
    a.player.next_clip();
    press(&mut a, KeyCode::Char('5'));
    assert_eq!(a.player.current_time(), 15.0);
    press(&mut a, KeyCode::Char('0'));
    assert_eq!(a.player.current_time(), 10.0);
}

#[test]
fn click_moves_cursor_and_starts_the_clip() {
    let mut a = app(vec![t("Commercial", 3)]);
    a.click_clip(2, 0.5);
    assert_eq!(a.cursor, 2);
    assert_eq!(a.player.current_clip_index(), Some(2));
    assert_eq!(a.player.current_time(), 20.0);

    a.click_clip(7, 0.5);
    assert_eq!(a.cursor, 2);
}

#[test]
fn copying_flashes_toast_and_field() {
    let mut a = app(vec![t("Commercial", 1)]);
    let now = Instant::now();
    press(&mut a, KeyCode::Char('s'));
    assert_eq!(a.overlay, Overlay::Share);

    let copier = Copy::with_tools(vec![Box::new(AlwaysCopies)]);
    assert_eq!(
        a.handle_key(KeyCode::Char('e'), KeyModifiers::NONE, &copier, now),
        KeyOutcome::Continue
    );
    assert_eq!(a.toast(now), Some("Copied to clipboard!"));
    assert!(a.is_copied(CopiedField::Embed, now));
    assert!(!a.is_copied(CopiedField::Link, now));

    let later = now + Duration::from_millis(2001);
    assert_eq!(a.toast(later), None);
    a.expire(later);
    assert!(!a.is_copied(CopiedField::Embed, later));
}

#[test]
fn failed_copy_shows_failure_toast() {
    let mut a = app(vec![t("Commercial", 1)]);
    a.open_share();
    let now = Instant::now();
    let nothing = Copy::with_tools(Vec::new());
    a.handle_key(KeyCode::Char('c'), KeyModifiers::NONE, &nothing, now);
    assert_eq!(a.toast(now), Some("Copy failed"));
    assert!(!a.is_copied(CopiedField::Link, now));
}

#[test]
fn share_texts_follow_the_selected_track() {
    let mut a = app(vec![t("Commercial", 1), t("Hip-Hop Promo", 1)]);
    a.player.select_track(1);
    assert_eq!(
        a.share_link(),
        "https://voice.example/clips?ref=home&track=hip-hop-promo"
    );
    assert!(a.embed_code().contains("src=\"https://voice.example/clips?ref=home&track=hip-hop-promo\""));
    assert!(a.embed_code().contains("height=\"600\""));
}

#[test]
fn quit_keys() {
    let mut a = app(vec![t("Commercial", 1)]);
    assert_eq!(press(&mut a, KeyCode::Char('q')), KeyOutcome::Quit);

    let copier = Copy::with_tools(Vec::new());
    assert_eq!(
        a.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL, &copier, Instant::now()),
        KeyOutcome::Quit
    );

    a.open_picker();
    assert_eq!(press(&mut a, KeyCode::Char('q')), KeyOutcome::Continue);
    assert_eq!(a.picker_query, "q");
}
