use std::time::Instant;

use ratatui::{Terminal, backend::TestBackend, layout::Rect};

use super::*;
use crate::config::{ShareSettings, UiSettings};
use crate::player::{ClipPlayer, ClipTiming, MediaEvent};
use crate::reel::{Clip, OPEN_END, Track};
use crate::share::ShareLink;

#[derive(Default)]
struct Silent {
    position: f64,
}

impl MediaBackend for Silent {
    fn set_source(&mut self, _url: &str) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
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

fn app(clips: Vec<Clip>) -> App<Silent> {
    let track = Track {
        id: "commercial".into(),
        name: "Commercial".into(),
        url: "/audio/commercial.mp3".into(),
        clips,
    };
    let link = ShareLink::parse("https://voice.example/clips").unwrap();
    let mut player = ClipPlayer::new(Silent::default(), vec![track], link, ClipTiming::default());
    player.handle_event(MediaEvent::LoadedMetadata {
        source: "/audio/commercial.mp3".into(),
        duration: 60.0,
    });
    App::new(player, &ShareSettings::default(), &UiSettings::default())
}

fn render(app: &App<Silent>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| draw(f, app, &UiSettings::default(), Instant::now()))
        .unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn visible_window_centres_the_cursor() {
    assert_eq!(visible_window(5, 10, 3), (0, 5));
    assert_eq!(visible_window(20, 5, 0), (0, 5));
    assert_eq!(visible_window(20, 5, 10), (8, 13));
    assert_eq!(visible_window(20, 5, 19), (15, 20));
    assert_eq!(visible_window(20, 0, 4), (0, 20));
}

#[test]
fn clip_at_maps_rows_and_fraction() {
    let list = Rect::new(0, 10, 42, 6);
    // Inner area: x 1..41, y 11..15; content starts after the 2-column marker.
    assert_eq!(clip_at(list, 3, 0, 3, 11), Some((0, 0.0)));
    assert_eq!(clip_at(list, 3, 0, 22, 12), Some((1, 0.5)));
    assert_eq!(clip_at(list, 3, 0, 1, 13), Some((2, 0.0)));
    // Below the last clip, on the border, outside.
    assert_eq!(clip_at(list, 3, 0, 10, 14), None);
    assert_eq!(clip_at(list, 3, 0, 10, 10), None);
    assert_eq!(clip_at(list, 3, 0, 50, 12), None);
}

#[test]
fn format_clock_renders_minutes_and_seconds() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(65.9), "1:05");
    assert_eq!(format_clock(-3.0), "0:00");
    assert_eq!(format_clock(f64::NAN), "0:00");
}

#[test]
fn draw_lists_clips_with_times() {
    let a = app(vec![
        Clip::new("Warm read", 0.0, 12.0),
        Clip::new("Full spot", 12.0, OPEN_END),
    ]);
    let screen = render(&a);
    assert!(screen.contains("Warm read  (0:00 - 0:12)"));
    assert!(screen.contains("Full spot  (0:12 - 1:00)"));
    assert!(screen.contains("Track: Commercial"));
    assert!(screen.contains("Starting"));
}

#[test]
fn draw_shows_confirmed_playback() {
    let mut a = app(vec![Clip::new("Warm read", 0.0, 12.0)]);
    a.player.handle_event(MediaEvent::PlayStarted);
    let screen = render(&a);
    assert!(screen.contains("Playing"));
    assert!(screen.contains("Clip: Warm read [0:00 / 0:12]"));
}

#[test]
fn draw_explains_a_track_without_clips() {
    let a = app(Vec::new());
    let screen = render(&a);
    assert!(screen.contains("This track has no clips."));
}

#[test]
fn draw_share_popup_shows_link() {
    let mut a = app(vec![Clip::new("Warm read", 0.0, 12.0)]);
    a.open_share();
    let screen = render(&a);
    assert!(screen.contains("https://voice.example/clips?track=commercial"));
}
