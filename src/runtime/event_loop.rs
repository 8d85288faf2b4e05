use std::sync::mpsc;
use std::time::Instant;

use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::debug;

use crate::app::{App, KeyOutcome, Overlay};
use crate::clipboard::Copy;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle, NowPlaying};
use crate::player::MediaBackend;
use crate::runtime::mpris_sync::{now_playing, update_mpris};
use crate::ui;

/// Main terminal event loop: drains backend notifications, runs the progress
/// callback, draws, and handles input from the terminal and MPRIS. Returns
/// `Ok(())` when shutdown is requested.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<B>,
    copier: &Copy,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> anyhow::Result<()> {
    let frame_interval = settings.player.frame_interval();
    let mut last_mpris: Option<NowPlaying> = None;

    loop {
        app.player.pump();
        if let Some(handle) = app.player.pending_frame() {
            app.player.on_frame(handle);
        }
        let now = Instant::now();
        app.follow_player();
        app.expire(now);

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let snapshot = now_playing(app);
        if last_mpris.as_ref() != Some(&snapshot) {
            mpris.update(snapshot.clone());
            last_mpris = Some(snapshot);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, now))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
            update_mpris(mpris, app);
        }

        if !event::poll(frame_interval)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key.code, key.modifiers, copier, Instant::now())
                    == KeyOutcome::Quit
                {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left)
                    || app.overlay != Overlay::None
                {
                    continue;
                }
                let Ok(size) = terminal.size() else {
                    continue;
                };
                let areas = ui::areas(Rect::new(0, 0, size.width, size.height));
                let total = app
                    .player
                    .selected_track()
                    .map_or(0, |t| t.clips.len());
                if let Some((row, fraction)) =
                    ui::clip_at(areas.clips, total, app.cursor, mouse.column, mouse.row)
                {
                    debug!(row, fraction, "clip clicked");
                    app.click_clip(row, fraction);
                }
            }
            _ => {}
        }
    }
}

/// Apply one MPRIS command. Returns true when the app should quit.
pub(super) fn handle_control_cmd<B: MediaBackend>(cmd: ControlCmd, app: &mut App<B>) -> bool {
    debug!(?cmd, "mpris command");
    let player = &mut app.player;
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            if !player.is_playing() {
                player.toggle_play();
            }
        }
        ControlCmd::Pause | ControlCmd::Stop => {
            if player.is_playing() {
                player.pause();
            }
        }
        ControlCmd::PlayPause => player.toggle_play(),
        ControlCmd::Next => player.next_clip(),
        ControlCmd::Prev => player.previous_clip(),
    }
    false
}
