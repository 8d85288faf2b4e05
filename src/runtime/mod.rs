//! Process-level wiring: settings, logging, the reel, the audio thread, MPRIS
//! and the terminal.

use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::clipboard::Copy;
use crate::mpris::ControlCmd;
use crate::player::ClipPlayer;
use crate::reel::load_reel;
use crate::share::ShareLink;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;


pub fn run() -> anyhow::Result<()> {
    let settings = settings::load_settings();
    logging::init(&settings.log)?;

    let mut args = env::args().skip(1);
    let reel = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let deep_link = args.next();

    let tracks = load_reel(&reel, &settings.reel)
        .with_context(|| format!("failed to load reel {}", reel.display()))?;
    info!(reel = %reel.display(), tracks = tracks.len(), "reel loaded");

    let link = ShareLink::from_arg(&settings.share.base_url, deep_link.as_deref())
        .with_context(|| format!("invalid share base url {}", settings.share.base_url))?;

    let audio_player = AudioPlayer::new(settings.audio.clone());
    let mut player = ClipPlayer::new(audio_player, tracks, link, settings.player.timing());
    startup::apply_player_defaults(&mut player, &settings);
    let mut app = App::new(player, &settings.share, &settings.ui);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &app);

    let copier = Copy::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &copier,
        &mpris,
        &control_rx,
    );

    app.player
        .shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
