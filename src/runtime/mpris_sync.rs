use crate::app::App;
use crate::mpris::{MprisHandle, NowPlaying};
use crate::player::MediaBackend;

/// Snapshot of the player for the MPRIS service.
pub fn now_playing<B: MediaBackend>(app: &App<B>) -> NowPlaying {
    let player = &app.player;
    let track = player.selected_track();
    let clip_index = player.current_clip_index();
    let clip = player.current_clip();
    let length_micros = clip.zip(clip_index).and_then(|(c, i)| {
        let span = player.effective_end(i)? - c.start;
        (span.is_finite() && span > 0.0).then(|| (span * 1_000_000.0) as i64)
    });

    NowPlaying {
        phase: Some(player.phase()),
        track_index: player.selected_index(),
        clip_index,
        title: clip.map(|c| c.name.clone()),
        album: track.map(|t| t.name.clone()),
        url: track.map(|t| t.url.clone()),
        length_micros,
        can_go_next: player.can_go_next(),
        can_go_previous: player.can_go_previous(),
    }
}

pub fn update_mpris<B: MediaBackend>(mpris: &MprisHandle, app: &App<B>) {
    mpris.update(now_playing(app));
}
