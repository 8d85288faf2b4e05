use crate::config;
use crate::player::{ClipPlayer, MediaBackend};

/// Apply the player-related settings that are not part of construction.
pub fn apply_player_defaults<B: MediaBackend>(player: &mut ClipPlayer<B>, settings: &config::Settings) {
    player.set_autoplay(settings.player.autoplay);
}
