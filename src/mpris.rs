//! MPRIS service so desktop media keys and `playerctl` drive the clip player.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::player::PlayerPhase;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.voclip";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

/// What the player is doing, as exposed over the bus.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NowPlaying {
    pub phase: Option<PlayerPhase>,
    pub track_index: Option<usize>,
    pub clip_index: Option<usize>,
    /// Clip name.
    pub title: Option<String>,
    /// Track name.
    pub album: Option<String>,
    pub url: Option<String>,
    /// Clip span in microseconds.
    pub length_micros: Option<i64>,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

impl NowPlaying {
    fn track_id(&self) -> Option<String> {
        Some(format!(
            "{OBJECT_PATH}/clip/{}_{}",
            self.track_index?, self.clip_index?
        ))
    }
}

#[derive(Debug, Default)]
struct SharedState {
    now: NowPlaying,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn update(&self, now: NowPlaying) {
        if let Ok(mut s) = self.state.lock() {
            s.now = now;
        }
    }
}

fn playback_status_for(phase: Option<PlayerPhase>) -> &'static str {
    match phase {
        Some(PlayerPhase::PlayingClip(_)) => "Playing",
        Some(PlayerPhase::PausedClip(_)) => "Paused",
        _ => "Stopped",
    }
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "voclip"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn with_now<T>(&self, f: impl FnOnce(&NowPlaying) -> T) -> Option<T> {
        self.state.lock().ok().map(|s| f(&s.now))
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        playback_status_for(self.with_now(|n| n.phase).flatten())
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        self.with_now(|n| n.clip_index.is_some() || n.title.is_some())
            .unwrap_or(false)
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.with_now(|n| n.can_go_next).unwrap_or(false)
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        self.with_now(|n| n.can_go_previous).unwrap_or(false)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Some(now) = self.with_now(NowPlaying::clone) else {
            return map;
        };

        if let Some(id) = now.track_id() {
            if let Some(v) = ObjectPath::try_from(id.as_str())
                .ok()
                .and_then(|p| owned(Value::from(p)))
            {
                map.insert("mpris:trackid".to_string(), v);
            }
        }
        if let Some(v) = owned(Value::from(now.title.unwrap_or_default())) {
            map.insert("xesam:title".to_string(), v);
        }
        if let Some(v) = now.album.and_then(|a| owned(Value::from(a))) {
            map.insert("xesam:album".to_string(), v);
        }
        if let Some(v) = now.url.and_then(|u| owned(Value::from(u))) {
            map.insert("xesam:url".to_string(), v);
        }
        if let Some(v) = now.length_micros.and_then(|l| owned(Value::from(l))) {
            map.insert("mpris:length".to_string(), v);
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }
            debug!(name = BUS_NAME, "MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
