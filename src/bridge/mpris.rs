//! MPRIS objects and the player's own remote-control object on the session bus.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use zbus::interface;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use super::messages::{ActionToken, Inbound, MediaMetadata, PlayState, ShellSignal, SignalChannel};

pub(super) const BUS_NAME: &str = "org.mpris.MediaPlayer2.allegro";
pub(super) const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";
pub(super) const REMOTE_PATH: &str = "/org/allegro/Remote";

/// What the bus objects report. Written by the host thread, read by zbus.
#[derive(Debug, Default)]
pub(super) struct SharedState {
    pub(super) status: Option<PlayState>,
    pub(super) title: Option<String>,
    pub(super) artist: Vec<String>,
    pub(super) album: Option<String>,
    pub(super) length_micros: Option<i64>,
    pub(super) position_micros: i64,
    pub(super) track_id: Option<OwnedObjectPath>,
}

impl SharedState {
    pub(super) fn set_metadata(&mut self, meta: Option<&MediaMetadata>) {
        let Some(meta) = meta else {
            *self = Self::default();
            return;
        };
        self.status = Some(meta.state);
        self.title = Some(meta.title.clone());
        self.artist = meta.artist.iter().cloned().collect();
        self.album = meta.album.clone();
        self.length_micros = meta.duration_seconds.map(seconds_to_micros);
        self.position_micros = seconds_to_micros(meta.position_seconds);
        self.track_id = ObjectPath::try_from(format!("/org/allegro/track/{}", meta.track_id.get()))
            .ok()
            .map(OwnedObjectPath::from);
    }

    /// Ignored while nothing is published.
    pub(super) fn set_position(&mut self, seconds: f64) {
        if self.status.is_some() {
            self.position_micros = seconds_to_micros(seconds);
        }
    }
}

fn seconds_to_micros(s: f64) -> i64 {
    if s.is_finite() && s > 0.0 {
        (s * 1_000_000.0) as i64
    } else {
        0
    }
}

pub(super) type Shared = Arc<Mutex<SharedState>>;

fn request_quit(tx: &Sender<Inbound>) {
    if tx.send(Inbound::Quit).is_err() {
        log::debug!("player loop is gone; dropping quit");
    }
}

fn forward(tx: &Sender<Inbound>, channel: SignalChannel, action: ActionToken) {
    if tx
        .send(Inbound::Signal(ShellSignal::new(channel, action)))
        .is_err()
    {
        log::debug!("player loop is gone; dropping {}", action.as_str());
    }
}

pub(super) struct RootIface {
    pub(super) tx: Sender<Inbound>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // The terminal cannot be raised from here.
    }

    fn quit(&self) {
        request_quit(&self.tx);
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
        "allegro"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        ["audio/mpeg", "audio/flac", "audio/ogg", "audio/wav", "audio/mp4"]
            .map(String::from)
            .to_vec()
    }
}

pub(super) struct PlayerIface {
    pub(super) tx: Sender<Inbound>,
    pub(super) state: Shared,
}

impl PlayerIface {
    fn key(&self, action: ActionToken) {
        forward(&self.tx, SignalChannel::MediaKey, action);
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.key(ActionToken::Next);
    }

    fn previous(&self) {
        self.key(ActionToken::Previous);
    }

    fn play(&self) {
        self.key(ActionToken::Play);
    }

    fn pause(&self) {
        self.key(ActionToken::Pause);
    }

    fn play_pause(&self) {
        self.key(ActionToken::PlayPause);
    }

    fn stop(&self) {
        self.key(ActionToken::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.status {
            None => "Stopped",
            Some(PlayState::Playing) => "Playing",
            Some(PlayState::Paused) => "Paused",
        }
    }

    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };
        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.as_str()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.as_str()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Method calls for status bar click handlers and scripts, mirroring a tray menu.
pub(super) struct RemoteIface {
    pub(super) tx: Sender<Inbound>,
}

#[interface(name = "org.allegro.Remote1")]
impl RemoteIface {
    fn play_pause(&self) {
        forward(&self.tx, SignalChannel::TrayControl, ActionToken::PlayPause);
    }

    fn next(&self) {
        forward(&self.tx, SignalChannel::TrayControl, ActionToken::Next);
    }

    fn previous(&self) {
        forward(&self.tx, SignalChannel::TrayControl, ActionToken::Previous);
    }

    fn quit(&self) {
        request_quit(&self.tx);
    }
}
