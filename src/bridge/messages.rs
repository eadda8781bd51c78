//! Messages crossing the boundary between the player and the desktop host.

use std::fmt;

use crate::library::TrackId;

/// Taskbar progress: a played fraction, or the "nothing to show" reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Fraction(f64),
    Reset,
}

impl Progress {
    pub fn from_fraction(fraction: Option<f64>) -> Self {
        match fraction {
            Some(f) if f.is_finite() => Self::Fraction(f.clamp(0.0, 1.0)),
            _ => Self::Reset,
        }
    }

    /// The wire value: `[0, 1]`, or `-1` for a reset.
    pub fn value(self) -> f64 {
        match self {
            Self::Fraction(f) => f,
            Self::Reset => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbarAction {
    Previous,
    PlayPause,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbarButton {
    pub tooltip: &'static str,
    pub icon: &'static str,
    pub action: ThumbarAction,
}

impl ThumbarButton {
    /// Previous, play-or-pause, next. The middle button shows what a click will do.
    pub fn row(playing: bool) -> [ThumbarButton; 3] {
        [
            ThumbarButton {
                tooltip: "Previous",
                icon: "media-skip-backward",
                action: ThumbarAction::Previous,
            },
            ThumbarButton {
                tooltip: if playing { "Pause" } else { "Play" },
                icon: if playing {
                    "media-playback-pause"
                } else {
                    "media-playback-start"
                },
                action: ThumbarAction::PlayPause,
            },
            ThumbarButton {
                tooltip: "Next",
                icon: "media-skip-forward",
                action: ThumbarAction::Next,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    Playing,
    #[default]
    Paused,
}

impl PlayState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// What the media center shows for the current track.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMetadata {
    pub track_id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub state: PlayState,
    pub duration_seconds: Option<f64>,
    pub position_seconds: f64,
}

/// Where a host signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalChannel {
    /// Remote-control calls on the player's own bus object (status bars, scripts).
    TrayControl,
    /// MPRIS calls: hardware media keys and the desktop media center.
    MediaKey,
    /// Media keys the terminal itself reports.
    Shortcut,
    /// A click on one of the thumbar buttons.
    Thumbar,
}

impl SignalChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrayControl => "tray-control",
            Self::MediaKey => "media-key",
            Self::Shortcut => "shortcut",
            Self::Thumbar => "thumbar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionToken {
    PlayPause,
    Play,
    Pause,
    Next,
    Previous,
    VolUp,
    VolDown,
    Mute,
    Theme,
}

impl ActionToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayPause => "playpause",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::VolUp => "volup",
            Self::VolDown => "voldown",
            Self::Mute => "mute",
            Self::Theme => "theme",
        }
    }
}

impl From<ThumbarAction> for ActionToken {
    fn from(action: ThumbarAction) -> Self {
        match action {
            ThumbarAction::Previous => Self::Previous,
            ThumbarAction::PlayPause => Self::PlayPause,
            ThumbarAction::Next => Self::Next,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellSignal {
    pub channel: SignalChannel,
    pub action: ActionToken,
}

impl ShellSignal {
    pub fn new(channel: SignalChannel, action: ActionToken) -> Self {
        Self { channel, action }
    }
}

impl fmt::Display for ShellSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel.as_str(), self.action.as_str())
    }
}

/// Everything the host can tell the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Signal(ShellSignal),
    Quit,
}
