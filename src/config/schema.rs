use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/allegro/config.toml` or `~/.config/allegro/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ALLEGRO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume used for the first track of a session, in `[0, 1]`.
    pub initial_volume: f32,
    /// How often the output thread reports position and checks for track end (milliseconds).
    pub tick_ms: u64,
    /// Fade applied to the playing track when the player quits (milliseconds, 0 = cut).
    pub fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            tick_ms: 200,
            fade_out_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seconds to seek with Left / Right.
    pub seek_seconds: f64,
    /// Volume change for Ctrl+Up / Ctrl+Down and the `volup` / `voldown` host actions.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 5.0,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start the first track as soon as a playlist is loaded.
    pub autoplay_on_load: bool,
    /// Reopen the last chosen folder at startup.
    pub restore_last_folder: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay_on_load: true,
            restore_last_folder: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether to show a desktop notification when a new track starts.
    pub notifications: bool,
    /// Delay before the "now playing" notification is shown; a newer track start
    /// within the delay replaces the pending one (milliseconds).
    pub notification_delay_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ allegro ~ ".to_string(),
            notifications: true,
            notification_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
                "flac".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}
