//! Error type shared by the player.
//!
//! Nothing here is fatal on its own: callers log the error and fall back
//! to a degraded behavior (track left paused, filename kept as title,
//! default preferences).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The audio backend could not open, decode or start a source.
    #[error("cannot play {}: {}", .path.display(), .reason)]
    Playback { path: PathBuf, reason: String },

    /// Tag/property extraction failed for a file.
    #[error("cannot read metadata from {}: {}", .path.display(), .reason)]
    Metadata { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    AudioDevice(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("cannot parse preferences: {0}")]
    PreferencesRead(#[from] toml::de::Error),

    #[error("cannot encode preferences: {0}")]
    PreferencesWrite(#[from] toml::ser::Error),

    #[error("session bus error: {0}")]
    Bus(#[from] zbus::Error),
}

impl PlayerError {
    pub fn playback(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Playback {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn metadata(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Metadata {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type PlayerResult<T> = Result<T, PlayerError>;
