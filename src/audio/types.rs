//! Audio-related small types: load generations, backend commands and events.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Generation number of a load request. Every load gets a fresh one, so
/// events from a superseded load can be told apart and dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load {}", self.0)
    }
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with `path`, paused, at `volume`.
    Load {
        load_id: LoadId,
        path: PathBuf,
        volume: f32,
    },
    Play,
    Pause,
    /// Seek the current source to an absolute position.
    Seek(Duration),
    SetVolume(f32),
    /// Drop the current source.
    Stop,
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Lifecycle reports from the audio backend, tagged with the load they belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Ready {
        load_id: LoadId,
        duration: Option<Duration>,
    },
    Failed {
        load_id: LoadId,
        reason: String,
    },
    Progress {
        load_id: LoadId,
        position: Duration,
    },
    Ended {
        load_id: LoadId,
    },
}

impl EngineEvent {
    pub fn load_id(&self) -> LoadId {
        match self {
            Self::Ready { load_id, .. }
            | Self::Failed { load_id, .. }
            | Self::Progress { load_id, .. }
            | Self::Ended { load_id } => *load_id,
        }
    }
}

/// The capability the playback engine drives. Results come back later as
/// `EngineEvent`s, never as return values.
pub trait AudioBackend {
    fn load(&mut self, load_id: LoadId, path: &Path, volume: f32);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn stop(&mut self);

    /// Release the output device. Called once when the player exits.
    fn shutdown(&mut self) {}
}
