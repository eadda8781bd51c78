//! The playback engine: one session at a time over an `AudioBackend`.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::PlayerError;
use crate::library::{Track, TrackId};

use super::types::{AudioBackend, EngineEvent, LoadId};
use super::volume::Volume;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Load requested, backend has not answered yet.
    Loading,
    Ready,
    Failed,
    /// The source played to its end.
    Ended,
}

#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub load_id: LoadId,
    pub track_id: TrackId,
    pub path: PathBuf,
    pub position: Duration,
    /// Unknown until the backend reports `Ready`.
    pub duration: Option<Duration>,
    pub playing: bool,
    pub state: SessionState,
}

impl PlaybackSession {
    /// Played fraction in `[0, 1]`, or `None` while the length is unknown.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.duration?.as_secs_f64();
        (total > 0.0).then(|| (self.position.as_secs_f64() / total).clamp(0.0, 1.0))
    }
}

pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    session: Option<PlaybackSession>,
    volume: Volume,
    last_load: u64,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    pub fn new(backend: B, initial_volume: f32) -> Self {
        Self {
            backend,
            session: None,
            volume: Volume::new(initial_volume),
            last_load: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.playing)
    }

    pub fn load_and_play(&mut self, track: &Track) -> LoadId {
        self.load(track, true)
    }

    /// Start a new session for `track`; the previous one is superseded.
    pub fn load(&mut self, track: &Track, play: bool) -> LoadId {
        self.last_load += 1;
        let load_id = LoadId(self.last_load);
        log::info!("{load_id}: loading {} ({})", track.path.display(), track.id);

        self.backend.load(load_id, &track.path, self.volume.level());
        if play {
            self.backend.play();
        }
        self.session = Some(PlaybackSession {
            load_id,
            track_id: track.id,
            path: track.path.clone(),
            position: Duration::ZERO,
            duration: track.duration(),
            playing: play,
            state: SessionState::Loading,
        });
        load_id
    }

    /// Flip between playing and paused. A failed session is reloaded instead.
    /// Returns `false` when there is no session to act on.
    pub fn toggle_play_pause(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match session.state {
            SessionState::Failed => {
                self.last_load += 1;
                let load_id = LoadId(self.last_load);
                log::info!("{load_id}: retrying {}", session.path.display());
                self.backend.load(load_id, &session.path, self.volume.level());
                self.backend.play();
                session.load_id = load_id;
                session.state = SessionState::Loading;
                session.position = Duration::ZERO;
                session.playing = true;
            }
            SessionState::Ended => {
                self.backend.seek(Duration::ZERO);
                self.backend.play();
                session.position = Duration::ZERO;
                session.state = SessionState::Ready;
                session.playing = true;
            }
            SessionState::Loading | SessionState::Ready => {
                session.playing = !session.playing;
                if session.playing {
                    self.backend.play();
                } else {
                    self.backend.pause();
                }
            }
        }
        true
    }

    pub fn seek_absolute(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.state == SessionState::Failed {
            return false;
        }

        let mut target = seconds.max(0.0);
        if let Some(d) = session.duration {
            target = target.min(d.as_secs_f64());
        }
        let position = Duration::from_secs_f64(target);
        session.position = position;
        self.backend.seek(position);
        true
    }

    pub fn seek_relative(&mut self, delta: f64) -> bool {
        let Some(current) = self.session.as_ref().map(|s| s.position.as_secs_f64()) else {
            return false;
        };
        self.seek_absolute(current + delta)
    }

    pub fn set_volume(&mut self, v: f32) -> bool {
        if !self.volume.set(v) {
            return false;
        }
        self.backend.set_volume(self.volume.level());
        true
    }

    pub fn adjust_volume(&mut self, delta: f32) -> bool {
        if !self.volume.adjust(delta) {
            return false;
        }
        self.backend.set_volume(self.volume.level());
        true
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.backend.set_volume(self.volume.level());
    }

    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            self.backend.stop();
        }
    }

    pub fn shutdown(&mut self) {
        self.session = None;
        self.backend.shutdown();
    }

    /// Apply a backend event to the session. Events from superseded loads
    /// are dropped and reported as `false`.
    pub fn handle_event(&mut self, event: &EngineEvent) -> bool {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.load_id == event.load_id())
        else {
            log::debug!("dropping stale event from {}", event.load_id());
            return false;
        };

        match event {
            EngineEvent::Ready { duration, .. } => {
                session.state = SessionState::Ready;
                if duration.is_some() {
                    session.duration = *duration;
                }
            }
            EngineEvent::Failed { reason, .. } => {
                let err = PlayerError::playback(&session.path, reason);
                log::warn!("{}: {err}", session.load_id);
                session.state = SessionState::Failed;
                session.playing = false;
            }
            EngineEvent::Progress { position, .. } => {
                session.position = *position;
            }
            EngineEvent::Ended { .. } => {
                if let Some(d) = session.duration {
                    session.position = d;
                }
                session.state = SessionState::Ended;
                session.playing = false;
            }
        }
        true
    }
}
