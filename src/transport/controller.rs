use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::audio::{AudioBackend, EngineEvent, PlaybackEngine, PlaybackSession};
use crate::bridge::{MediaMetadata, PlayState, Progress, ShellBridge, ThumbarButton};
use crate::config::Settings;
use crate::library::{Selection, Track, TrackId};
use crate::metadata::{MetadataReply, MetadataSource};
use crate::playlist::Playlist;
use crate::prefs::{PreferenceStore, Preferences, Theme};

use super::action::{Action, Dispatch};

const NOTIFICATION_SUMMARY: &str = "Now Playing";

/// Tracks past the current one whose tags are read ahead of time.
const METADATA_LOOKAHEAD: usize = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing loaded.
    Idle,
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy)]
struct PendingNotification {
    track_id: TrackId,
    due: Instant,
}

/// The player core: playlist, engine, preferences and what the desktop sees.
pub struct Transport<B: ShellBridge, A: AudioBackend> {
    playlist: Playlist,
    engine: PlaybackEngine<A>,
    bridge: B,
    resolver: Box<dyn MetadataSource>,
    store: Box<dyn PreferenceStore>,
    prefs: Preferences,
    settings: Settings,
    source_label: Option<String>,
    fullscreen: bool,
    pending_notification: Option<PendingNotification>,
    /// Tracks already sent to the resolver.
    requested: HashSet<TrackId>,
}

impl<B: ShellBridge, A: AudioBackend> Transport<B, A> {
    pub fn new(
        settings: Settings,
        backend: A,
        bridge: B,
        resolver: Box<dyn MetadataSource>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let prefs = store.load().unwrap_or_else(|e| {
            log::warn!("{e}; using default preferences");
            Preferences::default()
        });

        let mut playlist = Playlist::new();
        playlist.set_shuffle(prefs.shuffle);
        playlist.set_repeat(prefs.repeat);

        let mut transport = Self {
            playlist,
            engine: PlaybackEngine::new(backend, settings.audio.initial_volume),
            bridge,
            resolver,
            store,
            prefs,
            settings,
            source_label: None,
            fullscreen: false,
            pending_notification: None,
            requested: HashSet::new(),
        };
        transport.publish();
        transport
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn engine(&self) -> &PlaybackEngine<A> {
        &self.engine
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    #[cfg(test)]
    pub(crate) fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    pub fn state(&self) -> TransportState {
        if self.playlist.is_empty() {
            TransportState::Idle
        } else if self.engine.is_playing() {
            TransportState::Playing
        } else {
            TransportState::Paused
        }
    }

    /// The session and the playlist entry it is playing, if any.
    pub fn now_playing(&self) -> Option<(&PlaybackSession, &Track)> {
        let session = self.engine.session()?;
        let track = self.playlist.track(session.track_id)?;
        Some((session, track))
    }

    /// When `poll` next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_notification.map(|p| p.due)
    }

    pub fn dispatch(&mut self, action: Action) -> Dispatch {
        self.dispatch_at(action, Instant::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> Dispatch {
        match action {
            Action::PlayPause => self.toggle_play_pause(now),
            Action::Play if !self.engine.is_playing() => self.toggle_play_pause(now),
            Action::Pause if self.engine.is_playing() => self.toggle_play_pause(now),
            Action::Play | Action::Pause => Dispatch::Ignored,
            Action::Next => match self.playlist.next() {
                Some(_) => self.start_current(now, true),
                None => Dispatch::Ignored,
            },
            Action::Previous => match self.playlist.previous() {
                Some(_) => self.start_current(now, true),
                None => Dispatch::Ignored,
            },
            Action::PlayIndex(index) => match self.playlist.select(index) {
                Some(_) => self.start_current(now, true),
                None => Dispatch::Ignored,
            },
            Action::SeekBy(delta) => {
                let moved = self.engine.seek_relative(delta);
                if moved {
                    self.publish();
                }
                moved.into()
            }
            Action::SeekTo(seconds) => {
                let moved = self.engine.seek_absolute(seconds);
                if moved {
                    self.publish();
                }
                moved.into()
            }
            Action::VolumeUp => self.engine.adjust_volume(self.settings.controls.volume_step).into(),
            Action::VolumeDown => self
                .engine
                .adjust_volume(-self.settings.controls.volume_step)
                .into(),
            Action::ToggleMute => {
                self.engine.toggle_mute();
                Dispatch::Handled
            }
            Action::ToggleShuffle => {
                let on = !self.playlist.is_shuffled();
                self.playlist.set_shuffle(on);
                self.prefs.shuffle = on;
                self.save_preferences();
                Dispatch::Handled
            }
            Action::ToggleRepeat => {
                let on = !self.playlist.is_repeating();
                self.playlist.set_repeat(on);
                self.prefs.repeat = on;
                self.save_preferences();
                Dispatch::Handled
            }
            Action::ToggleTheme => {
                self.prefs.theme = self.prefs.theme.toggled();
                self.save_preferences();
                Dispatch::Handled
            }
            Action::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                Dispatch::Handled
            }
            Action::Clear => self.clear(),
            Action::Load(selection) => self.load(selection, now),
            Action::Signal(signal) => {
                log::debug!("host signal {signal}");
                self.dispatch_at(Action::from(signal.action), now)
            }
        }
    }

    pub fn on_engine_event(&mut self, event: EngineEvent, now: Instant) {
        if !self.engine.handle_event(&event) {
            return;
        }

        match event {
            EngineEvent::Ready { .. } => self.publish(),
            EngineEvent::Failed { .. } => {
                // Nothing is playing, so there is nothing to announce.
                self.pending_notification = None;
                self.publish();
            }
            EngineEvent::Progress { .. } => {
                if !self.engine.is_playing() {
                    return;
                }
                if let Some(session) = self.engine.session() {
                    let fraction = session.fraction();
                    let position = session.position.as_secs_f64();
                    self.bridge.update_progress(Progress::from_fraction(fraction));
                    self.bridge.update_position(position);
                }
            }
            EngineEvent::Ended { .. } => {
                if !self.playlist.is_repeating() {
                    self.playlist.next();
                }
                self.start_current(now, true);
            }
        }
    }

    pub fn on_metadata(&mut self, reply: MetadataReply) {
        let MetadataReply { track_id, result } = reply;
        let metadata = match result {
            Ok(m) => m,
            Err(e) => {
                log::debug!("{track_id}: {e}; keeping file name");
                return;
            }
        };

        let art = metadata.album_art.clone();
        let changed = if self.playlist.set_resolved(track_id, metadata) {
            true
        } else {
            // A re-read for a track whose cover was released earlier.
            match art {
                Some(art) if self.playlist.window(METADATA_LOOKAHEAD).contains(&track_id) => {
                    self.playlist.restore_art(track_id, art)
                }
                _ => false,
            }
        };
        if changed && self.engine.session().map(|s| s.track_id) == Some(track_id) {
            self.publish();
        }
    }

    /// Fire the pending notification once its delay has passed.
    pub fn poll(&mut self, now: Instant) {
        let Some(pending) = self.pending_notification else {
            return;
        };
        if now < pending.due {
            return;
        }
        self.pending_notification = None;

        let playing = self.engine.session().map(|s| s.track_id);
        if playing != Some(pending.track_id) {
            return;
        }
        if let Some(track) = self.playlist.track(pending.track_id) {
            let body = track.label();
            self.bridge.show_notification(NOTIFICATION_SUMMARY, &body);
        }
    }

    pub fn shutdown(&mut self) {
        self.pending_notification = None;
        self.engine.shutdown();
        self.bridge.clear_media_metadata();
    }

    fn toggle_play_pause(&mut self, now: Instant) -> Dispatch {
        if self.playlist.is_empty() {
            return Dispatch::Ignored;
        }
        if self.engine.session().is_none() {
            return self.start_current(now, true);
        }
        self.engine.toggle_play_pause();
        self.publish();
        Dispatch::Handled
    }

    fn load(&mut self, selection: Selection, now: Instant) -> Dispatch {
        let Selection {
            label,
            folder,
            tracks,
        } = selection;
        if tracks.is_empty() {
            log::info!("{label}: no playable files");
            return Dispatch::Ignored;
        }

        log::info!("loading {label}: {} tracks", tracks.len());
        self.engine.stop();
        self.playlist.load(tracks);
        self.playlist.set_shuffle(self.prefs.shuffle);
        self.playlist.set_repeat(self.prefs.repeat);
        self.source_label = Some(label);
        self.requested.clear();

        if let Some(folder) = folder {
            self.prefs.last_folder = Some(folder);
            self.save_preferences();
        }

        self.start_current(now, self.settings.playback.autoplay_on_load)
    }

    fn clear(&mut self) -> Dispatch {
        if self.playlist.is_empty() && self.engine.session().is_none() {
            return Dispatch::Ignored;
        }
        self.engine.stop();
        self.playlist.clear();
        self.requested.clear();
        self.source_label = None;
        self.pending_notification = None;
        self.publish();
        Dispatch::Handled
    }

    /// Load the playlist's current track into the engine.
    fn start_current(&mut self, now: Instant, play: bool) -> Dispatch {
        let Some(track) = self.playlist.current_track() else {
            return Dispatch::Ignored;
        };
        let track_id = track.id;
        if play {
            self.engine.load_and_play(track);
        } else {
            self.engine.load(track, false);
        }
        self.request_metadata();

        if play && self.settings.ui.notifications {
            let delay = Duration::from_millis(self.settings.ui.notification_delay_ms);
            self.pending_notification = Some(PendingNotification {
                track_id,
                due: now + delay,
            });
        } else {
            self.pending_notification = None;
        }

        self.publish();
        Dispatch::Handled
    }

    /// Ask for tags of the current track and the next few, current first.
    /// Covers of tracks that fell out of that window are released and read
    /// again when the track comes back into it.
    fn request_metadata(&mut self) {
        let window = self.playlist.window(METADATA_LOOKAHEAD);
        for id in self.playlist.release_art_except(&window) {
            self.requested.remove(&id);
        }
        for id in window {
            if !self.requested.insert(id) {
                continue;
            }
            if let Some(track) = self.playlist.track(id) {
                self.resolver.request(id, &track.path);
            }
        }
    }

    /// Push now-playing metadata, progress and thumbar buttons to the desktop.
    fn publish(&mut self) {
        let playing = self.engine.is_playing();
        self.bridge.set_thumbar_buttons(&ThumbarButton::row(playing));

        let snapshot = self.now_playing().map(|(session, track)| {
            let duration = session.duration.or(track.duration());
            let metadata = MediaMetadata {
                track_id: track.id,
                title: track.title().to_string(),
                artist: track.artist().map(str::to_string),
                album: track.album().map(str::to_string),
                state: if playing {
                    PlayState::Playing
                } else {
                    PlayState::Paused
                },
                duration_seconds: duration.map(|d| d.as_secs_f64()),
                position_seconds: session.position.as_secs_f64(),
            };
            (metadata, Progress::from_fraction(session.fraction()))
        });

        match snapshot {
            Some((metadata, progress)) => {
                self.bridge.update_media_metadata(&metadata);
                self.bridge.update_progress(progress);
            }
            None => {
                self.bridge.clear_media_metadata();
                self.bridge.update_progress(Progress::Reset);
            }
        }
    }

    fn save_preferences(&mut self) {
        if let Err(e) = self.store.save(&self.prefs) {
            log::warn!("could not save preferences: {e}");
        }
    }
}
