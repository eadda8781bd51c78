//! Playlist state: the ordered tracks, the cursor and the shuffle/repeat modes.
//!
//! The playlist never looks tracks up by name or by position across a
//! reorder; `TrackId` is the only identity it trusts.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::library::{AlbumArt, ResolvedMetadata, Track, TrackId};

#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    /// Canonical (pre-shuffle) order.
    original_order: Vec<Track>,
    /// `Some(i)` with `i < tracks.len()`, or `None` when empty.
    current: Option<usize>,
    shuffled: bool,
    repeating: bool,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the playlist; the cursor lands on the first track.
    pub fn load(&mut self, tracks: Vec<Track>) {
        self.original_order = tracks.clone();
        self.current = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
        self.shuffled = false;
    }

    /// Drop every track. Shuffle and repeat are modes, not contents, and stay.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.original_order.clear();
        self.current = None;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn current_id(&self) -> Option<TrackId> {
        self.current_track().map(|t| t.id)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Advance with wraparound. `None` when there is nothing to advance to.
    pub fn next(&mut self) -> Option<usize> {
        let n = self.tracks.len();
        if n == 0 {
            return None;
        }
        let i = self.current.map_or(0, |i| (i + 1) % n);
        self.current = Some(i);
        Some(i)
    }

    /// Retreat with wraparound. `None` when there is nothing to retreat to.
    pub fn previous(&mut self) -> Option<usize> {
        let n = self.tracks.len();
        if n == 0 {
            return None;
        }
        let i = self.current.map_or(0, |i| (i + n - 1) % n);
        self.current = Some(i);
        Some(i)
    }

    /// Move the cursor to `index`; `None` if it is out of range.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index < self.tracks.len() {
            self.current = Some(index);
            Some(index)
        } else {
            None
        }
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.set_shuffle_with(on, &mut rand::thread_rng());
    }

    /// Turning shuffle on keeps the current track first and permutes the rest;
    /// turning it off restores the canonical order and re-finds the current track.
    pub fn set_shuffle_with<R: Rng + ?Sized>(&mut self, on: bool, rng: &mut R) {
        if on == self.shuffled {
            return;
        }
        self.shuffled = on;
        if self.tracks.is_empty() {
            return;
        }

        if on {
            let current = self.current.unwrap_or(0);
            let head = self.tracks.remove(current);
            // `SliceRandom::shuffle` is an unbiased Fisher-Yates.
            self.tracks.shuffle(rng);
            self.tracks.insert(0, head);
            self.current = Some(0);
        } else {
            let playing = self.current_id();
            self.tracks = self.original_order.clone();
            self.current = Some(
                playing
                    .and_then(|id| self.tracks.iter().position(|t| t.id == id))
                    .unwrap_or(0),
            );
        }
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.repeating = on;
    }

    /// The current track followed by up to `ahead` tracks in play order,
    /// wrapping around. No id appears twice.
    pub fn window(&self, ahead: usize) -> Vec<TrackId> {
        let n = self.tracks.len();
        let Some(start) = self.current else {
            return Vec::new();
        };
        (0..=ahead.min(n.saturating_sub(1)))
            .map(|k| self.tracks[(start + k) % n].id)
            .collect()
    }

    /// Drop the cover of every track not in `keep`. Returns the ids that had one.
    pub fn release_art_except(&mut self, keep: &[TrackId]) -> Vec<TrackId> {
        let mut released = Vec::new();
        for t in self
            .tracks
            .iter_mut()
            .chain(self.original_order.iter_mut())
            .filter(|t| !keep.contains(&t.id))
        {
            let had_art = t.resolved.as_mut().and_then(|m| m.album_art.take()).is_some();
            if had_art && !released.contains(&t.id) {
                released.push(t.id);
            }
        }
        released
    }

    /// Put a cover back on a track whose tags are already known.
    pub fn restore_art(&mut self, id: TrackId, art: AlbumArt) -> bool {
        let mut restored = false;
        for m in self
            .tracks
            .iter_mut()
            .chain(self.original_order.iter_mut())
            .filter(|t| t.id == id)
            .filter_map(|t| t.resolved.as_mut())
            .filter(|m| m.album_art.is_none())
        {
            m.album_art = Some(art.clone());
            restored = true;
        }
        restored
    }

    /// Attach resolved tags to a track. The first reply wins; later ones are ignored.
    /// Returns false if the track is gone or already resolved.
    pub fn set_resolved(&mut self, id: TrackId, metadata: ResolvedMetadata) -> bool {
        let mut updated = false;
        for t in self
            .tracks
            .iter_mut()
            .chain(self.original_order.iter_mut())
            .filter(|t| t.id == id && t.resolved.is_none())
        {
            t.resolved = Some(metadata.clone());
            updated = true;
        }
        updated
    }
}

#[cfg(test)]
mod tests;
