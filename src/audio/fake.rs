use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{AudioBackend, LoadId};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(LoadId, PathBuf, f32),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    Stop,
    Shutdown,
}

/// Backend that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub calls: Vec<Call>,
}

impl FakeBackend {
    pub fn last_load(&self) -> Option<LoadId> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Load(id, ..) => Some(*id),
            _ => None,
        })
    }

    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(_, p, _) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for FakeBackend {
    fn load(&mut self, load_id: LoadId, path: &Path, volume: f32) {
        self.calls.push(Call::Load(load_id, path.to_path_buf(), volume));
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::SetVolume(volume));
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
    }

    fn shutdown(&mut self) {
        self.calls.push(Call::Shutdown);
    }
}
