use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{AudioBackend, AudioCmd, EngineEvent, LoadId};

/// Handle to the rodio output thread. Commands are queued in call order.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
    fade_out: Duration,
}

impl AudioPlayer {
    pub fn new(events: Sender<EngineEvent>, settings: &AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let join = match spawn_audio_thread(rx, events, tick) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("failed to start audio thread: {e}");
                None
            }
        };

        Self {
            tx,
            join,
            fade_out: Duration::from_millis(settings.fade_out_ms),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            log::warn!("audio thread is gone, dropping {:?}", e.0);
        }
    }
}

impl AudioBackend for AudioPlayer {
    fn load(&mut self, load_id: LoadId, path: &Path, volume: f32) {
        self.send(AudioCmd::Load {
            load_id,
            path: path.to_path_buf(),
            volume,
        });
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn shutdown(&mut self) {
        self.send(AudioCmd::Quit {
            fade_out_ms: self.fade_out.as_millis() as u64,
        });
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
