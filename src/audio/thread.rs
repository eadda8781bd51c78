use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::error::PlayerError;

use super::sink::open_sink;
use super::types::{AudioCmd, EngineEvent, LoadId};

struct Current {
    load_id: LoadId,
    sink: Sink,
    ended: bool,
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<EngineEvent>,
    tick: Duration,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("audio".to_string())
        .spawn(move || run(rx, events, tick))
}

fn run(rx: Receiver<AudioCmd>, events: Sender<EngineEvent>, tick: Duration) {
    // Without a device every load fails; the rest of the player keeps working.
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped, which garbles the TUI.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            log::error!("{}", PlayerError::AudioDevice(e.to_string()));
            None
        }
    };

    let mut current: Option<Current> = None;
    let mut last_tick = Instant::now();

    loop {
        match rx.recv_timeout(tick) {
            Ok(AudioCmd::Load {
                load_id,
                path,
                volume,
            }) => {
                if let Some(old) = current.take() {
                    old.sink.stop();
                }
                let opened = match stream.as_ref() {
                    Some(stream) => open_sink(stream, &path, volume),
                    None => Err(PlayerError::AudioDevice("no output device".to_string())),
                };
                let event = match opened {
                    Ok((sink, duration)) => {
                        current = Some(Current {
                            load_id,
                            sink,
                            ended: false,
                        });
                        EngineEvent::Ready { load_id, duration }
                    }
                    Err(e) => EngineEvent::Failed {
                        load_id,
                        reason: e.to_string(),
                    },
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            Ok(AudioCmd::Play) => {
                if let Some(c) = current.as_ref() {
                    c.sink.play();
                }
            }
            Ok(AudioCmd::Pause) => {
                if let Some(c) = current.as_ref() {
                    c.sink.pause();
                }
            }
            Ok(AudioCmd::Seek(position)) => {
                if let Some(c) = current.as_mut() {
                    match c.sink.try_seek(position) {
                        Ok(()) => c.ended = false,
                        Err(e) => log::warn!("{}: seek to {position:?} failed: {e}", c.load_id),
                    }
                }
            }
            Ok(AudioCmd::SetVolume(v)) => {
                if let Some(c) = current.as_ref() {
                    c.sink.set_volume(v);
                }
            }
            Ok(AudioCmd::Stop) => {
                if let Some(c) = current.take() {
                    c.sink.stop();
                }
            }
            Ok(AudioCmd::Quit { fade_out_ms }) => {
                if let Some(c) = current.take() {
                    if !c.sink.is_paused() {
                        fade_out_sink(&c.sink, fade_out_ms);
                    }
                    c.sink.stop();
                }
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            if let Some(event) = current.as_mut().and_then(poll) {
                if events.send(event).is_err() {
                    break;
                }
            }
        }
    }
}

/// One periodic look at the sink: `Ended` once when it drains, `Progress` while playing.
fn poll(c: &mut Current) -> Option<EngineEvent> {
    if c.ended {
        return None;
    }
    if c.sink.empty() {
        c.ended = true;
        return Some(EngineEvent::Ended { load_id: c.load_id });
    }
    (!c.sink.is_paused()).then(|| EngineEvent::Progress {
        load_id: c.load_id,
        position: c.sink.get_pos(),
    })
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
}
