//! Opening a file into a paused `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::{PlayerError, PlayerResult};

/// Create a paused `Sink` playing `path`, plus the decoder's length if it knows one.
pub(super) fn open_sink(
    stream: &OutputStream,
    path: &Path,
    volume: f32,
) -> PlayerResult<(Sink, Option<Duration>)> {
    let file = File::open(path).map_err(|e| PlayerError::playback(path, e))?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::playback(path, e))?;
    let duration = source.total_duration().filter(|d| !d.is_zero());

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.set_volume(volume);
    sink.append(source);
    Ok((sink, duration))
}
