//! Audio subsystem.
//!
//! `PlaybackEngine` holds the session state and talks to an `AudioBackend`;
//! in the running player that backend is `AudioPlayer`, a handle to a
//! dedicated rodio thread that reports back through `EngineEvent`s.

mod clock;
mod engine;
mod player;
mod sink;
mod thread;
mod types;
mod volume;

pub use clock::{format_clock, format_duration};
pub use engine::{PlaybackEngine, PlaybackSession};
pub use player::AudioPlayer;
pub use types::{AudioBackend, EngineEvent, LoadId};

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
