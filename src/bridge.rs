//! The message boundary between the player core and the desktop.
//!
//! Outbound, the core describes what it is doing through `ShellBridge`.
//! Inbound, host events (MPRIS calls, remote-control calls, thumbar clicks,
//! terminal media keys) arrive as `Inbound` values on a channel.

mod desktop;
mod launcher;
mod messages;
mod mpris;
mod notify;

pub use desktop::DesktopBridge;
pub use messages::{
    ActionToken, Inbound, MediaMetadata, PlayState, Progress, ShellSignal, SignalChannel,
    ThumbarAction, ThumbarButton,
};

pub trait ShellBridge {
    fn update_progress(&mut self, progress: Progress);
    /// Position within the current track, sent with each progress tick.
    fn update_position(&mut self, position_seconds: f64);
    fn set_thumbar_buttons(&mut self, buttons: &[ThumbarButton]);
    fn update_media_metadata(&mut self, metadata: &MediaMetadata);
    fn clear_media_metadata(&mut self);
    fn show_notification(&mut self, summary: &str, body: &str);
}

#[cfg(test)]
pub(crate) mod recording;
