//! Transport controller: binds the playlist and the playback engine to user
//! intent and pushes the result out through the shell bridge.
//!
//! Keyboard, mouse, drag-and-drop and host signals all end up as an
//! `Action` passed to `Transport::dispatch`.

mod action;
mod controller;
mod keys;

pub use action::{Action, Dispatch};
pub use controller::{Transport, TransportState};
pub use keys::{KeyIntent, map_key};
