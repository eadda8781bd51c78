//! Configuration loader and schema types.
//!
//! Read-only user settings: struct defaults, then an optional TOML file,
//! then `ALLEGRO__*` environment variables. Mutable state that survives
//! restarts (theme, last folder) lives in `prefs` instead.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
