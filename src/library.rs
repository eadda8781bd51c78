//! Track source: turns a folder pick, a multi-file pick or a drag-and-drop
//! into an ordered list of playable `Track`s.

mod drop;
mod model;
mod scan;

pub use drop::parse_dropped_paths;
pub use model::{AlbumArt, ResolvedMetadata, Track, TrackId};
pub use scan::{Selection, open_dropped, open_files, open_folder};
