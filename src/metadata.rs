//! Metadata resolver: reads tags and cover art on a worker thread.
//!
//! Replies come back over a channel tagged with the `TrackId` they were
//! requested for; the receiver decides whether the reply is still wanted.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread;

use lofty::prelude::*;

use crate::error::{PlayerError, PlayerResult};
use crate::library::{AlbumArt, ResolvedMetadata, TrackId};

#[derive(Debug)]
pub struct MetadataReply {
    pub track_id: TrackId,
    pub result: PlayerResult<ResolvedMetadata>,
}

/// Asynchronous metadata lookups, answered later through a `MetadataReply`.
pub trait MetadataSource {
    fn request(&self, track_id: TrackId, path: &Path);
}

pub struct MetadataResolver {
    tx: Sender<(TrackId, PathBuf)>,
}

impl MetadataResolver {
    pub fn spawn(replies: Sender<MetadataReply>) -> Self {
        let (tx, rx) = mpsc::channel::<(TrackId, PathBuf)>();
        let spawned = thread::Builder::new()
            .name("metadata".to_string())
            .spawn(move || {
                for (track_id, path) in rx {
                    let result = read_metadata(&path);
                    if replies.send(MetadataReply { track_id, result }).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = spawned {
            log::error!("failed to start metadata thread: {e}");
        }
        Self { tx }
    }
}

impl MetadataSource for MetadataResolver {
    fn request(&self, track_id: TrackId, path: &Path) {
        if self.tx.send((track_id, path.to_path_buf())).is_err() {
            log::warn!("metadata thread is gone; keeping file name for {track_id}");
        }
    }
}

pub fn read_metadata(path: &Path) -> PlayerResult<ResolvedMetadata> {
    let tagged = lofty::read_from_path(path).map_err(|e| PlayerError::metadata(path, e))?;

    let duration = tagged.properties().duration();
    let mut meta = ResolvedMetadata {
        duration: (!duration.is_zero()).then_some(duration),
        ..ResolvedMetadata::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        meta.title = non_empty(tag.title());
        meta.artist = non_empty(tag.artist());
        meta.album = non_empty(tag.album());
        meta.album_art = tag.pictures().first().map(|p| AlbumArt {
            mime_type: p
                .mime_type()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            data: Arc::from(p.data()),
        });
    }

    Ok(meta)
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
