use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-unique identity of a track, assigned when the track is created.
///
/// Two tracks built from the same path still get different ids, so the
/// playlist never confuses duplicates picked from different places.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u64);

impl TrackId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Embedded cover image, kept in memory as extracted from the file.
#[derive(Clone, PartialEq, Eq)]
pub struct AlbumArt {
    pub mime_type: String,
    pub data: Arc<[u8]>,
}

impl fmt::Debug for AlbumArt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlbumArt")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Best-effort tags read from the file after the track was created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_art: Option<AlbumArt>,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    /// File name without its extension.
    pub display_name: String,
    pub resolved: Option<ResolvedMetadata>,
}

impl Track {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = display_name_for(&path);
        Self {
            id: TrackId::next(),
            path,
            display_name,
            resolved: None,
        }
    }

    pub fn title(&self) -> &str {
        self.resolved
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or(&self.display_name)
    }

    pub fn artist(&self) -> Option<&str> {
        self.resolved.as_ref().and_then(|m| m.artist.as_deref())
    }

    pub fn album(&self) -> Option<&str> {
        self.resolved.as_ref().and_then(|m| m.album.as_deref())
    }

    pub fn album_art(&self) -> Option<&AlbumArt> {
        self.resolved.as_ref().and_then(|m| m.album_art.as_ref())
    }

    pub fn duration(&self) -> Option<Duration> {
        self.resolved.as_ref().and_then(|m| m.duration)
    }

    /// "Artist - Title" once tags are known, otherwise the file name.
    pub fn label(&self) -> String {
        match self.artist() {
            Some(a) => format!("{} - {}", a, self.title()),
            None => self.title().to_string(),
        }
    }
}

fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("UNKNOWN")
        .to_string()
}
