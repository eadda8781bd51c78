use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::PlayerResult;

use super::model::Track;

/// A resolved user choice: the tracks plus what to show as their origin.
#[derive(Debug, Clone)]
pub struct Selection {
    pub label: String,
    /// Set when the selection came from a single folder; remembered as the last folder.
    pub folder: Option<PathBuf>,
    pub tracks: Vec<Track>,
}

pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn scan_dir(dir: &Path, settings: &LibrarySettings) -> PlayerResult<Vec<Track>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )
        .into());
    }

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut paths: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p, settings))
        .collect();

    paths.sort_by_key(|p| p.to_string_lossy().to_lowercase());
    Ok(paths.into_iter().map(Track::from_path).collect())
}

/// Folder pick: every supported file below `dir`, ordered by path.
pub fn open_folder(dir: &Path, settings: &LibrarySettings) -> PlayerResult<Selection> {
    let tracks = scan_dir(dir, settings)?;
    let label = dir
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| dir.display().to_string());
    log::info!("scanned {}: {} tracks", dir.display(), tracks.len());
    Ok(Selection {
        label,
        folder: Some(dir.to_path_buf()),
        tracks,
    })
}

/// Multi-file pick: keeps the given order, drops unsupported or missing files.
pub fn open_files(paths: &[PathBuf], settings: &LibrarySettings) -> Selection {
    let tracks = paths
        .iter()
        .filter(|p| p.is_file() && is_audio_file(p, settings))
        .cloned()
        .map(Track::from_path)
        .collect();
    Selection {
        label: "Individual Files".to_string(),
        folder: None,
        tracks,
    }
}

/// Drag-and-drop: a mix of folders and files, expanded in drop order.
pub fn open_dropped(paths: &[PathBuf], settings: &LibrarySettings) -> Selection {
    if let [single] = paths {
        if single.is_dir() {
            match open_folder(single, settings) {
                Ok(selection) => return selection,
                Err(e) => log::warn!("ignoring dropped folder: {e}"),
            }
        }
    }

    let mut tracks = Vec::new();
    for p in paths {
        if p.is_dir() {
            match scan_dir(p, settings) {
                Ok(mut found) => tracks.append(&mut found),
                Err(e) => log::warn!("ignoring dropped folder: {e}"),
            }
        } else if p.is_file() && is_audio_file(p, settings) {
            tracks.push(Track::from_path(p.clone()));
        } else {
            log::debug!("ignoring dropped path {}", p.display());
        }
    }
    Selection {
        label: "Dropped Files".to_string(),
        folder: None,
        tracks,
    }
}
