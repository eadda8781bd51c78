//! Persisted UI preferences: theme, shuffle/repeat and the last folder.
//!
//! Unlike `config`, these are written back whenever the user changes them.
//! The file is a small TOML record; unknown keys are ignored and missing
//! keys take their defaults so older files keep loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PlayerResult;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub shuffle: bool,
    pub repeat: bool,
    pub last_folder: Option<PathBuf>,
}

/// Storage capability for `Preferences`.
pub trait PreferenceStore {
    fn load(&self) -> PlayerResult<Preferences>;
    fn save(&mut self, prefs: &Preferences) -> PlayerResult<()>;
}

/// Preferences kept in a TOML file, written atomically via a sibling temp file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> PlayerResult<Preferences> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, prefs: &Preferences) -> PlayerResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(prefs)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store for tests. Clones share the same record, so a test can
/// keep one handle while the player owns another.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: std::rc::Rc<std::cell::RefCell<(Preferences, usize)>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(prefs: Preferences) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().0 = prefs;
        store
    }

    pub fn prefs(&self) -> Preferences {
        self.inner.borrow().0.clone()
    }

    /// How many times `save` was called.
    pub fn saves(&self) -> usize {
        self.inner.borrow().1
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryStore {
    fn load(&self) -> PlayerResult<Preferences> {
        Ok(self.prefs())
    }

    fn save(&mut self, prefs: &Preferences) -> PlayerResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.0 = prefs.clone();
        inner.1 += 1;
        Ok(())
    }
}

/// `$XDG_STATE_HOME/allegro`, or `~/.local/state/allegro`.
pub fn state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };
    state_home.map(|d| d.join("allegro"))
}

pub fn default_preferences_path() -> Option<PathBuf> {
    state_dir().map(|d| d.join("preferences.toml"))
}
