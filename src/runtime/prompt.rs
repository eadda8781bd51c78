//! Text prompts standing in for the open-folder and open-files dialogs.

use std::env;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::LibrarySettings;
use crate::error::PlayerResult;
use crate::library::{Selection, open_files, open_folder, parse_dropped_paths};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Folder,
    Files,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Editing,
    Cancelled,
    Submitted(String),
}

#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    /// Folder prompt, pre-filled with the last folder when there is one.
    pub fn folder(last: Option<&Path>) -> Self {
        let input = last
            .map(|p| {
                let mut s = p.display().to_string();
                if !s.ends_with('/') {
                    s.push('/');
                }
                s
            })
            .unwrap_or_default();
        Self {
            kind: PromptKind::Folder,
            input,
        }
    }

    pub fn files() -> Self {
        Self {
            kind: PromptKind::Files,
            input: String::new(),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::Folder => "Open folder",
            PromptKind::Files => "Open files (quote paths with spaces)",
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptOutcome {
        if key.kind == KeyEventKind::Release {
            return PromptOutcome::Editing;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Enter => PromptOutcome::Submitted(self.input.clone()),
            KeyCode::Backspace => {
                self.input.pop();
                PromptOutcome::Editing
            }
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                PromptOutcome::Editing
            }
            KeyCode::Char('c') if ctrl => PromptOutcome::Cancelled,
            KeyCode::Char(c) if !ctrl && !c.is_control() => {
                self.input.push(c);
                PromptOutcome::Editing
            }
            _ => PromptOutcome::Editing,
        }
    }

    /// Pasted or dropped text goes into the input as-is, minus line breaks.
    pub fn paste(&mut self, text: &str) {
        match self.kind {
            PromptKind::Folder => self.input.push_str(text.trim_end_matches(['\r', '\n'])),
            PromptKind::Files => {
                if !self.input.is_empty() && !self.input.ends_with(' ') {
                    self.input.push(' ');
                }
                self.input.push_str(&text.replace(['\r', '\n'], " "));
            }
        }
    }
}

/// Turn submitted prompt input into a selection. Empty input is a cancelled
/// dialog and yields `Ok(None)`.
pub fn resolve(
    kind: PromptKind,
    input: &str,
    settings: &LibrarySettings,
) -> PlayerResult<Option<Selection>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match kind {
        PromptKind::Folder => open_folder(&expand_home(input), settings).map(Some),
        PromptKind::Files => {
            let paths: Vec<PathBuf> = parse_dropped_paths(input)
                .into_iter()
                .map(|p| expand_home(&p.to_string_lossy()))
                .collect();
            if paths.is_empty() {
                return Ok(None);
            }
            Ok(Some(open_files(&paths, settings)))
        }
    }
}

fn expand_home(input: &str) -> PathBuf {
    let home = env::var_os("HOME").map(PathBuf::from);
    match (input, home) {
        ("~", Some(home)) => home,
        (s, Some(home)) if s.starts_with("~/") => home.join(&s[2..]),
        (s, _) => PathBuf::from(s),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyEventState;
    use tempfile::tempdir;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(p: &mut Prompt, s: &str) {
        for c in s.chars() {
            assert_eq!(p.handle_key(press(KeyCode::Char(c))), PromptOutcome::Editing);
        }
    }

    #[test]
    fn typing_editing_and_submit() {
        let mut p = Prompt::files();
        type_str(&mut p, "abx");
        p.handle_key(press(KeyCode::Backspace));
        type_str(&mut p, "c");
        assert_eq!(p.input(), "abc");
        assert_eq!(
            p.handle_key(press(KeyCode::Enter)),
            PromptOutcome::Submitted("abc".to_string())
        );
    }

    #[test]
    fn escape_and_ctrl_c_cancel() {
        let mut p = Prompt::folder(None);
        assert_eq!(p.handle_key(press(KeyCode::Esc)), PromptOutcome::Cancelled);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(p.handle_key(ctrl_c), PromptOutcome::Cancelled);
    }

    #[test]
    fn ctrl_u_clears_and_release_is_ignored() {
        let mut p = Prompt::folder(Some(Path::new("/music")));
        assert_eq!(p.input(), "/music/");
        p.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(p.input(), "");

        let release = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        p.handle_key(release);
        assert_eq!(p.input(), "");
    }

    #[test]
    fn paste_into_files_prompt_separates_entries() {
        let mut p = Prompt::files();
        type_str(&mut p, "/a.mp3");
        p.paste("'/b c.mp3'\n'/d.mp3'\n");
        assert_eq!(p.input(), "/a.mp3 '/b c.mp3' '/d.mp3' ");
    }

    #[test]
    fn empty_input_is_a_cancelled_dialog() {
        let settings = LibrarySettings::default();
        assert!(resolve(PromptKind::Folder, "   ", &settings).unwrap().is_none());
        assert!(resolve(PromptKind::Files, "", &settings).unwrap().is_none());
    }

    #[test]
    fn folder_input_scans_the_folder() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.mp3"), b"").unwrap();
        fs::write(dir.path().join("a.flac"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let input = format!("  {}  ", dir.path().display());
        let selection = resolve(PromptKind::Folder, &input, &LibrarySettings::default())
            .unwrap()
            .unwrap();
        let names: Vec<_> = selection.tracks.iter().map(|t| t.display_name.clone()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(selection.folder.as_deref(), Some(dir.path()));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("nope").display().to_string();
        assert!(resolve(PromptKind::Folder, &input, &LibrarySettings::default()).is_err());
    }

    #[test]
    fn files_input_keeps_given_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b song.mp3");
        let a = dir.path().join("a.ogg");
        fs::write(&b, b"").unwrap();
        fs::write(&a, b"").unwrap();

        let input = format!("'{}' {}", b.display(), a.display());
        let selection = resolve(PromptKind::Files, &input, &LibrarySettings::default())
            .unwrap()
            .unwrap();
        let paths: Vec<_> = selection.tracks.iter().map(|t| t.path.clone()).collect();
        assert_eq!(paths, [b, a]);
        assert!(selection.folder.is_none());
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = env::var_os("HOME") {
            assert_eq!(expand_home("~/Music"), PathBuf::from(home).join("Music"));
        }
        assert_eq!(expand_home("/abs/~x"), PathBuf::from("/abs/~x"));
    }
}
