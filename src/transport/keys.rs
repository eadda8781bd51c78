//! Keyboard policy: which key does what.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MediaKeyCode};

use crate::bridge::{ActionToken, ShellSignal, SignalChannel};
use crate::config::ControlsSettings;

use super::action::Action;

/// What a key press asks for. Only `Transport` reaches the controller;
/// the rest is handled by the terminal front end.
#[derive(Debug, Clone)]
pub enum KeyIntent {
    Transport(Action),
    MoveSelection(isize),
    PlaySelection,
    OpenFolder,
    OpenFiles,
    Quit,
}

/// Map a key press to an intent. Nothing is mapped while a text prompt has focus.
pub fn map_key(key: KeyEvent, in_text_input: bool, controls: &ControlsSettings) -> Option<KeyIntent> {
    if in_text_input || key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let transport = |a: Action| Some(KeyIntent::Transport(a));

    match (ctrl, key.code) {
        (false, KeyCode::Char(' ')) => transport(Action::PlayPause),
        (false, KeyCode::Left) => transport(Action::SeekBy(-controls.seek_seconds)),
        (false, KeyCode::Right) => transport(Action::SeekBy(controls.seek_seconds)),
        (false, KeyCode::Up) => Some(KeyIntent::MoveSelection(-1)),
        (false, KeyCode::Down) => Some(KeyIntent::MoveSelection(1)),
        (false, KeyCode::Enter) => Some(KeyIntent::PlaySelection),
        // Ctrl+M is Enter on terminals without the kitty protocol.
        (false, KeyCode::Char('m')) => transport(Action::ToggleMute),
        (true, KeyCode::Left) => transport(Action::Previous),
        (true, KeyCode::Right) => transport(Action::Next),
        (true, KeyCode::Up) => transport(Action::VolumeUp),
        (true, KeyCode::Down) => transport(Action::VolumeDown),
        (true, KeyCode::Char(c)) => match c.to_ascii_lowercase() {
            'm' => transport(Action::ToggleMute),
            's' => transport(Action::ToggleShuffle),
            'r' => transport(Action::ToggleRepeat),
            't' => transport(Action::ToggleTheme),
            'd' => transport(Action::Clear),
            'f' => transport(Action::ToggleFullscreen),
            'o' => Some(KeyIntent::OpenFolder),
            'p' => Some(KeyIntent::OpenFiles),
            'q' | 'c' => Some(KeyIntent::Quit),
            _ => None,
        },
        (_, KeyCode::Media(m)) => media_key(m).map(|action| {
            KeyIntent::Transport(Action::Signal(ShellSignal::new(
                SignalChannel::Shortcut,
                action,
            )))
        }),
        _ => None,
    }
}

/// Media keys, when the terminal reports them (kitty keyboard protocol).
fn media_key(code: MediaKeyCode) -> Option<ActionToken> {
    match code {
        MediaKeyCode::PlayPause => Some(ActionToken::PlayPause),
        MediaKeyCode::Play => Some(ActionToken::Play),
        MediaKeyCode::Pause | MediaKeyCode::Stop => Some(ActionToken::Pause),
        MediaKeyCode::TrackNext => Some(ActionToken::Next),
        MediaKeyCode::TrackPrevious => Some(ActionToken::Previous),
        MediaKeyCode::RaiseVolume => Some(ActionToken::VolUp),
        MediaKeyCode::LowerVolume => Some(ActionToken::VolDown),
        MediaKeyCode::MuteVolume => Some(ActionToken::Mute),
        _ => None,
    }
}
