use crate::bridge::{ActionToken, ShellSignal};
use crate::library::Selection;

/// Every user or host intent the transport understands.
#[derive(Debug, Clone)]
pub enum Action {
    PlayPause,
    Play,
    Pause,
    Next,
    Previous,
    /// Seek by a signed number of seconds.
    SeekBy(f64),
    /// Seek to an absolute position in seconds.
    SeekTo(f64),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    ToggleShuffle,
    ToggleRepeat,
    ToggleTheme,
    ToggleFullscreen,
    Clear,
    /// Replace the playlist with a resolved pick.
    Load(Selection),
    /// Jump to a playlist row and play it.
    PlayIndex(usize),
    /// A host signal, mapped through its action token.
    Signal(ShellSignal),
}

impl From<ActionToken> for Action {
    fn from(token: ActionToken) -> Self {
        match token {
            ActionToken::PlayPause => Self::PlayPause,
            ActionToken::Play => Self::Play,
            ActionToken::Pause => Self::Pause,
            ActionToken::Next => Self::Next,
            ActionToken::Previous => Self::Previous,
            ActionToken::VolUp => Self::VolumeUp,
            ActionToken::VolDown => Self::VolumeDown,
            ActionToken::Mute => Self::ToggleMute,
            ActionToken::Theme => Self::ToggleTheme,
        }
    }
}

/// Whether a dispatched action changed anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// Nothing to act on (empty playlist, no session, nothing to change).
    Ignored,
}

impl From<bool> for Dispatch {
    fn from(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }
}
