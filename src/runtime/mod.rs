use std::env;
use std::sync::mpsc;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioPlayer;
use crate::bridge::DesktopBridge;
use crate::library::open_folder;
use crate::metadata::MetadataResolver;
use crate::prefs::{FileStore, default_preferences_path};
use crate::transport::{Action, Transport};

mod event_loop;
mod logging;
mod prompt;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let settings = settings::load_settings();
    log::info!("allegro {} starting", env!("CARGO_PKG_VERSION"));

    let (engine_tx, engine_rx) = mpsc::channel();
    let (metadata_tx, metadata_rx) = mpsc::channel();
    let (inbound_tx, inbound_rx) = mpsc::channel();

    let audio = AudioPlayer::new(engine_tx, &settings.audio);
    let resolver = MetadataResolver::spawn(metadata_tx);
    let bridge = DesktopBridge::spawn(inbound_tx);

    let prefs_path = default_preferences_path().unwrap_or_else(|| {
        let fallback = env::temp_dir().join("allegro-preferences.toml");
        log::warn!("no state directory; keeping preferences in {}", fallback.display());
        fallback
    });
    let store = FileStore::new(prefs_path);
    log::debug!("preferences at {}", store.path().display());

    let mut transport = Transport::new(
        settings.clone(),
        audio,
        bridge,
        Box::new(resolver),
        Box::new(store),
    );

    let restore = settings
        .playback
        .restore_last_folder
        .then(|| transport.preferences().last_folder.clone())
        .flatten();
    if let Some(dir) = restore {
        match open_folder(&dir, &settings.library) {
            Ok(selection) => {
                transport.dispatch(Action::Load(selection));
            }
            Err(e) => log::warn!("not opening {}: {e}", dir.display()),
        }
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    // Without the kitty protocol Ctrl+M arrives as Enter and media keys not at all.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(stdout, PushKeyboardEnhancementFlags(keyboard_flags()))?;
    } else {
        log::info!("terminal has no keyboard enhancement; media keys come from the desktop only");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let inputs = event_loop::Inputs {
        engine: engine_rx,
        metadata: metadata_rx,
        inbound: inbound_rx,
    };
    let run_result = event_loop::run(&mut terminal, &settings, &mut transport, &inputs);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    transport.shutdown();
    log::info!("bye");

    run_result
}

/// Escape-coded keys so modified letters and media keys are told apart.
/// Alternate keys keep shifted characters intact for the text prompts.
fn keyboard_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
}
