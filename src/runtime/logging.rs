use std::fs::{self, OpenOptions};

use crate::prefs::state_dir;

const LOG_FILE: &str = "allegro.log";

/// Route `log` output to a file under the state directory; the terminal
/// belongs to the UI. Filtering follows `RUST_LOG`, default `info`.
pub fn init() {
    let file = state_dir().and_then(|dir| {
        fs::create_dir_all(&dir).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });

    // Nowhere to write without corrupting the screen.
    let Some(file) = file else {
        return;
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.target(env_logger::Target::Pipe(Box::new(file)));

    // A logger may already be installed; keep it.
    let _ = builder.try_init();
}
