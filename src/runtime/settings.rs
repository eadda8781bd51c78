use crate::config;
use crate::error::PlayerError;

/// Settings for this run. A missing, unreadable or invalid config falls
/// back to defaults; the player still starts.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => s,
            Err(msg) => {
                log::warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            }
        },
        Err(e) => {
            let source = config::resolve_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "environment".to_string());
            log::warn!("{} ({source}); using defaults", PlayerError::from(e));
            config::Settings::default()
        }
    }
}
