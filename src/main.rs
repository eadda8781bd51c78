mod audio;
mod bridge;
mod config;
mod error;
mod library;
mod metadata;
mod playlist;
mod prefs;
mod runtime;
mod transport;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
