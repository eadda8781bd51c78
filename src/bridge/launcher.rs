//! Taskbar/dock progress through the `com.canonical.Unity.LauncherEntry` signal.
//!
//! Docks that understand it (KDE's task manager, Dash to Dock, Plank) match
//! the entry by the desktop file named in the application URI.

use std::collections::HashMap;

use zbus::Connection;
use zbus::names::BusName;
use zvariant::Value;

const APP_URI: &str = "application://allegro.desktop";
const PATH: &str = "/org/allegro/Launcher";
const INTERFACE: &str = "com.canonical.Unity.LauncherEntry";

/// The properties sent for a progress value in `[0, 1]`, or a negative value to hide it.
pub(super) fn progress_properties(value: f64) -> HashMap<&'static str, Value<'static>> {
    let mut props = HashMap::new();
    if value >= 0.0 {
        props.insert("progress", Value::from(value.min(1.0)));
        props.insert("progress-visible", Value::from(true));
    } else {
        props.insert("progress-visible", Value::from(false));
    }
    props
}

pub(super) async fn update_progress(conn: &Connection, value: f64) -> zbus::Result<()> {
    conn.emit_signal(
        None::<BusName<'_>>,
        PATH,
        INTERFACE,
        "Update",
        &(APP_URI, progress_properties(value)),
    )
    .await
}
