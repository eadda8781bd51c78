use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use async_io::block_on;
use zbus::Connection;

use crate::error::PlayerResult;

use super::ShellBridge;
use super::launcher;
use super::messages::{Inbound, MediaMetadata, Progress, ThumbarButton};
use super::mpris::{BUS_NAME, MPRIS_PATH, PlayerIface, REMOTE_PATH, RemoteIface, RootIface, Shared};
use super::notify::NotificationsProxy;

#[derive(Debug)]
enum HostRequest {
    Progress(f64),
    Position(f64),
    Metadata(MediaMetadata),
    ClearMetadata,
    Notify { summary: String, body: String },
}

/// The bridge used by the running player.
///
/// Bus-bound messages go, in call order, to a thread that owns the session
/// bus connection. Thumbar buttons stay here for the terminal UI to draw;
/// the last progress value is kept to skip repeats.
pub struct DesktopBridge {
    tx: Sender<HostRequest>,
    thumbar: Vec<ThumbarButton>,
    progress: Progress,
}

impl DesktopBridge {
    pub fn spawn(inbound: Sender<Inbound>) -> Self {
        let (tx, rx) = mpsc::channel::<HostRequest>();
        let spawned = thread::Builder::new()
            .name("desktop-host".to_string())
            .spawn(move || run_host(rx, inbound));
        if let Err(e) = spawned {
            log::error!("failed to start desktop host thread: {e}");
        }

        Self {
            tx,
            thumbar: ThumbarButton::row(false).to_vec(),
            progress: Progress::Reset,
        }
    }

    pub fn thumbar_buttons(&self) -> &[ThumbarButton] {
        &self.thumbar
    }

    fn send(&self, req: HostRequest) {
        if let Err(e) = self.tx.send(req) {
            log::debug!("desktop host is gone, dropping {:?}", e.0);
        }
    }
}

impl ShellBridge for DesktopBridge {
    fn update_progress(&mut self, progress: Progress) {
        if self.progress == progress {
            return;
        }
        self.progress = progress;
        self.send(HostRequest::Progress(progress.value()));
    }

    fn update_position(&mut self, position_seconds: f64) {
        self.send(HostRequest::Position(position_seconds));
    }

    fn set_thumbar_buttons(&mut self, buttons: &[ThumbarButton]) {
        self.thumbar = buttons.to_vec();
    }

    fn update_media_metadata(&mut self, metadata: &MediaMetadata) {
        self.send(HostRequest::Metadata(metadata.clone()));
    }

    fn clear_media_metadata(&mut self) {
        self.send(HostRequest::ClearMetadata);
    }

    fn show_notification(&mut self, summary: &str, body: &str) {
        self.send(HostRequest::Notify {
            summary: summary.to_string(),
            body: body.to_string(),
        });
    }
}

struct Host {
    conn: Connection,
    state: Shared,
    notifications: Option<NotificationsProxy<'static>>,
    last_notification: u32,
}

impl Host {
    async fn connect(inbound: Sender<Inbound>) -> PlayerResult<Self> {
        let conn = Connection::session().await?;
        let state: Shared = Arc::new(Mutex::new(Default::default()));

        let object_server = conn.object_server();
        object_server
            .at(MPRIS_PATH, RootIface { tx: inbound.clone() })
            .await?;
        object_server
            .at(
                MPRIS_PATH,
                PlayerIface {
                    tx: inbound.clone(),
                    state: state.clone(),
                },
            )
            .await?;
        object_server
            .at(REMOTE_PATH, RemoteIface { tx: inbound })
            .await?;
        conn.request_name(BUS_NAME).await?;

        let notifications = match NotificationsProxy::new(&conn).await {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("notifications unavailable: {e}");
                None
            }
        };

        log::info!("registered {BUS_NAME} on the session bus");
        Ok(Self {
            conn,
            state,
            notifications,
            last_notification: 0,
        })
    }

    async fn apply(&mut self, req: HostRequest) -> PlayerResult<()> {
        match req {
            HostRequest::Progress(value) => launcher::update_progress(&self.conn, value).await?,
            // MPRIS clients poll Position; it has no change signal.
            HostRequest::Position(seconds) => {
                if let Ok(mut s) = self.state.lock() {
                    s.set_position(seconds);
                }
            }
            HostRequest::Metadata(meta) => {
                log::debug!("now {}: {}", meta.state.as_str(), meta.title);
                self.publish(Some(&meta)).await?;
            }
            HostRequest::ClearMetadata => self.publish(None).await?,
            HostRequest::Notify { summary, body } => {
                if let Some(proxy) = &self.notifications {
                    self.last_notification = proxy
                        .notify(
                            "allegro",
                            self.last_notification,
                            "audio-x-generic",
                            &summary,
                            &body,
                            &[],
                            HashMap::new(),
                            -1,
                        )
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn publish(&self, meta: Option<&MediaMetadata>) -> PlayerResult<()> {
        if let Ok(mut s) = self.state.lock() {
            s.set_metadata(meta);
        }
        let iface = self
            .conn
            .object_server()
            .interface::<_, PlayerIface>(MPRIS_PATH)
            .await?;
        let player = iface.get().await;
        player.metadata_changed(iface.signal_emitter()).await?;
        player.playback_status_changed(iface.signal_emitter()).await?;
        Ok(())
    }
}

fn run_host(rx: Receiver<HostRequest>, inbound: Sender<Inbound>) {
    let mut host = match block_on(Host::connect(inbound)) {
        Ok(host) => host,
        Err(e) => {
            log::warn!("{e}; media keys, notifications and taskbar progress are disabled");
            // Keep draining so the player never notices.
            for _ in rx {}
            return;
        }
    };

    for req in rx {
        if let Err(e) = block_on(host.apply(req)) {
            log::warn!("desktop host: {e}");
        }
    }
}
