use super::{MediaMetadata, Progress, ShellBridge, ThumbarButton};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Progress(Progress),
    Position(f64),
    Thumbar(Vec<ThumbarButton>),
    Metadata(MediaMetadata),
    ClearMetadata,
    Notification { summary: String, body: String },
}

/// Bridge that keeps every outbound message, in order.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    pub sent: Vec<Sent>,
}

impl RecordingBridge {
    pub fn take(&mut self) -> Vec<Sent> {
        std::mem::take(&mut self.sent)
    }

    pub fn notifications(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter_map(|s| match s {
                Sent::Notification { body, .. } => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_metadata(&self) -> Option<&MediaMetadata> {
        self.sent.iter().rev().find_map(|s| match s {
            Sent::Metadata(m) => Some(m),
            _ => None,
        })
    }

    pub fn last_progress(&self) -> Option<Progress> {
        self.sent.iter().rev().find_map(|s| match s {
            Sent::Progress(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_position(&self) -> Option<f64> {
        self.sent.iter().rev().find_map(|s| match s {
            Sent::Position(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_thumbar(&self) -> Option<&[ThumbarButton]> {
        self.sent.iter().rev().find_map(|s| match s {
            Sent::Thumbar(b) => Some(b.as_slice()),
            _ => None,
        })
    }
}

impl ShellBridge for RecordingBridge {
    fn update_progress(&mut self, progress: Progress) {
        self.sent.push(Sent::Progress(progress));
    }

    fn update_position(&mut self, position_seconds: f64) {
        self.sent.push(Sent::Position(position_seconds));
    }

    fn set_thumbar_buttons(&mut self, buttons: &[ThumbarButton]) {
        self.sent.push(Sent::Thumbar(buttons.to_vec()));
    }

    fn update_media_metadata(&mut self, metadata: &MediaMetadata) {
        self.sent.push(Sent::Metadata(metadata.clone()));
    }

    fn clear_media_metadata(&mut self) {
        self.sent.push(Sent::ClearMetadata);
    }

    fn show_notification(&mut self, summary: &str, body: &str) {
        self.sent.push(Sent::Notification {
            summary: summary.to_string(),
            body: body.to_string(),
        });
    }
}
