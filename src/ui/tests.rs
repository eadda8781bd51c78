use std::path::Path;
use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

use super::*;
use crate::audio::EngineEvent;
use crate::audio::fake::FakeBackend;
use crate::bridge::recording::RecordingBridge;
use crate::config::Settings;
use crate::library::{ResolvedMetadata, Selection, Track, TrackId};
use crate::metadata::MetadataSource;
use crate::prefs::MemoryStore;
use crate::transport::Action;

struct NoTags;

impl MetadataSource for NoTags {
    fn request(&self, _track_id: TrackId, _path: &Path) {}
}

type TestTransport = Transport<RecordingBridge, FakeBackend>;

fn transport() -> TestTransport {
    Transport::new(
        Settings::default(),
        FakeBackend::default(),
        RecordingBridge::default(),
        Box::new(NoTags),
        Box::new(MemoryStore::default()),
    )
}

fn loaded(names: &[&str]) -> TestTransport {
    let mut t = transport();
    let tracks = names.iter().map(|n| Track::from_path(format!("/music/{n}.mp3"))).collect();
    t.dispatch(Action::Load(Selection {
        label: "music".to_string(),
        folder: None,
        tracks,
    }));
    t
}

fn render(t: &TestTransport, view: &View<'_>) -> (String, HitMap) {
    let settings = Settings::default();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut hits = HitMap::default();
    terminal
        .draw(|f| hits = draw(f, t, view, &settings.ui, &settings.controls))
        .unwrap();
    (screen(terminal.backend().buffer()), hits)
}

fn screen(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn view<'a>(buttons: &'a [ThumbarButton]) -> View<'a> {
    View {
        selected: 0,
        prompt: None,
        status: None,
        thumbar: buttons,
    }
}

#[test]
fn visible_window_keeps_selection_centered() {
    assert_eq!(visible_window(5, 10, 3), (0, 5));
    assert_eq!(visible_window(100, 10, 0), (0, 10));
    assert_eq!(visible_window(100, 10, 50), (45, 55));
    assert_eq!(visible_window(100, 10, 99), (90, 100));
    assert_eq!(visible_window(100, 0, 50), (0, 100));
}

#[test]
fn controls_text_includes_seek_step() {
    let text = controls_text(&ControlsSettings::default());
    assert!(text.contains("[←/→] seek -/+5s"));
    assert!(text.contains("[^Q] quit"));
}

#[test]
fn centered_popup_stays_inside_area() {
    let area = Rect::new(0, 0, 40, 10);
    let popup = centered_rect_sized(72, 5, area);
    assert!(popup.x >= area.x && popup.right() <= area.right());
    assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    assert_eq!(popup.height, 5);
}

#[test]
fn idle_screen_shows_nothing_playing() {
    let t = transport();
    let (text, hits) = render(&t, &view(&[]));
    assert!(text.contains("Nothing playing"));
    assert!(text.contains("0:00 / 0:00"));
    assert!(text.contains("Idle"));
    // No session, so the gauge is not clickable.
    assert_eq!(hits.at(50, 10), None);
}

#[test]
fn playlist_lists_labels_and_durations() {
    let mut t = loaded(&["alpha", "beta"]);
    let id = t.playlist().tracks()[1].id;
    t.on_metadata(crate::metadata::MetadataReply {
        track_id: id,
        result: Ok(ResolvedMetadata {
            title: Some("Beta Song".to_string()),
            artist: Some("Band".to_string()),
            duration: Some(Duration::from_secs(125)),
            ..Default::default()
        }),
    });

    let (text, _) = render(&t, &view(&[]));
    assert!(text.contains("tracks · music"));
    assert!(text.contains("♪   1. alpha"));
    assert!(text.contains("2. Band - Beta Song  [2:05]"));
    assert!(text.contains("Playing"));
}

#[test]
fn gauge_shows_position_over_duration() {
    let mut t = loaded(&["alpha"]);
    let load_id = t.engine().session().unwrap().load_id;
    let now = std::time::Instant::now();
    t.on_engine_event(
        EngineEvent::Ready {
            load_id,
            duration: Some(Duration::from_secs(200)),
        },
        now,
    );
    t.on_engine_event(
        EngineEvent::Progress {
            load_id,
            position: Duration::from_secs(65),
        },
        now,
    );

    let (text, hits) = render(&t, &view(&[]));
    assert!(text.contains("1:05 / 3:20"));
    // Gauge row sits under the header (3) and the now-playing panel (6).
    assert!(matches!(hits.at(1, 10), Some(Hit::Seek(f)) if f == 0.0));
    assert!(matches!(hits.at(98, 10), Some(Hit::Seek(f)) if (f - 1.0).abs() < 1e-9));
}

#[test]
fn thumbar_buttons_are_drawn_and_clickable() {
    let t = loaded(&["alpha"]);
    let buttons = ThumbarButton::row(true);
    let (text, hits) = render(&t, &view(&buttons));
    assert!(text.contains("Previous"));
    assert!(text.contains("Pause"));
    assert!(text.contains("Next"));
    assert_eq!(button_label(&buttons[1]), "⏸ Pause");

    assert_eq!(hits.at(5, 13), Some(Hit::Thumbar(ThumbarAction::Previous)));
    assert_eq!(hits.at(50, 13), Some(Hit::Thumbar(ThumbarAction::PlayPause)));
    assert_eq!(hits.at(95, 13), Some(Hit::Thumbar(ThumbarAction::Next)));
}

#[test]
fn playlist_rows_map_to_indices() {
    let t = loaded(&["a", "b", "c"]);
    let (_, hits) = render(&t, &view(&[]));
    // Playlist block starts at row 15; its first inner row is 16.
    assert_eq!(hits.at(10, 16), Some(Hit::Row(0)));
    assert_eq!(hits.at(10, 18), Some(Hit::Row(2)));
    assert_eq!(hits.at(10, 19), None);
}

#[test]
fn fullscreen_hides_playlist() {
    let mut t = loaded(&["alpha", "beta"]);
    t.dispatch(Action::ToggleFullscreen);
    let (text, hits) = render(&t, &view(&[]));
    assert!(!text.contains(" tracks "));
    assert!(!text.contains("2. beta"));
    assert!(!(15..26).any(|row| matches!(hits.at(10, row), Some(Hit::Row(_)))));
}

#[test]
fn theme_changes_background() {
    let mut t = transport();
    let settings = Settings::default();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| {
            draw(f, &t, &view(&[]), &settings.ui, &settings.controls);
        })
        .unwrap();
    assert_eq!(terminal.backend().buffer()[(1, 1)].bg, Color::Black);

    t.dispatch(Action::ToggleTheme);
    terminal
        .draw(|f| {
            draw(f, &t, &view(&[]), &settings.ui, &settings.controls);
        })
        .unwrap();
    assert_eq!(terminal.backend().buffer()[(1, 1)].bg, Color::White);
}

#[test]
fn prompt_overlay_takes_the_mouse() {
    let t = loaded(&["alpha"]);
    let buttons = ThumbarButton::row(false);
    let v = View {
        selected: 0,
        prompt: Some(("Open folder", "/home/me/Mu")),
        status: None,
        thumbar: &buttons,
    };
    let (text, hits) = render(&t, &v);
    assert!(text.contains(" Open folder "));
    assert!(text.contains("/home/me/Mu"));
    assert_eq!(hits.at(5, 13), None);
}

#[test]
fn status_appears_in_footer_title() {
    let t = transport();
    let v = View {
        selected: 0,
        prompt: None,
        status: Some("no playable files"),
        thumbar: &[],
    };
    let (text, _) = render(&t, &v);
    assert!(text.contains("controls · no playable files"));
}
