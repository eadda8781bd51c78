//! Terminal rendering for the player.
//!
//! `draw` is a pure function of the transport state and the front end's
//! `View`; it returns a `HitMap` so mouse clicks can be resolved against
//! what was actually drawn.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::audio::{AudioBackend, format_clock, format_duration};
use crate::bridge::{ShellBridge, ThumbarAction, ThumbarButton};
use crate::config::{ControlsSettings, UiSettings};
use crate::prefs::Theme;
use crate::transport::{Transport, TransportState};

/// Key help, in display order. `{seek}` is filled from the controls settings.
const CONTROLS: &[(&str, &str)] = &[
    ("space", "play/pause"),
    ("←/→", "seek -/+{seek}s"),
    ("^←/^→", "prev/next"),
    ("↑/↓ enter", "select/play"),
    ("^↑/^↓", "volume"),
    ("^M/m", "mute"),
    ("^S", "shuffle"),
    ("^R", "repeat"),
    ("^T", "theme"),
    ("^F", "fullscreen"),
    ("^O", "open folder"),
    ("^P", "open files"),
    ("^D", "clear"),
    ("^Q", "quit"),
];

const PADDED: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Front-end state that is not part of the player core.
pub struct View<'a> {
    /// Playlist row under the cursor.
    pub selected: usize,
    /// Title and current input of an open text prompt.
    pub prompt: Option<(&'a str, &'a str)>,
    /// One-line message shown in the footer title.
    pub status: Option<&'a str>,
    pub thumbar: &'a [ThumbarButton],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Thumbar(ThumbarAction),
    Row(usize),
    /// A click on the seek gauge, as a fraction of its width.
    Seek(f64),
}

/// Screen regions that react to the mouse, as of the last draw.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    thumbar: Vec<(Rect, ThumbarAction)>,
    /// Inner list area and the playlist index of its first row.
    rows: Option<(Rect, usize, usize)>,
    gauge: Option<Rect>,
}

impl HitMap {
    pub fn at(&self, column: u16, row: u16) -> Option<Hit> {
        if let Some((_, action)) = self.thumbar.iter().find(|(r, _)| inside(*r, column, row)) {
            return Some(Hit::Thumbar(*action));
        }
        if let Some(g) = self.gauge.filter(|g| inside(*g, column, row)) {
            if g.width <= 1 {
                return Some(Hit::Seek(0.0));
            }
            let offset = f64::from(column - g.x);
            return Some(Hit::Seek(offset / f64::from(g.width - 1)));
        }
        if let Some((area, start, end)) = self.rows.filter(|(a, _, _)| inside(*a, column, row)) {
            let index = start + usize::from(row - area.y);
            return (index < end).then_some(Hit::Row(index));
        }
        None
    }
}

fn inside(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x.saturating_add(r.width) && row >= r.y && row < r.y.saturating_add(r.height)
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    dim: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            dim: Color::DarkGray,
        },
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            dim: Color::Gray,
        },
    }
}

fn controls_text(controls: &ControlsSettings) -> String {
    let seek = format!("{}", controls.seek_seconds);
    CONTROLS
        .iter()
        .map(|(key, what)| format!("[{key}] {}", what.replace("{seek}", &seek)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Start and end of the rows to draw, keeping `selected` near the middle.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Center a popup of the given size inside `r`.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2)).max(10).min(r.width);
    let height = height.min(r.height.saturating_sub(2)).max(3).min(r.height);
    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

fn state_label(state: TransportState) -> &'static str {
    match state {
        TransportState::Idle => "Idle",
        TransportState::Paused => "Paused",
        TransportState::Playing => "Playing",
    }
}

fn button_label(button: &ThumbarButton) -> String {
    let glyph = match (button.action, button.tooltip) {
        (ThumbarAction::Previous, _) => "⏮",
        (ThumbarAction::Next, _) => "⏭",
        (ThumbarAction::PlayPause, "Pause") => "⏸",
        (ThumbarAction::PlayPause, _) => "▶",
    };
    format!("{glyph} {}", button.tooltip)
}

pub fn draw<B: ShellBridge, A: AudioBackend>(
    frame: &mut Frame,
    transport: &Transport<B, A>,
    view: &View<'_>,
    ui: &UiSettings,
    controls: &ControlsSettings,
) -> HitMap {
    let colors = palette(transport.theme());
    let base = Style::default().fg(colors.fg).bg(colors.bg);
    let accent = Style::default().fg(colors.accent).bg(colors.bg);
    let mut hits = HitMap::default();

    let area = frame.area();
    frame.render_widget(Block::default().style(base), area);

    let fullscreen = transport.is_fullscreen();
    let playlist_height = if fullscreen {
        Constraint::Length(0)
    } else {
        Constraint::Min(3)
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
            playlist_height,
            Constraint::Length(4),
        ])
        .split(area);

    // Header
    let header = Paragraph::new(ui.header_text.as_str())
        .style(base)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" allegro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let volume = transport.engine().volume();
    let volume_text = if volume.is_muted() {
        "muted".to_string()
    } else {
        format!("{:.0}%", volume.level() * 100.0)
    };
    let flags = format!(
        "{} • Shuffle: {} • Repeat: {} • Volume: {}",
        state_label(transport.state()),
        if transport.playlist().is_shuffled() { "ON" } else { "OFF" },
        if transport.playlist().is_repeating() { "ON" } else { "OFF" },
        volume_text,
    );
    let mut lines: Vec<Line> = match transport.now_playing() {
        Some((_, track)) => vec![
            Line::from(Span::styled(
                track.title().to_string(),
                accent.add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} · {}",
                track.artist().unwrap_or("Unknown artist"),
                track.album().unwrap_or("Unknown album")
            )),
            Line::from(match track.album_art() {
                Some(art) => format!("[cover art: {}]", art.mime_type),
                None => "[no cover art]".to_string(),
            }),
        ],
        None => vec![Line::from("Nothing playing"), Line::from(""), Line::from("")],
    };
    lines.push(Line::from(flags));
    let now_playing = Paragraph::new(lines)
        .style(base)
        .block(Block::bordered().padding(PADDED).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    // Seek gauge
    let (ratio, clock) = match transport.now_playing() {
        Some((session, track)) => {
            let total = session.duration.or(track.duration());
            let ratio = session.fraction().unwrap_or(0.0).clamp(0.0, 1.0);
            let clock = format!(
                "{} / {}",
                format_clock(session.position.as_secs_f64()),
                format_duration(total)
            );
            (ratio, clock)
        }
        None => (0.0, format!("{} / {}", format_clock(0.0), format_duration(None))),
    };
    let gauge_block = Block::bordered().title(" position ");
    let gauge_inner = gauge_block.inner(chunks[2]);
    let gauge = Gauge::default()
        .block(gauge_block)
        .style(base)
        .gauge_style(Style::default().fg(colors.accent).bg(colors.dim))
        .ratio(ratio)
        .label(clock);
    frame.render_widget(gauge, chunks[2]);
    if transport.now_playing().is_some() {
        hits.gauge = Some(gauge_inner);
    }

    // Thumbar buttons
    if !view.thumbar.is_empty() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, view.thumbar.len() as u32); view.thumbar.len()])
            .split(chunks[3]);
        for (button, cell) in view.thumbar.iter().zip(cells.iter()) {
            let widget = Paragraph::new(button_label(button))
                .style(accent)
                .alignment(Alignment::Center)
                .block(Block::bordered().title_bottom(Line::from(button.icon).right_aligned()));
            frame.render_widget(widget, *cell);
            hits.thumbar.push((*cell, button.action));
        }
    }

    // Playlist
    if !fullscreen {
        let playlist = transport.playlist();
        let title = match transport.source_label() {
            Some(label) => format!(" tracks · {label} "),
            None => " tracks ".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(chunks[4]);

        let total = playlist.len();
        let selected = view.selected.min(total.saturating_sub(1));
        let (start, end) = visible_window(total, inner.height as usize, selected);
        let current = playlist.current_index();

        let items: Vec<ListItem> = playlist.tracks()[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let index = start + offset;
                let marker = if current == Some(index) { "♪ " } else { "  " };
                let duration = track
                    .duration()
                    .map(|d| format!("  [{}]", format_duration(Some(d))))
                    .unwrap_or_default();
                let text = format!("{marker}{:>3}. {}{duration}", index + 1, track.label());
                if current == Some(index) {
                    ListItem::new(text).style(accent.add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(text)
                }
            })
            .collect();

        let list = List::new(items)
            .style(base)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(selected - start));
        }
        frame.render_stateful_widget(list, chunks[4], &mut state);
        hits.rows = Some((inner, start, end));
    }

    // Footer
    let footer_title = match view.status {
        Some(s) => format!(" controls · {s} "),
        None => " controls ".to_string(),
    };
    let footer = Paragraph::new(controls_text(controls))
        .style(base)
        .block(Block::default().borders(Borders::ALL).title(footer_title).padding(PADDED))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    // Prompt overlay
    if let Some((title, input)) = view.prompt {
        let popup = centered_rect_sized(72, 5, area);
        frame.render_widget(Clear, popup);
        let text = vec![
            Line::from(format!("{input}▏")),
            Line::from(Span::styled(
                "enter: open • esc: cancel",
                Style::default().fg(colors.dim),
            )),
        ];
        let prompt = Paragraph::new(text)
            .style(base)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(accent)
                    .title(format!(" {title} "))
                    .padding(PADDED),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(prompt, popup);
        // The prompt owns the mouse while it is open.
        hits = HitMap::default();
    }

    hits
}

#[cfg(test)]
mod tests;
