use std::io::Stdout;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{AudioBackend, EngineEvent};
use crate::bridge::{ActionToken, DesktopBridge, Inbound, ShellSignal, SignalChannel};
use crate::config::Settings;
use crate::library::{Selection, open_dropped, parse_dropped_paths};
use crate::metadata::MetadataReply;
use crate::transport::{Action, Dispatch, KeyIntent, Transport, map_key};
use crate::ui::{self, Hit, HitMap, View};

use super::prompt::{Prompt, PromptOutcome, resolve};

/// Upper bound on how long the loop sleeps waiting for terminal input.
const FRAME: Duration = Duration::from_millis(50);

/// Channels the capability threads answer on.
pub struct Inputs {
    pub engine: Receiver<EngineEvent>,
    pub metadata: Receiver<MetadataReply>,
    pub inbound: Receiver<Inbound>,
}

/// Terminal-side state that the player core does not care about.
#[derive(Default)]
pub struct FrontEnd {
    selected: usize,
    /// Current track as of the last frame; the cursor follows it when it moves.
    followed: Option<usize>,
    prompt: Option<Prompt>,
    status: Option<String>,
    hits: HitMap,
}

impl FrontEnd {
    fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    fn follow_current(&mut self, current: Option<usize>, len: usize) {
        if current != self.followed {
            if let Some(i) = current {
                self.selected = i;
            }
            self.followed = current;
        }
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Run until the user or the desktop asks to quit.
pub fn run<A: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &Settings,
    transport: &mut Transport<DesktopBridge, A>,
    inputs: &Inputs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut front = FrontEnd::default();

    loop {
        while let Ok(ev) = inputs.engine.try_recv() {
            transport.on_engine_event(ev, Instant::now());
        }
        while let Ok(reply) = inputs.metadata.try_recv() {
            transport.on_metadata(reply);
        }
        while let Ok(msg) = inputs.inbound.try_recv() {
            match msg {
                Inbound::Signal(signal) => {
                    transport.dispatch(Action::Signal(signal));
                }
                Inbound::Quit => {
                    log::info!("quit requested by the desktop");
                    return Ok(());
                }
            }
        }
        transport.poll(Instant::now());

        let playlist = transport.playlist();
        front.follow_current(playlist.current_index(), playlist.len());

        let mut hits = HitMap::default();
        {
            let view = View {
                selected: front.selected,
                prompt: front.prompt.as_ref().map(|p| (p.title(), p.input())),
                status: front.status.as_deref(),
                thumbar: transport.bridge().thumbar_buttons(),
            };
            let t: &Transport<DesktopBridge, A> = transport;
            terminal.draw(|f| hits = ui::draw(f, t, &view, &settings.ui, &settings.controls))?;
        }
        front.hits = hits;

        let timeout = transport
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()).min(FRAME))
            .unwrap_or(FRAME);
        if !event::poll(timeout)? {
            continue;
        }

        let flow = match event::read()? {
            Event::Key(key) => handle_key(key, settings, transport, &mut front),
            Event::Paste(text) => {
                handle_paste(&text, settings, transport, &mut front);
                Flow::Continue
            }
            Event::Mouse(mouse) => {
                handle_mouse(mouse, transport, &mut front);
                Flow::Continue
            }
            _ => Flow::Continue,
        };
        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

fn handle_key<A: AudioBackend>(
    key: KeyEvent,
    settings: &Settings,
    transport: &mut Transport<DesktopBridge, A>,
    front: &mut FrontEnd,
) -> Flow {
    let intent = map_key(key, front.prompt.is_some(), &settings.controls);

    let Some(intent) = intent else {
        if let Some(prompt) = front.prompt.as_mut() {
            match prompt.handle_key(key) {
                PromptOutcome::Editing => {}
                PromptOutcome::Cancelled => front.prompt = None,
                PromptOutcome::Submitted(input) => {
                    let kind = prompt.kind();
                    front.prompt = None;
                    match resolve(kind, &input, &settings.library) {
                        Ok(Some(selection)) => load(selection, transport, front),
                        Ok(None) => {}
                        Err(e) => {
                            log::warn!("{e}");
                            front.status = Some(e.to_string());
                        }
                    }
                }
            }
        }
        return Flow::Continue;
    };

    match intent {
        KeyIntent::Transport(action) => {
            transport.dispatch(action);
        }
        KeyIntent::MoveSelection(delta) => {
            front.move_selection(delta, transport.playlist().len());
        }
        KeyIntent::PlaySelection => {
            transport.dispatch(Action::PlayIndex(front.selected));
        }
        KeyIntent::OpenFolder => {
            let last = transport.preferences().last_folder.clone();
            front.status = None;
            front.prompt = Some(Prompt::folder(last.as_deref()));
        }
        KeyIntent::OpenFiles => {
            front.status = None;
            front.prompt = Some(Prompt::files());
        }
        KeyIntent::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Bracketed paste: typed into an open prompt, otherwise treated as dropped paths.
fn handle_paste<A: AudioBackend>(
    text: &str,
    settings: &Settings,
    transport: &mut Transport<DesktopBridge, A>,
    front: &mut FrontEnd,
) {
    if let Some(prompt) = front.prompt.as_mut() {
        prompt.paste(text);
        return;
    }

    let paths = parse_dropped_paths(text);
    if paths.is_empty() {
        return;
    }
    log::debug!("dropped {} paths", paths.len());
    load(open_dropped(&paths, &settings.library), transport, front);
}

fn handle_mouse<A: AudioBackend>(
    mouse: MouseEvent,
    transport: &mut Transport<DesktopBridge, A>,
    front: &mut FrontEnd,
) {
    let len = transport.playlist().len();
    match mouse.kind {
        MouseEventKind::ScrollUp => front.move_selection(-1, len),
        MouseEventKind::ScrollDown => front.move_selection(1, len),
        MouseEventKind::Down(MouseButton::Left) => match front.hits.at(mouse.column, mouse.row) {
            Some(Hit::Thumbar(action)) => {
                let signal = ShellSignal::new(SignalChannel::Thumbar, ActionToken::from(action));
                transport.dispatch(Action::Signal(signal));
            }
            Some(Hit::Row(index)) => {
                front.selected = index;
                transport.dispatch(Action::PlayIndex(index));
            }
            Some(Hit::Seek(fraction)) => {
                let total = transport
                    .now_playing()
                    .and_then(|(session, track)| session.duration.or(track.duration()));
                if let Some(total) = total {
                    transport.dispatch(Action::SeekTo(fraction * total.as_secs_f64()));
                }
            }
            None => {}
        },
        _ => {}
    }
}

fn load<A: AudioBackend>(
    selection: Selection,
    transport: &mut Transport<DesktopBridge, A>,
    front: &mut FrontEnd,
) {
    let label = selection.label.clone();
    match transport.dispatch(Action::Load(selection)) {
        Dispatch::Handled => {
            front.status = None;
            front.followed = None;
        }
        Dispatch::Ignored => front.status = Some(format!("{label}: no playable files")),
    }
}
