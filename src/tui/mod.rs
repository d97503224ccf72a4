//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Loop
//!
//! ```text
//! key ──▶ TuiState::handle_event ──▶ Action ──▶ update() ──▶ Effect ──▶ PersistJob
//!                                                  ▲                       │
//!                                                  └── Saved/SaveFailed ◀──┘
//! ```
//!
//! Redraws happen only after an event or a background result; the loop
//! sleeps up to 250ms between polls.

mod component;
mod components;
mod event;
mod ui;

use std::io::{self, stdout};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::action::{Action, Effect, update};
use crate::core::state::{App, Tab};
use crate::storage::BookStore;
use crate::storage::worker::{PersistJob, spawn_load, spawn_persist_worker};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Typing a new title. Esc switches to List.
    Input,
    /// Navigating and editing books with single-key commands.
    List,
    /// Editing the notes of the book with this id.
    Notes(String),
    /// Typing a link for the book with this id.
    Link(String),
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input_box: InputBox,
    pub mode: InputMode,
    pub list_state: ListState,
    /// Book picked with `r`, waiting for the second `r` on a target.
    pub relation_source: Option<String>,
    /// Book for which `d` was pressed once.
    pub pending_delete: Option<String>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input_box: InputBox::new("New book"),
            mode: InputMode::Input, // User expects to type immediately
            list_state: ListState::default(),
            relation_source: None,
            pending_delete: None,
        }
    }

    /// Route one event by mode. Returns the action for `update()`, if any.
    pub fn handle_event(&mut self, app: &App, event: &TuiEvent) -> Option<Action> {
        if matches!(event, TuiEvent::ForceQuit) {
            return Some(Action::Quit);
        }
        match self.mode.clone() {
            InputMode::Input => self.handle_input(event),
            InputMode::List => self.handle_list(app, event),
            InputMode::Notes(id) => self.handle_field(event).map(|notes| Action::UpdateNotes {
                id,
                notes,
            }),
            InputMode::Link(id) => self
                .handle_field(event)
                .map(|url| Action::AddLink { id, url }),
        }
    }

    fn handle_input(&mut self, event: &TuiEvent) -> Option<Action> {
        if matches!(event, TuiEvent::NextTab) {
            return Some(Action::NextTab);
        }
        match self.input_box.handle_event(event)? {
            InputEvent::Submit(title) => Some(Action::AddBook(title)),
            InputEvent::Cancel => {
                self.mode = InputMode::List;
                None
            }
            InputEvent::ContentChanged => None,
        }
    }

    /// Notes/link editing: Enter yields the text, Esc discards it.
    fn handle_field(&mut self, event: &TuiEvent) -> Option<String> {
        match self.input_box.handle_event(event)? {
            InputEvent::Submit(text) => {
                self.mode = InputMode::List;
                Some(text)
            }
            InputEvent::Cancel => {
                self.input_box.clear();
                self.mode = InputMode::List;
                None
            }
            InputEvent::ContentChanged => None,
        }
    }

    fn handle_list(&mut self, app: &App, event: &TuiEvent) -> Option<Action> {
        let selected = app
            .selected_id
            .clone()
            .filter(|id| app.book(id).is_some());

        // A second `d` must follow the first immediately
        let pending_delete = self.pending_delete.take();

        match event {
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let visible = app.visible_books();
                if visible.is_empty() {
                    return None;
                }
                let current = selected
                    .as_deref()
                    .and_then(|id| visible.iter().position(|b| b.id == id));
                let index = match (event, current) {
                    (TuiEvent::CursorUp, Some(i)) => i.saturating_sub(1),
                    (TuiEvent::CursorUp, None) => visible.len() - 1,
                    (_, Some(i)) => (i + 1).min(visible.len() - 1),
                    (_, None) => 0,
                };
                Some(Action::Select(Some(visible[index].id.clone())))
            }
            TuiEvent::Move(direction) => selected.map(|id| Action::MoveBook {
                id,
                direction: *direction,
            }),
            TuiEvent::NextTab => Some(Action::NextTab),
            TuiEvent::Submit | TuiEvent::InputChar(' ') => selected.map(Action::ToggleExpand),
            TuiEvent::Escape => {
                if self.relation_source.take().is_some() {
                    return None;
                }
                selected.map(Action::ToggleSelect)
            }
            TuiEvent::InputChar('p') => selected.map(Action::TogglePriority),
            TuiEvent::InputChar('d') => {
                let id = selected?;
                if pending_delete.as_deref() == Some(id.as_str()) {
                    return Some(Action::DeleteBook(id));
                }
                self.pending_delete = Some(id);
                None
            }
            TuiEvent::InputChar('r') => {
                let id = selected?;
                match self.relation_source.take() {
                    Some(source) if source != id => Some(Action::ToggleNext {
                        parent: source,
                        candidate: id,
                    }),
                    Some(_) => None,
                    None => {
                        self.relation_source = Some(id);
                        None
                    }
                }
            }
            TuiEvent::InputChar('e') => {
                let id = selected?;
                let notes = app.book(&id).and_then(|b| b.notes.clone()).unwrap_or_default();
                self.input_box.set_text(&notes);
                self.mode = InputMode::Notes(id);
                None
            }
            TuiEvent::InputChar('l') => {
                let id = selected?;
                self.input_box.clear();
                self.mode = InputMode::Link(id);
                None
            }
            TuiEvent::InputChar('x') => {
                let id = selected?;
                let count = app.book(&id).map(|b| b.links().len()).unwrap_or(0);
                let index = count.checked_sub(1)?;
                Some(Action::RemoveLink { id, index })
            }
            TuiEvent::InputChar('i') | TuiEvent::InputChar('a') => {
                self.input_box.clear();
                self.mode = InputMode::Input;
                None
            }
            TuiEvent::InputChar('q') => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Translate an effect into the persistence job it requires.
pub fn job_for(app: &App, effect: &Effect) -> Option<PersistJob> {
    match effect {
        Effect::PersistAll => Some(PersistJob::UpsertAll(app.books.clone())),
        Effect::Delete(id) => Some(PersistJob::Delete {
            id: id.clone(),
            books: app.books.clone(),
        }),
        Effect::Update { id, patch } => Some(PersistJob::Update {
            id: id.clone(),
            patch: patch.clone(),
        }),
        Effect::None | Effect::Quit => None,
    }
}

/// Apply an action and queue its persistence. Returns true on quit.
fn dispatch(app: &mut App, action: Action, jobs: &UnboundedSender<PersistJob>) -> bool {
    let effect = update(app, action);
    if let Some(job) = job_for(app, &effect) {
        debug!("Queueing persist job: {:?}", job);
        if jobs.send(job).is_err() {
            warn!("Persistence worker is gone; change kept in memory only");
            app.status_message = "Save failed: persistence worker stopped".to_string();
        }
    }
    effect == Effect::Quit
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
    }
}

pub fn run(store: Arc<dyn BookStore>, default_tab: Tab) -> io::Result<()> {
    let mut app = App::new(store.name(), default_tab);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    spawn_load(store.clone(), tx.clone());
    let (jobs, worker) = spawn_persist_worker(store, tx);

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Failed to enable terminal modes: {}", e);
    }

    let mut needs_redraw = true;
    let mut should_quit = false;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if let Some(action) = tui.handle_event(&app, &event)
                && dispatch(&mut app, action, &jobs)
            {
                should_quit = true;
                break;
            }
        }

        // Handle background task results (initial load, saves)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(&mut app, action, &jobs);
        }
    }

    // Let the worker finish queued writes before the runtime shuts down
    drop(jobs);
    info!("Waiting for pending saves");
    let flushed = tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(worker));
    if let Err(e) = flushed {
        warn!("Persistence worker ended abnormally: {}", e);
    }

    drop(terminal_mode_guard);
    ratatui::restore();
    Ok(())
}
