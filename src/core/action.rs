//! # Actions
//!
//! Everything that can happen in readnext becomes an `Action`.
//! User presses Alt+Right? That's `Action::MoveBook { .. }`.
//! Storage finishes loading? That's `Action::BooksLoaded(books)`.
//!
//! The `update()` function takes the current state and an action, applies
//! the matching List Engine transformation, and returns an `Effect` telling
//! the adapter what to persist. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::core::book::{Book, BookPatch};
use crate::core::list::{self, MoveDirection};
use crate::core::state::{App, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Initial list arrived from storage.
    BooksLoaded(Vec<Book>),
    LoadFailed(String),
    AddBook(String),
    DeleteBook(String),
    TogglePriority(String),
    /// Toggle `candidate` in the "read next" list of `parent`.
    ToggleNext { parent: String, candidate: String },
    MoveBook { id: String, direction: MoveDirection },
    Select(Option<String>),
    /// Select `id`, or clear the selection if it is already selected.
    ToggleSelect(String),
    ToggleExpand(String),
    SwitchTab(Tab),
    NextTab,
    UpdateNotes { id: String, notes: String },
    AddLink { id: String, url: String },
    RemoveLink { id: String, index: usize },
    /// A persistence job finished.
    Saved,
    SaveFailed(String),
    Quit,
}

impl Action {
    /// Whether the action edits the book list.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Action::AddBook(_)
                | Action::DeleteBook(_)
                | Action::TogglePriority(_)
                | Action::ToggleNext { .. }
                | Action::MoveBook { .. }
                | Action::UpdateNotes { .. }
                | Action::AddLink { .. }
                | Action::RemoveLink { .. }
        )
    }
}

/// Work the adapter must do after `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Write the whole list (order, levels, relations changed).
    PersistAll,
    /// Delete the row, then write the purged list.
    Delete(String),
    /// Single-row change.
    Update { id: String, patch: BookPatch },
}

/// Replace `app.books`, reporting whether anything changed.
fn commit(app: &mut App, books: Vec<Book>) -> bool {
    if books == app.books {
        return false;
    }
    app.books = books;
    true
}

/// Commit and emit a single-row update for `id`, or `Effect::None` if the
/// transformation was a no-op.
fn commit_row(app: &mut App, id: &str, books: Vec<Book>) -> Effect {
    if !commit(app, books) {
        return Effect::None;
    }
    match app.book(id) {
        Some(book) => Effect::Update {
            id: id.to_string(),
            patch: BookPatch::from_book(book),
        },
        None => Effect::None,
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    // Edits need the stored list; BooksLoaded would otherwise replace them.
    if action.is_edit() && (app.is_loading || app.error.is_some()) {
        debug!("Ignoring edit before the list is loaded");
        if app.is_loading {
            app.status_message = "Still loading, try again in a moment".to_string();
        }
        return Effect::None;
    }
    match action {
        Action::BooksLoaded(books) => {
            info!("Loaded {} books from {}", books.len(), app.backend_name);
            app.is_loading = false;
            app.error = None;
            let books = list::normalize_levels(books);
            app.status_message = format!("{} books", books.len());
            if let Some(id) = &app.selected_id
                && !books.iter().any(|b| &b.id == id)
            {
                app.selected_id = None;
            }
            app.books = books;
            Effect::None
        }
        Action::LoadFailed(message) => {
            warn!("Load failed: {}", message);
            app.is_loading = false;
            app.error = Some(message);
            Effect::None
        }
        Action::AddBook(title) => {
            let (books, new_id) = list::insert_book(&app.books, &title);
            match new_id {
                Some(id) => {
                    app.books = books;
                    app.status_message = format!("Added \"{}\"", title.trim());
                    app.selected_id = Some(id);
                    Effect::PersistAll
                }
                None => Effect::None,
            }
        }
        Action::DeleteBook(id) => {
            let books = list::remove_book(&app.books, &id);
            if !commit(app, books) {
                return Effect::None;
            }
            if app.selected_id.as_deref() == Some(id.as_str()) {
                app.selected_id = None;
            }
            app.expanded.remove(&id);
            app.status_message = "Book deleted".to_string();
            Effect::Delete(id)
        }
        Action::TogglePriority(id) => {
            let books = list::toggle_priority(&app.books, &id);
            commit_row(app, &id, books)
        }
        Action::ToggleNext { parent, candidate } => {
            let books = list::set_next_relation(&app.books, &parent, &candidate);
            commit_row(app, &parent, books)
        }
        Action::MoveBook { id, direction } => {
            let books = list::move_book(&app.books, &id, direction);
            if commit(app, books) {
                Effect::PersistAll
            } else {
                Effect::None
            }
        }
        Action::Select(id) => {
            app.selected_id = id;
            Effect::None
        }
        Action::ToggleSelect(id) => {
            if app.selected_id.as_deref() == Some(id.as_str()) {
                app.selected_id = None;
            } else {
                app.selected_id = Some(id);
            }
            Effect::None
        }
        Action::ToggleExpand(id) => {
            if !app.expanded.remove(&id) {
                app.expanded.insert(id);
            }
            Effect::None
        }
        Action::SwitchTab(tab) => {
            app.active_tab = tab;
            app.status_message = tab.label().to_string();
            Effect::None
        }
        Action::NextTab => {
            let tab = app.active_tab.next();
            update(app, Action::SwitchTab(tab))
        }
        Action::UpdateNotes { id, notes } => {
            let books = list::update_notes(&app.books, &id, &notes);
            commit_row(app, &id, books)
        }
        Action::AddLink { id, url } => {
            let books = list::add_link(&app.books, &id, &url);
            commit_row(app, &id, books)
        }
        Action::RemoveLink { id, index } => {
            let books = list::remove_link(&app.books, &id, index);
            commit_row(app, &id, books)
        }
        Action::Saved => {
            debug!("Persistence job finished");
            Effect::None
        }
        Action::SaveFailed(message) => {
            warn!("Save failed: {}", message);
            app.status_message = format!("Save failed: {}", message);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
