//! # Application State
//!
//! Core business state for readnext. Domain data only; presentation state
//! (input buffers, list scroll, pending relation source) lives in `tui`.
//!
//! ```text
//! App
//! ├── books: Vec<Book>              // the ordered list (sole owner)
//! ├── selected_id: Option<String>   // highlighted book
//! ├── expanded: HashSet<String>     // books with the details panel open
//! ├── active_tab: Tab               // HighPriority | All
//! ├── status_message: String        // status bar text
//! ├── error: Option<String>         // fatal load error
//! ├── backend_name: String          // "local" / "remote"
//! └── is_loading: bool              // waiting for the initial list
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::HashSet;

use crate::core::book::Book;
use crate::core::list::high_priority_view;

/// Which slice of the list is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    HighPriority,
    All,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::HighPriority => Tab::All,
            Tab::All => Tab::HighPriority,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::HighPriority => "High priority",
            Tab::All => "All books",
        }
    }

    /// Parse the config spelling (`high-priority` / `all`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "high-priority" | "high" => Some(Tab::HighPriority),
            "all" => Some(Tab::All),
            _ => None,
        }
    }
}

pub struct App {
    pub books: Vec<Book>,
    pub selected_id: Option<String>,
    pub expanded: HashSet<String>,
    pub active_tab: Tab,
    pub status_message: String,
    pub error: Option<String>,
    pub backend_name: String,
    pub is_loading: bool,
}

impl App {
    pub fn new(backend_name: impl Into<String>, active_tab: Tab) -> Self {
        Self {
            books: Vec::new(),
            selected_id: None,
            expanded: HashSet::new(),
            active_tab,
            status_message: String::from("Loading reading list..."),
            error: None,
            backend_name: backend_name.into(),
            is_loading: true,
        }
    }

    /// Books shown under the active tab, in list order.
    pub fn visible_books(&self) -> Vec<Book> {
        match self.active_tab {
            Tab::HighPriority => high_priority_view(&self.books),
            Tab::All => self.books.clone(),
        }
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.selected_id.as_deref().and_then(|id| self.book(id))
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }
}
