//! # Book Records
//!
//! The data model shared by every layer: a `Book` is one reading-list entry.
//!
//! ```text
//! Book
//! ├── id: String              // opaque, unique for the session
//! ├── title: String
//! ├── priority: Priority      // High | Unspecified
//! ├── next_books: Vec<String> // "read next" ids, doubles as child list
//! ├── level: u8               // 0 = top-level, 1 = nested (capped)
//! ├── notes: Option<String>
//! └── links: Option<Vec<String>>
//! ```
//!
//! The flat `Vec<Book>` order is significant: nesting is encoded by position
//! plus `level`, and a parent's `next_books` is the authoritative child list.

use serde::{Deserialize, Serialize};

/// Deepest nesting level a book can have.
pub const MAX_LEVEL: u8 = 1;

/// Priority flag. Serialized with the values the original table stores.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    #[default]
    #[serde(rename = "高", alias = "high")]
    High,
    #[serde(rename = "未指定", alias = "unspecified")]
    Unspecified,
}

impl Priority {
    pub fn toggled(self) -> Self {
        match self {
            Priority::High => Priority::Unspecified,
            Priority::Unspecified => Priority::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Unspecified => "unspecified",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub next_books: Vec<String>,
    #[serde(default)]
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
}

impl Book {
    /// A fresh top-level, high-priority book with no relations.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: Priority::High,
            next_books: Vec::new(),
            level: 0,
            notes: None,
            links: None,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.level > 0
    }

    pub fn links(&self) -> &[String] {
        self.links.as_deref().unwrap_or_default()
    }
}

/// A book as handed to `BookStore::create`, before the store assigns an id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub priority: Priority,
    pub next_books: Vec<String>,
    pub level: u8,
    pub notes: Option<String>,
    pub links: Option<Vec<String>>,
}

impl From<Book> for NewBook {
    fn from(book: Book) -> Self {
        Self {
            title: book.title,
            priority: book.priority,
            next_books: book.next_books,
            level: book.level,
            notes: book.notes,
            links: book.links,
        }
    }
}

impl NewBook {
    pub fn with_id(self, id: String) -> Book {
        Book {
            id,
            title: self.title,
            priority: self.priority,
            next_books: self.next_books,
            level: self.level,
            notes: self.notes,
            links: self.links,
        }
    }
}

/// Partial update for a single book. `None` fields are left untouched.
///
/// `notes` and `links` are doubly optional: `Some(None)` clears the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub next_books: Option<Vec<String>>,
    pub level: Option<u8>,
    pub notes: Option<Option<String>>,
    pub links: Option<Option<Vec<String>>>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patch carrying every mutable field of `book`.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            priority: Some(book.priority),
            next_books: Some(book.next_books.clone()),
            level: Some(book.level),
            notes: Some(book.notes.clone()),
            links: Some(book.links.clone()),
        }
    }

    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(priority) = self.priority {
            book.priority = priority;
        }
        if let Some(next_books) = &self.next_books {
            book.next_books = next_books.clone();
        }
        if let Some(level) = self.level {
            book.level = level;
        }
        if let Some(notes) = &self.notes {
            book.notes = notes.clone();
        }
        if let Some(links) = &self.links {
            book.links = links.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serializes_as_table_values() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"高\"");
        assert_eq!(
            serde_json::to_string(&Priority::Unspecified).unwrap(),
            "\"未指定\""
        );
    }

    #[test]
    fn test_priority_accepts_english_aliases() {
        let p: Priority = serde_json::from_str("\"unspecified\"").unwrap();
        assert_eq!(p, Priority::Unspecified);
        let p: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn test_book_json_uses_camel_case_and_defaults() {
        let json = r#"{"id":"1","title":"Dune","priority":"高","nextBooks":["2"]}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.next_books, vec!["2".to_string()]);
        assert_eq!(book.level, 0);
        assert!(book.notes.is_none());

        let out = serde_json::to_string(&book).unwrap();
        assert!(out.contains("\"nextBooks\""));
        assert!(!out.contains("notes"));
    }

    #[test]
    fn test_patch_clears_notes() {
        let mut book = Book::new("1", "Dune");
        book.notes = Some("spice".to_string());
        let patch = BookPatch {
            notes: Some(None),
            ..Default::default()
        };
        patch.apply(&mut book);
        assert!(book.notes.is_none());
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn test_patch_from_book_is_complete() {
        let mut book = Book::new("1", "Dune");
        book.level = 1;
        book.priority = Priority::Unspecified;
        let patch = BookPatch::from_book(&book);
        let mut target = Book::new("1", "other");
        patch.apply(&mut target);
        assert_eq!(target, book);
        assert!(BookPatch::default().is_empty());
    }
}
