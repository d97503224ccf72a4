//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::action::{Action, update};
use crate::core::book::{Book, BookPatch, NewBook};
use crate::core::state::{App, Tab};
use crate::storage::{BookStore, StoreError};

/// An in-memory store for tests that don't need files or a server.
#[derive(Default)]
pub struct MemoryStore {
    books: Mutex<Vec<Book>>,
    failing: bool,
    next_id: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
            ..Default::default()
        }
    }

    /// Every call fails with a network error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Network("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        self.check()?;
        Ok(self.books.lock().unwrap().clone())
    }

    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        self.check()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let book = book.with_id(format!("mem-{}", *next_id));
        self.books.lock().unwrap().push(book.clone());
        Ok(book)
    }

    async fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>, StoreError> {
        self.check()?;
        let mut books = self.books.lock().unwrap();
        Ok(books.iter_mut().find(|b| b.id == id).map(|book| {
            patch.apply(book);
            book.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.check()?;
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() != before)
    }

    async fn batch_upsert(&self, books: &[Book]) -> Result<Vec<Book>, StoreError> {
        self.check()?;
        let mut stored = self.books.lock().unwrap();
        let mut merged = books.to_vec();
        merged.extend(
            stored
                .drain(..)
                .filter(|old| !books.iter().any(|b| b.id == old.id)),
        );
        *stored = merged;
        Ok(books.to_vec())
    }
}

/// Creates a loaded App on the "All" tab holding `books`.
pub fn test_app(books: Vec<Book>) -> App {
    let mut app = App::new("memory", Tab::All);
    update(&mut app, Action::BooksLoaded(books));
    app
}

/// `Book::new` with a level and `next_books` filled in.
pub fn book(id: &str, level: u8, next: &[&str]) -> Book {
    Book {
        level,
        next_books: next.iter().map(|s| s.to_string()).collect(),
        ..Book::new(id, id.to_uppercase())
    }
}
