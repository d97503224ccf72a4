//! # JSON File Store
//!
//! The whole list lives in one JSON array (default `~/.readnext/books.json`),
//! in list order, using the camelCase field names of `Book`.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.
//! A mutex serializes read-modify-write cycles within the process.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use tokio::fs;
use tokio::sync::Mutex;

use crate::core::book::{Book, BookPatch, NewBook};
use crate::storage::{BookStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means an empty list.
    async fn read(&self) -> Result<Vec<Book>, StoreError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&json).map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Atomically write `books` as JSON (via `.tmp` + rename).
    async fn write(&self, books: &[Book]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(books)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;
        debug!("Wrote {} books to {}", books.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl BookStore for JsonFileStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let _guard = self.lock.lock().await;
        let mut books = self.read().await?;
        let book = book.with_id(uuid::Uuid::new_v4().to_string());
        books.push(book.clone());
        self.write(&books).await?;
        info!("Created book {} in {}", book.id, self.path.display());
        Ok(book)
    }

    async fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut books = self.read().await?;
        let Some(book) = books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        patch.apply(book);
        let updated = book.clone();
        self.write(&books).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut books = self.read().await?;
        let before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == before {
            return Ok(false);
        }
        self.write(&books).await?;
        Ok(true)
    }

    /// Rows named in `books` take the given order; stored rows not named
    /// keep their relative order after them.
    async fn batch_upsert(&self, books: &[Book]) -> Result<Vec<Book>, StoreError> {
        let _guard = self.lock.lock().await;
        let stored = self.read().await?;
        let mut merged = books.to_vec();
        merged.extend(
            stored
                .into_iter()
                .filter(|old| !books.iter().any(|b| b.id == old.id)),
        );
        self.write(&merged).await?;
        Ok(books.to_vec())
    }
}
