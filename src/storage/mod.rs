//! # Storage
//!
//! One capability trait, `BookStore`, with two backends:
//!
//! - [`local::JsonFileStore`]: the whole list in a JSON file
//! - [`remote::RemoteTableStore`]: a hosted REST table keyed by book id
//!
//! Which one is wired in is a deployment choice (`Backend` in the config).
//! The core never calls storage; the TUI and CLI do, after `update()`.

pub mod local;
pub mod remote;
pub mod worker;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::Backend;
use crate::core::book::{Book, BookPatch, NewBook};
use crate::core::config::ResolvedConfig;

pub use local::JsonFileStore;
pub use remote::RemoteTableStore;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StoreError {
    /// Store misconfigured (missing URL or key). Not retryable.
    Config(String),
    /// Local file failure.
    Io(std::io::Error),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Server returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse stored or returned data.
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Config(msg) => write!(f, "config error: {msg}"),
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// Every stored book, in list order.
    async fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    /// Store a new book; the store assigns its id.
    async fn create(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Apply `patch` to the book with `id`. `Ok(None)` when no such book.
    async fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>, StoreError>;

    /// Delete the book with `id`. `Ok(false)` when no such book.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Insert or replace every book, keyed by id, recording list order.
    async fn batch_upsert(&self, books: &[Book]) -> Result<Vec<Book>, StoreError>;
}

/// Best-effort batch write: on failure the input comes back unchanged so the
/// caller keeps its in-memory state and can retry later.
pub async fn upsert_or_keep(store: &dyn BookStore, books: Vec<Book>) -> Vec<Book> {
    match store.batch_upsert(&books).await {
        Ok(saved) => saved,
        Err(e) => {
            warn!("Batch upsert to {} failed: {}", store.name(), e);
            books
        }
    }
}

/// Build the configured store.
pub fn build_store(config: &ResolvedConfig) -> Result<Arc<dyn BookStore>, StoreError> {
    match config.backend {
        Backend::Local => Ok(Arc::new(JsonFileStore::new(config.data_file.clone()))),
        Backend::Remote => {
            let url = config.remote_url.clone().ok_or_else(|| {
                StoreError::Config(
                    "remote backend needs a URL (config [remote].url or SUPABASE_URL)".to_string(),
                )
            })?;
            let api_key = config.remote_api_key.clone().ok_or_else(|| {
                StoreError::Config(
                    "remote backend needs an API key (config [remote].api_key or SUPABASE_ANON_KEY)"
                        .to_string(),
                )
            })?;
            Ok(Arc::new(RemoteTableStore::new(
                url,
                api_key,
                config.remote_table.clone(),
            )))
        }
    }
}
