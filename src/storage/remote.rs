//! Remote table store speaking the PostgREST dialect (as exposed by Supabase).
//!
//! Rows live in one table (default `books`) with snake_case columns:
//!
//! ```text
//! id | title | priority | next_books | level | notes | links | position | created_at | updated_at
//! ```
//!
//! `position` records the list index on every batch write so the flat order
//! survives a round trip. Rows created one at a time have no position yet and
//! sort after positioned rows by `created_at`.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::core::book::{Book, BookPatch, NewBook, Priority};
use crate::storage::{BookStore, StoreError};

const LIST_ORDER: &str = "position.asc.nullslast,created_at.asc";

// ============================================================================
// Row Types
// ============================================================================

/// A row as returned by the table.
#[derive(Deserialize, Debug)]
struct BookRow {
    id: String,
    title: String,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    next_books: Option<Vec<String>>,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    links: Option<Vec<String>>,
    #[serde(default)]
    position: Option<i64>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            priority: row.priority.unwrap_or_default(),
            next_books: row.next_books.unwrap_or_default(),
            level: row.level.unwrap_or(0),
            notes: row.notes.filter(|n| !n.is_empty()),
            links: row.links.filter(|l| !l.is_empty()),
        }
    }
}

/// Rows in list order. The sort is stable, so unpositioned rows keep the
/// server's `created_at` order after the positioned ones.
fn into_books(mut rows: Vec<BookRow>) -> Vec<Book> {
    rows.sort_by_key(|r| r.position.unwrap_or(i64::MAX));
    rows.into_iter().map(Book::from).collect()
}

/// A row body for insert/update/upsert. Absent fields are left out of the
/// JSON; `Some(None)` writes an explicit null.
#[derive(Serialize, Debug, Default)]
struct RowBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_books: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<Option<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

impl RowBody {
    fn from_new(book: NewBook) -> Self {
        Self {
            title: Some(book.title),
            priority: Some(book.priority),
            next_books: Some(book.next_books),
            level: Some(book.level),
            notes: Some(book.notes),
            links: Some(book.links),
            ..Default::default()
        }
    }

    fn from_patch(patch: BookPatch) -> Self {
        Self {
            title: patch.title,
            priority: patch.priority,
            next_books: patch.next_books,
            level: patch.level,
            notes: patch.notes,
            links: patch.links,
            updated_at: Some(Utc::now().to_rfc3339()),
            ..Default::default()
        }
    }

    fn from_book(book: &Book, position: usize) -> Self {
        Self {
            id: Some(book.id.clone()),
            title: Some(book.title.clone()),
            priority: Some(book.priority),
            next_books: Some(book.next_books.clone()),
            level: Some(book.level),
            notes: Some(book.notes.clone()),
            links: Some(book.links.clone()),
            position: Some(position as i64),
            updated_at: Some(Utc::now().to_rfc3339()),
        }
    }
}

// ============================================================================
// Store Implementation
// ============================================================================

pub struct RemoteTableStore {
    base_url: String,
    api_key: String,
    table: String,
    client: reqwest::Client,
}

impl RemoteTableStore {
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn headers(&self, prefer: &'static str) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| StoreError::Config(format!("invalid API key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| StoreError::Config(format!("invalid API key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert("Prefer", HeaderValue::from_static(prefer));
        Ok(headers)
    }

    /// Send a request and decode the returned rows.
    async fn rows(&self, request: reqwest::RequestBuilder) -> Result<Vec<BookRow>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        debug!("Remote store response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Remote store error: {} - {}", status, message);
            return Err(StoreError::Api { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Parse(e.to_string()))
    }
}

#[async_trait]
impl BookStore for RemoteTableStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let request = self
            .client
            .get(self.table_url())
            .headers(self.headers("count=none")?)
            .query(&[("select", "*"), ("order", LIST_ORDER)]);
        let rows = self.rows(request).await?;
        info!("Fetched {} rows from {}", rows.len(), self.table);
        Ok(into_books(rows))
    }

    async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let request = self
            .client
            .post(self.table_url())
            .headers(self.headers("return=representation")?)
            .json(&[RowBody::from_new(book)]);
        let row = self
            .rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Parse("insert returned no row".to_string()))?;
        info!("Created remote book {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: &str, patch: BookPatch) -> Result<Option<Book>, StoreError> {
        let request = self
            .client
            .patch(self.table_url())
            .headers(self.headers("return=representation")?)
            .query(&[("id", format!("eq.{id}"))])
            .json(&RowBody::from_patch(patch));
        Ok(self.rows(request).await?.into_iter().next().map(Book::from))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let request = self
            .client
            .delete(self.table_url())
            .headers(self.headers("return=representation")?)
            .query(&[("id", format!("eq.{id}"))]);
        Ok(!self.rows(request).await?.is_empty())
    }

    async fn batch_upsert(&self, books: &[Book]) -> Result<Vec<Book>, StoreError> {
        if books.is_empty() {
            return Ok(Vec::new());
        }
        let body: Vec<RowBody> = books
            .iter()
            .enumerate()
            .map(|(i, b)| RowBody::from_book(b, i))
            .collect();
        let request = self
            .client
            .post(self.table_url())
            .headers(self.headers("resolution=merge-duplicates,return=representation")?)
            .query(&[("on_conflict", "id")])
            .json(&body);
        let rows = self.rows(request).await?;
        debug!("Upserted {} rows", rows.len());
        Ok(into_books(rows))
    }
}
