//! # Persistence Worker
//!
//! A single background task that owns the store handle and runs jobs one at
//! a time, in the order the event loop queued them. Outcomes flow back into
//! the event loop as `Action::Saved` / `Action::SaveFailed`.
//!
//! ```text
//! event loop ──PersistJob──▶ worker ──▶ BookStore
//!      ▲                       │
//!      └──────Action───────────┘
//! ```
//!
//! Jobs carry a snapshot of the list, so a slow store never blocks input and
//! the in-memory list stays authoritative.

use std::sync::{Arc, mpsc};

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::core::action::Action;
use crate::core::book::{Book, BookPatch};
use crate::storage::{BookStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum PersistJob {
    /// Write the whole list in order.
    UpsertAll(Vec<Book>),
    /// Delete one row, then write the remaining list (its references purged).
    Delete { id: String, books: Vec<Book> },
    /// Apply a single-row patch.
    Update { id: String, patch: BookPatch },
}

impl PersistJob {
    fn label(&self) -> &'static str {
        match self {
            PersistJob::UpsertAll(_) => "upsert",
            PersistJob::Delete { .. } => "delete",
            PersistJob::Update { .. } => "update",
        }
    }
}

async fn run_job(store: &dyn BookStore, job: PersistJob) -> Result<(), StoreError> {
    match job {
        PersistJob::UpsertAll(books) => {
            store.batch_upsert(&books).await?;
        }
        PersistJob::Delete { id, books } => {
            if !store.delete(&id).await? {
                debug!("Delete of {} matched no stored row", id);
            }
            store.batch_upsert(&books).await?;
        }
        PersistJob::Update { id, patch } => {
            if store.update(&id, patch).await?.is_none() {
                warn!("Update of {} matched no stored row", id);
            }
        }
    }
    Ok(())
}

/// Spawn the worker. Dropping the returned sender lets the worker drain its
/// queue and exit; await the handle to wait for that.
pub fn spawn_persist_worker(
    store: Arc<dyn BookStore>,
    tx: mpsc::Sender<Action>,
) -> (UnboundedSender<PersistJob>, JoinHandle<()>) {
    let (job_tx, mut job_rx) = unbounded_channel::<PersistJob>();

    let handle = tokio::spawn(async move {
        info!("Persistence worker started ({})", store.name());
        let mut completed = 0usize;
        while let Some(job) = job_rx.recv().await {
            let label = job.label();
            let action = match run_job(store.as_ref(), job).await {
                Ok(()) => {
                    completed += 1;
                    debug!("Persist job '{}' done", label);
                    Action::Saved
                }
                Err(e) => {
                    warn!("Persist job '{}' failed: {}", label, e);
                    Action::SaveFailed(e.to_string())
                }
            };
            if tx.send(action).is_err() {
                debug!("Persist result dropped: receiver gone");
            }
        }
        info!("Persistence worker stopped after {} jobs", completed);
    });

    (job_tx, handle)
}

/// Fetch the initial list in the background.
pub fn spawn_load(store: Arc<dyn BookStore>, tx: mpsc::Sender<Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = match store.list_all().await {
            Ok(books) => Action::BooksLoaded(books),
            Err(e) => {
                warn!("Initial load from {} failed: {}", store.name(), e);
                Action::LoadFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver initial load: receiver dropped");
        }
    })
}
