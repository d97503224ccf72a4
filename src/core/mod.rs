//! # Core Application Logic
//!
//! This module contains readnext's business logic.
//! It knows nothing about any specific UI technology or storage backend.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Book (data model)    │
//!                    │  • list (List Engine)   │
//!                    │  • forest (hierarchy)   │
//!                    │  • State + Action       │
//!                    │                         │
//!                    │  No UI. No storage.     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    CLI     │      │  Storage   │
//!     │  Adapter   │      │ add / list │      │  backends  │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`book`]: `Book`, `Priority`, and the create/patch shapes
//! - [`list`]: pure list transformations (insert, remove, move, nest, ...)
//! - [`forest`]: the "read next" forest derived for display
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: settings with the defaults → file → env → CLI chain

pub mod action;
pub mod book;
pub mod config;
pub mod forest;
pub mod list;
pub mod state;
