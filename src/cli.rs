//! Non-interactive commands (`readnext add`, `readnext list`).
//!
//! Both talk to the store directly and print plain text; the List Engine
//! still decides level and priority so a book added here looks the same as
//! one added in the TUI.

use log::info;

use crate::core::book::{Book, NewBook, Priority};
use crate::core::forest::build_forest;
use crate::core::list::{high_priority_view, insert_book, normalize_levels};
use crate::storage::{BookStore, StoreError};

/// Append a book titled `title`. `Ok(None)` for a blank title.
pub async fn add(store: &dyn BookStore, title: &str) -> Result<Option<Book>, StoreError> {
    let books = normalize_levels(store.list_all().await?);
    // The draft id is discarded; the store assigns the real one.
    let (appended, id) = insert_book(&books, title);
    if id.is_none() {
        return Ok(None);
    }
    let Some(draft) = appended.last().cloned() else {
        return Ok(None);
    };

    let created = store.create(NewBook::from(draft)).await?;
    info!("Added \"{}\" as {}", created.title, created.id);
    Ok(Some(created))
}

/// Print-ready listing: the high-priority view, or every book with `all`.
pub async fn list(store: &dyn BookStore, all: bool) -> Result<String, StoreError> {
    let books = normalize_levels(store.list_all().await?);
    Ok(render_listing(&books, all))
}

pub fn render_listing(books: &[Book], all: bool) -> String {
    let shown = if all {
        books.to_vec()
    } else {
        high_priority_view(books)
    };
    if shown.is_empty() {
        return "No books.\n".to_string();
    }

    // Relations resolve against the whole list, not just the filtered view.
    let forest = build_forest(books);
    let mut out = String::new();
    for book in &shown {
        let indent = "  ".repeat(book.level as usize);
        let mark = match book.priority {
            Priority::High => '*',
            Priority::Unspecified => '-',
        };
        out.push_str(&format!("{indent}{mark} {}\n", book.title));

        let next: Vec<&str> = forest
            .children(&book.id)
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        if !next.is_empty() {
            out.push_str(&format!("{indent}    next: {}\n", next.join(", ")));
        }
    }
    out
}
