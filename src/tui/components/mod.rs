//! # TUI Components
//!
//! Stateless components receive everything as props:
//! - `TitleBar`: backend, tab strip and status
//! - `BookList`: the rows of the active tab
//! - `Details`: notes, links and "read next" for one book
//!
//! `InputBox` owns its buffer and emits `InputEvent`s.
//!
//! Each file holds the component's types, rendering, event handling and tests.

mod book_list;
mod details;
pub mod input_box;
mod title_bar;

pub use book_list::BookList;
pub use details::Details;
pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub use title_bar::TitleBar;
