//! # BookList Component
//!
//! The flat list for the active tab, one row per book:
//!
//! ```text
//! ★ Dune                         →2
//!     Children of Dune
//! ★ Neuromancer                  ◆
//! ```
//!
//! Nested books are indented by level. `★` marks high priority, `→n` the
//! number of "read next" entries, `◆` the pending relation source.
//! Titles are truncated by display width so CJK titles don't overflow.

use std::collections::HashSet;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::book::{Book, Priority};
use crate::tui::component::Component;

pub struct BookList<'a> {
    pub books: &'a [Book],
    pub selected_id: Option<&'a str>,
    pub relation_source: Option<&'a str>,
    pub expanded: &'a HashSet<String>,
    pub title: &'a str,
    pub focused: bool,
    /// Scroll/selection state kept across frames
    pub state: &'a mut ListState,
}

/// Cut `text` to at most `max` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl BookList<'_> {
    fn row(&self, book: &Book, width: usize) -> ListItem<'static> {
        let indent = "    ".repeat(book.level as usize);
        let (mark, mark_style) = match book.priority {
            Priority::High => ("★ ", Style::default().fg(Color::Yellow)),
            Priority::Unspecified => ("  ", Style::default()),
        };
        let expander = if self.expanded.contains(&book.id) {
            "▾ "
        } else {
            ""
        };

        let mut suffix = String::new();
        if !book.next_books.is_empty() {
            suffix.push_str(&format!(" →{}", book.next_books.len()));
        }
        if self.relation_source == Some(book.id.as_str()) {
            suffix.push_str(" ◆");
        }

        let fixed = indent.width() + mark.width() + expander.width() + suffix.width();
        let title = truncate_to_width(&book.title, width.saturating_sub(fixed));

        let title_style = if book.is_nested() {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };

        ListItem::new(Line::from(vec![
            Span::raw(indent),
            Span::styled(mark, mark_style),
            Span::raw(expander),
            Span::styled(title, title_style),
            Span::styled(suffix, Style::default().fg(Color::Cyan)),
        ]))
    }
}

impl Component for BookList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title);

        // Highlight symbol takes two columns
        let width = area.width.saturating_sub(2 + 2) as usize;

        if self.books.is_empty() {
            frame.render_widget(
                ratatui::widgets::Paragraph::new("No books yet. Type a title and press Enter.")
                    .block(block)
                    .style(Style::default().add_modifier(Modifier::DIM)),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self.books.iter().map(|b| self.row(b, width)).collect();
        let selected = self
            .selected_id
            .and_then(|id| self.books.iter().position(|b| b.id == id));
        self.state.select(selected);

        let list = List::new(items)
            .block(block)
            .highlight_symbol("> ")
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, area, &mut *self.state);
    }
}
