//! # Details Component
//!
//! Expanded view of one book: notes, numbered links, and the books to read
//! before and after it, resolved through the forest.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::book::Book;
use crate::tui::component::Component;

pub struct Details<'a> {
    pub book: &'a Book,
    /// Books listed in `book.next_books`, already resolved
    pub next: Vec<&'a Book>,
    /// Books whose `next_books` list this one
    pub before: Vec<&'a Book>,
}

impl Details<'_> {
    fn heading(text: &str) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
    }

    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let dim = Style::default().add_modifier(Modifier::DIM);
        let mut lines = vec![Self::heading("Notes")];
        match self.book.notes.as_deref() {
            Some(notes) if width > 0 => {
                lines.extend(
                    textwrap::wrap(notes, width)
                        .into_iter()
                        .map(|l| Line::from(l.into_owned())),
                );
            }
            _ => lines.push(Line::styled("(none)  e: edit", dim)),
        }

        lines.push(Line::default());
        lines.push(Self::heading("Links"));
        if self.book.links().is_empty() {
            lines.push(Line::styled("(none)  l: add", dim));
        }
        for (i, link) in self.book.links().iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), dim),
                Span::styled(link.clone(), Style::default().fg(Color::Blue)),
            ]));
        }

        lines.push(Line::default());
        lines.push(Self::heading("Read next"));
        if self.next.is_empty() {
            lines.push(Line::styled("(none)  r: link books", dim));
        }
        for book in &self.next {
            lines.push(Line::from(format!("→ {}", book.title)));
        }

        if !self.before.is_empty() {
            lines.push(Line::default());
            lines.push(Self::heading("Read before"));
            for book in &self.before {
                lines.push(Line::from(format!("← {}", book.title)));
            }
        }
        lines
    }
}

impl Component for Details<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.book.title.as_str());
        let width = area.width.saturating_sub(2) as usize;
        frame.render_widget(Paragraph::new(self.lines(width)).block(block), area);
    }
}
