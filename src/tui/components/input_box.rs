//! # InputBox Component
//!
//! One-line text field used for new titles, notes and links. The buffer and
//! cursor are internal state; the title and focus flag are props.
//!
//! Text wider than the box scrolls horizontally so the cursor stays visible.
//! Widths are measured in terminal columns (`unicode-width`), the cursor is a
//! byte offset kept on a char boundary.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border columns on each side of the text.
const BORDER_OFFSET: u16 = 1;
/// Height of the bordered box.
pub const INPUT_HEIGHT: u16 = 3;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed; the buffer is cleared.
    Submit(String),
    /// Esc pressed; the buffer is kept.
    Cancel,
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Border title (Prop)
    pub title: String,
    /// Whether keystrokes currently go here (Prop)
    pub focused: bool,
    cursor: usize,
    /// First visible display column
    scroll: usize,
}

impl InputBox {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            title: title.into(),
            focused: true,
            cursor: 0,
            scroll: 0,
        }
    }

    /// Replace the buffer and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].width()
    }

    /// Keep the cursor inside a window `inner` columns wide.
    fn update_scroll(&mut self, inner: usize) {
        if inner == 0 {
            return;
        }
        let col = self.cursor_column();
        if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll + inner {
            self.scroll = col + 1 - inner;
        }
    }

    fn visible_text(&self, inner: usize) -> String {
        let mut out = String::new();
        let mut col = 0;
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0);
            if col >= self.scroll {
                if col + w > self.scroll + inner {
                    break;
                }
                out.push(c);
            }
            col += w;
        }
        out
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner = area.width.saturating_sub(BORDER_OFFSET * 2) as usize;
        self.update_scroll(inner);

        let style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(self.title.as_str());
        frame.render_widget(
            Paragraph::new(self.visible_text(inner))
                .block(block)
                .style(style),
            area,
        );

        if self.focused {
            let x = area.x + BORDER_OFFSET + (self.cursor_column() - self.scroll) as u16;
            frame.set_cursor_position((x, area.y + BORDER_OFFSET));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: pasted newlines become spaces
                let text = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                }
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll = 0;
                Some(InputEvent::Submit(text))
            }
            TuiEvent::Escape => Some(InputEvent::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(input: &mut InputBox, s: &str) {
        for c in s.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut input = InputBox::new("New book");
        type_str(&mut input, "Dune");
        assert_eq!(input.buffer, "Dune");

        let event = input.handle_event(&TuiEvent::Submit);
        assert_eq!(event, Some(InputEvent::Submit("Dune".to_string())));
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut input = InputBox::new("New book");
        type_str(&mut input, "本を読む");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "本をむ");
        input.handle_event(&TuiEvent::Home);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "をむ");
    }

    #[test]
    fn test_backspace_at_start_is_ignored() {
        let mut input = InputBox::new("New book");
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = InputBox::new("Notes");
        input.handle_event(&TuiEvent::Paste("a\nb".to_string()));
        assert_eq!(input.buffer, "a b");
    }

    #[test]
    fn test_escape_cancels_and_keeps_text() {
        let mut input = InputBox::new("Link");
        input.set_text("https://");
        assert_eq!(input.handle_event(&TuiEvent::Escape), Some(InputEvent::Cancel));
        assert_eq!(input.buffer, "https://");
    }

    #[test]
    fn test_long_text_scrolls_to_cursor() {
        let backend = TestBackend::new(12, INPUT_HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new("T");
        input.set_text("abcdefghijklmnop");
        terminal
            .draw(|f| {
                input.render(f, f.area());
            })
            .unwrap();

        let row: String = (0..12u16)
            .map(|x| terminal.backend().buffer()[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.contains("hijklmnop"));
        assert!(!row.contains("abc"));
    }
}
