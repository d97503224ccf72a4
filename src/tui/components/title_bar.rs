//! # TitleBar Component
//!
//! Top line: backend, tab strip, and the current status message.
//!
//! ```text
//! readnext (local) | [High priority]  All books | 3 books
//! ```
//!
//! Stateless: every field is a prop copied from `App` before rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::Tab;
use crate::tui::component::Component;

pub struct TitleBar {
    pub backend_name: String,
    pub active_tab: Tab,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(backend_name: String, active_tab: Tab, status_message: String) -> Self {
        Self {
            backend_name,
            active_tab,
            status_message,
        }
    }

    fn tab_span(&self, tab: Tab) -> Span<'static> {
        if tab == self.active_tab {
            Span::styled(
                format!("[{}]", tab.label()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                format!(" {} ", tab.label()),
                Style::default().add_modifier(Modifier::DIM),
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("readnext", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" ({}) | ", self.backend_name)),
            self.tab_span(Tab::HighPriority),
            Span::raw(" "),
            self.tab_span(Tab::All),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
