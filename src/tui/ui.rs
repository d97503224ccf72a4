use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::forest::build_forest;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{BookList, Details, INPUT_HEIGHT, TitleBar};
use crate::tui::{InputMode, TuiState};

/// Screen layout:
///
/// ```text
/// ┌ title bar (1) ───────────────────────────┐
/// │ book list          │ details (if open)   │
/// ├ key hints (1) ───────────────────────────┤
/// └ input box (3) ───────────────────────────┘
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1), Length(INPUT_HEIGHT)]);
    let [title_area, main_area, hint_area, input_area] = layout.areas(frame.area());

    TitleBar::new(
        app.backend_name.clone(),
        app.active_tab,
        app.status_message.clone(),
    )
    .render(frame, title_area);

    if let Some(error_msg) = &app.error {
        draw_error_view(frame, main_area, error_msg);
    } else {
        draw_main_area(frame, main_area, app, tui);
    }

    frame.render_widget(
        Paragraph::new(hint_line(app, tui)).style(Style::default().add_modifier(Modifier::DIM)),
        hint_area,
    );

    tui.input_box.title = input_title(app, &tui.mode);
    tui.input_box.focused = tui.mode != InputMode::List;
    tui.input_box.render(frame, input_area);
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(error_msg)
        .block(Block::bordered().title("ERROR"))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

fn draw_main_area(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let visible = app.visible_books();
    let open = app
        .selected_book()
        .filter(|b| app.is_expanded(&b.id) && visible.iter().any(|v| v.id == b.id));

    let (list_area, details_area) = match open {
        Some(_) => {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(area);
            (left, Some(right))
        }
        None => (area, None),
    };

    let list_title = format!("{} ({})", app.active_tab.label(), visible.len());
    BookList {
        books: &visible,
        selected_id: app.selected_id.as_deref(),
        relation_source: tui.relation_source.as_deref(),
        expanded: &app.expanded,
        title: &list_title,
        focused: tui.mode == InputMode::List,
        state: &mut tui.list_state,
    }
    .render(frame, list_area);

    if let (Some(book), Some(details_area)) = (open, details_area) {
        let forest = build_forest(&app.books);
        Details {
            book,
            next: forest.children(&book.id),
            before: forest.parents(&book.id),
        }
        .render(frame, details_area);
    }
}

fn input_title(app: &App, mode: &InputMode) -> String {
    let title_of = |id: &str| {
        app.book(id)
            .map(|b| b.title.clone())
            .unwrap_or_default()
    };
    match mode {
        InputMode::Input | InputMode::List => "New book".to_string(),
        InputMode::Notes(id) => format!("Notes for {}", title_of(id)),
        InputMode::Link(id) => format!("Add link to {}", title_of(id)),
    }
}

fn hint_line(app: &App, tui: &TuiState) -> Line<'static> {
    if app.is_loading {
        return Line::from("Loading...");
    }
    if tui.pending_delete.is_some() {
        return Line::from("Press d again to delete, any other key to cancel");
    }
    if let Some(source) = tui.relation_source.as_deref() {
        let title = app.book(source).map(|b| b.title.as_str()).unwrap_or("?");
        return Line::from(format!(
            "Linking from \"{title}\": select a book and press r (Esc cancels)"
        ));
    }
    let text = match tui.mode {
        InputMode::Input => "Enter: add  Esc: list  Tab: switch tab  Ctrl+C: quit",
        InputMode::List => {
            "↑↓: select  Alt+←↑↓→: move  p: priority  Space: details  r: read next  e: notes  l/x: links  d: delete  i: add  q: quit"
        }
        InputMode::Notes(_) | InputMode::Link(_) => "Enter: save  Esc: cancel",
    };
    Line::from(text)
}
