use folio_api::endpoints::{Project, ProjectStatus};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::state::AppState;
use crate::ui::{
    components::{empty_state, help_bar, screen_title},
    layouts, theme,
};

const HELP_TEXT: &str = "h/l: column | j/k: card | H/L: move | a: archive | r: reload | ?: help";

pub fn render(f: &mut Frame, state: &AppState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    screen_title::render_screen_title(f, title_area, &title(state), &state.board.loading);
    render_board(f, content_area, state);
    help_bar::render_status_bar(f, help_area, HELP_TEXT, state.notification.as_ref());
}

fn title(state: &AppState) -> String {
    let mut title = String::from("Projects");
    if let Some(name) = &state.user_name {
        title.push_str(&format!(" - {}", name));
    }
    if state.board.show_archived {
        title.push_str(" (showing archived)");
    }
    if !state.pending_moves.is_empty() {
        title.push_str(&format!(" [{} saving]", state.pending_moves.len()));
    }
    title
}

fn render_board(f: &mut Frame, area: Rect, state: &AppState) {
    if state.board.projects.is_empty() {
        empty_state::render_empty_board(f, area, &state.board.loading);
        return;
    }

    let columns = layouts::board_columns(area, ProjectStatus::ALL.len());
    for (status, column_area) in ProjectStatus::ALL.into_iter().zip(columns.iter()) {
        render_column(f, *column_area, state, status);
    }
}

fn render_column(f: &mut Frame, area: Rect, state: &AppState, status: ProjectStatus) {
    let focused = state.board.focused_status() == status;
    let cards = state.board.column(status);

    let items: Vec<ListItem> = cards.iter().map(|p| card(state, p)).collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::column_border_style(status, focused))
        .title(format!(" {} ({}) ", status.display_name(), cards.len()));

    let mut list = List::new(items).block(block);
    let mut list_state = ListState::default();
    if focused {
        list = list.highlight_style(theme::selection_style());
        list_state.select(Some(state.board.selected_row(status)));
    }

    f.render_stateful_widget(list, area, &mut list_state);
}

fn card<'a>(state: &AppState, project: &'a Project) -> ListItem<'a> {
    let mut spans = vec![Span::raw(project.title.as_str())];
    if state.has_pending_move(project.id) {
        spans.push(Span::styled(" …", theme::loading_style()));
    }
    let line = Line::from(spans);

    if project.archived {
        ListItem::new(line).style(theme::muted_style())
    } else {
        ListItem::new(line)
    }
}
