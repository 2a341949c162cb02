//! Placeholder for a board with no cards to show.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::LoadingState;
use crate::ui::theme;

pub fn render_empty_board(f: &mut Frame, area: Rect, loading: &LoadingState) {
    let (message, style) = match loading {
        LoadingState::NotStarted | LoadingState::Loading(_) => {
            ("Loading projects...", theme::loading_style())
        }
        LoadingState::Loaded => ("No projects yet", theme::muted_style()),
        LoadingState::Error(error) => (error.as_str(), Style::default().fg(theme::COLOR_ERROR)),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, style)),
        Line::from(""),
        Line::from(Span::styled("Press r to reload", theme::help_text_style())),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Projects "));

    f.render_widget(paragraph, area);
}
