//! Bottom bar: key hints, or the current notification when there is one.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::{Notification, NotificationKind};
use crate::ui::theme;

pub fn render_help_bar(f: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text)
        .style(theme::help_text_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, area);
}

/// Shows `notification` in place of the hints until it is dismissed
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    hints: &str,
    notification: Option<&Notification>,
) {
    let Some(notification) = notification else {
        render_help_bar(f, area, hints);
        return;
    };

    let color = match notification.kind {
        NotificationKind::Success => theme::COLOR_SUCCESS,
        NotificationKind::Error => theme::COLOR_ERROR,
    };
    let text = format!("{}  (Esc to dismiss)", notification.message);
    let bar = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(bar, area);
}
