use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::ui::{layouts, screens::Screen, theme};

pub fn render_help_popup(f: &mut Frame, screen: &Screen) {
    let (width, height) = layouts::popup_sizes::LARGE;
    let area = layouts::centered_popup(width, height, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help (press ? or Esc to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(theme::accent_border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem> = help_items(screen)
        .into_iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(description),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).style(Style::default().fg(Color::White)), inner);
}

fn help_items(screen: &Screen) -> Vec<(&'static str, &'static str)> {
    let mut items = match screen {
        Screen::Board => vec![
            ("←/h  →/l", "Focus previous / next column"),
            ("↑/k  ↓/j", "Select card"),
            ("H / L", "Move card to previous / next column"),
            ("a", "Archive or restore selected card"),
            ("A", "Show or hide archived cards"),
            ("r", "Reload projects"),
            ("Esc", "Dismiss notification"),
            ("o", "Log out"),
        ],
        Screen::Logs(..) => vec![
            ("↑/k", "Scroll up (older logs)"),
            ("↓/j", "Scroll down (newer logs)"),
            ("Page Up", "Scroll up one page"),
            ("Page Down", "Scroll down one page"),
            ("g then g", "Scroll to oldest logs"),
            ("G", "Scroll to newest logs"),
            ("h/←/Esc", "Back to board"),
        ],
    };

    items.extend([
        ("", ""),
        ("--- Global ---", ""),
        ("g then l", "Go to logs"),
        ("g then g", "Top of list"),
        ("G", "Bottom of list"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ]);

    items
}
