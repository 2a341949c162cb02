//! Screen title with loading indicator.

use ratatui::prelude::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::LoadingState;
use crate::ui::{layouts, theme};

use super::loading_indicator;

pub fn render_screen_title(f: &mut Frame, area: Rect, title: &str, loading_state: &LoadingState) {
    let (title_area, indicator_area) = layouts::title_with_loading(area);

    f.render_widget(Paragraph::new(title).style(theme::title_style()), title_area);
    loading_indicator::render_loading_indicator(f, indicator_area, loading_state);
}
