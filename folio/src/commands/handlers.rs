use crate::events::AppCommand;
use crate::input::{Key, KeyEvent};
use crate::state::AppState;
use crate::ui::screens::Screen;
use folio_api::endpoints::ProjectStatus;

/// Map user input (KeyEvent) to AppCommand based on current UI state
/// Returns None if the key should be ignored
pub fn handle_key_input(event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = event.key;

    if event.is_interrupt() {
        return Some(AppCommand::Quit);
    }

    // Help popup swallows everything else
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    // Handle multi-key sequences
    if let Some(pending) = state.pending_key {
        return match (pending, key) {
            ('g', Key::Char('g')) => Some(AppCommand::NavigateToTop),
            ('g', Key::Char('l')) => Some(AppCommand::NavigateToLogs),
            // Any other key clears the pending key
            _ => Some(AppCommand::ClearPendingKey),
        };
    }

    match (state.current_screen(), key) {
        (_, Key::Char('?')) => Some(AppCommand::ToggleHelp),
        (_, Key::Char('q')) => Some(AppCommand::Quit),
        (_, Key::Char('g')) => Some(AppCommand::SetPendingKey('g')),
        (_, Key::Char('G')) => Some(AppCommand::NavigateToBottom),

        // Logs screen
        (Screen::Logs(_), Key::Esc | Key::Left | Key::Char('h')) => Some(AppCommand::NavigateBack),
        (Screen::Logs(_), Key::Up | Key::Char('k')) => Some(AppCommand::ScrollLogsUp),
        (Screen::Logs(_), Key::Down | Key::Char('j')) => Some(AppCommand::ScrollLogsDown),
        (Screen::Logs(_), Key::PageUp) => Some(AppCommand::ScrollLogsPageUp),
        (Screen::Logs(_), Key::PageDown) => Some(AppCommand::ScrollLogsPageDown),

        // Board
        (Screen::Board, Key::Esc) => state
            .notification
            .as_ref()
            .map(|_| AppCommand::DismissNotification),
        (Screen::Board, Key::Left | Key::Char('h')) => Some(AppCommand::FocusPreviousColumn),
        (Screen::Board, Key::Right | Key::Char('l')) => Some(AppCommand::FocusNextColumn),
        (Screen::Board, Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Board, Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),
        (Screen::Board, Key::Char('H')) => move_selected(state, ProjectStatus::previous),
        (Screen::Board, Key::Char('L')) => move_selected(state, ProjectStatus::next),
        (Screen::Board, Key::Char('a')) => {
            state
                .board
                .selected_project()
                .map(|project| AppCommand::SetProjectArchived {
                    project_id: project.id,
                    archived: !project.archived,
                })
        }
        (Screen::Board, Key::Char('A')) => Some(AppCommand::ToggleShowArchived),
        (Screen::Board, Key::Char('r')) => Some(AppCommand::LoadProjects),
        (Screen::Board, Key::Char('o')) => Some(AppCommand::Logout),

        _ => None,
    }
}

/// Move the selected card to the end of the neighbouring column
fn move_selected(
    state: &AppState,
    neighbour: fn(&ProjectStatus) -> Option<ProjectStatus>,
) -> Option<AppCommand> {
    let project = state.board.selected_project()?;
    let to_status = neighbour(&project.status)?;

    Some(AppCommand::MoveProject {
        project_id: project.id,
        from_status: project.status,
        to_status,
        from_index: state.board.selected_row(project.status),
        to_index: state.board.column(to_status).len(),
    })
}
