use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::events::AppCommand;
use crate::state::*;
use crate::ui::screens::Screen;
use folio_api::endpoints::{ProjectId, ProjectStatus};
use throbber_widgets_tui::ThrobberState;

const LOGS_PAGE: usize = 20;

/// Execute a command, spawning background tasks for anything that talks to the server
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    match command {
        AppCommand::LoadProjects => {
            state.board.loading = LoadingState::Loading(ThrobberState::default());
            let loader = data_loader.clone();
            task_manager.spawn_load_task("projects".to_string(), async move {
                loader.load_projects().await;
            });
        }

        AppCommand::MoveProject {
            project_id,
            from_status,
            to_status,
            from_index,
            to_index,
        } => {
            if let Some(pending) =
                apply_move(state, project_id, from_status, to_status, from_index, to_index)
            {
                // Never cancelled by a later move
                let loader = data_loader.clone();
                task_manager.spawn_write_task("move", async move {
                    loader.move_project(pending).await;
                });
            }
        }

        AppCommand::SetProjectArchived {
            project_id,
            archived,
        } => {
            if let Some(original) = apply_archived(state, project_id, archived) {
                let loader = data_loader.clone();
                task_manager.spawn_write_task("archive", async move {
                    loader.set_archived(project_id, archived, original).await;
                });
            }
        }

        AppCommand::Logout => {
            tracing::info!("Logging out");
            let loader = data_loader.clone();
            task_manager.spawn_write_task("logout", async move {
                loader.logout().await;
            });
        }

        command => {
            execute_command_sync(command, state);
            return;
        }
    }

    state.pending_key = None;
}

/// Synchronous command execution for testing (no background tasks)
///
/// Handles every pure state transition, including the optimistic half of
/// moves and archive toggles. Commands that only exist to reach the server
/// are skipped; tests inject the matching DataEvents instead.
///
/// NOTE: This is public for use by the testing module but should not be used in production code.
pub fn execute_command_sync(command: AppCommand, state: &mut AppState) {
    let is_setting_pending_key = matches!(command, AppCommand::SetPendingKey(_));

    match command {
        // Simple state updates
        AppCommand::Quit => state.exit(ExitReason::Quit),
        AppCommand::ToggleHelp => state.help_visible = !state.help_visible,
        AppCommand::DismissNotification => state.notification = None,
        AppCommand::SetPendingKey(c) => state.pending_key = Some(c),
        AppCommand::ClearPendingKey => state.pending_key = None,
        AppCommand::ToggleShowArchived => state.board.toggle_show_archived(),

        // Board navigation
        AppCommand::SelectNext => state.board.select_next(),
        AppCommand::SelectPrevious => state.board.select_prev(),
        AppCommand::FocusNextColumn => state.board.focus_next_column(),
        AppCommand::FocusPreviousColumn => state.board.focus_previous_column(),

        AppCommand::NavigateBack => {
            state.navigate_back();
        }
        AppCommand::NavigateToTop => match state.logs_state_mut() {
            Some(logs) => logs.scroll_offset = logs.total_entries.saturating_sub(1),
            None => state.board.select_first(),
        },
        AppCommand::NavigateToBottom => match state.logs_state_mut() {
            Some(logs) => logs.scroll_offset = 0,
            None => state.board.select_last(),
        },

        // Optimistic halves
        AppCommand::MoveProject {
            project_id,
            from_status,
            to_status,
            from_index,
            to_index,
        } => {
            apply_move(state, project_id, from_status, to_status, from_index, to_index);
        }
        AppCommand::SetProjectArchived {
            project_id,
            archived,
        } => {
            apply_archived(state, project_id, archived);
        }

        // Log screen (offset counts back from the newest entry)
        AppCommand::NavigateToLogs => {
            state.navigate_to(Screen::Logs(LogsState::default()));
        }
        AppCommand::ScrollLogsUp => scroll_logs(state, |offset, max| (offset + 1).min(max)),
        AppCommand::ScrollLogsDown => scroll_logs(state, |offset, _| offset.saturating_sub(1)),
        AppCommand::ScrollLogsPageUp => {
            scroll_logs(state, |offset, max| (offset + LOGS_PAGE).min(max))
        }
        AppCommand::ScrollLogsPageDown => {
            scroll_logs(state, |offset, _| offset.saturating_sub(LOGS_PAGE))
        }
        AppCommand::ScrollLogsToTop => scroll_logs(state, |_, max| max),
        AppCommand::ScrollLogsToBottom => scroll_logs(state, |_, _| 0),

        // Commands that require background tasks - skip in sync mode
        // Tests should inject DataEvents directly for these
        AppCommand::LoadProjects | AppCommand::Logout => {}
    }

    // Clear pending key after any command except SetPendingKey
    if !is_setting_pending_key && state.pending_key.is_some() {
        state.pending_key = None;
    }
}

/// Optimistic write of a move; the cursor follows the card
fn apply_move(
    state: &mut AppState,
    project_id: ProjectId,
    from_status: ProjectStatus,
    to_status: ProjectStatus,
    from_index: usize,
    to_index: usize,
) -> Option<PendingMove> {
    let pending = state.begin_move(project_id, from_status, to_status, from_index, to_index)?;
    state.board.focus_project(project_id);
    Some(pending)
}

/// Optimistic archive toggle. Returns the previous flag for rollback.
fn apply_archived(state: &mut AppState, project_id: ProjectId, archived: bool) -> Option<bool> {
    let project = state.board.project_mut(project_id)?;
    let original = project.archived;
    if original == archived {
        return None;
    }
    project.archived = archived;
    state.board.clamp_selection();
    tracing::info!(%project_id, archived, "Optimistically updated archive flag");
    Some(original)
}

fn scroll_logs(state: &mut AppState, scroll: impl FnOnce(usize, usize) -> usize) {
    if let Some(logs) = state.logs_state_mut() {
        logs.scroll_offset = scroll(logs.scroll_offset, logs.total_entries.saturating_sub(1));
    }
}
