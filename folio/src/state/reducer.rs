use super::moves::Rollback;
use super::{AppState, LoadingState, Notification};
use crate::events::{DataEvent, RequestFailure};
use crate::state::ExitReason;
use folio_api::endpoints::Project;

/// Pure state transition function for data events
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        DataEvent::ProjectsLoaded { projects } => {
            tracing::info!("Loaded {} projects", projects.len());
            state.board.set_projects(projects);
            // The fetch may predate moves still in flight
            state.reapply_pending_moves();
            state.board.loading = LoadingState::Loaded;
        }

        DataEvent::ProjectMoveCommitted { op_id, project } => {
            if state.commit_move(op_id).is_none() {
                return;
            }
            state.notify(Notification::success(format!(
                "Moved '{}' to {}",
                project.title,
                project.status.display_name()
            )));
            // A newer move owns the displayed status until it resolves
            if !state.has_pending_move(project.id) {
                replace_project(state, project);
            }
        }

        DataEvent::ProjectMoveFailed { op_id, failure } => {
            let Some((pending, outcome)) = state.rollback_move(op_id) else {
                return;
            };
            let title = state
                .board
                .project(pending.project_id)
                .map(|p| p.title.clone())
                .unwrap_or_else(|| "project".to_string());

            let message = match outcome {
                Rollback::Restored { status } => format!(
                    "{}; '{}' is back in {}",
                    move_failure_reason(&failure),
                    title,
                    status.display_name()
                ),
                Rollback::HandedOff { .. } => format!(
                    "{} for an earlier move of '{}'",
                    move_failure_reason(&failure),
                    title
                ),
                Rollback::Gone => move_failure_reason(&failure),
            };
            state.notify(Notification::error(message));
        }

        DataEvent::ProjectArchiveUpdated { project } => {
            let verb = if project.archived { "Archived" } else { "Restored" };
            state.notify(Notification::success(format!("{} '{}'", verb, project.title)));
            if let Some(existing) = state.board.project_mut(project.id) {
                existing.archived = project.archived;
                existing.updated_at = project.updated_at;
            }
            state.board.clamp_selection();
        }

        DataEvent::ProjectArchiveFailed {
            project_id,
            original_archived,
            failure,
        } => {
            tracing::warn!(%project_id, "Archive update failed: {}", failure);
            if let Some(project) = state.board.project_mut(project_id) {
                project.archived = original_archived;
            }
            state.board.clamp_selection();
            state.notify(Notification::error(format!(
                "Could not update project: {}",
                failure
            )));
        }

        DataEvent::SessionExpired => {
            tracing::warn!("Session expired, leaving board");
            state.exit(ExitReason::SessionExpired);
        }

        DataEvent::LoggedOut => {
            state.exit(ExitReason::LoggedOut);
        }

        DataEvent::LoadError { failure } => {
            tracing::error!("Failed to load projects: {}", failure);
            state.board.loading = LoadingState::Error(failure.to_string());
            state.notify(Notification::error(format!(
                "Failed to load projects: {}",
                failure
            )));
        }
    }
}

/// Notification text for a rejected move, by error kind
fn move_failure_reason(failure: &RequestFailure) -> String {
    match failure {
        RequestFailure::SessionExpired => "Session expired, move reverted".to_string(),
        RequestFailure::NotFound => "Project no longer exists on the server".to_string(),
        RequestFailure::Rejected(message) => format!("Move rejected: {}", message),
        RequestFailure::Network(_) => "Could not reach the server, move reverted".to_string(),
    }
}

fn replace_project(state: &mut AppState, project: Project) {
    if let Some(existing) = state.board.project_mut(project.id) {
        *existing = project;
    }
    state.board.clamp_selection();
}
