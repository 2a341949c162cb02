use axum::{extract::State, http::StatusCode, Json};
use folio_api::endpoints::projects::{NewProject, ProjectUpdate, ReorderProjects};
use folio_api::endpoints::{MessageResponse, Project, ProjectId};

use crate::server::{
    error::ServerError,
    extract::{AuthUser, ValidJson, ValidPath},
    AppState,
};

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn list_projects(State(state): State<AppState>, user: AuthUser) -> Json<Vec<Project>> {
    Json(state.projects.list(user.user_id))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, project_id = %id))]
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<ProjectId>,
) -> Result<Json<Project>, ServerError> {
    Ok(Json(state.projects.get(user.user_id, id)?))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(new): ValidJson<NewProject>,
) -> Result<(StatusCode, Json<Project>), ServerError> {
    let project = state.projects.create(user.user_id, new)?;
    tracing::info!(project_id = %project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, project_id = %id))]
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<ProjectId>,
    ValidJson(update): ValidJson<ProjectUpdate>,
) -> Result<Json<Project>, ServerError> {
    if update.is_empty() {
        return Err(ServerError::BadRequest("Nothing to update".to_string()));
    }

    let project = state.projects.update(user.user_id, id, update)?;
    tracing::info!(status = %project.status, "Project updated");
    Ok(Json(project))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id, project_id = %id))]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<ProjectId>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.projects.delete(user.user_id, id)?;
    tracing::info!("Project deleted");
    Ok(Json(MessageResponse {
        message: "Project deleted".to_string(),
    }))
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn reorder_projects(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(req): ValidJson<ReorderProjects>,
) -> Result<Json<Vec<Project>>, ServerError> {
    Ok(Json(state.projects.reorder(user.user_id, &req.order)?))
}
