mod auth;
mod projects;

pub use auth::{login, logout, me, refresh_token, register};
pub use projects::{
    create_project, delete_project, get_project, list_projects, reorder_projects, update_project,
};

use crate::server::models::HealthResponse;
use axum::Json;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
