use axum::{extract::State, http::StatusCode, Json};
use folio_api::endpoints::MessageResponse;

use crate::common::{
    AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, TokenKind,
    UserProfile,
};
use crate::server::{
    error::ServerError,
    extract::{AuthUser, ValidJson},
    services::User,
    AppState,
};

fn issue_session(state: &AppState, user: &User) -> Result<AuthResponse, ServerError> {
    Ok(AuthResponse {
        access_token: state.tokens.issue(user.id, TokenKind::Access)?,
        refresh_token: state.tokens.issue(user.id, TokenKind::Refresh)?,
        user: user.profile(),
    })
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    let users = state.users.clone();
    let user =
        tokio::task::spawn_blocking(move || users.authenticate(&req.email, &req.password))
            .await??;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(issue_session(&state, &user)?))
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let users = state.users.clone();
    let user = tokio::task::spawn_blocking(move || {
        users.register(&req.email, &req.password, &req.name)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(issue_session(&state, &user)?)))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ServerError> {
    tracing::debug!("Token refresh requested");

    let claims = state.tokens.verify(&req.refresh_token, TokenKind::Refresh)?;

    if !state.users.exists(claims.sub) {
        tracing::debug!(user_id = %claims.sub, "Refresh for unknown user");
        return Err(ServerError::Unauthorized("Unknown user".to_string()));
    }

    let access_token = state.tokens.issue(claims.sub, TokenKind::Access)?;

    tracing::info!(user_id = %claims.sub, "Token refresh successful");

    Ok(Json(RefreshResponse { access_token }))
}

/// Tokens are stateless; the client discards them
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ServerError> {
    state
        .users
        .get(user.user_id)
        .map(|u| Json(u.profile()))
        .ok_or_else(|| ServerError::Unauthorized("Unknown user".to_string()))
}
