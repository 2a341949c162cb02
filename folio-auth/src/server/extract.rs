use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use folio_api::endpoints::UserId;

use crate::common::TokenKind;
use crate::server::{error::ServerError, AppState};

/// `axum::Json` with `{"error": ...}` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ValidJson<T>(pub T);

/// `axum::extract::Path` with `{"error": ...}` rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct ValidPath<T>(pub T);

/// Caller authenticated by `Authorization: Bearer <access token>`.
///
/// Rejects expired tokens, refresh tokens, and tokens whose user no longer
/// exists.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ServerError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

        let claims = state.tokens.verify(token, TokenKind::Access)?;

        if !state.users.exists(claims.sub) {
            tracing::debug!(user_id = %claims.sub, "Token for unknown user");
            return Err(ServerError::Unauthorized("Unknown user".to_string()));
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
