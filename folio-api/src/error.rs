use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum FolioApiError {
    Api(StatusCode, String),
    Internal(ApiError),
}

impl FolioApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FolioApiError::Api(status, _) => Some(*status),
            FolioApiError::Internal(_) => None,
        }
    }

    /// True when the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<ApiError> for FolioApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                // Error bodies are `{"error": "..."}`; fall back to the raw text otherwise
                let message = serde_json::from_str::<ErrorResponse>(&detail)
                    .map(|response| response.error)
                    .unwrap_or(detail);
                FolioApiError::Api(status, message)
            }
            e => FolioApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for FolioApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolioApiError::Internal(e) => write!(f, "Internal error: {}", e),
            FolioApiError::Api(status, message) => write!(f, "({}) {}", status, message),
        }
    }
}

impl std::error::Error for FolioApiError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
