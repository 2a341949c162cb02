use reqwest::StatusCode;
use serde::Deserialize;

/// Error body the server sends with every non-2xx response
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum AuthClientError {
    Http(reqwest::Error),
    Rejected { status: StatusCode, message: String },
    MalformedToken(String),
}

impl AuthClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::MalformedToken(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl std::fmt::Display for AuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {}", e),
            Self::Rejected { status, message } => write!(f, "Server rejected request ({}): {}", status, message),
            Self::MalformedToken(msg) => write!(f, "Malformed token: {}", msg),
        }
    }
}

impl std::error::Error for AuthClientError {}

impl From<reqwest::Error> for AuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<jsonwebtoken::errors::Error> for AuthClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::MalformedToken(err.to_string())
    }
}
