pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::FolioApiError;
use repositories::*;
use secrecy::{ExposeSecret, SecretString};
use tower_api_client::Client as ApiClient;
pub use tower_api_client::Request as ApiRequest;

pub const DEFAULT_BASE_PATH: &str = "/api";

/// Client for the portfolio REST resources.
///
/// A client is bound to one access token. The session layer builds a fresh
/// client whenever it replays a request with a rotated token.
pub struct Client {
    inner: ApiClient,
}

impl Client {
    /// `server_url` is the server origin, e.g. `http://localhost:8080`.
    pub fn new(server_url: &str, access_token: &SecretString) -> Self {
        let base_url = format!("{}{}", server_url.trim_end_matches('/'), DEFAULT_BASE_PATH);
        Self {
            inner: ApiClient::new(&base_url).bearer_auth(access_token.expose_secret()),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, FolioApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

pub struct Request;

impl Request {
    pub fn projects() -> ProjectRepository {
        ProjectRepository::new()
    }
}
