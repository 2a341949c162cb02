mod models;

use crate::common::{
    AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, UserProfile,
};
pub use models::AuthClientError;
use models::ErrorBody;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use super::session::{AuthBackend, AuthSession, RequestError};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the `/api/auth` routes
pub struct ServerAuthClient {
    http_client: Client,
    server_url: String,
}

impl ServerAuthClient {
    pub fn new(server_url: impl Into<String>) -> Result<Self, AuthClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, AuthClientError> {
        let url = format!("{}/api/auth/login", self.server_url);

        let resp = self.http_client.post(&url).json(req).send().await?;

        Ok(check_status(resp).await?.json::<AuthResponse>().await?)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, AuthClientError> {
        let url = format!("{}/api/auth/register", self.server_url);

        let resp = self.http_client.post(&url).json(req).send().await?;

        Ok(check_status(resp).await?.json::<AuthResponse>().await?)
    }

    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshResponse, AuthClientError> {
        let url = format!("{}/api/auth/refresh", self.server_url);
        let req = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };

        let resp = self.http_client.post(&url).json(&req).send().await?;

        Ok(check_status(resp).await?.json::<RefreshResponse>().await?)
    }

    pub async fn logout(&self, access_token: &str) -> Result<(), AuthClientError> {
        let url = format!("{}/api/auth/logout", self.server_url);

        let resp = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        check_status(resp).await?;
        Ok(())
    }

    pub async fn me(&self, access_token: &str) -> Result<UserProfile, AuthClientError> {
        let url = format!("{}/api/auth/me", self.server_url);

        let resp = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(check_status(resp).await?.json::<UserProfile>().await?)
    }
}

impl AuthBackend for ServerAuthClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthClientError> {
        ServerAuthClient::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthClientError> {
        ServerAuthClient::register(self, request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthClientError> {
        self.refresh_token(refresh_token).await
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthClientError> {
        ServerAuthClient::logout(self, access_token).await
    }
}

impl AuthSession<ServerAuthClient> {
    /// Asks the server who the current tokens belong to, refreshing once if
    /// the access token is no longer accepted
    pub async fn verify(&self) -> Result<UserProfile, RequestError<AuthClientError>> {
        self.send(|token: SecretString| async move {
            self.backend().me(token.expose_secret()).await
        })
        .await
    }
}

/// Turn non-2xx responses into `AuthClientError::Rejected` with the server's message
async fn check_status(resp: Response) -> Result<Response, AuthClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(AuthClientError::Rejected { status, message })
}
