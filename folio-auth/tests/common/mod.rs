#![allow(dead_code)]

use chrono::Duration;
use folio_api::endpoints::UserId;
use folio_auth::common::TokenKind;
use folio_auth::server::services::{ProjectStore, TokenIssuer, UserStore};
use folio_auth::server::{router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";
pub const PASSWORD: &str = "correct horse battery";

pub struct TestServer {
    pub url: String,
    pub state: AppState,
}

impl TestServer {
    /// Sign a token with the server's secrets but a custom lifetime
    pub fn token_with_ttl(&self, user_id: UserId, kind: TokenKind, ttl: Duration) -> String {
        issuer(ttl, ttl).issue(user_id, kind).unwrap()
    }
}

pub fn issuer(access_ttl: Duration, refresh_ttl: Duration) -> TokenIssuer {
    TokenIssuer::with_secrets(ACCESS_SECRET, REFRESH_SECRET, access_ttl, refresh_ttl)
}

pub async fn spawn_app() -> TestServer {
    let state = AppState {
        users: Arc::new(UserStore::new(4)),
        projects: Arc::new(ProjectStore::new()),
        tokens: Arc::new(issuer(Duration::minutes(15), Duration::days(7))),
    };

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        url: format!("http://{}", addr),
        state,
    }
}
