//! Client-side session state machine.
//!
//! ```text
//! Unauthenticated -> Authenticating -> Authenticated
//! Authenticated -> Refreshing -> Authenticated      (refresh accepted)
//! Authenticated -> Refreshing -> Unauthenticated    (refresh rejected or unreachable)
//! ```
//!
//! [`AuthSession::send`] is the request interceptor: it attaches the current
//! access token, and on an authentication failure refreshes the access token
//! once and replays the request once. A replayed request is never refreshed
//! again, so a broken session always ends in `Unauthenticated` instead of a
//! refresh loop.

use std::future::Future;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use folio_api::FolioApiError;
use secrecy::SecretString;
use thiserror::Error;

use super::auth_client::AuthClientError;
use super::token_storage::TokenStore;
use crate::common::{
    AuthResponse, Claims, CurrentUser, LoginRequest, RefreshResponse, RegisterRequest,
    StoredSession, TokenKind,
};

/// Transport used by [`AuthSession`] to reach the auth endpoints
pub trait AuthBackend: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, AuthClientError>> + Send;

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, AuthClientError>> + Send;

    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<RefreshResponse, AuthClientError>> + Send;

    fn logout(&self, access_token: &str) -> impl Future<Output = Result<(), AuthClientError>> + Send;
}

/// Errors that can mean "the access token was not accepted"
pub trait AuthFailure {
    fn is_auth_failure(&self) -> bool;
}

impl AuthFailure for FolioApiError {
    fn is_auth_failure(&self) -> bool {
        self.is_unauthorized()
    }
}

impl AuthFailure for AuthClientError {
    fn is_auth_failure(&self) -> bool {
        self.is_unauthorized()
    }
}

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(StoredSession),
    Refreshing(StoredSession),
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Unauthenticated => SessionStatus::Unauthenticated,
            Self::Authenticating => SessionStatus::Authenticating,
            Self::Authenticated(_) => SessionStatus::Authenticated,
            Self::Refreshing(_) => SessionStatus::Refreshing,
        }
    }

    fn session(&self) -> Option<&StoredSession> {
        match self {
            Self::Authenticated(session) | Self::Refreshing(session) => Some(session),
            Self::Unauthenticated | Self::Authenticating => None,
        }
    }
}

/// Tag of [`SessionState`] without the credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Refreshing,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Access token does not belong to the returned user")]
    IdentityMismatch,

    #[error(transparent)]
    Backend(#[from] AuthClientError),
}

/// Outcome of a request sent through [`AuthSession::send`]
#[derive(Debug, Error)]
pub enum RequestError<E> {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(E),
}

impl<E> RequestError<E> {
    /// True when the session is gone and the user has to log in again
    pub fn is_session_lost(&self) -> bool {
        matches!(
            self,
            Self::Session(SessionError::SessionExpired | SessionError::Unauthenticated)
        )
    }
}

pub struct AuthSession<B> {
    backend: B,
    state: RwLock<SessionState>,
    store: Option<TokenStore>,
}

impl<B: AuthBackend> AuthSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: RwLock::new(SessionState::Unauthenticated),
            store: None,
        }
    }

    /// Persist tokens to `store` whenever they change
    pub fn with_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.read().status()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.read().session().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session().is_some()
    }

    /// Resume a session persisted by an earlier run
    pub fn restore(&self, session: StoredSession) {
        tracing::debug!(user_id = %session.user.id, "Restoring persisted session");
        *self.write() = SessionState::Authenticated(session);
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, SessionError> {
        *self.write() = SessionState::Authenticating;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.backend.login(&request).await;

        self.establish(email, result)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<CurrentUser, SessionError> {
        *self.write() = SessionState::Authenticating;

        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let result = self.backend.register(&request).await;

        self.establish(email, result)
    }

    /// Finish `Authenticating` with the server's answer.
    ///
    /// The user id comes from the access token's `sub` claim and must match
    /// the response body; the email is the one the caller authenticated with.
    fn establish(
        &self,
        email: &str,
        result: Result<AuthResponse, AuthClientError>,
    ) -> Result<CurrentUser, SessionError> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.clear();
                tracing::warn!("Authentication failed: {}", err);
                return Err(match err {
                    e if e.is_unauthorized() => SessionError::InvalidCredentials,
                    AuthClientError::Rejected { message, .. } => SessionError::Rejected(message),
                    e => SessionError::Backend(e),
                });
            }
        };

        let claims = match Claims::decode_unverified(&response.access_token) {
            Ok(claims) if claims.typ == TokenKind::Access => claims,
            Ok(_) => {
                self.clear();
                return Err(AuthClientError::MalformedToken("not an access token".into()).into());
            }
            Err(e) => {
                self.clear();
                return Err(AuthClientError::from(e).into());
            }
        };

        if claims.sub != response.user.id {
            self.clear();
            return Err(SessionError::IdentityMismatch);
        }

        let user = CurrentUser {
            id: claims.sub,
            email: email.to_string(),
            name: response.user.name,
        };
        let session = StoredSession {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: user.clone(),
        };

        self.persist(&session);
        *self.write() = SessionState::Authenticated(session);

        tracing::info!(user_id = %user.id, "Session established");
        Ok(user)
    }

    /// Run `request` with the current access token, refreshing and replaying
    /// it once if the token is rejected.
    pub async fn send<T, E, F, Fut>(&self, request: F) -> Result<T, RequestError<E>>
    where
        F: Fn(SecretString) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: AuthFailure,
    {
        let token = self
            .access_token()
            .ok_or(RequestError::Session(SessionError::Unauthenticated))?;

        match request(SecretString::from(token)).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_auth_failure() => {
                tracing::debug!("Access token rejected, refreshing");
            }
            Err(err) => return Err(RequestError::Api(err)),
        }

        // From here on the request counts as retried
        let token = self.refresh().await?;

        match request(SecretString::from(token)).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_auth_failure() => {
                tracing::warn!("Replayed request rejected with a fresh token, ending session");
                self.clear();
                Err(RequestError::Session(SessionError::SessionExpired))
            }
            Err(err) => Err(RequestError::Api(err)),
        }
    }

    /// Trade the refresh token for a new access token.
    ///
    /// Any failure, including an unreachable server, ends the session.
    pub async fn refresh(&self) -> Result<String, SessionError> {
        let refresh_token = {
            let mut state = self.write();
            match state.session().cloned() {
                Some(session) if !session.refresh_token.is_empty() => {
                    let token = session.refresh_token.clone();
                    *state = SessionState::Refreshing(session);
                    Some(token)
                }
                _ => None,
            }
        };

        let Some(refresh_token) = refresh_token else {
            tracing::warn!("No refresh token available, ending session");
            self.clear();
            return Err(SessionError::SessionExpired);
        };

        let response = match self.backend.refresh(&refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                self.clear();
                return Err(SessionError::SessionExpired);
            }
        };

        let refreshed = {
            let mut state = self.write();
            let same_user = Claims::decode_unverified(&response.access_token)
                .ok()
                .filter(|claims| claims.typ == TokenKind::Access)
                .map(|claims| claims.sub);

            match state.session().cloned() {
                Some(mut session) if same_user == Some(session.user.id) => {
                    session.access_token = response.access_token.clone();
                    *state = SessionState::Authenticated(session.clone());
                    Some(session)
                }
                _ => None,
            }
        };

        match refreshed {
            Some(session) => {
                self.persist(&session);
                tracing::info!("Access token refreshed");
                Ok(response.access_token)
            }
            None => {
                // Logged out meanwhile, or the server answered for someone else
                self.clear();
                Err(SessionError::SessionExpired)
            }
        }
    }

    /// Best-effort server logout, then drop every credential we hold
    pub async fn logout(&self) {
        if let Some(token) = self.access_token() {
            if let Err(e) = self.backend.logout(&token).await {
                tracing::warn!("Server logout failed, clearing local session anyway: {}", e);
            }
        }
        self.clear();
        tracing::info!("Logged out");
    }

    fn access_token(&self) -> Option<String> {
        self.read().session().map(|s| s.access_token.clone())
    }

    fn clear(&self) {
        *self.write() = SessionState::Unauthenticated;
        if let Some(store) = &self.store {
            if let Err(e) = store.delete() {
                tracing::warn!("Failed to delete persisted session: {}", e);
            }
        }
    }

    fn persist(&self, session: &StoredSession) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(session) {
                tracing::warn!("Failed to persist session: {}", e);
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_api::endpoints::UserId;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn token(user_id: UserId, typ: TokenKind, tag: i64) -> String {
        let claims = Claims {
            sub: user_id,
            exp: 4_000_000_000,
            iat: tag,
            typ,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test"),
        )
        .unwrap()
    }

    fn rejected(status: StatusCode) -> AuthClientError {
        AuthClientError::Rejected {
            status,
            message: "nope".to_string(),
        }
    }

    /// Backend double that counts refresh calls
    struct FakeBackend {
        user_id: UserId,
        refresh_ok: bool,
        refresh_calls: AtomicUsize,
        logout_fails: bool,
        issued: AtomicUsize,
    }

    impl FakeBackend {
        fn new(refresh_ok: bool) -> Self {
            Self {
                user_id: UserId::new_v4(),
                refresh_ok,
                refresh_calls: AtomicUsize::new(0),
                logout_fails: false,
                issued: AtomicUsize::new(0),
            }
        }

        fn refresh_calls(&self) -> usize {
            self.refresh_calls.load(Ordering::SeqCst)
        }
    }

    impl AuthBackend for FakeBackend {
        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthClientError> {
            if request.password != "correct horse" {
                return Err(rejected(StatusCode::UNAUTHORIZED));
            }
            Ok(AuthResponse {
                access_token: token(self.user_id, TokenKind::Access, 1),
                refresh_token: token(self.user_id, TokenKind::Refresh, 1),
                user: CurrentUser {
                    id: self.user_id,
                    // Deliberately differs from the login email
                    email: "stored@example.com".to_string(),
                    name: "Ada".to_string(),
                },
            })
        }

        async fn register(
            &self,
            _request: &RegisterRequest,
        ) -> Result<AuthResponse, AuthClientError> {
            Err(rejected(StatusCode::BAD_REQUEST))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<RefreshResponse, AuthClientError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if !self.refresh_ok {
                return Err(rejected(StatusCode::UNAUTHORIZED));
            }
            let tag = 100 + self.issued.fetch_add(1, Ordering::SeqCst) as i64;
            Ok(RefreshResponse {
                access_token: token(self.user_id, TokenKind::Access, tag),
            })
        }

        async fn logout(&self, _access_token: &str) -> Result<(), AuthClientError> {
            if self.logout_fails {
                return Err(rejected(StatusCode::INTERNAL_SERVER_ERROR));
            }
            Ok(())
        }
    }

    #[derive(Debug, PartialEq)]
    enum FakeApiError {
        Unauthorized,
        NotFound,
    }

    impl AuthFailure for FakeApiError {
        fn is_auth_failure(&self) -> bool {
            matches!(self, FakeApiError::Unauthorized)
        }
    }

    async fn logged_in(backend: FakeBackend) -> AuthSession<FakeBackend> {
        let session = AuthSession::new(backend);
        session.login("ada@example.com", "correct horse").await.unwrap();
        session
    }

    fn corrupt_access_token(session: &AuthSession<FakeBackend>) {
        let SessionState::Authenticated(mut stored) = session.state() else {
            panic!("expected authenticated session");
        };
        stored.access_token = "expired".to_string();
        session.restore(stored);
    }

    #[tokio::test]
    async fn test_login_user_identity() {
        let backend = FakeBackend::new(true);
        let expected_id = backend.user_id;
        let session = logged_in(backend).await;

        let user = session.current_user().unwrap();
        let SessionState::Authenticated(stored) = session.state() else {
            panic!("expected authenticated session");
        };
        let claims = Claims::decode_unverified(&stored.access_token).unwrap();

        assert_eq!(user.id, claims.sub);
        assert_eq!(user.id, expected_id);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn test_bad_credentials_store_nothing() {
        let session = AuthSession::new(FakeBackend::new(true));

        let result = session.login("ada@example.com", "wrong").await;

        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_register_rejection_surfaces_message() {
        let session = AuthSession::new(FakeBackend::new(true));

        let result = session.register("ada@example.com", "pw", "Ada").await;

        assert!(matches!(result, Err(SessionError::Rejected(ref msg)) if msg == "nope"));
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_send_attaches_current_token() {
        let session = logged_in(FakeBackend::new(true)).await;
        let SessionState::Authenticated(stored) = session.state() else {
            panic!("expected authenticated session");
        };

        let seen = Mutex::new(Vec::new());
        let result: Result<u32, RequestError<FakeApiError>> = session
            .send(|token| {
                use secrecy::ExposeSecret;
                seen.lock().unwrap().push(token.expose_secret().to_string());
                async { Ok(7) }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(*seen.lock().unwrap(), vec![stored.access_token]);
        assert_eq!(session.backend().refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_access_token_refreshes_once_and_replays() {
        let session = logged_in(FakeBackend::new(true)).await;
        corrupt_access_token(&session);

        let attempts = AtomicUsize::new(0);
        let result: Result<&str, RequestError<FakeApiError>> = session
            .send(|token| {
                use secrecy::ExposeSecret;
                attempts.fetch_add(1, Ordering::SeqCst);
                let accepted = token.expose_secret() != "expired";
                async move {
                    if accepted {
                        Ok("projects")
                    } else {
                        Err(FakeApiError::Unauthorized)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "projects");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(session.backend().refresh_calls(), 1);
        assert_eq!(session.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_refresh_failure_forces_logout_without_replay() {
        let session = logged_in(FakeBackend::new(false)).await;
        corrupt_access_token(&session);

        let attempts = AtomicUsize::new(0);
        let result: Result<(), RequestError<FakeApiError>> = session
            .send(|_token| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeApiError::Unauthorized) }
            })
            .await;

        assert!(matches!(
            result,
            Err(RequestError::Session(SessionError::SessionExpired))
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(session.backend().refresh_calls(), 1);
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_missing_refresh_token_skips_refresh_call() {
        let session = logged_in(FakeBackend::new(true)).await;
        let SessionState::Authenticated(mut stored) = session.state() else {
            panic!("expected authenticated session");
        };
        stored.refresh_token.clear();
        session.restore(stored);

        let result: Result<(), RequestError<FakeApiError>> = session
            .send(|_token| async { Err(FakeApiError::Unauthorized) })
            .await;

        assert!(result.unwrap_err().is_session_lost());
        assert_eq!(session.backend().refresh_calls(), 0);
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_replayed_request_is_never_refreshed_twice() {
        let session = logged_in(FakeBackend::new(true)).await;

        let attempts = AtomicUsize::new(0);
        let result: Result<(), RequestError<FakeApiError>> = session
            .send(|_token| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(FakeApiError::Unauthorized) }
            })
            .await;

        assert!(result.unwrap_err().is_session_lost());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(session.backend().refresh_calls(), 1);
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_touch_session() {
        let session = logged_in(FakeBackend::new(true)).await;

        let result: Result<(), RequestError<FakeApiError>> = session
            .send(|_token| async { Err(FakeApiError::NotFound) })
            .await;

        assert!(matches!(result, Err(RequestError::Api(FakeApiError::NotFound))));
        assert_eq!(session.backend().refresh_calls(), 0);
        assert_eq!(session.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_send_without_session() {
        let session = AuthSession::new(FakeBackend::new(true));

        let result: Result<(), RequestError<FakeApiError>> =
            session.send(|_token| async { Ok(()) }).await;

        assert!(matches!(
            result,
            Err(RequestError::Session(SessionError::Unauthenticated))
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let mut backend = FakeBackend::new(true);
        backend.logout_fails = true;
        let session = logged_in(backend).await;

        session.logout().await;

        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_session_persisted_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::at(dir.path().join("session.json"));
        let session = AuthSession::new(FakeBackend::new(false)).with_store(store.clone());

        session.login("ada@example.com", "correct horse").await.unwrap();
        let persisted = store.load().unwrap().unwrap();
        assert_eq!(persisted.user.email, "ada@example.com");

        // Refresh fails -> persisted session is gone too
        let _ = session.refresh().await;
        assert!(store.load().unwrap().is_none());
    }
}
