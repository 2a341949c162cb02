//! Board data flow against a live folio server on an ephemeral port.

use chrono::Duration;
use folio::events::DataEvent;
use folio::state::reducer::reduce_data_event;
use folio::state::{AppState, ExitReason, NotificationKind};
use folio::DataLoader;
use folio_api::endpoints::projects::NewProject;
use folio_api::endpoints::{Project, ProjectStatus, UserId};
use folio_auth::common::TokenKind;
use folio_auth::server::services::{ProjectStore, TokenIssuer, UserStore};
use folio_auth::server::{serve, AppState as ServerState};
use folio_auth::{AuthSession, ServerAuthClient, SessionState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const ACCESS_SECRET: &str = "board-access-secret";
const REFRESH_SECRET: &str = "board-refresh-secret";

struct Harness {
    board: AppState,
    loader: DataLoader,
    events: mpsc::UnboundedReceiver<DataEvent>,
    server: ServerState,
    session: Arc<AuthSession<ServerAuthClient>>,
    owner: UserId,
}

impl Harness {
    async fn start() -> Self {
        let server = ServerState {
            users: Arc::new(UserStore::new(4)),
            projects: Arc::new(ProjectStore::new()),
            tokens: Arc::new(TokenIssuer::with_secrets(
                ACCESS_SECRET,
                REFRESH_SECRET,
                Duration::minutes(15),
                Duration::days(7),
            )),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve(listener, server.clone(), std::future::pending()));

        let session = AuthSession::new(ServerAuthClient::new(url).unwrap());
        let user = session
            .register("grace@example.com", "hopper-cobol-1959", "Grace")
            .await
            .unwrap();
        let session = Arc::new(session);

        let (tx, events) = mpsc::unbounded_channel();
        Self {
            board: AppState::new(),
            loader: DataLoader::new(session.clone(), tx),
            events,
            server,
            session,
            owner: user.id,
        }
    }

    fn seed(&self, title: &str, status: ProjectStatus) -> Project {
        self.server
            .projects
            .create(
                self.owner,
                NewProject {
                    title: title.to_string(),
                    description: None,
                    status: Some(status),
                },
            )
            .unwrap()
    }

    async fn load(&mut self) {
        self.loader.load_projects().await;
        self.apply_next().await;
    }

    /// Reduce the next event from the loader into the board
    async fn apply_next(&mut self) {
        let event = tokio::time::timeout(std::time::Duration::from_secs(5), self.events.recv())
            .await
            .expect("timed out waiting for data event")
            .expect("loader channel closed");
        reduce_data_event(&mut self.board, event);
    }

    fn status(&self, project: &Project) -> ProjectStatus {
        self.board.board.project(project.id).unwrap().status
    }

    fn server_status(&self, project: &Project) -> ProjectStatus {
        self.server
            .projects
            .get(self.owner, project.id)
            .unwrap()
            .status
    }
}

#[tokio::test]
async fn test_load_projects() {
    let mut h = Harness::start().await;
    h.seed("Portfolio", ProjectStatus::Ideation);
    h.seed("Blog", ProjectStatus::Completed);

    h.load().await;

    assert_eq!(h.board.board.column(ProjectStatus::Ideation).len(), 1);
    assert_eq!(h.board.board.column(ProjectStatus::Completed).len(), 1);
}

#[tokio::test]
async fn test_accepted_move_is_committed() {
    let mut h = Harness::start().await;
    let site = h.seed("Site", ProjectStatus::Planning);
    h.load().await;

    let pending = h
        .board
        .begin_move(site.id, ProjectStatus::Planning, ProjectStatus::InProgress, 0, 0)
        .unwrap();
    h.loader.move_project(pending).await;
    h.apply_next().await;

    assert!(h.board.pending_moves.is_empty());
    assert_eq!(h.status(&site), ProjectStatus::InProgress);
    assert_eq!(h.server_status(&site), ProjectStatus::InProgress);
}

#[tokio::test]
async fn test_one_move_succeeds_and_one_fails() {
    let mut h = Harness::start().await;
    let kept = h.seed("Kept", ProjectStatus::Planning);
    let removed = h.seed("Removed", ProjectStatus::Planning);
    h.load().await;

    let first = h
        .board
        .begin_move(kept.id, ProjectStatus::Planning, ProjectStatus::InProgress, 0, 0)
        .unwrap();
    let second = h
        .board
        .begin_move(removed.id, ProjectStatus::Planning, ProjectStatus::InProgress, 0, 1)
        .unwrap();

    // Deleted elsewhere while the board still shows it
    h.server.projects.delete(h.owner, removed.id).unwrap();

    tokio::join!(h.loader.move_project(first), h.loader.move_project(second));
    h.apply_next().await;
    h.apply_next().await;

    assert!(h.board.pending_moves.is_empty());
    assert_eq!(h.status(&kept), ProjectStatus::InProgress);
    assert_eq!(h.status(&removed), ProjectStatus::Planning);
    assert_eq!(h.server_status(&kept), ProjectStatus::InProgress);
}

#[tokio::test]
async fn test_move_with_expired_access_token_refreshes_and_commits() {
    let mut h = Harness::start().await;
    let site = h.seed("Site", ProjectStatus::Planning);
    h.load().await;

    let SessionState::Authenticated(mut stored) = h.session.state() else {
        panic!("session should be authenticated");
    };
    stored.access_token = TokenIssuer::with_secrets(
        ACCESS_SECRET,
        REFRESH_SECRET,
        Duration::seconds(-60),
        Duration::seconds(-60),
    )
    .issue(h.owner, TokenKind::Access)
    .unwrap();
    h.session.restore(stored);

    let pending = h
        .board
        .begin_move(site.id, ProjectStatus::Planning, ProjectStatus::Completed, 0, 0)
        .unwrap();
    h.loader.move_project(pending).await;
    h.apply_next().await;

    assert_eq!(h.status(&site), ProjectStatus::Completed);
    assert_eq!(h.server_status(&site), ProjectStatus::Completed);
    assert_eq!(
        h.board.notification.as_ref().map(|n| n.kind),
        Some(NotificationKind::Success)
    );
}

#[tokio::test]
async fn test_move_with_dead_session_reverts_and_ends_board() {
    let mut h = Harness::start().await;
    let site = h.seed("Site", ProjectStatus::Planning);
    h.load().await;

    let SessionState::Authenticated(mut stored) = h.session.state() else {
        panic!("session should be authenticated");
    };
    let expired = TokenIssuer::with_secrets(
        ACCESS_SECRET,
        REFRESH_SECRET,
        Duration::seconds(-60),
        Duration::seconds(-60),
    );
    stored.access_token = expired.issue(h.owner, TokenKind::Access).unwrap();
    stored.refresh_token = expired.issue(h.owner, TokenKind::Refresh).unwrap();
    h.session.restore(stored);

    let pending = h
        .board
        .begin_move(site.id, ProjectStatus::Planning, ProjectStatus::InProgress, 0, 0)
        .unwrap();
    h.loader.move_project(pending).await;
    // Rollback first, then the session loss
    h.apply_next().await;
    assert_eq!(h.status(&site), ProjectStatus::Planning);
    h.apply_next().await;

    assert_eq!(h.board.exit_reason, Some(ExitReason::SessionExpired));
    assert!(!h.session.is_authenticated());
    assert_eq!(h.server_status(&site), ProjectStatus::Planning);
}
