use crate::events::{DataEvent, RequestFailure};
use crate::state::PendingMove;
use folio_api::endpoints::ProjectId;
use folio_api::{ApiRequest, Client, FolioApiError, Request};
use folio_auth::{AuthSession, RequestError, ServerAuthClient};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs board requests through the session and reports back as [`DataEvent`]s
#[derive(Clone)]
pub struct DataLoader {
    pub session: Arc<AuthSession<ServerAuthClient>>,
    pub server_url: Arc<str>,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl DataLoader {
    pub fn new(
        session: Arc<AuthSession<ServerAuthClient>>,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        let server_url = Arc::from(session.backend().server_url());
        Self {
            session,
            server_url,
            data_tx,
        }
    }

    /// Sends one API request with the current access token, refreshing once on 401
    async fn send<R>(&self, request: R) -> Result<R::Response, RequestError<FolioApiError>>
    where
        R: ApiRequest + Clone + Send + 'static,
        R::Response: Send,
    {
        let server_url = self.server_url.clone();
        self.session
            .send(move |token: SecretString| {
                let client = Client::new(&server_url, &token);
                let request = request.clone();
                async move { client.send(request).await }
            })
            .await
    }

    pub async fn load_projects(&self) {
        tracing::info!("Loading projects");

        match self.send(Request::projects().list()).await {
            Ok(projects) => {
                let _ = self.data_tx.send(DataEvent::ProjectsLoaded { projects });
            }
            Err(e) => {
                let failure = RequestFailure::from(e);
                tracing::error!("Failed to load projects: {}", failure);
                self.report_session_loss(&failure);
                let _ = self.data_tx.send(DataEvent::LoadError { failure });
            }
        }
    }

    /// Persists an optimistic move. Exactly one of committed/failed is reported.
    pub async fn move_project(&self, pending: PendingMove) {
        let op_id = pending.op_id;
        let req = Request::projects()
            .update(pending.project_id)
            .status(pending.new_status);

        match self.send(req).await {
            Ok(project) => {
                tracing::info!(%op_id, project_id = %project.id, "Server accepted move");
                let _ = self
                    .data_tx
                    .send(DataEvent::ProjectMoveCommitted { op_id, project });
            }
            Err(e) => {
                let failure = RequestFailure::from(e);
                tracing::error!(%op_id, "Server rejected move: {}", failure);
                // Roll back before the board loop is torn down
                let _ = self.data_tx.send(DataEvent::ProjectMoveFailed {
                    op_id,
                    failure: failure.clone(),
                });
                self.report_session_loss(&failure);
            }
        }
    }

    pub async fn set_archived(&self, project_id: ProjectId, archived: bool, original: bool) {
        let req = Request::projects().update(project_id).archived(archived);

        match self.send(req).await {
            Ok(project) => {
                let _ = self.data_tx.send(DataEvent::ProjectArchiveUpdated { project });
            }
            Err(e) => {
                let failure = RequestFailure::from(e);
                let _ = self.data_tx.send(DataEvent::ProjectArchiveFailed {
                    project_id,
                    original_archived: original,
                    failure: failure.clone(),
                });
                self.report_session_loss(&failure);
            }
        }
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        let _ = self.data_tx.send(DataEvent::LoggedOut);
    }

    fn report_session_loss(&self, failure: &RequestFailure) {
        if failure.is_session_expired() {
            let _ = self.data_tx.send(DataEvent::SessionExpired);
        }
    }
}
