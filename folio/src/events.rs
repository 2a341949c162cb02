use folio_api::endpoints::{Project, ProjectId, ProjectStatus};
use folio_api::FolioApiError;
use folio_auth::{RequestError, SessionError};

use crate::state::OpId;

/// Commands to execute (user actions → background tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    SelectNext,
    SelectPrevious,
    FocusNextColumn,
    FocusPreviousColumn,
    NavigateToTop,
    NavigateToBottom,

    // Navigation
    NavigateBack,

    // Data loading
    LoadProjects,

    // Project updates
    MoveProject {
        project_id: ProjectId,
        from_status: ProjectStatus,
        to_status: ProjectStatus,
        from_index: usize,
        to_index: usize,
    },
    SetProjectArchived {
        project_id: ProjectId,
        archived: bool,
    },

    // View toggles
    ToggleShowArchived,
    ToggleHelp,
    DismissNotification,

    // Log screen
    NavigateToLogs,
    ScrollLogsUp,
    ScrollLogsDown,
    ScrollLogsPageUp,
    ScrollLogsPageDown,
    ScrollLogsToTop,
    ScrollLogsToBottom,

    // Key sequence state
    SetPendingKey(char),
    ClearPendingKey,

    // System
    Logout,
    Quit,
}

/// Why a request made on behalf of the board did not succeed
#[derive(Debug, Clone, PartialEq)]
pub enum RequestFailure {
    /// The session could not be refreshed; the user has to log in again
    SessionExpired,
    NotFound,
    Rejected(String),
    Network(String),
}

impl RequestFailure {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl std::fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionExpired => write!(f, "session expired"),
            Self::NotFound => write!(f, "project no longer exists"),
            Self::Rejected(message) => write!(f, "rejected by server: {}", message),
            Self::Network(message) => write!(f, "server unreachable: {}", message),
        }
    }
}

impl From<RequestError<FolioApiError>> for RequestFailure {
    fn from(err: RequestError<FolioApiError>) -> Self {
        match err {
            RequestError::Session(SessionError::SessionExpired | SessionError::Unauthenticated) => {
                Self::SessionExpired
            }
            RequestError::Session(e) => Self::Rejected(e.to_string()),
            RequestError::Api(e) if e.is_not_found() => Self::NotFound,
            RequestError::Api(FolioApiError::Api(_, message)) => Self::Rejected(message),
            RequestError::Api(FolioApiError::Internal(e)) => Self::Network(e.to_string()),
        }
    }
}

/// Events from background tasks (responses to commands)
#[derive(Debug, Clone)]
pub enum DataEvent {
    ProjectsLoaded {
        projects: Vec<Project>,
    },

    // Status moves, matched to their pending record by op id
    ProjectMoveCommitted {
        op_id: OpId,
        project: Project,
    },
    ProjectMoveFailed {
        op_id: OpId,
        failure: RequestFailure,
    },

    // Archiving
    ProjectArchiveUpdated {
        project: Project,
    },
    ProjectArchiveFailed {
        project_id: ProjectId,
        original_archived: bool,
        failure: RequestFailure,
    },

    // Session
    SessionExpired,
    LoggedOut,

    // Errors
    LoadError {
        failure: RequestFailure,
    },
}
