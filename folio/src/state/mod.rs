pub(crate) mod board;
mod moves;
pub mod reducer;

pub use board::BoardState;
pub use moves::{OpId, PendingMove};

use crate::ui::screens::Screen;
use throbber_widgets_tui::ThrobberState;

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown in the status line until replaced or dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Why the board loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    LoggedOut,
    /// Refresh failed; the caller should prompt for credentials again
    SessionExpired,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Screens pushed on top of the board
    pub history: Vec<Screen>,

    // Board data lives outside the screen stack so background results land
    // even while another screen is showing
    pub board: BoardState,
    pub pending_moves: std::collections::BTreeMap<OpId, PendingMove>,
    next_op_id: u64,

    // Signed-in user, shown in the title
    pub user_name: Option<String>,

    // UI state
    pub help_visible: bool,
    pub pending_key: Option<char>,
    pub notification: Option<Notification>,

    // System
    pub should_quit: bool,
    pub exit_reason: Option<ExitReason>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),

            board: BoardState::default(),
            pending_moves: Default::default(),
            next_op_id: 0,

            user_name: None,

            help_visible: false,
            pending_key: None,
            notification: None,

            should_quit: false,
            exit_reason: None,
        }
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    /// Get the current screen; the board when nothing is pushed
    pub fn current_screen(&self) -> &Screen {
        self.history.last().unwrap_or(&Screen::Board)
    }

    pub fn logs_state_mut(&mut self) -> Option<&mut LogsState> {
        match self.history.last_mut() {
            Some(Screen::Logs(logs)) => Some(logs),
            _ => None,
        }
    }

    /// Navigate to a new screen (push to stack)
    pub fn navigate_to(&mut self, screen: Screen) {
        tracing::debug!(
            "Navigating to new screen, stack depth: {} -> {}",
            self.history.len(),
            self.history.len() + 1
        );
        self.history.push(screen);
    }

    /// Navigate back (pop from stack)
    /// Returns true if navigation succeeded, false if already on the board
    pub fn navigate_back(&mut self) -> bool {
        if self.history.pop().is_some() {
            tracing::debug!("Navigated back, stack depth: {}", self.history.len());
            true
        } else {
            tracing::debug!("Cannot navigate back, already on the board");
            false
        }
    }

    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        match self.board.loading {
            LoadingState::Loading(ref mut throbber_state) => Some(throbber_state),
            _ => None,
        }
    }

    /// Leave the board loop for the given reason
    pub fn exit(&mut self, reason: ExitReason) {
        self.should_quit = true;
        self.exit_reason = Some(reason);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct LogsState {
    pub scroll_offset: usize,
    pub total_entries: usize,
}
