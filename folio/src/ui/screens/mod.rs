pub mod board_screen;
pub mod logs_screen;

use crate::state::LogsState;

/// Screens that can be pushed over the board
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Board,
    Logs(LogsState),
}
