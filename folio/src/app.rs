use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use folio_auth::{AuthSession, ServerAuthClient};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_core::{AppCore, DataEventHandler};
use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::commands::{executor, AppCommand};
use crate::events::DataEvent;
use crate::input::KeyEvent;
use crate::log_buffer::LogBuffer;
use crate::state::{AppState, ExitReason};
use crate::ui::screens::Screen;

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Production command handler: spawns background tasks through the data loader
struct LiveHandler {
    task_manager: BackgroundTaskManager,
    data_loader: DataLoader,
}

impl DataEventHandler for LiveHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        executor::execute_command(command, state, &mut self.task_manager, &self.data_loader);
    }
}

/// The Kanban board for one authenticated session
pub struct App {
    session: Arc<AuthSession<ServerAuthClient>>,
}

impl App {
    pub fn new(session: Arc<AuthSession<ServerAuthClient>>) -> Self {
        Self { session }
    }

    /// Runs the board until the user quits, logs out, or the session expires
    pub async fn run(&self, log_buffer: &LogBuffer) -> Result<ExitReason> {
        let mut terminal = self.init()?;
        let result = self.event_loop(&mut terminal, log_buffer).await;
        // Restore the terminal even when the loop failed
        self.exit(terminal)?;
        result
    }

    async fn event_loop(&self, terminal: &mut Tui, log_buffer: &LogBuffer) -> Result<ExitReason> {
        let (data_tx, mut data_rx) = mpsc::unbounded_channel::<DataEvent>();

        let mut ui_state = AppState::new();
        if let Some(user) = self.session.current_user() {
            tracing::info!(user_id = %user.id, "Opening board");
            ui_state = ui_state.with_user_name(user.name);
        }

        let handler = LiveHandler {
            task_manager: BackgroundTaskManager::new(),
            data_loader: DataLoader::new(self.session.clone(), data_tx),
        };
        let mut core = AppCore::with_state(handler, ui_state);
        core.execute(AppCommand::LoadProjects);

        let mut event_stream = EventStream::new();
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));

        tracing::info!("Entering main event loop");
        loop {
            if let Some(logs_state) = core.state_mut().logs_state_mut() {
                logs_state.total_entries = log_buffer.len();
            }

            terminal.draw(|f| crate::ui::render_app(f, core.state(), log_buffer))?;

            tokio::select! {
                _ = interval.tick() => {
                    if let Some(throbber_state) = core.state_mut().loading_state() {
                        throbber_state.calc_next();
                    }
                }
                Some(Ok(event)) = event_stream.next() => {
                    if let Event::Key(key) = event {
                        if matches!(key.kind, KeyEventKind::Press) {
                            // Logging on the logs screen would scroll it under the reader
                            if !matches!(core.state().current_screen(), Screen::Logs(_)) {
                                tracing::debug!("Key press: {:?}", key);
                            }
                            core.handle_key(KeyEvent::from(key));
                        }
                    }
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", data_event);
                    core.handle_data_event(data_event);
                }
            }

            if core.should_quit() {
                break;
            }
        }

        let reason = core.state().exit_reason.unwrap_or(ExitReason::Quit);
        let handler = core.handler_mut();
        tracing::info!(
            ?reason,
            "Leaving board, cancelling {} background tasks",
            handler.task_manager.running()
        );
        handler.task_manager.cancel_all();

        Ok(reason)
    }

    fn init(&self) -> Result<Tui, std::io::Error> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        Terminal::new(CrosstermBackend::new(stdout))
    }

    fn exit(&self, mut terminal: Tui) -> Result<(), std::io::Error> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
