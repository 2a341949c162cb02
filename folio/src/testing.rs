use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor;
use crate::events::{AppCommand, DataEvent};
use crate::input::{Key, KeyEvent};
use crate::state::{AppState, OpId};
use crate::ui::screens::Screen;
use folio_api::endpoints::{Project, ProjectId, ProjectStatus};

/// Mock handler for tests: runs commands through `execute_command_sync`
/// and records them, so no task is spawned and no request is made
#[derive(Default)]
pub struct MockDataHandler {
    pub executed: Vec<AppCommand>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        self.executed.push(command.clone());
        executor::execute_command_sync(command, state);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            core: AppCore::new(MockDataHandler::new()),
        }
    }

    /// A board that has already loaded `projects`
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let mut app = Self::new();
        app.send_data_event(DataEvent::ProjectsLoaded { projects });
        app
    }

    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    pub fn send_key_event(&mut self, event: KeyEvent) {
        self.core.handle_key(event);
    }

    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    pub fn execute(&mut self, command: AppCommand) {
        self.core.execute(command);
    }

    /// Inject a data event (simulate an API response)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    /// Commands produced so far, in order
    pub fn executed(&mut self) -> &[AppCommand] {
        &self.core.handler_mut().executed
    }

    pub fn project_status(&self, project_id: ProjectId) -> Option<ProjectStatus> {
        self.state().board.project(project_id).map(|p| p.status)
    }

    /// Newest in-flight move of a project
    pub fn latest_op(&self, project_id: ProjectId) -> Option<OpId> {
        self.state()
            .pending_moves
            .values()
            .filter(|pending| pending.project_id == project_id)
            .map(|pending| pending.op_id)
            .max()
    }

    pub fn assert_screen_type(&self, expected_discriminant: std::mem::Discriminant<Screen>) {
        let current = self.state().current_screen();
        assert_eq!(
            std::mem::discriminant(current),
            expected_discriminant,
            "Expected different screen. Current: {:?}",
            current
        );
    }

    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
