use folio_api::endpoints::{Project, ProjectId, ProjectStatus};
use itertools::Itertools;

use super::LoadingState;

const COLUMN_COUNT: usize = ProjectStatus::ALL.len();

/// Projects grouped into one column per status, plus cursor position
#[derive(Default, Debug, Clone)]
pub struct BoardState {
    pub projects: Vec<Project>,
    pub loading: LoadingState,
    pub focused_column: usize,
    pub show_archived: bool,
    // Each column remembers its own cursor
    selected_rows: [usize; COLUMN_COUNT],
}

impl BoardState {
    pub fn focused_status(&self) -> ProjectStatus {
        ProjectStatus::from_column(self.focused_column).unwrap_or_default()
    }

    /// Visible cards of a column in board order
    pub fn column(&self, status: ProjectStatus) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.status == status && (self.show_archived || !p.archived))
            .sorted_by_key(|p| p.order)
            .collect()
    }

    pub fn selected_row(&self, status: ProjectStatus) -> usize {
        self.selected_rows[status.column()]
    }

    pub fn selected_project(&self) -> Option<&Project> {
        let status = self.focused_status();
        self.column(status).get(self.selected_row(status)).copied()
    }

    /// Column and row a project is displayed at, if visible
    pub fn position(&self, project_id: ProjectId) -> Option<(ProjectStatus, usize)> {
        let project = self.project(project_id)?;
        let row = self
            .column(project.status)
            .iter()
            .position(|p| p.id == project_id)?;
        Some((project.status, row))
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn project_mut(&mut self, project_id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        let status = self.focused_status();
        let len = self.column(status).len();
        if len > 0 {
            let row = &mut self.selected_rows[status.column()];
            *row = if *row + 1 >= len { 0 } else { *row + 1 };
        }
    }

    pub fn select_prev(&mut self) {
        let status = self.focused_status();
        let len = self.column(status).len();
        if len > 0 {
            let row = &mut self.selected_rows[status.column()];
            *row = if *row == 0 { len - 1 } else { *row - 1 };
        }
    }

    pub fn select_first(&mut self) {
        self.selected_rows[self.focused_column] = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.column(self.focused_status()).len();
        self.selected_rows[self.focused_column] = len.saturating_sub(1);
    }

    pub fn focus_next_column(&mut self) {
        self.focused_column = (self.focused_column + 1).min(COLUMN_COUNT - 1);
    }

    pub fn focus_previous_column(&mut self) {
        self.focused_column = self.focused_column.saturating_sub(1);
    }

    /// Moves the cursor onto a project, wherever it currently sits
    pub fn focus_project(&mut self, project_id: ProjectId) {
        if let Some((status, row)) = self.position(project_id) {
            self.focused_column = status.column();
            self.selected_rows[status.column()] = row;
        }
    }

    /// Keeps every cursor inside its column after cards come or go
    pub fn clamp_selection(&mut self) {
        for status in ProjectStatus::ALL {
            let len = self.column(status).len();
            let row = &mut self.selected_rows[status.column()];
            *row = (*row).min(len.saturating_sub(1));
        }
    }

    pub fn toggle_show_archived(&mut self) {
        self.show_archived = !self.show_archived;
        self.clamp_selection();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use folio_api::endpoints::UserId;

    pub(crate) fn project(title: &str, status: ProjectStatus, order: u32) -> Project {
        let now = chrono::Utc::now();
        Project {
            id: ProjectId::new_v4(),
            owner_id: UserId::new_v4(),
            title: title.to_string(),
            description: None,
            status,
            order,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn board(projects: Vec<Project>) -> BoardState {
        let mut board = BoardState::default();
        board.set_projects(projects);
        board
    }

    #[test]
    fn test_columns_follow_order_and_hide_archived() {
        let mut archived = project("Old site", ProjectStatus::Ideation, 0);
        archived.archived = true;
        let mut board = board(vec![
            project("Blog", ProjectStatus::Ideation, 2),
            archived,
            project("Portfolio", ProjectStatus::Ideation, 1),
        ]);

        let titles: Vec<_> = board
            .column(ProjectStatus::Ideation)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Portfolio", "Blog"]);

        board.toggle_show_archived();
        assert_eq!(board.column(ProjectStatus::Ideation).len(), 3);
        assert_eq!(board.column(ProjectStatus::Ideation)[0].title, "Old site");
    }

    #[test]
    fn test_selection_wraps_within_column() {
        let mut board = board(vec![
            project("A", ProjectStatus::Ideation, 0),
            project("B", ProjectStatus::Ideation, 1),
        ]);

        board.select_prev();
        assert_eq!(board.selected_project().map(|p| p.title.as_str()), Some("B"));
        board.select_next();
        assert_eq!(board.selected_project().map(|p| p.title.as_str()), Some("A"));
    }

    #[test]
    fn test_column_focus_is_bounded() {
        let mut board = BoardState::default();
        board.focus_previous_column();
        assert_eq!(board.focused_status(), ProjectStatus::Ideation);

        for _ in 0..10 {
            board.focus_next_column();
        }
        assert_eq!(board.focused_status(), ProjectStatus::OnHold);
        assert!(board.selected_project().is_none());
    }

    #[test]
    fn test_focus_project_follows_card() {
        let target = project("Target", ProjectStatus::Completed, 1);
        let id = target.id;
        let mut board = board(vec![project("Other", ProjectStatus::Completed, 0), target]);

        board.focus_project(id);
        assert_eq!(board.focused_status(), ProjectStatus::Completed);
        assert_eq!(board.selected_project().map(|p| p.id), Some(id));
    }

    #[test]
    fn test_clamp_after_reload() {
        let mut board = board(vec![
            project("A", ProjectStatus::Ideation, 0),
            project("B", ProjectStatus::Ideation, 1),
        ]);
        board.select_last();
        board.set_projects(vec![project("C", ProjectStatus::Ideation, 0)]);
        assert_eq!(board.selected_row(ProjectStatus::Ideation), 0);
    }
}
