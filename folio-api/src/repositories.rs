use crate::endpoints::{
    ProjectId,
    projects::{
        CreateProject, DeleteProject, GetProject, ListProjects, ReorderProjects, UpdateProject,
    },
};

#[derive(Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> ListProjects {
        ListProjects::new()
    }

    pub fn get(&self, project_id: ProjectId) -> GetProject {
        GetProject::new(project_id)
    }

    pub fn create(&self, title: impl Into<String>) -> CreateProject {
        CreateProject::new(title)
    }

    pub fn update(&self, project_id: ProjectId) -> UpdateProject {
        UpdateProject::new(project_id)
    }

    pub fn delete(&self, project_id: ProjectId) -> DeleteProject {
        DeleteProject::new(project_id)
    }

    pub fn reorder(&self, order: Vec<ProjectId>) -> ReorderProjects {
        ReorderProjects::new(order)
    }
}
