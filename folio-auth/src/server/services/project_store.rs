use chrono::Utc;
use dashmap::DashMap;
use folio_api::endpoints::{Project, ProjectId, UserId};
use folio_api::endpoints::projects::{NewProject, ProjectUpdate};
use std::collections::HashSet;

use crate::server::error::ServerError;

/// Projects per owner, kept sorted so that `order` equals the vector index
#[derive(Default)]
pub struct ProjectStore {
    projects: DashMap<UserId, Vec<Project>>,
}

fn not_found(id: ProjectId) -> ServerError {
    ServerError::NotFound(format!("Project {} not found", id))
}

fn validated_title(title: &str) -> Result<String, ServerError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServerError::BadRequest("Title is required".to_string()));
    }
    Ok(title.to_string())
}

fn renumber(projects: &mut [Project]) {
    for (index, project) in projects.iter_mut().enumerate() {
        project.order = index as u32;
    }
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, owner: UserId) -> Vec<Project> {
        self.projects
            .get(&owner)
            .map(|p| p.value().clone())
            .unwrap_or_default()
    }

    pub fn get(&self, owner: UserId, id: ProjectId) -> Result<Project, ServerError> {
        self.projects
            .get(&owner)
            .and_then(|projects| projects.iter().find(|p| p.id == id).cloned())
            .ok_or_else(|| not_found(id))
    }

    /// Appends to the end of the owner's ordering
    pub fn create(&self, owner: UserId, new: NewProject) -> Result<Project, ServerError> {
        let title = validated_title(&new.title)?;
        let now = Utc::now();

        let mut projects = self.projects.entry(owner).or_default();
        let project = Project {
            id: ProjectId::new_v4(),
            owner_id: owner,
            title,
            description: new.description,
            status: new.status.unwrap_or_default(),
            order: projects.len() as u32,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        projects.push(project.clone());

        Ok(project)
    }

    pub fn update(
        &self,
        owner: UserId,
        id: ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, ServerError> {
        let title = update.title.as_deref().map(validated_title).transpose()?;

        let mut projects = self.projects.get_mut(&owner).ok_or_else(|| not_found(id))?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(title) = title {
            project.title = title;
        }
        if let Some(description) = update.description {
            project.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        if let Some(archived) = update.archived {
            project.archived = archived;
        }
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    /// Removes the project and closes the gap in the ordering
    pub fn delete(&self, owner: UserId, id: ProjectId) -> Result<Project, ServerError> {
        let mut projects = self.projects.get_mut(&owner).ok_or_else(|| not_found(id))?;
        let index = projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        let removed = projects.remove(index);
        renumber(&mut projects);

        Ok(removed)
    }

    /// `order` must list every one of the owner's projects exactly once
    pub fn reorder(&self, owner: UserId, order: &[ProjectId]) -> Result<Vec<Project>, ServerError> {
        let mut projects = self.projects.entry(owner).or_default();

        let unique: HashSet<_> = order.iter().collect();
        let is_permutation = unique.len() == order.len()
            && order.len() == projects.len()
            && projects.iter().all(|p| unique.contains(&p.id));
        if !is_permutation {
            return Err(ServerError::BadRequest(
                "Order must list each of your projects exactly once".to_string(),
            ));
        }

        projects.sort_by_key(|p| order.iter().position(|id| *id == p.id));
        renumber(&mut projects);

        Ok(projects.value().clone())
    }
}
