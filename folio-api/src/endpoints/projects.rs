use super::{MessageResponse, ProjectId, UserId};
use crate::macros::setter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Common

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub order: u32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kanban column a project sits in
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Ideation,
    Researching,
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Board column order
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::Ideation,
        ProjectStatus::Researching,
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    pub fn column(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    pub fn from_column(column: usize) -> Option<Self> {
        Self::ALL.get(column).copied()
    }

    /// Column to the right, if any
    pub fn next(&self) -> Option<Self> {
        Self::from_column(self.column() + 1)
    }

    /// Column to the left, if any
    pub fn previous(&self) -> Option<Self> {
        self.column().checked_sub(1).and_then(Self::from_column)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ideation => "ideation",
            Self::Researching => "researching",
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ideation => "Ideation",
            Self::Researching => "Researching",
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListProjects;

impl ListProjects {
    pub fn new() -> Self {
        Self
    }
}

impl Request for ListProjects {
    type Data = ();
    type Response = Vec<Project>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/projects".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetProject {
    project_id: ProjectId,
}

impl GetProject {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

impl Request for GetProject {
    type Data = ();
    type Response = Project;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/projects/{}", self.project_id).into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProject {
    #[serde(flatten)]
    project: NewProject,
}

impl CreateProject {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            project: NewProject {
                title: title.into(),
                description: None,
                status: None,
            },
        }
    }

    setter!(opt project.description: String);
    setter!(opt project.status: ProjectStatus);
}

impl Request for CreateProject {
    type Data = Self;
    type Response = Project;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/projects".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.archived.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProject {
    #[serde(skip)]
    project_id: ProjectId,
    #[serde(flatten)]
    update: ProjectUpdate,
}

impl UpdateProject {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            update: ProjectUpdate::default(),
        }
    }

    setter!(opt update.title: String);
    setter!(opt update.description: String);
    setter!(opt update.status: ProjectStatus);
    setter!(opt update.archived: bool);
}

impl Request for UpdateProject {
    type Data = Self;
    type Response = Project;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/projects/{}", self.project_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteProject {
    project_id: ProjectId,
}

impl DeleteProject {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

impl Request for DeleteProject {
    type Data = ();
    type Response = MessageResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/projects/{}", self.project_id).into()
    }
}

/// Full ordering of the caller's projects, first element gets order 0
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderProjects {
    pub order: Vec<ProjectId>,
}

impl ReorderProjects {
    pub fn new(order: Vec<ProjectId>) -> Self {
        Self { order }
    }
}

impl Request for ReorderProjects {
    type Data = Self;
    type Response = Vec<Project>;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        "/projects/reorder".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let status: ProjectStatus = serde_json::from_str("\"on-hold\"").unwrap();
        assert_eq!(status, ProjectStatus::OnHold);

        assert!(serde_json::from_str::<ProjectStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_status_column_navigation() {
        assert_eq!(ProjectStatus::Ideation.previous(), None);
        assert_eq!(
            ProjectStatus::Planning.next(),
            Some(ProjectStatus::InProgress)
        );
        assert_eq!(ProjectStatus::OnHold.next(), None);
        assert_eq!(ProjectStatus::OnHold.column(), 5);
    }

    #[test]
    fn test_update_body_only_carries_set_fields() {
        let req = UpdateProject::new(ProjectId::new_v4()).status(ProjectStatus::Completed);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "completed" }));
    }
}
