//
//  redmine-cli
//  api/resources/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects API types and operations.
//!
//! Projects are the top-level containers of issues, versions, categories,
//! memberships, news and wiki pages. They nest through `parent`.
//!
//! # Example
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::resources::{Project, ProjectInclude, Tracker};
//!
//! # async fn run(client: RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
//! let project = client
//!     .create_project(&Project {
//!         name: "Website".to_string(),
//!         identifier: "website".to_string(),
//!         trackers: vec![Tracker::with_id(1), Tracker::with_id(2)],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let include = ProjectInclude { trackers: true, issue_categories: true };
//! let project = client.get_project(project.id, &include).await?;
//! for tracker in &project.trackers {
//!     println!("{}", tracker.name);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{IssueCategory, Tracker};
use crate::api::common::codec::{
    custom_field_values, decode_list, decode_single, envelope, is_zero, nullable, timestamp,
};
use crate::api::common::{ApiResult, CustomField, IncludeSet, Pagination, Params};
use crate::api::RedmineClient;

/// A Redmine project.
///
/// # Fields
///
/// * `identifier` - URL-safe unique key, fixed after creation
/// * `parent` - Parent project for sub-projects
/// * `trackers` - Enabled trackers, present with `ProjectInclude::trackers`
/// * `issue_categories` - Present with `ProjectInclude::issue_categories`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub identifier: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub homepage: String,
    #[serde(default)]
    pub parent: Option<Box<Project>>,
    #[serde(default, deserialize_with = "nullable")]
    pub trackers: Vec<Tracker>,
    #[serde(default, deserialize_with = "nullable")]
    pub issue_categories: Vec<IssueCategory>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl Project {
    /// A reference to the project with `id`, for use in writes.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub(crate) fn encode(&self) -> ProjectPayload<'_> {
        ProjectPayload {
            identifier: &self.identifier,
            name: &self.name,
            description: &self.description,
            homepage: &self.homepage,
            parent_id: self.parent.as_ref().map(|p| p.id).unwrap_or_default(),
            tracker_ids: self.trackers.iter().map(|t| t.id).collect(),
            custom_field_values: custom_field_values(&self.custom_fields),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    identifier: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    name: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    description: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    homepage: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    parent_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    tracker_ids: Vec<u64>,
    #[serde(skip_serializing_if = "is_zero")]
    custom_field_values: BTreeMap<String, Value>,
}

/// Associations to expand on `get_project`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectInclude {
    pub trackers: bool,
    pub issue_categories: bool,
}

impl IncludeSet for ProjectInclude {
    fn flags(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("trackers", self.trackers),
            ("issue_categories", self.issue_categories),
        ]
    }
}

impl RedmineClient {
    /// Lists the projects visible to the current user.
    pub async fn list_projects(&self, params: &Params) -> ApiResult<(Vec<Project>, Pagination)> {
        let body = self.get("projects.json", params).await?;
        decode_list(&body, "projects")
    }

    pub async fn get_project(&self, id: u64, include: &ProjectInclude) -> ApiResult<Project> {
        let mut params = Params::new();
        include.apply(&mut params);
        let body = self.get(&format!("projects/{}.json", id), &params).await?;
        decode_single(&body, "project")
    }

    /// Creates a project. `name` and `identifier` are required by the
    /// service.
    pub async fn create_project(&self, project: &Project) -> ApiResult<Project> {
        let body = self
            .post("projects.json", &envelope("project", project.encode()))
            .await?;
        decode_single(&body, "project")
    }

    /// Updates the project identified by `project.id`.
    pub async fn update_project(&self, project: &Project) -> ApiResult<()> {
        self.put(
            &format!("projects/{}.json", project.id),
            &envelope("project", project.encode()),
        )
        .await
    }

    /// Deletes a project with all its data.
    pub async fn delete_project(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("projects/{}.json", id), &Params::new())
            .await
    }
}
