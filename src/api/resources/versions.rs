//
//  redmine-cli
//  api/resources/versions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Versions (roadmap milestones) API types and operations.
//!
//! Versions belong to a project and may be shared with other projects
//! according to their [`VersionSharing`] mode.
//!
//! # Version Status
//!
//! * `open` - Issues can be assigned to the version
//! * `locked` - No new issues can be assigned
//! * `closed` - The version is done
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::resources::{Project, Version, VersionSharing};
//!
//! # async fn run(client: RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
//! let version = client
//!     .create_version(&Version {
//!         name: "2.1.0".to_string(),
//!         project: Some(Box::new(Project::with_id(3))),
//!         sharing: Some(VersionSharing::Descendants),
//!         due_date: NaiveDate::from_ymd_opt(2026, 12, 1),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Project;
use crate::api::common::codec::{
    custom_field_values, date, decode_list, decode_single, envelope, format_date, is_zero,
    nullable, timestamp,
};
use crate::api::common::{ApiError, ApiResult, CustomField, Pagination, Params};
use crate::api::RedmineClient;

/// Lifecycle state of a version. Unknown values decode as `Open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Locked,
    Closed,
    #[default]
    #[serde(other)]
    Open,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Locked => "locked",
            Self::Closed => "closed",
        }
    }
}

/// Which projects besides the owner may use a version. Unknown values
/// decode as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSharing {
    /// Shared with sub-projects.
    Descendants,
    /// Shared with the project hierarchy (ancestors and descendants).
    Hierarchy,
    /// Shared with the whole project tree of the root project.
    Tree,
    /// Shared with all projects.
    System,
    /// Not shared.
    #[default]
    #[serde(other)]
    None,
}

impl VersionSharing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Descendants => "descendants",
            Self::Hierarchy => "hierarchy",
            Self::Tree => "tree",
            Self::System => "system",
        }
    }
}

/// A project version.
///
/// `status` and `sharing` are `None` when the service did not send them and
/// are only written when set; [`Version::status`] and [`Version::sharing`]
/// resolve them to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Version {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub project: Option<Box<Project>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default)]
    pub status: Option<VersionStatus>,
    #[serde(default)]
    pub sharing: Option<VersionSharing>,
    #[serde(default, deserialize_with = "date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl Version {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn status(&self) -> VersionStatus {
        self.status.unwrap_or_default()
    }

    pub fn sharing(&self) -> VersionSharing {
        self.sharing.unwrap_or_default()
    }

    fn encode(&self) -> VersionPayload<'_> {
        VersionPayload {
            name: &self.name,
            description: &self.description,
            status: self.status,
            sharing: self.sharing,
            due_date: format_date(self.due_date),
            custom_field_values: custom_field_values(&self.custom_fields),
        }
    }
}

#[derive(Debug, Serialize)]
struct VersionPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    name: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    description: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    status: Option<VersionStatus>,
    #[serde(skip_serializing_if = "is_zero")]
    sharing: Option<VersionSharing>,
    #[serde(skip_serializing_if = "is_zero")]
    due_date: String,
    #[serde(skip_serializing_if = "is_zero")]
    custom_field_values: BTreeMap<String, Value>,
}

impl RedmineClient {
    /// Lists the versions of a project, including shared ones.
    pub async fn list_versions(
        &self,
        project_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<Version>, Pagination)> {
        let body = self
            .get(&format!("projects/{}/versions.json", project_id), params)
            .await?;
        decode_list(&body, "versions")
    }

    pub async fn get_version(&self, id: u64) -> ApiResult<Version> {
        let body = self
            .get(&format!("versions/{}.json", id), &Params::new())
            .await?;
        decode_single(&body, "version")
    }

    /// Creates a version in `version.project`.
    ///
    /// Returns [`ApiError::MissingField`] without sending anything when the
    /// project is not set.
    pub async fn create_version(&self, version: &Version) -> ApiResult<Version> {
        let project = version
            .project
            .as_ref()
            .ok_or(ApiError::MissingField("Project"))?;
        let body = self
            .post(
                &format!("projects/{}/versions.json", project.id),
                &envelope("version", version.encode()),
            )
            .await?;
        decode_single(&body, "version")
    }

    pub async fn update_version(&self, version: &Version) -> ApiResult<()> {
        self.put(
            &format!("versions/{}.json", version.id),
            &envelope("version", version.encode()),
        )
        .await
    }

    pub async fn delete_version(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("versions/{}.json", id), &Params::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::mock_client;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_status_and_sharing_decoding() {
        let version: Version = serde_json::from_value(json!({
            "id": 1, "status": "locked", "sharing": "tree"
        }))
        .unwrap();
        assert_eq!(version.status(), VersionStatus::Locked);
        assert_eq!(version.sharing(), VersionSharing::Tree);

        let version: Version = serde_json::from_value(json!({
            "id": 1, "status": "archived", "sharing": "galaxy"
        }))
        .unwrap();
        assert_eq!(version.status, Some(VersionStatus::Open));
        assert_eq!(version.sharing, Some(VersionSharing::None));

        let version: Version = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(version.status.is_none());
        assert_eq!(version.status(), VersionStatus::Open);
    }

    #[test]
    fn test_zero_due_date_is_not_encoded() {
        let version: Version = serde_json::from_value(json!({
            "id": 4, "name": "1.0", "due_date": "", "description": null
        }))
        .unwrap();
        assert!(version.due_date.is_none());
        let encoded = serde_json::to_value(version.encode()).unwrap();
        assert_eq!(encoded, json!({"name": "1.0"}));
    }

    #[tokio::test]
    async fn test_create_version_requires_project() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client
            .create_version(&Version {
                name: "1.0".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingField("Project")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_version() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", "/projects/3/versions.json")
            .match_body(Matcher::Json(json!({"version": {
                "name": "2.1.0",
                "status": "locked",
                "sharing": "descendants",
                "due_date": "2026-12-01"
            }})))
            .with_status(201)
            .with_body(
                r#"{"version": {"id": 12, "name": "2.1.0", "project": {"id": 3, "name": "Web"},
                    "status": "locked", "sharing": "descendants", "due_date": "2026-12-01"}}"#,
            )
            .create_async()
            .await;

        let version = Version {
            name: "2.1.0".to_string(),
            project: Some(Box::new(Project::with_id(3))),
            status: Some(VersionStatus::Locked),
            sharing: Some(VersionSharing::Descendants),
            due_date: NaiveDate::from_ymd_opt(2026, 12, 1),
            ..Default::default()
        };
        let created = client.create_version(&version).await.unwrap();
        assert_eq!(created.id, 12);
        assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2026, 12, 1));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_version() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("DELETE", "/versions/12.json")
            .with_status(200)
            .create_async()
            .await;

        client.delete_version(12).await.unwrap();
        mock.assert_async().await;
    }
}
