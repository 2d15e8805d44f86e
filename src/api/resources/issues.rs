//
//  redmine-cli
//  api/resources/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issues API types and operations.
//!
//! This module provides the central Redmine resource: issues, together with
//! the types that only appear nested inside them (journals, journal details
//! and changesets).
//!
//! # Overview
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `list_issues` | `GET /issues.json` |
//! | `list_project_issues` | `GET /projects/<id>/issues.json` |
//! | `get_issue` | `GET /issues/<id>.json[?include=...]` |
//! | `create_issue` | `POST /issues.json` |
//! | `update_issue` | `PUT /issues/<id>.json` |
//! | `delete_issue` | `DELETE /issues/<id>.json` |
//!
//! # Partial Updates
//!
//! Writes only carry the fields that differ from their zero value. To change
//! one field of an existing issue, build an [`Issue`] with its `id` and that
//! single field set:
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::resources::{Issue, IssueStatus};
//!
//! # async fn run(client: RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
//! let patch = Issue {
//!     id: 42,
//!     status: Some(Box::new(IssueStatus::with_id(5))),
//!     notes: "Fixed in r1234".to_string(),
//!     ..Default::default()
//! };
//! client.update_issue(&patch, &[]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! A consequence is that a field cannot be cleared to zero through an
//! update (e.g. `done_ratio` back to `0`).
//!
//! # Filters
//!
//! `list_issues` passes [`Params`] through untouched. Common filters are
//! `project_id`, `subproject_id`, `tracker_id`, `status_id` (`open`,
//! `closed`, `*` or an id), `assigned_to_id` (`me` or an id), `query_id` and
//! `cf_<id>` for custom fields.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::uploads::UploadPayload;
use super::{
    Attachment, Enumeration, IssueCategory, IssueRelation, IssueStatus, Project, Tracker, Upload,
    User, Version,
};
use crate::api::common::codec::{
    custom_field_values, date, decode_list, decode_single, envelope, format_date, is_zero,
    nullable, timestamp,
};
use crate::api::common::{ApiResult, CustomField, IncludeSet, Pagination, Params};
use crate::api::RedmineClient;

/// A Redmine issue.
///
/// Nested references (`project`, `tracker`, `status`, ...) carry `id` and
/// `name` on decode. On encode only their `id` is used and they are sent as
/// `<name>_id`.
///
/// The collections `journals`, `attachments`, `relations`, `changesets`,
/// `children` and `watchers` are only filled when requested through
/// [`IssueInclude`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub subject: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    /// Parent task; only its `id` is set.
    #[serde(default)]
    pub parent: Option<Box<Issue>>,
    #[serde(default)]
    pub project: Option<Box<Project>>,
    #[serde(default)]
    pub tracker: Option<Box<Tracker>>,
    #[serde(default)]
    pub status: Option<Box<IssueStatus>>,
    #[serde(default)]
    pub priority: Option<Box<Enumeration>>,
    #[serde(default)]
    pub author: Option<Box<User>>,
    #[serde(default)]
    pub assigned_to: Option<Box<User>>,
    #[serde(default)]
    pub category: Option<Box<IssueCategory>>,
    /// Target version.
    #[serde(default)]
    pub fixed_version: Option<Box<Version>>,
    #[serde(default, deserialize_with = "date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "date")]
    pub due_date: Option<NaiveDate>,
    /// Percent done, 0 to 100.
    #[serde(default, deserialize_with = "nullable")]
    pub done_ratio: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_hours: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub spent_hours: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
    /// Note added with an update. Write-only.
    #[serde(skip)]
    pub notes: String,
    #[serde(default, deserialize_with = "nullable")]
    pub journals: Vec<Journal>,
    #[serde(default, deserialize_with = "nullable")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "nullable")]
    pub relations: Vec<IssueRelation>,
    #[serde(default, deserialize_with = "nullable")]
    pub changesets: Vec<Changeset>,
    #[serde(default, deserialize_with = "nullable")]
    pub children: Vec<Issue>,
    #[serde(default, deserialize_with = "nullable")]
    pub watchers: Vec<User>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl Issue {
    /// A reference to the issue with `id`, for use in writes.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn encode<'a>(&'a self, uploads: &'a [Upload]) -> IssuePayload<'a> {
        fn id_of<T>(reference: &Option<Box<T>>, id: impl Fn(&T) -> u64) -> u64 {
            reference.as_deref().map(id).unwrap_or_default()
        }

        IssuePayload {
            subject: &self.subject,
            description: &self.description,
            parent_issue_id: id_of(&self.parent, |i| i.id),
            project_id: id_of(&self.project, |p| p.id),
            tracker_id: id_of(&self.tracker, |t| t.id),
            status_id: id_of(&self.status, |s| s.id),
            priority_id: id_of(&self.priority, |p| p.id),
            author_id: id_of(&self.author, |u| u.id),
            assigned_to_id: id_of(&self.assigned_to, |u| u.id),
            category_id: id_of(&self.category, |c| c.id),
            fixed_version_id: id_of(&self.fixed_version, |v| v.id),
            start_date: format_date(self.start_date),
            due_date: format_date(self.due_date),
            done_ratio: self.done_ratio,
            estimated_hours: self.estimated_hours,
            spent_hours: self.spent_hours,
            notes: &self.notes,
            custom_field_values: custom_field_values(&self.custom_fields),
            uploads: uploads.iter().map(Upload::encode).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct IssuePayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    subject: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    description: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    parent_issue_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    project_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    tracker_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    status_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    priority_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    author_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    assigned_to_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    category_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    fixed_version_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    start_date: String,
    #[serde(skip_serializing_if = "is_zero")]
    due_date: String,
    #[serde(skip_serializing_if = "is_zero")]
    done_ratio: u32,
    #[serde(skip_serializing_if = "is_zero")]
    estimated_hours: f64,
    #[serde(skip_serializing_if = "is_zero")]
    spent_hours: f64,
    #[serde(skip_serializing_if = "is_zero")]
    notes: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    custom_field_values: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "is_zero")]
    uploads: Vec<UploadPayload<'a>>,
}

/// One entry of an issue's history.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Journal {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default)]
    pub user: Option<Box<User>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
    #[serde(default, deserialize_with = "nullable")]
    pub private_notes: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub details: Vec<JournalDetail>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
}

/// A single field change recorded in a [`Journal`].
///
/// `property` is `attr` for core fields, `cf` for custom fields (with the
/// field id in `name`), `attachment` or `relation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JournalDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub property: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub old_value: String,
    #[serde(default, deserialize_with = "nullable")]
    pub new_value: String,
}

/// A repository commit referencing an issue.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Changeset {
    #[serde(default, deserialize_with = "nullable")]
    pub revision: String,
    #[serde(default)]
    pub user: Option<Box<User>>,
    #[serde(default, deserialize_with = "nullable")]
    pub comments: String,
    // Older Redmine releases spell it "commited_on".
    #[serde(default, alias = "commited_on", deserialize_with = "timestamp")]
    pub committed_on: Option<DateTime<Utc>>,
}

/// Associations to expand on `get_issue`.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::common::IncludeSet;
/// use redmine_cli::api::resources::IssueInclude;
///
/// let include = IssueInclude { relations: true, journals: true, ..Default::default() };
/// assert_eq!(include.to_param().as_deref(), Some("journals,relations"));
/// assert_eq!(IssueInclude::default().to_param(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueInclude {
    pub children: bool,
    pub attachments: bool,
    pub relations: bool,
    pub changesets: bool,
    pub journals: bool,
    pub watchers: bool,
}

impl IncludeSet for IssueInclude {
    fn flags(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("children", self.children),
            ("attachments", self.attachments),
            ("relations", self.relations),
            ("changesets", self.changesets),
            ("journals", self.journals),
            ("watchers", self.watchers),
        ]
    }
}

impl RedmineClient {
    /// Lists issues across all visible projects.
    ///
    /// By default Redmine only returns open issues; pass
    /// `filter("status_id", "*")` for all of them.
    pub async fn list_issues(&self, params: &Params) -> ApiResult<(Vec<Issue>, Pagination)> {
        let body = self.get("issues.json", params).await?;
        decode_list(&body, "issues")
    }

    /// Lists the issues of one project (and its sub-projects by default).
    pub async fn list_project_issues(
        &self,
        project_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<Issue>, Pagination)> {
        let body = self
            .get(&format!("projects/{}/issues.json", project_id), params)
            .await?;
        decode_list(&body, "issues")
    }

    /// Fetches one issue with the requested associations.
    pub async fn get_issue(&self, id: u64, include: &IssueInclude) -> ApiResult<Issue> {
        let mut params = Params::new();
        include.apply(&mut params);
        let body = self.get(&format!("issues/{}.json", id), &params).await?;
        decode_single(&body, "issue")
    }

    /// Creates an issue, attaching previously uploaded files.
    ///
    /// # Parameters
    ///
    /// * `issue` - The issue; `project` and `subject` are required by the service
    /// * `uploads` - Tokens from [`upload_file`](Self::upload_file)
    ///
    /// # Returns
    ///
    /// The issue as stored by the service, including its new `id`.
    pub async fn create_issue(&self, issue: &Issue, uploads: &[Upload]) -> ApiResult<Issue> {
        let body = self
            .post("issues.json", &envelope("issue", issue.encode(uploads)))
            .await?;
        decode_single(&body, "issue")
    }

    /// Updates the issue identified by `issue.id` with its non-zero fields.
    pub async fn update_issue(&self, issue: &Issue, uploads: &[Upload]) -> ApiResult<()> {
        self.put(
            &format!("issues/{}.json", issue.id),
            &envelope("issue", issue.encode(uploads)),
        )
        .await
    }

    pub async fn delete_issue(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("issues/{}.json", id), &Params::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::{ApiError, CustomFieldValue};
    use crate::api::resources::RelationType;
    use crate::api::testing::mock_client;
    use mockito::Matcher;
    use serde_json::json;

    const FULL_ISSUE: &str = r#"{"issue": {
        "id": 42,
        "project": {"id": 3, "name": "Web"},
        "tracker": {"id": 1, "name": "Bug"},
        "status": {"id": 2, "name": "In Progress"},
        "priority": {"id": 4, "name": "High"},
        "author": {"id": 5, "name": "John Smith"},
        "assigned_to": null,
        "parent": {"id": 40},
        "subject": "Login fails",
        "description": "",
        "start_date": "2024-05-01",
        "due_date": null,
        "done_ratio": 0,
        "estimated_hours": null,
        "spent_hours": 0.0,
        "custom_fields": [
            {"id": 3, "name": "Browser", "value": "Firefox"},
            {"id": 7, "name": "Platforms", "multiple": true, "value": ["Linux", "macOS"]}
        ],
        "created_on": "2024-05-01T08:15:00Z",
        "updated_on": "0000-00-00T00:00:00Z",
        "journals": [
            {"id": 100, "user": {"id": 5, "name": "John Smith"}, "notes": "Looking into it",
             "private_notes": false, "created_on": "2024-05-02T10:00:00Z",
             "details": [{"property": "attr", "name": "status_id", "old_value": "1", "new_value": "2"}]}
        ],
        "relations": [{"id": 9, "issue_id": 42, "issue_to_id": 43, "relation_type": "blocks", "delay": null}],
        "changesets": [{"revision": "abc123", "user": {"id": 5, "name": "John Smith"},
                        "comments": "refs #42", "committed_on": "2024-05-03T11:00:00Z"}],
        "children": [{"id": 44, "tracker": {"id": 1, "name": "Bug"}, "subject": "Sub task"}]
    }}"#;

    #[test]
    fn test_decode_full_issue() {
        let issue: Issue = decode_single(FULL_ISSUE, "issue").unwrap();
        assert_eq!(issue.id, 42);
        assert_eq!(issue.parent.as_ref().map(|p| p.id), Some(40));
        assert!(issue.assigned_to.is_none());
        assert_eq!(issue.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(issue.due_date.is_none());
        assert!(issue.updated_on.is_none());
        assert_eq!(issue.custom_fields[0].value(), "Firefox");
        assert_eq!(
            issue.custom_fields[1].value,
            CustomFieldValue::Multiple(vec!["Linux".to_string(), "macOS".to_string()])
        );
        assert_eq!(issue.journals[0].details[0].new_value, "2");
        assert_eq!(issue.relations[0].kind(), RelationType::Blocks);
        assert!(issue.changesets[0].committed_on.is_some());
        assert_eq!(issue.children[0].subject, "Sub task");
    }

    #[test]
    fn test_round_trip_omits_zero_fields() {
        let issue: Issue = decode_single(FULL_ISSUE, "issue").unwrap();
        let encoded = serde_json::to_value(issue.encode(&[])).unwrap();
        assert_eq!(
            encoded,
            json!({
                "subject": "Login fails",
                "parent_issue_id": 40,
                "project_id": 3,
                "tracker_id": 1,
                "status_id": 2,
                "priority_id": 4,
                "author_id": 5,
                "start_date": "2024-05-01",
                "custom_field_values": {"3": "Firefox", "7": ["Linux", "macOS"]}
            })
        );
    }

    #[test]
    fn test_legacy_changeset_spelling() {
        let changeset: Changeset = serde_json::from_value(json!({
            "revision": "r1", "commited_on": "2020-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(changeset.committed_on.is_some());
    }

    #[tokio::test]
    async fn test_create_issue_with_uploads() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", "/issues.json")
            .match_body(Matcher::Json(json!({"issue": {
                "subject": "Crash on save",
                "project_id": 3,
                "tracker_id": 1,
                "due_date": "2024-06-30",
                "uploads": [{"token": "7167.ed1c", "filename": "trace.log", "content_type": "text/plain"}]
            }})))
            .with_status(201)
            .with_body(r#"{"issue": {"id": 43, "subject": "Crash on save", "project": {"id": 3, "name": "Web"}}}"#)
            .create_async()
            .await;

        let issue = Issue {
            subject: "Crash on save".to_string(),
            project: Some(Box::new(Project::with_id(3))),
            tracker: Some(Box::new(Tracker::with_id(1))),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..Default::default()
        };
        let uploads = vec![Upload {
            token: "7167.ed1c".to_string(),
            filename: "trace.log".to_string(),
            content_type: "text/plain".to_string(),
            ..Default::default()
        }];
        let created = client.create_issue(&issue, &uploads).await.unwrap();
        assert_eq!(created.id, 43);
        assert_eq!(created.subject, "Crash on save");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_issue_validation_error() {
        let (mut server, client) = mock_client().await;
        let _mock = server
            .mock("POST", "/issues.json")
            .with_status(422)
            .with_body(r#"{"errors": ["Subject cannot be blank", "Project cannot be blank"]}"#)
            .create_async()
            .await;

        let err = client
            .create_issue(&Issue::default(), &[])
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_issue_includes() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("GET", "/issues/42.json")
            .match_query(Matcher::UrlEncoded(
                "include".into(),
                "changesets,children,journals,relations".into(),
            ))
            .with_status(200)
            .with_body(FULL_ISSUE)
            .create_async()
            .await;

        let include = IssueInclude {
            children: true,
            relations: true,
            changesets: true,
            journals: true,
            ..Default::default()
        };
        let issue = client.get_issue(42, &include).await.unwrap();
        assert_eq!(issue.journals.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_project_issues_pagination() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("GET", "/projects/3/issues.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("offset".into(), "25".into()),
                Matcher::UrlEncoded("limit".into(), "25".into()),
                Matcher::UrlEncoded("sort".into(), "updated_on:desc".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"issues": [{"id": 1}, {"id": 2}, {"id": 3}],
                    "total_count": 42, "limit": 25, "offset": 25}"#,
            )
            .create_async()
            .await;

        let params = Params::new().offset(25).limit(25).sort("updated_on:desc");
        let (issues, page) = client.list_project_issues(3, &params).await.unwrap();
        assert_eq!(issues.len(), 3);
        assert_eq!(
            page,
            Pagination {
                total_count: 42,
                limit: 25,
                offset: 25
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_issue_partial() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("PUT", "/issues/42.json")
            .match_body(Matcher::Json(json!({"issue": {
                "status_id": 5,
                "notes": "Fixed in r1234"
            }})))
            .with_status(204)
            .create_async()
            .await;

        let patch = Issue {
            id: 42,
            status: Some(Box::new(IssueStatus::with_id(5))),
            notes: "Fixed in r1234".to_string(),
            ..Default::default()
        };
        client.update_issue(&patch, &[]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_issue() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("DELETE", "/issues/42.json")
            .with_status(204)
            .create_async()
            .await;

        client.delete_issue(42).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_issues_malformed_body() {
        let (mut server, client) = mock_client().await;
        let _mock = server
            .mock("GET", "/issues.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client.list_issues(&Params::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
