//
//  redmine-cli
//  api/resources/issue_categories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue categories.
//!
//! Categories are created under a project. Deleting a category that is still
//! used by issues needs a `reassign_to_id` naming the category those issues
//! move to.

use serde::{Deserialize, Serialize};

use super::{Project, User};
use crate::api::common::codec::{decode_list, decode_single, envelope, is_zero, nullable};
use crate::api::common::{ApiError, ApiResult, Pagination, Params};
use crate::api::RedmineClient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IssueCategory {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub project: Option<Box<Project>>,
    /// Default assignee of new issues in this category.
    #[serde(default)]
    pub assigned_to: Option<Box<User>>,
}

impl IssueCategory {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn encode(&self) -> IssueCategoryPayload<'_> {
        IssueCategoryPayload {
            name: &self.name,
            assigned_to_id: self.assigned_to.as_ref().map(|u| u.id).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct IssueCategoryPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    name: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    assigned_to_id: u64,
}

impl RedmineClient {
    pub async fn list_issue_categories(
        &self,
        project_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<IssueCategory>, Pagination)> {
        let body = self
            .get(
                &format!("projects/{}/issue_categories.json", project_id),
                params,
            )
            .await?;
        decode_list(&body, "issue_categories")
    }

    pub async fn get_issue_category(&self, id: u64) -> ApiResult<IssueCategory> {
        let body = self
            .get(&format!("issue_categories/{}.json", id), &Params::new())
            .await?;
        decode_single(&body, "issue_category")
    }

    /// Creates a category in `category.project`.
    ///
    /// Returns [`ApiError::MissingField`] without sending anything when the
    /// project is not set.
    pub async fn create_issue_category(&self, category: &IssueCategory) -> ApiResult<IssueCategory> {
        let project = category
            .project
            .as_ref()
            .ok_or(ApiError::MissingField("Project"))?;
        let body = self
            .post(
                &format!("projects/{}/issue_categories.json", project.id),
                &envelope("issue_category", category.encode()),
            )
            .await?;
        decode_single(&body, "issue_category")
    }

    pub async fn update_issue_category(&self, category: &IssueCategory) -> ApiResult<()> {
        self.put(
            &format!("issue_categories/{}.json", category.id),
            &envelope("issue_category", category.encode()),
        )
        .await
    }

    /// Deletes a category, moving its issues to `reassign_to` when given.
    pub async fn delete_issue_category(&self, id: u64, reassign_to: Option<u64>) -> ApiResult<()> {
        let mut params = Params::new();
        if let Some(target) = reassign_to {
            params.set("reassign_to_id", target.to_string());
        }
        self.delete(&format!("issue_categories/{}.json", id), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::mock_client;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_issue_category_requires_project() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let category = IssueCategory {
            name: "UI".to_string(),
            ..Default::default()
        };
        let err = client.create_issue_category(&category).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingField("Project")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_issue_category() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", "/projects/3/issue_categories.json")
            .match_body(Matcher::Json(
                json!({"issue_category": {"name": "UI", "assigned_to_id": 5}}),
            ))
            .with_status(201)
            .with_body(
                r#"{"issue_category": {"id": 2, "name": "UI",
                    "project": {"id": 3, "name": "Web"},
                    "assigned_to": {"id": 5, "name": "John Smith"}}}"#,
            )
            .create_async()
            .await;

        let category = IssueCategory {
            name: "UI".to_string(),
            project: Some(Box::new(Project::with_id(3))),
            assigned_to: Some(Box::new(User::with_id(5))),
            ..Default::default()
        };
        let created = client.create_issue_category(&category).await.unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(
            created.assigned_to.as_ref().map(|u| u.name.as_str()),
            Some("John Smith")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_issue_category_with_reassign() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("DELETE", "/issue_categories/2.json")
            .match_query(Matcher::UrlEncoded("reassign_to_id".into(), "4".into()))
            .with_status(204)
            .create_async()
            .await;

        client.delete_issue_category(2, Some(4)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_issue_category_without_reassign() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("DELETE", "/issue_categories/2.json")
            .with_status(204)
            .create_async()
            .await;

        client.delete_issue_category(2, None).await.unwrap();
        mock.assert_async().await;
    }
}
