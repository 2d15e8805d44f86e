//
//  redmine-cli
//  api/resources/issue_statuses.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue statuses (`GET /issue_statuses.json`).

use serde::Deserialize;

use crate::api::common::codec::{decode_list, nullable};
use crate::api::common::{ApiResult, Pagination, Params};
use crate::api::RedmineClient;

/// A workflow status such as "New" or "Closed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueStatus {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_closed: bool,
}

impl IssueStatus {
    /// A reference to the status with `id`, for use in writes.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

impl RedmineClient {
    /// Lists every issue status defined on the instance.
    pub async fn list_issue_statuses(
        &self,
        params: &Params,
    ) -> ApiResult<(Vec<IssueStatus>, Pagination)> {
        let body = self.get("issue_statuses.json", params).await?;
        decode_list(&body, "issue_statuses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::mock_client;

    #[tokio::test]
    async fn test_list_issue_statuses() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("GET", "/issue_statuses.json")
            .with_status(200)
            .with_body(
                r#"{"issue_statuses": [
                    {"id": 1, "name": "New", "is_default": true},
                    {"id": 5, "name": "Closed", "is_closed": true}
                ]}"#,
            )
            .create_async()
            .await;

        let (statuses, page) = client.list_issue_statuses(&Params::new()).await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].is_default);
        assert!(!statuses[0].is_closed);
        assert!(statuses[1].is_closed);
        assert_eq!(page, Pagination::default());
        mock.assert_async().await;
    }
}
