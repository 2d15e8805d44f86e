//
//  redmine-cli
//  api/resources/trackers.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Trackers (`GET /trackers.json`).

use serde::Deserialize;

use super::IssueStatus;
use crate::api::common::codec::{decode_list, nullable};
use crate::api::common::{ApiResult, Pagination, Params};
use crate::api::RedmineClient;

/// An issue tracker such as "Bug" or "Feature".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Tracker {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Status new issues of this tracker start in.
    #[serde(default)]
    pub default_status: Option<Box<IssueStatus>>,
}

impl Tracker {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

impl RedmineClient {
    /// Lists every tracker defined on the instance.
    pub async fn list_trackers(&self, params: &Params) -> ApiResult<(Vec<Tracker>, Pagination)> {
        let body = self.get("trackers.json", params).await?;
        decode_list(&body, "trackers")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::mock_client;

    #[tokio::test]
    async fn test_list_trackers_with_default_status() {
        let (mut server, client) = mock_client().await;
        let _mock = server
            .mock("GET", "/trackers.json")
            .with_status(200)
            .with_body(
                r#"{"trackers": [
                    {"id": 1, "name": "Bug", "default_status": {"id": 1, "name": "New"}},
                    {"id": 2, "name": "Feature", "default_status": null}
                ]}"#,
            )
            .create_async()
            .await;

        let (trackers, _) = client.list_trackers(&Params::new()).await.unwrap();
        assert_eq!(trackers[0].name, "Bug");
        assert_eq!(
            trackers[0].default_status.as_ref().map(|s| s.name.as_str()),
            Some("New")
        );
        assert!(trackers[1].default_status.is_none());
    }
}
