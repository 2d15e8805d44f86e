//
//  redmine-cli
//  api/resources/queries.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Saved issue queries (`GET /queries.json`).
//!
//! A query id can be passed back to `list_issues` as the `query_id` filter.

use serde::Deserialize;

use crate::api::common::codec::{decode_list, nullable};
use crate::api::common::{ApiResult, Pagination, Params};
use crate::api::RedmineClient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Query {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_public: bool,
    /// Zero for a global query.
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: u64,
}

impl RedmineClient {
    /// Lists the saved queries visible to the current user.
    pub async fn list_queries(&self, params: &Params) -> ApiResult<(Vec<Query>, Pagination)> {
        let body = self.get("queries.json", params).await?;
        decode_list(&body, "queries")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::mock_client;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_list_queries_pagination() {
        let (mut server, client) = mock_client().await;
        let _mock = server
            .mock("GET", "/queries.json")
            .match_query(Matcher::UrlEncoded("offset".into(), "25".into()))
            .with_status(200)
            .with_body(
                r#"{"queries": [{"id": 4, "name": "Open bugs", "is_public": true, "project_id": null}],
                    "total_count": 26, "limit": 25, "offset": 25}"#,
            )
            .create_async()
            .await;

        let (queries, page) = client
            .list_queries(&Params::new().offset(25))
            .await
            .unwrap();
        assert_eq!(queries[0].project_id, 0);
        assert!(queries[0].is_public);
        assert_eq!(page.total_count, 26);
        assert!(!page.has_next());
    }
}
