//
//  redmine-cli
//  api/resources/news.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! News items (`GET /news.json`, `GET /projects/<id>/news.json`).

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Project, User};
use crate::api::common::codec::{decode_list, nullable, timestamp};
use crate::api::common::{ApiResult, Pagination, Params};
use crate::api::RedmineClient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct News {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default)]
    pub project: Option<Box<Project>>,
    #[serde(default)]
    pub author: Option<Box<User>>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
}

impl RedmineClient {
    /// Lists news across all visible projects.
    pub async fn list_news(&self, params: &Params) -> ApiResult<(Vec<News>, Pagination)> {
        let body = self.get("news.json", params).await?;
        decode_list(&body, "news")
    }

    /// Lists the news of one project.
    pub async fn list_project_news(
        &self,
        project_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<News>, Pagination)> {
        let body = self
            .get(&format!("projects/{}/news.json", project_id), params)
            .await?;
        decode_list(&body, "news")
    }
}
