//
//  redmine-cli
//  api/resources/wiki.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Wiki pages API types and operations.
//!
//! Wiki pages are addressed by project and title rather than by id:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `list_wiki_pages` | `GET /projects/<id>/wiki/index.json` |
//! | `get_wiki_page` | `GET /projects/<id>/wiki/<title>[/<version>].json` |
//! | `save_wiki_page` | `PUT /projects/<id>/wiki/<title>.json` |
//! | `delete_wiki_page` | `DELETE /projects/<id>/wiki/<title>.json` |
//!
//! Saving is create-or-update: the service answers `201 Created` with the new
//! page when the title did not exist yet, and `204 No Content` otherwise.
//! Setting `version` on save turns it into an optimistic-lock check: the
//! update is rejected when the page has moved past that version.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{Attachment, User};
use crate::api::common::codec::{
    decode_list, decode_single, envelope, is_zero, nullable, timestamp,
};
use crate::api::common::{ApiResult, IncludeSet, Pagination, Params};
use crate::api::RedmineClient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WikiPage {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    /// Parent page; only its `title` is set.
    #[serde(default)]
    pub parent: Option<Box<WikiPage>>,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    /// Edit comment of this version.
    #[serde(default, deserialize_with = "nullable")]
    pub comments: String,
    #[serde(default, deserialize_with = "nullable")]
    pub version: u32,
    #[serde(default)]
    pub author: Option<Box<User>>,
    #[serde(default, deserialize_with = "nullable")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl WikiPage {
    fn encode(&self) -> WikiPagePayload<'_> {
        WikiPagePayload {
            text: &self.text,
            comments: &self.comments,
            version: self.version,
            parent_title: self
                .parent
                .as_ref()
                .map(|p| p.title.as_str())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WikiPagePayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    text: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    comments: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    version: u32,
    #[serde(skip_serializing_if = "is_zero")]
    parent_title: &'a str,
}

/// Associations to expand on `get_wiki_page`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WikiPageInclude {
    pub attachments: bool,
}

impl IncludeSet for WikiPageInclude {
    fn flags(&self) -> Vec<(&'static str, bool)> {
        vec![("attachments", self.attachments)]
    }
}

fn page_path(project_id: u64, title: &str) -> String {
    format!("projects/{}/wiki/{}.json", project_id, title)
}

impl RedmineClient {
    /// Lists the pages of a project wiki. Entries carry no `text`.
    pub async fn list_wiki_pages(
        &self,
        project_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<WikiPage>, Pagination)> {
        let body = self
            .get(&format!("projects/{}/wiki/index.json", project_id), params)
            .await?;
        decode_list(&body, "wiki_pages")
    }

    /// Fetches a page, or one of its past versions when `version` is given.
    ///
    /// `Some(0)` is treated like `None` and fetches the current version.
    pub async fn get_wiki_page(
        &self,
        project_id: u64,
        title: &str,
        version: Option<u32>,
        include: &WikiPageInclude,
    ) -> ApiResult<WikiPage> {
        let path = match version {
            Some(version) if version > 0 => {
                format!("projects/{}/wiki/{}/{}.json", project_id, title, version)
            }
            _ => page_path(project_id, title),
        };
        let mut params = Params::new();
        include.apply(&mut params);
        let body = self.get(&path, &params).await?;
        decode_single(&body, "wiki_page")
    }

    /// Creates or updates the page titled `page.title`.
    ///
    /// # Returns
    ///
    /// `Some(page)` when the page was created, `None` when an existing page
    /// was updated.
    pub async fn save_wiki_page(
        &self,
        project_id: u64,
        page: &WikiPage,
    ) -> ApiResult<Option<WikiPage>> {
        let body = self
            .put_accepting(
                &page_path(project_id, &page.title),
                &envelope("wiki_page", page.encode()),
                &[StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT],
            )
            .await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        decode_single(&body, "wiki_page").map(Some)
    }

    /// Deletes a page with its history and child pages.
    pub async fn delete_wiki_page(&self, project_id: u64, title: &str) -> ApiResult<()> {
        self.delete(&page_path(project_id, title), &Params::new())
            .await
    }
}
