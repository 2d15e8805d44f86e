//
//  redmine-cli
//  api/resources/attachments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Attachment metadata (`GET /attachments/<id>.json`).
//!
//! Attachments are read-only through this API. New files are attached by
//! uploading them first (see [`uploads`](super::uploads)) and passing the
//! resulting tokens to an issue create or update.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::User;
use crate::api::common::codec::{decode_single, nullable, timestamp};
use crate::api::common::{ApiResult, Params};
use crate::api::RedmineClient;

/// Metadata of an attached file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub filename: String,
    /// Size in bytes.
    #[serde(default, deserialize_with = "nullable")]
    pub filesize: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub content_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    /// Direct download URL.
    #[serde(default, deserialize_with = "nullable")]
    pub content_url: String,
    #[serde(default)]
    pub author: Option<Box<User>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
}

impl RedmineClient {
    pub async fn get_attachment(&self, id: u64) -> ApiResult<Attachment> {
        let body = self
            .get(&format!("attachments/{}.json", id), &Params::new())
            .await?;
        decode_single(&body, "attachment")
    }
}
