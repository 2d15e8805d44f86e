//
//  redmine-cli
//  api/resources/enumerations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Enumerations
//!
//! Redmine exposes three administrator-defined value lists under
//! `/enumerations/`. They share one shape and decode into [`Enumeration`].
//!
//! | Operation | Path | Key |
//! |-----------|------|-----|
//! | `list_issue_priorities` | `enumerations/issue_priorities.json` | `issue_priorities` |
//! | `list_time_entry_activities` | `enumerations/time_entry_activities.json` | `time_entry_activities` |
//! | `list_document_categories` | `enumerations/document_categories.json` | `document_categories` |

use serde::Deserialize;

use crate::api::common::codec::{decode_list, nullable};
use crate::api::common::{ApiResult, CustomField, Pagination, Params};
use crate::api::RedmineClient;

/// An issue priority, time entry activity or document category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Enumeration {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub active: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
}

impl Enumeration {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

impl RedmineClient {
    async fn list_enumeration(
        &self,
        kind: &'static str,
        params: &Params,
    ) -> ApiResult<(Vec<Enumeration>, Pagination)> {
        let body = self
            .get(&format!("enumerations/{}.json", kind), params)
            .await?;
        decode_list(&body, kind)
    }

    /// Lists issue priorities.
    pub async fn list_issue_priorities(
        &self,
        params: &Params,
    ) -> ApiResult<(Vec<Enumeration>, Pagination)> {
        self.list_enumeration("issue_priorities", params).await
    }

    /// Lists time entry activities.
    pub async fn list_time_entry_activities(
        &self,
        params: &Params,
    ) -> ApiResult<(Vec<Enumeration>, Pagination)> {
        self.list_enumeration("time_entry_activities", params).await
    }

    /// Lists document categories.
    pub async fn list_document_categories(
        &self,
        params: &Params,
    ) -> ApiResult<(Vec<Enumeration>, Pagination)> {
        self.list_enumeration("document_categories", params).await
    }
}
