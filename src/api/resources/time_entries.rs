//
//  redmine-cli
//  api/resources/time_entries.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Time tracking API types and operations.
//!
//! A time entry is logged against an issue or directly against a project.
//! When both are set the service checks that the issue belongs to the
//! project.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::resources::{Enumeration, Issue, TimeEntry};
//!
//! # async fn run(client: RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
//! let entry = client
//!     .create_time_entry(&TimeEntry {
//!         issue: Some(Box::new(Issue::with_id(42))),
//!         hours: 1.5,
//!         activity: Some(Box::new(Enumeration::with_id(9))),
//!         comments: "Code review".to_string(),
//!         spent_on: NaiveDate::from_ymd_opt(2026, 3, 2),
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

use super::{Enumeration, Issue, Project, User};
use crate::api::common::codec::{
    custom_field_values, date, decode_list, decode_single, envelope, format_date, is_zero,
    nullable, timestamp,
};
use crate::api::common::{ApiResult, CustomField, Pagination, Params};
use crate::api::RedmineClient;

/// Time spent on an issue or project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeEntry {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub hours: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub comments: String,
    #[serde(default, deserialize_with = "date")]
    pub spent_on: Option<NaiveDate>,
    #[serde(default)]
    pub issue: Option<Box<Issue>>,
    #[serde(default)]
    pub project: Option<Box<Project>>,
    /// One of the time entry activities.
    #[serde(default)]
    pub activity: Option<Box<Enumeration>>,
    /// Owner of the entry; defaults to the current user on create.
    #[serde(default)]
    pub user: Option<Box<User>>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_on: Option<DateTime<Utc>>,
}

impl TimeEntry {
    fn encode(&self) -> TimeEntryPayload<'_> {
        TimeEntryPayload {
            project_id: self.project.as_ref().map(|p| p.id).unwrap_or_default(),
            issue_id: self.issue.as_ref().map(|i| i.id).unwrap_or_default(),
            user_id: self.user.as_ref().map(|u| u.id).unwrap_or_default(),
            activity_id: self.activity.as_ref().map(|a| a.id).unwrap_or_default(),
            hours: self.hours,
            comments: &self.comments,
            spent_on: format_date(self.spent_on),
            custom_field_values: custom_field_values(&self.custom_fields),
        }
    }
}

#[derive(Debug, Serialize)]
struct TimeEntryPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    project_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    issue_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    user_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    activity_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    hours: f64,
    #[serde(skip_serializing_if = "is_zero")]
    comments: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    spent_on: String,
    #[serde(skip_serializing_if = "is_zero")]
    custom_field_values: BTreeMap<String, Value>,
}

impl RedmineClient {
    /// Lists time entries.
    ///
    /// Useful filters: `project_id`, `user_id`, `spent_on`, `from`, `to`.
    pub async fn list_time_entries(
        &self,
        params: &Params,
    ) -> ApiResult<(Vec<TimeEntry>, Pagination)> {
        let body = self.get("time_entries.json", params).await?;
        decode_list(&body, "time_entries")
    }

    pub async fn get_time_entry(&self, id: u64) -> ApiResult<TimeEntry> {
        let body = self
            .get(&format!("time_entries/{}.json", id), &Params::new())
            .await?;
        decode_single(&body, "time_entry")
    }

    pub async fn create_time_entry(&self, entry: &TimeEntry) -> ApiResult<TimeEntry> {
        let body = self
            .post("time_entries.json", &envelope("time_entry", entry.encode()))
            .await?;
        decode_single(&body, "time_entry")
    }

    pub async fn update_time_entry(&self, entry: &TimeEntry) -> ApiResult<()> {
        self.put(
            &format!("time_entries/{}.json", entry.id),
            &envelope("time_entry", entry.encode()),
        )
        .await
    }

    pub async fn delete_time_entry(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("time_entries/{}.json", id), &Params::new())
            .await
    }
}
