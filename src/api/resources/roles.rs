//
//  redmine-cli
//  api/resources/roles.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Roles (`GET /roles.json`, `GET /roles/<id>.json`).
//!
//! Roles appear nested in memberships, where `inherited` marks a role that
//! comes from a group membership rather than a direct one.

use serde::Deserialize;

use crate::api::common::codec::{decode_list, decode_single, nullable};
use crate::api::common::{ApiResult, Pagination, Params};
use crate::api::RedmineClient;

/// A project role such as "Manager" or "Developer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub inherited: bool,
    /// Permission names, only present on `get_role`.
    #[serde(default, deserialize_with = "nullable")]
    pub permissions: Vec<String>,
}

impl Role {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

impl RedmineClient {
    /// Lists every role defined on the instance.
    pub async fn list_roles(&self, params: &Params) -> ApiResult<(Vec<Role>, Pagination)> {
        let body = self.get("roles.json", params).await?;
        decode_list(&body, "roles")
    }

    /// Fetches one role with its permissions.
    pub async fn get_role(&self, id: u64) -> ApiResult<Role> {
        let body = self.get(&format!("roles/{}.json", id), &Params::new()).await?;
        decode_single(&body, "role")
    }
}
