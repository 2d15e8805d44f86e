//
//  redmine-cli
//  api/resources/memberships.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project memberships.
//!
//! A membership binds a user or a group to a project with a set of roles.
//! Memberships are created under their project and addressed by their own
//! id afterwards:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `list_project_memberships` | `GET /projects/<id>/memberships.json` |
//! | `get_membership` | `GET /memberships/<id>.json` |
//! | `create_membership` | `POST /projects/<project.id>/memberships.json` |
//! | `update_membership` | `PUT /memberships/<id>.json` |
//! | `delete_membership` | `DELETE /memberships/<id>.json` |
//!
//! Only the roles of a membership can be changed once it exists.

use serde::{Deserialize, Serialize};

use super::{Group, Project, Role, User};
use crate::api::common::codec::{decode_list, decode_single, envelope, is_zero, nullable};
use crate::api::common::{ApiError, ApiResult, Pagination, Params};
use crate::api::RedmineClient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Membership {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default)]
    pub project: Option<Box<Project>>,
    /// Set for a user membership.
    #[serde(default)]
    pub user: Option<Box<User>>,
    /// Set for a group membership.
    #[serde(default)]
    pub group: Option<Box<Group>>,
    #[serde(default, deserialize_with = "nullable")]
    pub roles: Vec<Role>,
}

impl Membership {
    fn encode(&self) -> MembershipPayload {
        // Redmine takes a group id in `user_id` as well.
        let principal = self
            .user
            .as_ref()
            .map(|u| u.id)
            .or_else(|| self.group.as_ref().map(|g| g.id))
            .unwrap_or_default();

        MembershipPayload {
            user_id: principal,
            role_ids: self.roles.iter().map(|r| r.id).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MembershipPayload {
    #[serde(skip_serializing_if = "is_zero")]
    user_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    role_ids: Vec<u64>,
}

impl RedmineClient {
    /// Lists the memberships of a project.
    pub async fn list_project_memberships(
        &self,
        project_id: u64,
        params: &Params,
    ) -> ApiResult<(Vec<Membership>, Pagination)> {
        let body = self
            .get(&format!("projects/{}/memberships.json", project_id), params)
            .await?;
        decode_list(&body, "memberships")
    }

    pub async fn get_membership(&self, id: u64) -> ApiResult<Membership> {
        let body = self
            .get(&format!("memberships/{}.json", id), &Params::new())
            .await?;
        decode_single(&body, "membership")
    }

    /// Creates a membership in `membership.project`.
    ///
    /// Returns [`ApiError::MissingField`] without sending anything when the
    /// project is not set.
    pub async fn create_membership(&self, membership: &Membership) -> ApiResult<Membership> {
        let project = membership
            .project
            .as_ref()
            .ok_or(ApiError::MissingField("Project"))?;
        let body = self
            .post(
                &format!("projects/{}/memberships.json", project.id),
                &envelope("membership", membership.encode()),
            )
            .await?;
        decode_single(&body, "membership")
    }

    /// Replaces the roles of the membership identified by `membership.id`.
    pub async fn update_membership(&self, membership: &Membership) -> ApiResult<()> {
        self.put(
            &format!("memberships/{}.json", membership.id),
            &envelope("membership", membership.encode()),
        )
        .await
    }

    pub async fn delete_membership(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("memberships/{}.json", id), &Params::new())
            .await
    }
}
