//
//  redmine-cli
//  api/resources/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Groups API types and operations.
//!
//! Group management requires administrator privileges. Besides the usual
//! CRUD operations, users are added to and removed from a group through the
//! `groups/<id>/users` sub-collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Membership, User};
use crate::api::common::codec::{
    custom_field_values, decode_list, decode_single, envelope, is_zero, nullable,
};
use crate::api::common::{ApiResult, CustomField, IncludeSet, Pagination, Params};
use crate::api::RedmineClient;

/// A group of users.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// Members, present with `GroupInclude::users`.
    #[serde(default, deserialize_with = "nullable")]
    pub users: Vec<User>,
    /// Project memberships, present with `GroupInclude::memberships`.
    #[serde(default, deserialize_with = "nullable")]
    pub memberships: Vec<Membership>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
}

impl Group {
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub(crate) fn encode(&self) -> GroupPayload<'_> {
        GroupPayload {
            name: &self.name,
            user_ids: self.users.iter().map(|u| u.id).collect(),
            custom_field_values: custom_field_values(&self.custom_fields),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    name: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    user_ids: Vec<u64>,
    #[serde(skip_serializing_if = "is_zero")]
    custom_field_values: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct GroupUser {
    user_id: u64,
}

/// Associations to expand on `get_group`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupInclude {
    pub users: bool,
    pub memberships: bool,
}

impl IncludeSet for GroupInclude {
    fn flags(&self) -> Vec<(&'static str, bool)> {
        vec![("users", self.users), ("memberships", self.memberships)]
    }
}

impl RedmineClient {
    pub async fn list_groups(&self, params: &Params) -> ApiResult<(Vec<Group>, Pagination)> {
        let body = self.get("groups.json", params).await?;
        decode_list(&body, "groups")
    }

    pub async fn get_group(&self, id: u64, include: &GroupInclude) -> ApiResult<Group> {
        let mut params = Params::new();
        include.apply(&mut params);
        let body = self.get(&format!("groups/{}.json", id), &params).await?;
        decode_single(&body, "group")
    }

    /// Creates a group. Initial members are taken from `group.users`.
    pub async fn create_group(&self, group: &Group) -> ApiResult<Group> {
        let body = self
            .post("groups.json", &envelope("group", group.encode()))
            .await?;
        decode_single(&body, "group")
    }

    /// Updates the group identified by `group.id`.
    ///
    /// A non-empty `users` list replaces the whole member list.
    pub async fn update_group(&self, group: &Group) -> ApiResult<()> {
        self.put(
            &format!("groups/{}.json", group.id),
            &envelope("group", group.encode()),
        )
        .await
    }

    pub async fn delete_group(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("groups/{}.json", id), &Params::new())
            .await
    }

    /// Adds one user to a group.
    ///
    /// Unlike entity creation this answers `204 No Content`, so it is sent
    /// as a raw exchange.
    pub async fn add_user_to_group(&self, group_id: u64, user_id: u64) -> ApiResult<()> {
        self.post_no_content(
            &format!("groups/{}/users.json", group_id),
            &GroupUser { user_id },
        )
        .await
    }

    /// Removes one user from a group.
    pub async fn remove_user_from_group(&self, group_id: u64, user_id: u64) -> ApiResult<()> {
        self.delete(
            &format!("groups/{}/users/{}.json", group_id, user_id),
            &Params::new(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::mock_client;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_group_with_users() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("GET", "/groups/20.json")
            .match_query(Matcher::UrlEncoded("include".into(), "users".into()))
            .with_status(200)
            .with_body(
                r#"{"group": {"id": 20, "name": "Developers",
                    "users": [{"id": 5, "name": "John Smith"}, {"id": 8, "name": "Dave Loper"}]}}"#,
            )
            .create_async()
            .await;

        let include = GroupInclude {
            users: true,
            ..Default::default()
        };
        let group = client.get_group(20, &include).await.unwrap();
        assert_eq!(group.users.len(), 2);
        assert_eq!(group.users[1].name, "Dave Loper");
        assert!(group.memberships.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_group_sends_user_ids() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", "/groups.json")
            .match_body(Matcher::Json(
                json!({"group": {"name": "Ops", "user_ids": [5, 8]}}),
            ))
            .with_status(201)
            .with_body(r#"{"group": {"id": 21, "name": "Ops"}}"#)
            .create_async()
            .await;

        let group = Group {
            name: "Ops".to_string(),
            users: vec![User::with_id(5), User::with_id(8)],
            ..Default::default()
        };
        let created = client.create_group(&group).await.unwrap();
        assert_eq!(created.id, 21);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_user_to_group() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("POST", "/groups/21/users.json")
            .match_body(Matcher::Json(json!({"user_id": 5})))
            .with_status(204)
            .create_async()
            .await;

        client.add_user_to_group(21, 5).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_user_from_group() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("DELETE", "/groups/21/users/5.json")
            .with_status(204)
            .create_async()
            .await;

        client.remove_user_from_group(21, 5).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_include_order() {
        let include = GroupInclude {
            users: true,
            memberships: true,
        };
        assert_eq!(include.to_param().as_deref(), Some("memberships,users"));
        assert!(GroupInclude::default().to_param().is_none());
    }
}
