//
//  redmine-cli
//  api/resources/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Users API types and operations.
//!
//! Users are also the target of most nested references (`author`,
//! `assigned_to`, `user`). Those references only carry `id` and `name`;
//! the remaining fields stay at their zero values.
//!
//! # Operations
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `list_users` | `GET /users.json` |
//! | `get_user` | `GET /users/<id>.json` |
//! | `get_current_user` | `GET /users/current.json` |
//! | `create_user` | `POST /users.json` |
//! | `update_user` | `PUT /users/<id>.json` |
//! | `delete_user` | `DELETE /users/<id>.json` |
//!
//! # Example
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::resources::{User, UserInclude};
//!
//! # async fn run(client: RedmineClient) -> Result<(), redmine_cli::api::ApiError> {
//! let me = client
//!     .get_current_user(&UserInclude { groups: true, ..Default::default() })
//!     .await?;
//! println!("{} belongs to {} groups", me.login, me.groups.len());
//!
//! let created = client
//!     .create_user(&User {
//!         login: "jdoe".to_string(),
//!         firstname: "John".to_string(),
//!         lastname: "Doe".to_string(),
//!         mail: "jdoe@example.com".to_string(),
//!         password: "s3cret-passw0rd".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Group, Membership};
use crate::api::common::codec::{
    custom_field_values, decode_list, decode_single, envelope, is_zero, nullable, timestamp,
};
use crate::api::common::{ApiResult, CustomField, IncludeSet, Pagination, Params};
use crate::api::RedmineClient;

/// A Redmine user account.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "nullable")]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub login: String,
    #[serde(default, deserialize_with = "nullable")]
    pub firstname: String,
    #[serde(default, deserialize_with = "nullable")]
    pub lastname: String,
    /// Display name, present on nested references.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub mail: String,
    /// Write-only; never returned by the service.
    #[serde(skip)]
    pub password: String,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "nullable")]
    pub memberships: Vec<Membership>,
    #[serde(default, deserialize_with = "nullable")]
    pub groups: Vec<Group>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub last_login_on: Option<DateTime<Utc>>,
}

impl User {
    /// A reference to the user with `id`, for use in writes.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Best human-readable name: `name`, then "first last", then `login`.
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        let full = format!("{} {}", self.firstname, self.lastname);
        let full = full.trim();
        if full.is_empty() {
            self.login.clone()
        } else {
            full.to_string()
        }
    }

    pub(crate) fn encode(&self) -> UserPayload<'_> {
        UserPayload {
            login: &self.login,
            password: &self.password,
            firstname: &self.firstname,
            lastname: &self.lastname,
            mail: &self.mail,
            custom_field_values: custom_field_values(&self.custom_fields),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UserPayload<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    login: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    password: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    firstname: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    lastname: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    mail: &'a str,
    #[serde(skip_serializing_if = "is_zero")]
    custom_field_values: BTreeMap<String, Value>,
}

/// Associations to expand on `get_user` and `get_current_user`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserInclude {
    pub memberships: bool,
    pub groups: bool,
}

impl IncludeSet for UserInclude {
    fn flags(&self) -> Vec<(&'static str, bool)> {
        vec![("memberships", self.memberships), ("groups", self.groups)]
    }
}

impl RedmineClient {
    /// Lists users. Requires administrator privileges.
    ///
    /// Useful filters: `status`, `name`, `group_id`.
    pub async fn list_users(&self, params: &Params) -> ApiResult<(Vec<User>, Pagination)> {
        let body = self.get("users.json", params).await?;
        decode_list(&body, "users")
    }

    /// Fetches one user.
    pub async fn get_user(&self, id: u64, include: &UserInclude) -> ApiResult<User> {
        self.fetch_user(&format!("users/{}.json", id), include).await
    }

    /// Fetches the user the credentials belong to.
    pub async fn get_current_user(&self, include: &UserInclude) -> ApiResult<User> {
        self.fetch_user("users/current.json", include).await
    }

    async fn fetch_user(&self, path: &str, include: &UserInclude) -> ApiResult<User> {
        let mut params = Params::new();
        include.apply(&mut params);
        let body = self.get(path, &params).await?;
        decode_single(&body, "user")
    }

    /// Creates a user and returns it as stored by the service.
    pub async fn create_user(&self, user: &User) -> ApiResult<User> {
        let body = self
            .post("users.json", &envelope("user", user.encode()))
            .await?;
        decode_single(&body, "user")
    }

    /// Updates the user identified by `user.id` with its non-zero fields.
    pub async fn update_user(&self, user: &User) -> ApiResult<()> {
        self.put(
            &format!("users/{}.json", user.id),
            &envelope("user", user.encode()),
        )
        .await
    }

    pub async fn delete_user(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("users/{}.json", id), &Params::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ApiError;
    use crate::api::testing::mock_client;
    use mockito::Matcher;
    use serde_json::json;

    const USER_BODY: &str = r#"{"user": {
        "id": 5, "login": "jsmith", "firstname": "John", "lastname": "Smith",
        "mail": "jsmith@example.com", "created_on": "2022-01-10T08:00:00Z",
        "last_login_on": null,
        "groups": [{"id": 20, "name": "Developers"}],
        "memberships": [{"id": 1, "project": {"id": 3, "name": "Web"},
                         "roles": [{"id": 4, "name": "Developer"}]}]
    }}"#;

    #[tokio::test]
    async fn test_get_current_user_with_includes() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("GET", "/users/current.json")
            .match_query(Matcher::UrlEncoded(
                "include".into(),
                "groups,memberships".into(),
            ))
            .with_status(200)
            .with_body(USER_BODY)
            .create_async()
            .await;

        let include = UserInclude {
            memberships: true,
            groups: true,
        };
        let user = client.get_current_user(&include).await.unwrap();
        assert_eq!(user.login, "jsmith");
        assert_eq!(user.groups[0].name, "Developers");
        assert_eq!(user.memberships[0].roles[0].name, "Developer");
        assert!(user.created_on.is_some());
        assert!(user.last_login_on.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_user_without_includes() {
        let (mut server, client) = mock_client().await;
        let mock = server
            .mock("GET", "/users/5.json")
            .with_status(200)
            .with_body(USER_BODY)
            .create_async()
            .await;

        let user = client.get_user(5, &UserInclude::default()).await.unwrap();
        assert_eq!(user.display_name(), "John Smith");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let (mut server, client) = mock_client().await;
        let _mock = server
            .mock("POST", "/users.json")
            .match_body(Matcher::Json(json!({
                "user": {"login": "jdoe", "password": "pw", "mail": "jdoe@example.com"}
            })))
            .with_status(422)
            .with_body(r#"{"errors": ["Password is too short (minimum is 8 characters)"]}"#)
            .create_async()
            .await;

        let user = User {
            login: "jdoe".to_string(),
            password: "pw".to_string(),
            mail: "jdoe@example.com".to_string(),
            ..Default::default()
        };
        let err = client.create_user(&user).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("Password is too short"));
    }

    #[test]
    fn test_decoded_user_reencodes_without_zero_fields() {
        let user: User = decode_single(USER_BODY, "user").unwrap();
        let encoded = serde_json::to_value(user.encode()).unwrap();
        assert_eq!(
            encoded,
            json!({
                "login": "jsmith",
                "firstname": "John",
                "lastname": "Smith",
                "mail": "jsmith@example.com"
            })
        );
    }

    #[test]
    fn test_display_name_fallbacks() {
        let reference = User {
            name: "Jane Roe".to_string(),
            ..Default::default()
        };
        assert_eq!(reference.display_name(), "Jane Roe");

        let login_only = User {
            login: "bot".to_string(),
            ..Default::default()
        };
        assert_eq!(login_only.display_name(), "bot");
    }
}
