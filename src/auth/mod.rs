//
//  redmine-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Redmine accepts two kinds of credentials over HTTP Basic authentication:
//!
//! - **Username and password** of a Redmine account.
//! - **API access key** taken from the "My account" page. It is sent as the
//!   Basic username with an empty password.
//!
//! Both are attached to every request by [`Credentials::apply_to_request`].
//!
//! ## Example
//!
//! ```rust
//! use redmine_cli::auth::Credentials;
//!
//! let key = Credentials::api_key("0123456789abcdef");
//! assert_eq!(key.kind(), "api-key");
//!
//! // Secrets never appear in debug output.
//! assert!(!format!("{key:?}").contains("0123456789abcdef"));
//! ```

use std::fmt;

use reqwest::RequestBuilder;

/// Credentials used to authenticate against a Redmine instance.
///
/// # Variants
///
/// - `Basic`: A Redmine login and its password.
/// - `ApiKey`: A personal API access key.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP Basic authentication with a login and password.
    Basic {
        /// The Redmine login.
        username: String,
        /// The account password.
        password: String,
    },
    /// API access key, sent as the Basic username with an empty password.
    ApiKey {
        /// The key shown on the user's account page.
        key: String,
    },
}

impl Credentials {
    /// Creates username/password credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates API key credentials.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey { key: key.into() }
    }

    /// Applies the credentials to an HTTP request.
    ///
    /// # Parameters
    ///
    /// - `request`: The [`RequestBuilder`] to authenticate.
    ///
    /// # Returns
    ///
    /// The request with an `Authorization: Basic ...` header.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use redmine_cli::auth::Credentials;
    /// use reqwest::Client;
    ///
    /// async fn fetch(credentials: &Credentials) {
    ///     let client = Client::new();
    ///     let request = client.get("https://redmine.example.com/users/current.json");
    ///     let response = credentials.apply_to_request(request).send().await;
    /// }
    /// ```
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::ApiKey { key } => request.basic_auth(key, Some("")),
        }
    }

    /// Short label for log lines and status output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::ApiKey { .. } => "api-key",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::ApiKey { .. } => f.debug_struct("ApiKey").field("key", &"***").finish(),
        }
    }
}
