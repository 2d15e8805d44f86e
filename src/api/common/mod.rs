//
//  redmine-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Redmine REST API
//!
//! This module provides the shared types used by every resource module: the
//! unified [`ApiError`], the [`Params`] query bag, list [`Pagination`], the
//! polymorphic [`CustomField`], the [`IncludeSet`] trait, and the codec
//! helpers that map between wire JSON and domain structs.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`Params`] - Filter, sort and pagination parameters for list calls
//! - [`Pagination`] - `total_count` / `limit` / `offset` of a list response
//! - [`CustomField`] - Custom field with a single or multiple value
//! - [`IncludeSet`] - Flags translated into the `include` query parameter
//!
//! # Example
//!
//! ```rust
//! use redmine_cli::api::common::{ApiError, Params};
//!
//! let params = Params::new().limit(25).offset(50).filter("status_id", "open");
//! assert_eq!(params.len(), 3);
//!
//! let err = ApiError::MissingField("Project");
//! assert_eq!(err.to_string(), "Missing required field: Project");
//! ```

use thiserror::Error;

pub mod codec;
mod custom_fields;
mod include;
mod pagination;

pub use custom_fields::*;
pub use include::*;
pub use pagination::*;

/// Unified error type for all Redmine API operations.
///
/// Every operation on [`RedmineClient`](crate::api::RedmineClient) returns
/// `Result<T, ApiError>`. Errors are never retried or recovered inside the
/// library; they propagate directly to the caller.
///
/// # Variants
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `Network` | Connection or IO failure while sending or reading |
/// | `Decode` | A response body is not the JSON shape expected |
/// | `InvalidUrl` | The base URL or a built URL cannot be parsed |
/// | `Validation` | The service answered `422` with validation messages |
/// | `UnexpectedStatus` | Any other status than the verb's success status |
/// | `MissingField` | A create call lacks a required parent reference |
/// | `Certificate` | A root CA bundle could not be loaded |
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::common::ApiError;
///
/// let err = ApiError::Validation(vec![
///     "Name can't be blank".to_string(),
///     "Identifier is too short".to_string(),
/// ]);
/// assert_eq!(err.to_string(), "Name can't be blank; Identifier is too short");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    ///
    /// This covers connection failures, timeouts enforced by the underlying
    /// client, DNS resolution errors and body read failures.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service rejected the payload with `422 Unprocessable Entity`.
    ///
    /// # Parameters
    ///
    /// - `0` - The messages from the `errors` array of the response body
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    /// The service answered with a status other than the expected one.
    ///
    /// # Parameters
    ///
    /// - `status` - The status line, e.g. `500 Internal Server Error`
    /// - `body` - The raw response body
    #[error("{status} {body}")]
    UnexpectedStatus {
        /// Status line of the response.
        status: String,
        /// Raw response body text.
        body: String,
    },

    /// A required parent reference was missing before a create call.
    ///
    /// No request is sent when this error is returned.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A PEM root certificate could not be parsed.
    #[error("Invalid root certificate: {0}")]
    Certificate(String),
}

/// Convenience alias used by every resource operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Generic query parameter bag for list and get calls.
///
/// Parameters are passed through to the service untouched: the library does
/// not interpret filter semantics. Insertion order is preserved and setting a
/// key twice replaces the earlier value.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::common::Params;
///
/// let params = Params::new()
///     .offset(25)
///     .limit(25)
///     .sort("updated_on:desc")
///     .filter("project_id", "3");
///
/// let pairs: Vec<_> = params.iter().collect();
/// assert_eq!(pairs[0], ("offset", "25"));
/// assert_eq!(pairs[3], ("project_id", "3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `offset` pagination parameter.
    pub fn offset(self, offset: u32) -> Self {
        self.filter("offset", offset.to_string())
    }

    /// Sets the `limit` pagination parameter.
    pub fn limit(self, limit: u32) -> Self {
        self.filter("limit", limit.to_string())
    }

    /// Sets the `sort` parameter, e.g. `"priority:desc,updated_on"`.
    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.filter("sort", sort)
    }

    /// Sets an arbitrary filter parameter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a parameter in place, replacing any previous value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Returns the value set for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
