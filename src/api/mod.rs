//
//  redmine-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Redmine REST API
//!
//! Typed access to the Redmine REST API.
//!
//! ## Module Structure
//!
//! - [`client`]: [`RedmineClient`], URL building, authentication and status
//!   handling
//! - [`common`]: Errors, query parameters, pagination, custom fields,
//!   include sets and the wire codec helpers
//! - [`resources`]: One module per resource kind. Each defines the domain
//!   types and adds its operations to [`RedmineClient`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use redmine_cli::api::RedmineClient;
//! use redmine_cli::api::common::Params;
//! use redmine_cli::api::resources::IssueInclude;
//!
//! # async fn run() -> Result<(), redmine_cli::api::ApiError> {
//! let client = RedmineClient::with_api_key("https://redmine.example.com", "abc123")?;
//!
//! let (issues, page) = client
//!     .list_issues(&Params::new().filter("status_id", "open").limit(10))
//!     .await?;
//! println!("{} of {} open issues", issues.len(), page.total_count);
//!
//! let include = IssueInclude { journals: true, ..Default::default() };
//! let issue = client.get_issue(issues[0].id, &include).await?;
//! println!("{} has {} journals", issue.subject, issue.journals.len());
//! # Ok(())
//! # }
//! ```

pub mod client;

pub mod common;

pub mod resources;

pub use client::RedmineClient;

pub use common::{ApiError, ApiResult, Pagination, Params};
