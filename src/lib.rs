//
//  redmine-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Redmine CLI Library
//!
//! A typed client for the Redmine REST API, and the command-line interface
//! built on top of it.
//!
//! ## Overview
//!
//! Every Redmine resource (issues, projects, users, time entries, wiki
//! pages, ...) is a plain Rust struct that decodes from the service's JSON
//! and encodes back into the partial-update bodies the service expects.
//! Operations are `async` methods on [`RedmineClient`].
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP transport, wire codec and resource operations
//! - [`auth`]: Credentials (login/password or API key)
//! - [`config`]: Configuration file and environment overrides
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Terminal output helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use redmine_cli::api::{Params, RedmineClient};
//! use redmine_cli::api::resources::IssueInclude;
//!
//! # async fn run() -> Result<(), redmine_cli::api::ApiError> {
//! let client = RedmineClient::with_api_key("https://redmine.example.com", "secret-key")?;
//!
//! let (issues, page) = client
//!     .list_issues(&Params::new().filter("project_id", "3").limit(10))
//!     .await?;
//! println!("{} of {} issues", issues.len(), page.total_count);
//!
//! let issue = client
//!     .get_issue(42, &IssueInclude { journals: true, ..Default::default() })
//!     .await?;
//! println!("#{} {}", issue.id, issue.subject);
//! # Ok(())
//! # }
//! ```

/// Redmine REST API client.
///
/// Contains the transport ([`api::client`]), the shared wire codec
/// ([`api::common`]) and one module per resource ([`api::resources`]).
pub mod api;

/// Credentials attached to every request as HTTP Basic authentication.
pub mod auth;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/rdm/config.toml`
/// - macOS: `~/Library/Application Support/org.redmine.rdm/config.toml`
/// - Windows: `%APPDATA%\redmine\rdm\config\config.toml`
pub mod config;

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Output formatting for the CLI.
pub mod output;

pub use api::RedmineClient;
pub use cli::Cli;
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes.
pub const APP_NAME: &str = "rdm";

/// Application version constant.
///
/// The current version of the crate, derived from Cargo.toml at compile
/// time. Also sent in the `User-Agent` header.
///
/// # Example
///
/// ```rust
/// use redmine_cli::VERSION;
///
/// println!("rdm version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Example
///
/// ```rust,no_run
/// use redmine_cli::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::NOT_FOUND);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Authentication required or rejected (`401`/`403`).
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found (`404`).
    pub const NOT_FOUND: i32 = 8;

    /// The service rejected the request with validation errors (`422`).
    pub const VALIDATION: i32 = 16;
}
