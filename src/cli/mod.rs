//
//  redmine-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod issue;
mod project;
mod time;
mod upload;
mod user;

pub use issue::IssueCommand;
pub use project::ProjectCommand;
pub use time::TimeCommand;
pub use upload::UploadCommand;
pub use user::UserCommand;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::api::{ApiError, Params, RedmineClient};
use crate::config::Config;
use crate::exit_codes;
use crate::output::{OutputFormat, OutputWriter};

/// Redmine CLI - Work with Redmine from the command line
#[derive(Parser, Debug)]
#[command(
    name = "rdm",
    version,
    about = "Work with Redmine from the command line",
    long_about = "rdm is a CLI for the Redmine REST API.\n\n\
                  It brings issues, projects, users and time tracking to your terminal.",
    propagate_version = true,
    after_help = "Use 'rdm <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Base URL of the Redmine instance
    #[arg(long, global = true, env = "REDMINE_URL")]
    pub url: Option<String>,

    /// API key (see "My account" in Redmine)
    #[arg(long, global = true, env = "REDMINE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to an alternative config file
    #[arg(long, global = true, env = "RDM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Loads the configuration, letting command-line flags win over the
    /// file and environment.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load_from(path)?;
                config.apply_overrides(|name| std::env::var(name).ok());
                config
            }
            None => Config::load()?,
        };

        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            config.url = Some(url.to_string());
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            config.api_key = Some(key.to_string());
        }
        Ok(config)
    }

    pub fn client(&self) -> Result<RedmineClient> {
        RedmineClient::from_config(&self.load_config()?)
    }

    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }
}

/// Paging flags shared by list commands.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Maximum number of items to list
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Number of items to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

impl PageArgs {
    pub fn params(&self) -> Params {
        let params = Params::new().limit(self.limit);
        if self.offset > 0 {
            params.offset(self.offset)
        } else {
            params
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage issues
    #[command(visible_alias = "i")]
    Issue(IssueCommand),

    /// Browse projects
    #[command(visible_alias = "proj")]
    Project(ProjectCommand),

    /// Browse users
    User(UserCommand),

    /// Track spent time
    Time(TimeCommand),

    /// Upload a file and print its token
    Upload(UploadCommand),

    /// Print version information
    Version,
}

/// Maps a command failure to a process exit code.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Validation(_)) => exit_codes::VALIDATION,
        Some(ApiError::UnexpectedStatus { status, .. }) => {
            if status.starts_with("401") || status.starts_with("403") {
                exit_codes::AUTH_ERROR
            } else if status.starts_with("404") {
                exit_codes::NOT_FOUND
            } else {
                exit_codes::ERROR
            }
        }
        _ => exit_codes::ERROR,
    }
}
