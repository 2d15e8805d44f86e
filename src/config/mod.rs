//
//  redmine-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Connection settings for `rdm`, loaded from a TOML file stored in the
//! platform configuration directory and overridden by environment
//! variables.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/rdm/config.toml`
//! - **macOS**: `~/Library/Application Support/org.redmine.rdm/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\redmine\rdm\config\config.toml`
//!
//! `RDM_CONFIG` points to a different file.
//!
//! ## Example Configuration File
//!
//! ```toml
//! url = "https://redmine.example.com"
//! api_key = "0123456789abcdef0123456789abcdef01234567"
//! switch_user = "jsmith"
//! root_ca = "/etc/ssl/corp-root.pem"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `REDMINE_URL` | `url` |
//! | `REDMINE_API_KEY` | `api_key` |
//! | `REDMINE_USERNAME` | `username` |
//! | `REDMINE_PASSWORD` | `password` |
//! | `REDMINE_SWITCH_USER` | `switch_user` |
//!
//! A missing file is not an error: it yields [`Config::default`] with the
//! overrides applied.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::Credentials;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "RDM_CONFIG";

/// Connection settings for one Redmine instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// API access key. Takes precedence over username/password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Login to impersonate on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_user: Option<String>,

    /// PEM file with an extra trusted root certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_ca: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration from the default path and the environment.
    ///
    /// # Returns
    ///
    /// Returns the merged configuration, or an error when the file exists but
    /// cannot be read or parsed.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use redmine_cli::config::Config;
    ///
    /// let config = Config::load()?;
    /// if let Some(url) = &config.url {
    ///     println!("Using {}", url);
    /// }
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Loads the configuration file at `path` without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Returns the path of the configuration file.
    ///
    /// `RDM_CONFIG` wins over the platform directory.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("org", "redmine", "rdm")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Applies `REDMINE_*` overrides, reading values through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(v) = get("REDMINE_URL") {
            self.url = Some(v);
        }
        if let Some(v) = get("REDMINE_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = get("REDMINE_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = get("REDMINE_PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = get("REDMINE_SWITCH_USER") {
            self.switch_user = Some(v);
        }
    }

    /// Returns the base URL or an error telling the user how to set it.
    pub fn require_url(&self) -> Result<&str> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => bail!("No Redmine URL configured. Set `url` in the config file or REDMINE_URL."),
        }
    }

    /// Picks the credentials to use: the API key first, then
    /// username/password.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(Credentials::api_key(key));
        }

        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() => {
                Ok(Credentials::basic(user, password))
            }
            (Some(_), None) => bail!("A username is configured but no password."),
            _ => bail!(
                "No credentials configured. Set `api_key` (or `username` and `password`) \
                 in the config file or REDMINE_API_KEY."
            ),
        }
    }
}
