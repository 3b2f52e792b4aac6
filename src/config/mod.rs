//! Configuration management for tootprune
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use tootprune::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Purging posts on: {:?}", config.account.server_url());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `TOOTPRUNE__<section>__<key>`
//!
//! Examples:
//! - `TOOTPRUNE__ACCOUNT__SERVER=metalhead.club`
//! - `TOOTPRUNE__PURGE__MAX_AGE="6 months"`
//! - `TOOTPRUNE__PURGE__DRY_RUN=true`
//!
//! The access token is a secret and is read from `TOOTPRUNE_ACCESS_TOKEN`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `tootprune.toml`.
//! This can be overridden using the `TOOTPRUNE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::{MaxAge, ParseError as MaxAgeError};
pub use models::{AccountConfig, Config, HttpSettings, PurgeSettings};
pub use validation::ValidationError;

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

use crate::purge::PurgeOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`TOOTPRUNE__*`, `TOOTPRUNE_ACCESS_TOKEN`)
    /// 2. TOML file (default: `tootprune.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed (including an unparseable `max_age`)
    /// - Server or access token are missing
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_with_secrets(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Options for a purge starting at `now`; requires a maximum age
    pub fn purge_options(&self, now: DateTime<Utc>) -> Result<PurgeOptions, ValidationError> {
        let max_age = self.purge.max_age.ok_or(ValidationError::MissingMaxAge)?;

        let mut options = PurgeOptions::new(max_age.cutoff(now));
        options.dry_run = self.purge.dry_run;
        options.favourites = self.purge.favourites;
        options.page_limit = self.purge.page_limit;
        options.page_pause = Duration::from_millis(self.purge.page_pause_ms);
        Ok(options)
    }
}
