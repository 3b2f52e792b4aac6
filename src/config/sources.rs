use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "TOOTPRUNE_CONFIG";
const ACCESS_TOKEN_ENV_VAR: &str = "TOOTPRUNE_ACCESS_TOKEN";
const DEFAULT_CONFIG_PATH: &str = "tootprune.toml";
const ENV_PREFIX: &str = "TOOTPRUNE";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // .env may itself name the settings file
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    read_with_secrets(config_path)
}

/// Like [`load`], but reading the file at `config_path`
pub fn load_with_secrets(config_path: PathBuf) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    read_with_secrets(config_path)
}

fn read_with_secrets(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut config = load_from_sources(config_path)?;
    apply_access_token(&mut config, env::var(ACCESS_TOKEN_ENV_VAR).ok());
    Ok(config)
}

/// The access token may live in the environment instead of the settings file
fn apply_access_token(config: &mut Config, token: Option<String>) {
    if let Some(token) = token {
        if !token.trim().is_empty() {
            config.account.access_token = Some(token.trim().to_string());
        }
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // TOOTPRUNE__PURGE__MAX_AGE -> purge.max_age
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
