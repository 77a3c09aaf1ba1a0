//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration: optional TOML file, then the process
/// environment, then an explicit port override.
pub fn load_config(path: Option<&Path>, port: Option<u16>) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, port, |var| std::env::var(var).ok())
}

/// Same as [`load_config`], reading environment variables through `lookup`.
pub fn load_config_with<F>(
    path: Option<&Path>,
    port: Option<u16>,
    lookup: F,
) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    if let Some(port) = port {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse a TOML file without validating it.
pub fn load_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `PORT`, `PI_SERVER_API_KEY`, `PI_API_BASE` and `RELAY_BIND_HOST`.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("PORT") {
        config.listener.port = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env { var: "PORT", value })?;
    }
    if let Some(value) = lookup("PI_SERVER_API_KEY") {
        config.upstream.api_key = Some(value);
    }
    if let Some(value) = lookup("PI_API_BASE") {
        config.upstream.api_base = value;
    }
    if let Some(value) = lookup("RELAY_BIND_HOST") {
        config.listener.host = value;
    }
    Ok(())
}
