//! Configuration validation.
//!
//! Semantic checks only; serde already handled the syntax. Every problem is
//! reported, not just the first, so a misconfigured deployment is fixed in
//! one pass.

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("PI_SERVER_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidApiBase { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.api_key().is_none() {
        errors.push(ValidationError::MissingApiKey);
    }

    if let Err(reason) = check_api_base(&config.upstream.api_base) {
        errors.push(ValidationError::InvalidApiBase {
            url: config.upstream.api_base.clone(),
            reason,
        });
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.connect_secs" });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.upstream_secs" });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_bytes" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_api_base(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.upstream.api_key = Some("key".to_string());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_key_rejected() {
        let mut config = valid_config();
        config.upstream.api_key = None;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingApiKey]);
        assert_eq!(errors[0].to_string(), "PI_SERVER_API_KEY is not set");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.upstream.api_base = "ftp://example.com".to_string();
        config.timeouts.upstream_secs = 0;
        config.limits.max_body_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "timeouts.upstream_secs" }));
    }

    #[test]
    fn test_api_base_with_query_rejected() {
        let mut config = valid_config();
        config.upstream.api_base = "https://api.example.com/v2?debug=1".to_string();
        assert!(matches!(
            validate_config(&config).unwrap_err()[0],
            ValidationError::InvalidApiBase { .. }
        ));
    }

    #[test]
    fn test_relative_api_base_rejected() {
        let mut config = valid_config();
        config.upstream.api_base = "/v2".to_string();
        assert!(validate_config(&config).is_err());
    }
}
