//! Validation and normalisation helpers for configuration documents.

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{MediaServiceConfig, SweepConfig};

/// Reject configurations the run cannot use.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] naming the first offending field.
pub fn validate(config: &SweepConfig) -> ConfigResult<()> {
    validate_base_url("qbittorrent", &config.qbittorrent.url)?;
    validate_service("sonarr", &config.sonarr)?;
    validate_service("radarr", &config.radarr)?;

    validate_threshold("min_availability", config.thresholds.min_availability)?;
    validate_threshold("min_active_hours", config.thresholds.min_active_hours)?;
    validate_threshold("min_added_hours", config.thresholds.min_added_hours)?;

    if config.http.timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            section: "http",
            field: "timeout_secs",
            value: Some("0".to_string()),
            reason: "must be at least one second",
        });
    }

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            section: "logging",
            field: "level",
            value: None,
            reason: "must not be empty",
        });
    }

    Ok(())
}

fn validate_service(section: &'static str, service: &MediaServiceConfig) -> ConfigResult<()> {
    if !service.enabled {
        return Ok(());
    }
    validate_base_url(section, &service.url)?;
    if service.api_key.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            section,
            field: "api_key",
            value: None,
            reason: "required when the service is enabled",
        });
    }
    Ok(())
}

fn validate_threshold(field: &'static str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidField {
            section: "thresholds",
            field,
            value: Some(value.to_string()),
            reason: "must be a finite, non-negative number",
        });
    }
    Ok(())
}

fn validate_base_url(section: &'static str, raw: &str) -> ConfigResult<()> {
    let invalid = |reason| ConfigError::InvalidField {
        section,
        field: "url",
        value: Some(raw.to_string()),
        reason,
    };
    let parsed = Url::parse(raw).map_err(|_| invalid("must be an absolute URL"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid("scheme must be http or https")),
    }
}

/// Ensure a base URL ends with `/` so relative endpoint joins keep its path.
#[must_use]
pub fn with_trailing_slash(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Parse a boolean override the way shells usually spell them.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
