//! Layered loading: defaults, then the YAML file, then environment overrides.
//!
//! # Design
//! - Environment access goes through a caller-supplied lookup so tests never
//!   mutate the process environment.
//! - The returned configuration is normalised and validated; callers never
//!   see a half-checked document.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{KnownRequires, LogFormat, SweepConfig};
use crate::validate::{parse_bool, validate, with_trailing_slash};

/// Parse a YAML document on top of the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the document does not match the schema.
pub fn from_yaml_str(document: &str) -> ConfigResult<SweepConfig> {
    if document.trim().is_empty() {
        return Ok(SweepConfig::default());
    }
    serde_yaml::from_str(document).map_err(|source| ConfigError::Parse { path: None, source })
}

/// Read and parse a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and
/// [`ConfigError::Parse`] when its contents are invalid.
pub fn load_file(path: &Path) -> ConfigResult<SweepConfig> {
    let document = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "config.read",
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&document).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        },
        other => other,
    })
}

/// Full load: optional file, `ARRSWEEP_*` overrides, normalisation, validation.
///
/// When `path` is `None` the default file is used if it exists. An explicit
/// path that does not exist is an error.
///
/// # Errors
///
/// Propagates read, parse, override, and validation failures.
pub fn load<F>(path: Option<&Path>, lookup: F) -> ConfigResult<SweepConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => {
            let fallback = Path::new(defaults::CONFIG_FILE);
            match load_file(fallback) {
                Ok(config) => config,
                Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    debug!(path = defaults::CONFIG_FILE, "no configuration file; using defaults");
                    SweepConfig::default()
                }
                Err(err) => return Err(err),
            }
        }
    };
    apply_env_overrides(&mut config, lookup)?;
    normalize(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Load `.env` from the working directory into the process environment, if present.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded environment file");
    }
}

/// Apply `ARRSWEEP_*` overrides read through `lookup`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnv`] when a value cannot be parsed.
pub fn apply_env_overrides<F>(config: &mut SweepConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let env = Overrides { lookup: &lookup };

    env.string("ARRSWEEP_QBITTORRENT_URL", &mut config.qbittorrent.url);
    env.string("ARRSWEEP_QBITTORRENT_USERNAME", &mut config.qbittorrent.username);
    env.string("ARRSWEEP_QBITTORRENT_PASSWORD", &mut config.qbittorrent.password);

    env.flag("ARRSWEEP_SONARR_ENABLED", &mut config.sonarr.enabled)?;
    env.string("ARRSWEEP_SONARR_URL", &mut config.sonarr.url);
    env.string("ARRSWEEP_SONARR_API_KEY", &mut config.sonarr.api_key);

    env.flag("ARRSWEEP_RADARR_ENABLED", &mut config.radarr.enabled)?;
    env.string("ARRSWEEP_RADARR_URL", &mut config.radarr.url);
    env.string("ARRSWEEP_RADARR_API_KEY", &mut config.radarr.api_key);

    env.number("ARRSWEEP_MIN_AVAILABILITY", &mut config.thresholds.min_availability)?;
    env.number("ARRSWEEP_MIN_ACTIVE_HOURS", &mut config.thresholds.min_active_hours)?;
    env.number("ARRSWEEP_MIN_ADDED_HOURS", &mut config.thresholds.min_added_hours)?;

    env.flag("ARRSWEEP_ALWAYS_REMOVE", &mut config.removal.always_remove)?;
    env.flag("ARRSWEEP_REMOVE_IF_KNOWN", &mut config.removal.remove_if_known)?;
    if let Some(raw) = env.get("ARRSWEEP_REMOVE_KNOWN_REQUIRES") {
        config.removal.known_requires =
            KnownRequires::parse(&raw).ok_or(ConfigError::InvalidEnv {
                key: "ARRSWEEP_REMOVE_KNOWN_REQUIRES",
                value: raw,
                reason: "expected 'resolved' or 'marked'",
            })?;
    }

    if let Some(raw) = env.get("ARRSWEEP_HTTP_TIMEOUT_SECS") {
        config.http.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            key: "ARRSWEEP_HTTP_TIMEOUT_SECS",
            value: raw.clone(),
            reason: "expected a whole number of seconds",
        })?;
    }

    env.string("ARRSWEEP_LOG_LEVEL", &mut config.logging.level);
    if let Some(raw) = env.get("ARRSWEEP_LOG_FORMAT") {
        config.logging.format = LogFormat::parse(&raw).ok_or(ConfigError::InvalidEnv {
            key: "ARRSWEEP_LOG_FORMAT",
            value: raw,
            reason: "expected 'pretty' or 'json'",
        })?;
    }
    if let Some(raw) = env.get("ARRSWEEP_LOG_FILE") {
        config.logging.file = Some(raw.into());
    }

    Ok(())
}

/// Fill empty media URLs with stock addresses and add trailing slashes.
pub fn normalize(config: &mut SweepConfig) {
    if config.sonarr.url.trim().is_empty() {
        defaults::SONARR_URL.clone_into(&mut config.sonarr.url);
    }
    if config.radarr.url.trim().is_empty() {
        defaults::RADARR_URL.clone_into(&mut config.radarr.url);
    }
    config.qbittorrent.url = with_trailing_slash(&config.qbittorrent.url);
    config.sonarr.url = with_trailing_slash(&config.sonarr.url);
    config.radarr.url = with_trailing_slash(&config.radarr.url);
}

struct Overrides<'a, F> {
    lookup: &'a F,
}

impl<F> Overrides<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn string(&self, key: &str, target: &mut String) {
        if let Some(value) = self.get(key) {
            *target = value;
        }
    }

    fn flag(&self, key: &'static str, target: &mut bool) -> ConfigResult<()> {
        if let Some(raw) = self.get(key) {
            *target = parse_bool(&raw).ok_or(ConfigError::InvalidEnv {
                key,
                value: raw,
                reason: "expected a boolean",
            })?;
        }
        Ok(())
    }

    fn number(&self, key: &'static str, target: &mut f64) -> ConfigResult<()> {
        if let Some(raw) = self.get(key) {
            *target = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key,
                value: raw.clone(),
                reason: "expected a number",
            })?;
        }
        Ok(())
    }
}
