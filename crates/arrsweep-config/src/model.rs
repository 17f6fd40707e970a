//! Typed configuration document.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

const REDACTED: &str = "***";

/// Complete configuration for one cleanup run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Download client session.
    pub qbittorrent: QbittorrentConfig,
    /// Episodic media service.
    pub sonarr: MediaServiceConfig,
    /// Movie media service.
    pub radarr: MediaServiceConfig,
    /// Candidate filter thresholds.
    pub thresholds: ThresholdConfig,
    /// Cleanup policy.
    pub removal: RemovalConfig,
    /// Outbound HTTP behaviour.
    pub http: HttpConfig,
    /// Log output.
    pub logging: LoggingSettings,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            qbittorrent: QbittorrentConfig::default(),
            sonarr: MediaServiceConfig::sonarr(),
            radarr: MediaServiceConfig::radarr(),
            thresholds: ThresholdConfig::default(),
            removal: RemovalConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl SweepConfig {
    /// Copy of the configuration with credentials masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        mask(&mut copy.qbittorrent.password);
        mask(&mut copy.sonarr.api_key);
        mask(&mut copy.radarr.api_key);
        copy
    }
}

fn mask(secret: &mut String) {
    if !secret.is_empty() {
        REDACTED.clone_into(secret);
    }
}

/// qBittorrent Web API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QbittorrentConfig {
    /// Base URL of the Web API, e.g. `http://localhost:8090/api/v2/`.
    pub url: String,
    /// Web UI user.
    pub username: String,
    /// Web UI password.
    pub password: String,
}

impl Default for QbittorrentConfig {
    fn default() -> Self {
        Self {
            url: defaults::QBITTORRENT_URL.to_string(),
            username: defaults::QBITTORRENT_USERNAME.to_string(),
            password: String::new(),
        }
    }
}

/// A Sonarr or Radarr instance.
///
/// An empty `url` falls back to the service's stock address during loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaServiceConfig {
    /// Whether the service takes part in resolution.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Base URL of the v3 API.
    #[serde(default)]
    pub url: String,
    /// Value for the `X-Api-Key` header.
    #[serde(default)]
    pub api_key: String,
}

const fn enabled_by_default() -> bool {
    true
}

impl MediaServiceConfig {
    fn with_url(url: &str) -> Self {
        Self {
            enabled: true,
            url: url.to_string(),
            api_key: String::new(),
        }
    }

    /// Default Sonarr instance.
    #[must_use]
    pub fn sonarr() -> Self {
        Self::with_url(defaults::SONARR_URL)
    }

    /// Default Radarr instance.
    #[must_use]
    pub fn radarr() -> Self {
        Self::with_url(defaults::RADARR_URL)
    }
}

/// Thresholds a torrent must cross before it counts as failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Availability (fraction of the payload seen across peers) below which a torrent is failing.
    pub min_availability: f64,
    /// Minimum client-reported active hours.
    pub min_active_hours: f64,
    /// Minimum hours since the torrent was added.
    pub min_added_hours: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_availability: defaults::MIN_AVAILABILITY,
            min_active_hours: defaults::MIN_ACTIVE_HOURS,
            min_added_hours: defaults::MIN_ADDED_HOURS,
        }
    }
}

/// Meaning of "known" for `remove_if_known`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KnownRequires {
    /// Any media service recognised the title.
    #[default]
    Resolved,
    /// The failure mark was accepted.
    Marked,
}

impl KnownRequires {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resolved" => Some(Self::Resolved),
            "marked" => Some(Self::Marked),
            _ => None,
        }
    }
}

/// When a candidate is deleted from the download client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemovalConfig {
    /// Delete every candidate, resolved or not.
    pub always_remove: bool,
    /// Delete candidates a media service knows about.
    pub remove_if_known: bool,
    /// Definition of "known".
    pub known_requires: KnownRequires,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            always_remove: defaults::ALWAYS_REMOVE,
            remove_if_known: defaults::REMOVE_IF_KNOWN,
            known_requires: KnownRequires::default(),
        }
    }
}

/// Outbound HTTP settings shared by every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl HttpConfig {
    /// Timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
        }
    }
}

/// Log rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-friendly multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Output format on stderr.
    pub format: LogFormat,
    /// Optional append-only log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            file: None,
        }
    }
}
