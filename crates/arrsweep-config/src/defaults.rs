//! Default endpoints, credentials, and thresholds.
//!
//! # Design
//! - Values match a stock single-host install of qBittorrent, Sonarr, and Radarr.
//! - Thresholds favour leaving torrents alone: a day of activity below full availability.

/// Default configuration file name, resolved relative to the working directory.
pub const CONFIG_FILE: &str = "arrsweep.yaml";

pub(crate) const QBITTORRENT_URL: &str = "http://localhost:8090/api/v2/";
pub(crate) const QBITTORRENT_USERNAME: &str = "admin";
pub(crate) const SONARR_URL: &str = "http://localhost:8989/api/v3/";
pub(crate) const RADARR_URL: &str = "http://localhost:7878/api/v3/";

pub(crate) const MIN_AVAILABILITY: f64 = 1.0;
pub(crate) const MIN_ACTIVE_HOURS: f64 = 24.0;
pub(crate) const MIN_ADDED_HOURS: f64 = 0.0;

pub(crate) const ALWAYS_REMOVE: bool = false;
pub(crate) const REMOVE_IF_KNOWN: bool = true;

pub(crate) const HTTP_TIMEOUT_SECS: u64 = 10;
pub(crate) const LOG_LEVEL: &str = "info";
