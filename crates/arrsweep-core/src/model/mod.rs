//! Torrent records, client-reported states, and media identifiers.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Snapshot of a single torrent as reported by the download client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Info hash; the identity used for deletion.
    pub hash: String,
    /// Display name, also used as the free-text title for media lookups.
    pub name: String,
    /// Fraction of pieces obtainable across connected peers. The client may
    /// report a negative sentinel when the value is unknown.
    pub availability: f64,
    /// Wall-clock instant the torrent was added to the client.
    pub added_at: DateTime<Utc>,
    /// Cumulative seconds the client has spent actively working on the torrent.
    pub active_seconds: i64,
    /// Client-reported state.
    pub state: TorrentState,
}

impl TorrentRecord {
    /// Hours elapsed since the torrent was added, rounded to hundredths.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn added_hours(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.added_at).num_milliseconds() as f64;
        (millis / 1_000.0 / SECONDS_PER_HOUR * 100.0).round() / 100.0
    }

    /// Hours of client-reported active time.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn active_hours(&self) -> f64 {
        self.active_seconds as f64 / SECONDS_PER_HOUR
    }

    /// Availability as a non-negative percentage.
    #[must_use]
    pub fn availability_percent(&self) -> f64 {
        (self.availability * 100.0).abs()
    }
}

/// States reported by the qBittorrent Web API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TorrentState {
    /// `error`
    Error,
    /// `missingFiles`
    MissingFiles,
    /// `uploading`
    Uploading,
    /// `pausedUP` / `stoppedUP`
    PausedUpload,
    /// `queuedUP`
    QueuedUpload,
    /// `stalledUP`
    StalledUpload,
    /// `checkingUP`
    CheckingUpload,
    /// `forcedUP`
    ForcedUpload,
    /// `allocating`
    Allocating,
    /// `downloading`
    Downloading,
    /// `metaDL`
    FetchingMetadata,
    /// `forcedMetaDL`
    ForcedFetchingMetadata,
    /// `pausedDL` / `stoppedDL`
    PausedDownload,
    /// `queuedDL`
    QueuedDownload,
    /// Actively trying to download but receiving nothing from peers (`stalledDL`).
    StalledDownload,
    /// `checkingDL`
    CheckingDownload,
    /// `forcedDL`
    ForcedDownload,
    /// `checkingResumeData`
    CheckingResumeData,
    /// `moving`
    Moving,
    /// `unknown`
    Unknown,
    /// Any state string this build does not recognise.
    Other(String),
}

impl TorrentState {
    /// Wire representation used by the download client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::MissingFiles => "missingFiles",
            Self::Uploading => "uploading",
            Self::PausedUpload => "pausedUP",
            Self::QueuedUpload => "queuedUP",
            Self::StalledUpload => "stalledUP",
            Self::CheckingUpload => "checkingUP",
            Self::ForcedUpload => "forcedUP",
            Self::Allocating => "allocating",
            Self::Downloading => "downloading",
            Self::FetchingMetadata => "metaDL",
            Self::ForcedFetchingMetadata => "forcedMetaDL",
            Self::PausedDownload => "pausedDL",
            Self::QueuedDownload => "queuedDL",
            Self::StalledDownload => "stalledDL",
            Self::CheckingDownload => "checkingDL",
            Self::ForcedDownload => "forcedDL",
            Self::CheckingResumeData => "checkingResumeData",
            Self::Moving => "moving",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for TorrentState {
    fn from(value: &str) -> Self {
        match value {
            "error" => Self::Error,
            "missingFiles" => Self::MissingFiles,
            "uploading" => Self::Uploading,
            "pausedUP" | "stoppedUP" => Self::PausedUpload,
            "queuedUP" => Self::QueuedUpload,
            "stalledUP" => Self::StalledUpload,
            "checkingUP" => Self::CheckingUpload,
            "forcedUP" => Self::ForcedUpload,
            "allocating" => Self::Allocating,
            "downloading" => Self::Downloading,
            "metaDL" => Self::FetchingMetadata,
            "forcedMetaDL" => Self::ForcedFetchingMetadata,
            "pausedDL" | "stoppedDL" => Self::PausedDownload,
            "queuedDL" => Self::QueuedDownload,
            "stalledDL" => Self::StalledDownload,
            "checkingDL" => Self::CheckingDownload,
            "forcedDL" => Self::ForcedDownload,
            "checkingResumeData" => Self::CheckingResumeData,
            "moving" => Self::Moving,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TorrentState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<TorrentState> for String {
    fn from(value: TorrentState) -> Self {
        value.as_str().to_string()
    }
}

impl Display for TorrentState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

macro_rules! media_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a service-issued identifier. Services never issue zero or
            /// negative ids for stored items, so those map to `None`.
            #[must_use]
            pub const fn new(raw: i64) -> Option<Self> {
                if raw > 0 { Some(Self(raw)) } else { None }
            }

            /// Raw numeric identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

media_id!(
    /// Episode identifier issued by the episodic service.
    EpisodeId
);
media_id!(
    /// History record identifier issued by the episodic service.
    HistoryRecordId
);
media_id!(
    /// Movie identifier issued by the movie service.
    MovieId
);

/// One row of the episodic service's download history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Record identifier, absent when the service reported an unusable id.
    pub id: Option<HistoryRecordId>,
    /// Event type such as `grabbed` or `downloadFolderImported`.
    pub event_type: String,
}

impl HistoryEntry {
    /// Event type marking the moment the service initiated a download.
    pub const GRABBED: &'static str = "grabbed";

    /// Whether this entry records a grab.
    #[must_use]
    pub fn is_grab(&self) -> bool {
        self.event_type == Self::GRABBED
    }
}

/// One result of a fuzzy movie lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieMatch {
    /// Library identifier; absent for movies the service does not manage.
    pub id: Option<MovieId>,
    /// Title reported by the service; carried into the match event.
    pub title: Option<String>,
}

/// Media-management services consulted during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaService {
    /// Episodic service (Sonarr).
    Sonarr,
    /// Movie service (Radarr).
    Radarr,
}

impl MediaService {
    /// Human-readable service name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sonarr => "Sonarr",
            Self::Radarr => "Radarr",
        }
    }
}

impl Display for MediaService {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of resolving a candidate title against the media services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resolution {
    /// Title parsed into an episode; the grabbed history record may be missing.
    Episode {
        /// Parsed episode identifier.
        episode_id: EpisodeId,
        /// Most recent `grabbed` history record for the episode.
        history_record_id: Option<HistoryRecordId>,
    },
    /// Title matched a library movie.
    Movie {
        /// Matched movie identifier.
        movie_id: MovieId,
    },
    /// No enabled service recognised the title.
    NoMatch,
}

impl Resolution {
    /// Whether any service claimed the title.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        !matches!(self, Self::NoMatch)
    }

    /// Service that owns the match, if any.
    #[must_use]
    pub const fn service(&self) -> Option<MediaService> {
        match self {
            Self::Episode { .. } => Some(MediaService::Sonarr),
            Self::Movie { .. } => Some(MediaService::Radarr),
            Self::NoMatch => None,
        }
    }

    /// Short label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Episode { .. } => "resolved_sonarr",
            Self::Movie { .. } => "resolved_radarr",
            Self::NoMatch => "unresolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(added_hours_ago: i64, active_seconds: i64) -> (TorrentRecord, DateTime<Utc>) {
        let now = Utc::now();
        let torrent = TorrentRecord {
            hash: "abc".into(),
            name: "Show.S01E02".into(),
            availability: -0.25,
            added_at: now - Duration::hours(added_hours_ago),
            active_seconds,
            state: TorrentState::StalledDownload,
        };
        (torrent, now)
    }

    #[test]
    fn added_and_active_hours_are_independent() {
        let (torrent, now) = record(48, 30 * 3_600);
        assert!((torrent.added_hours(now) - 48.0).abs() < f64::EPSILON);
        assert!((torrent.active_hours() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn availability_percent_ignores_sign() {
        let (torrent, _) = record(1, 0);
        assert!((torrent.availability_percent() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn torrent_state_round_trips_known_and_unknown_strings() {
        assert_eq!(TorrentState::from("stalledDL"), TorrentState::StalledDownload);
        assert_eq!(TorrentState::from("stoppedDL"), TorrentState::PausedDownload);
        assert_eq!(TorrentState::StalledDownload.to_string(), "stalledDL");

        let other = TorrentState::from("someFutureState");
        assert_eq!(other, TorrentState::Other("someFutureState".into()));
        assert_eq!(other.as_str(), "someFutureState");
    }

    #[test]
    fn media_ids_reject_non_positive_values() {
        assert!(EpisodeId::new(0).is_none());
        assert!(MovieId::new(-4).is_none());
        assert_eq!(HistoryRecordId::new(99).map(HistoryRecordId::get), Some(99));
    }

    #[test]
    fn resolution_reports_owner_and_label() {
        let episode = Resolution::Episode {
            episode_id: EpisodeId::new(42).expect("valid id"),
            history_record_id: None,
        };
        assert!(episode.is_match());
        assert_eq!(episode.service(), Some(MediaService::Sonarr));
        assert_eq!(Resolution::NoMatch.label(), "unresolved");
        assert_eq!(Resolution::NoMatch.service(), None);
    }
}
