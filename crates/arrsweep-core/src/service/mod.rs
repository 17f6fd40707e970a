//! Collaborator traits implemented by the HTTP adapters.

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::model::{EpisodeId, HistoryEntry, HistoryRecordId, MovieId, MovieMatch, TorrentRecord};

/// Authenticated session against the download client.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Fetch every torrent the client knows about.
    async fn list_torrents(&self) -> ServiceResult<Vec<TorrentRecord>>;

    /// Delete a torrent, optionally removing its files from disk.
    async fn delete_torrent(&self, hash: &str, delete_files: bool) -> ServiceResult<()>;
}

/// Episodic media service (Sonarr).
#[async_trait]
pub trait EpisodeCatalog: Send + Sync {
    /// Parse a free-text release title into the first matching episode.
    async fn parse_title(&self, title: &str) -> ServiceResult<Option<EpisodeId>>;

    /// History for an episode, newest first.
    async fn history(&self, episode: EpisodeId) -> ServiceResult<Vec<HistoryEntry>>;

    /// Mark a grabbed history record as failed, blocklisting the release.
    async fn mark_failed(&self, record: HistoryRecordId) -> ServiceResult<()>;
}

/// Movie media service (Radarr).
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fuzzy title lookup; the first result is the best match.
    async fn lookup(&self, title: &str) -> ServiceResult<Vec<MovieMatch>>;

    /// Mark a movie's download as failed, blocklisting the release.
    async fn mark_failed(&self, movie: MovieId) -> ServiceResult<()>;
}
