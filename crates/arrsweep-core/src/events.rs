//! Typed sweep events and the sinks that receive them.
//!
//! Components never log directly; they emit [`SweepEvent`] values into an
//! injected [`EventSink`]. The binary installs [`TracingSink`], tests use
//! [`RecordingSink`] to assert on what happened.

use std::sync::Mutex;

use serde::Serialize;

use crate::model::{EpisodeId, HistoryRecordId, MediaService, MovieId};

/// Everything observable that happens during a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SweepEvent {
    /// The download client listing was fetched.
    TorrentsListed {
        /// Number of torrents reported by the client.
        total: usize,
    },
    /// The filter selected this many candidates.
    CandidatesSelected {
        /// Number of candidates.
        count: usize,
    },
    /// A candidate is about to be processed.
    Processing {
        /// Torrent name.
        title: String,
        /// Torrent hash.
        hash: String,
        /// Availability as a percentage.
        availability_percent: f64,
        /// Client-reported active hours.
        active_hours: f64,
        /// Wall-clock hours since the torrent was added.
        added_hours: f64,
    },
    /// A media service is being consulted.
    CheckingService {
        /// Service consulted.
        service: MediaService,
    },
    /// A media service did not recognise the title.
    LookupMiss {
        /// Service consulted.
        service: MediaService,
        /// Title looked up.
        title: String,
    },
    /// A media service could not be queried.
    LookupFailed {
        /// Service consulted.
        service: MediaService,
        /// Title looked up.
        title: String,
        /// Error detail.
        message: String,
    },
    /// The episodic service parsed the title into an episode.
    EpisodeFound {
        /// Parsed episode.
        episode_id: EpisodeId,
    },
    /// A grabbed history record exists for the episode.
    HistoryRecordFound {
        /// The grab to invalidate.
        record_id: HistoryRecordId,
    },
    /// The episode has no grabbed history record.
    HistoryRecordMissing {
        /// Torrent name.
        title: String,
    },
    /// The history query failed after the episode was found.
    HistoryLookupFailed {
        /// Parsed episode.
        episode_id: EpisodeId,
        /// Error detail.
        message: String,
    },
    /// The movie service matched the title.
    MovieFound {
        /// Matched movie.
        movie_id: MovieId,
        /// Title reported by the service, when it sent one.
        title: Option<String>,
    },
    /// The release was added to the owning service's blocklist.
    Marked {
        /// Owning service.
        service: MediaService,
    },
    /// The owning service rejected the failure mark.
    MarkFailed {
        /// Owning service.
        service: MediaService,
        /// Error detail.
        message: String,
    },
    /// No service recognised the title; nothing was marked.
    Unresolved {
        /// Torrent name.
        title: String,
    },
    /// The torrent and its files were deleted from the client.
    Removed {
        /// Torrent name.
        title: String,
    },
    /// The client rejected the deletion.
    RemoveFailed {
        /// Torrent name.
        title: String,
        /// Error detail.
        message: String,
    },
    /// The cleanup policy kept the torrent.
    Kept {
        /// Torrent name.
        title: String,
    },
    /// Every candidate was processed.
    Completed {
        /// Candidates processed.
        candidates: usize,
        /// Candidates that need attention.
        failures: usize,
    },
}

/// Receiver for sweep events.
pub trait EventSink: Send + Sync {
    /// Record a single event.
    fn emit(&self, event: SweepEvent);
}

/// Sink that forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    #[allow(clippy::too_many_lines)]
    fn emit(&self, event: SweepEvent) {
        match event {
            SweepEvent::TorrentsListed { total } => {
                tracing::debug!(total, "fetched torrent listing");
            }
            SweepEvent::CandidatesSelected { count } => {
                tracing::info!(count, "found {count} failed torrent(s) above threshold");
            }
            SweepEvent::Processing {
                title,
                hash,
                availability_percent,
                active_hours,
                added_hours,
            } => {
                tracing::warn!(%hash, "---> processing '{title}'");
                tracing::info!("current availability: {availability_percent:.2}%");
                tracing::info!("active download time: {active_hours:.2} hour(s)");
                tracing::info!("media added {added_hours:.2} hour(s) ago");
            }
            SweepEvent::CheckingService { service } => {
                tracing::info!("checking {service}...");
            }
            SweepEvent::LookupMiss { service, title } => {
                tracing::warn!(%service, "no media found for title: {title}");
            }
            SweepEvent::LookupFailed {
                service,
                title,
                message,
            } => {
                tracing::error!(%service, error = %message, "lookup failed for '{title}'");
            }
            SweepEvent::EpisodeFound { episode_id } => {
                tracing::info!("found episode ID {episode_id}");
            }
            SweepEvent::HistoryRecordFound { record_id } => {
                tracing::info!("found history record ID {record_id}");
            }
            SweepEvent::HistoryRecordMissing { title } => {
                tracing::error!("no history record found for '{title}'");
            }
            SweepEvent::HistoryLookupFailed {
                episode_id,
                message,
            } => {
                tracing::error!(%episode_id, error = %message, "history lookup failed");
            }
            SweepEvent::MovieFound { movie_id, title } => match title {
                Some(title) => tracing::info!("found movie ID {movie_id} ('{title}')"),
                None => tracing::info!("found movie ID {movie_id}"),
            },
            SweepEvent::Marked { service } => {
                tracing::info!("successfully added the torrent to the blocklist in {service}");
            }
            SweepEvent::MarkFailed { service, message } => {
                tracing::error!(
                    error = %message,
                    "failed to add the torrent to the blocklist in {service}"
                );
            }
            SweepEvent::Unresolved { title } => {
                tracing::error!("no media found for '{title}'; no action taken");
            }
            SweepEvent::Removed { title } => {
                tracing::info!("successfully removed '{title}' from download client");
            }
            SweepEvent::RemoveFailed { title, message } => {
                tracing::error!(error = %message, "failed to remove '{title}' from download client");
            }
            SweepEvent::Kept { title } => {
                tracing::debug!("removal policy kept '{title}'");
            }
            SweepEvent::Completed {
                candidates,
                failures,
            } => {
                tracing::info!(candidates, failures, "cleanup completed");
            }
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SweepEvent>>,
}

impl RecordingSink {
    /// Construct an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in emission order.
    ///
    /// # Panics
    ///
    /// Panics if the event buffer mutex has been poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<SweepEvent> {
        self.events
            .lock()
            .expect("event buffer mutex poisoned")
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SweepEvent) {
        self.events
            .lock()
            .expect("event buffer mutex poisoned")
            .push(event);
    }
}
