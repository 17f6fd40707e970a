//! Per-run orchestration: list, filter, resolve, mark, clean up.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cleanup::{CleanupPolicy, RemovalState};
use crate::error::SweepError;
use crate::events::{EventSink, SweepEvent};
use crate::filter::FilterCriteria;
use crate::marker::{self, MarkState};
use crate::model::{Resolution, TorrentRecord};
use crate::resolver::{ResolveOutcome, Resolver};
use crate::service::DownloadClient;

/// Overall classification of a completed sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStatus {
    /// Every candidate was handled without error.
    Clean,
    /// At least one candidate needs attention.
    Partial,
}

/// Everything that happened to a single candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateOutcome {
    /// Torrent hash.
    pub hash: String,
    /// Torrent name.
    pub name: String,
    /// Availability as a percentage.
    pub availability_percent: f64,
    /// Client-reported active hours.
    pub active_hours: f64,
    /// Wall-clock hours since the torrent was added.
    pub added_hours: f64,
    /// What the resolver found.
    pub resolution: Resolution,
    /// Failure-marking result.
    pub mark: MarkState,
    /// Cleanup result.
    pub removal: RemovalState,
    /// Set when a media service could not be queried.
    pub lookup_error: Option<String>,
}

impl CandidateOutcome {
    /// Whether this candidate hit an error or a skipped step.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        self.lookup_error.is_some()
            || self.mark.needs_attention()
            || matches!(self.removal, RemovalState::Failed { .. })
    }
}

/// Result of a full sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    /// Torrents returned by the client listing.
    pub torrents_seen: usize,
    /// One entry per candidate, in processing order.
    pub outcomes: Vec<CandidateOutcome>,
}

impl SweepReport {
    /// Number of candidates that need attention.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.needs_attention())
            .count()
    }

    /// Clean when no candidate needs attention.
    #[must_use]
    pub fn status(&self) -> SweepStatus {
        if self.failures() == 0 {
            SweepStatus::Clean
        } else {
            SweepStatus::Partial
        }
    }
}

/// Sequential sweep over one download client.
pub struct Sweeper {
    client: Arc<dyn DownloadClient>,
    resolver: Resolver,
    criteria: FilterCriteria,
    policy: CleanupPolicy,
    events: Arc<dyn EventSink>,
}

impl Sweeper {
    /// Assemble a sweeper from its collaborators.
    #[must_use]
    pub fn new(
        client: Arc<dyn DownloadClient>,
        resolver: Resolver,
        criteria: FilterCriteria,
        policy: CleanupPolicy,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            client,
            resolver,
            criteria,
            policy,
            events,
        }
    }

    /// List and filter without touching media services or deleting anything.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::ListTorrents`] when the listing fails.
    pub async fn candidates(&self, now: DateTime<Utc>) -> Result<Vec<TorrentRecord>, SweepError> {
        let torrents = self.list().await?;
        let selected: Vec<TorrentRecord> = self
            .criteria
            .select(&torrents, now)
            .into_iter()
            .map(|candidate| candidate.torrent.clone())
            .collect();
        self.events.emit(SweepEvent::CandidatesSelected {
            count: selected.len(),
        });
        Ok(selected)
    }

    /// Run the full pipeline once.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::ListTorrents`] when the listing fails. Every
    /// per-candidate failure is recorded in the report instead.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
        let torrents = self.list().await?;
        let candidates = self.criteria.select(&torrents, now);
        self.events.emit(SweepEvent::CandidatesSelected {
            count: candidates.len(),
        });

        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            outcomes.push(self.process(candidate.torrent, now).await);
        }

        let report = SweepReport {
            torrents_seen: torrents.len(),
            outcomes,
        };
        self.events.emit(SweepEvent::Completed {
            candidates: report.outcomes.len(),
            failures: report.failures(),
        });
        Ok(report)
    }

    async fn list(&self) -> Result<Vec<TorrentRecord>, SweepError> {
        let torrents = self
            .client
            .list_torrents()
            .await
            .map_err(|source| SweepError::ListTorrents { source })?;
        self.events.emit(SweepEvent::TorrentsListed {
            total: torrents.len(),
        });
        Ok(torrents)
    }

    async fn process(&self, torrent: &TorrentRecord, now: DateTime<Utc>) -> CandidateOutcome {
        let events = self.events.as_ref();
        let availability_percent = torrent.availability_percent();
        let active_hours = torrent.active_hours();
        let added_hours = torrent.added_hours(now);
        events.emit(SweepEvent::Processing {
            title: torrent.name.clone(),
            hash: torrent.hash.clone(),
            availability_percent,
            active_hours,
            added_hours,
        });

        let (resolution, mark, lookup_error) =
            match self.resolver.resolve(&torrent.name, events).await {
                ResolveOutcome::Matched { resolution, owner } => {
                    let mark = marker::mark_failed(owner.as_ref(), &resolution, events).await;
                    (resolution, mark, None)
                }
                ResolveOutcome::NoMatch => {
                    events.emit(SweepEvent::Unresolved {
                        title: torrent.name.clone(),
                    });
                    (Resolution::NoMatch, MarkState::NotAttempted, None)
                }
                ResolveOutcome::Failed { service, error } => {
                    events.emit(SweepEvent::Unresolved {
                        title: torrent.name.clone(),
                    });
                    let message = format!("{service}: {}", error.detail());
                    (Resolution::NoMatch, MarkState::NotAttempted, Some(message))
                }
            };

        let removal = if self.policy.should_remove(&resolution, &mark) {
            self.remove(torrent).await
        } else {
            events.emit(SweepEvent::Kept {
                title: torrent.name.clone(),
            });
            RemovalState::NotRemoved
        };

        CandidateOutcome {
            hash: torrent.hash.clone(),
            name: torrent.name.clone(),
            availability_percent,
            active_hours,
            added_hours,
            resolution,
            mark,
            removal,
            lookup_error,
        }
    }

    async fn remove(&self, torrent: &TorrentRecord) -> RemovalState {
        match self.client.delete_torrent(&torrent.hash, true).await {
            Ok(()) => {
                self.events.emit(SweepEvent::Removed {
                    title: torrent.name.clone(),
                });
                RemovalState::Removed
            }
            Err(err) => {
                let reason = err.detail();
                self.events.emit(SweepEvent::RemoveFailed {
                    title: torrent.name.clone(),
                    message: reason.clone(),
                });
                RemovalState::Failed { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::KnownRequirement;
    use crate::events::RecordingSink;
    use crate::model::{EpisodeId, HistoryRecordId, MovieId, TorrentState};
    use crate::resolver::{EpisodeStrategy, MovieStrategy};
    use crate::testing::{FakeClient, FakeEpisodes, FakeMovies};
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    fn show(state: TorrentState) -> TorrentRecord {
        TorrentRecord {
            hash: "abc123".into(),
            name: "Show.S01E02".into(),
            availability: 0.10,
            added_at: now() - Duration::hours(48),
            active_seconds: 30 * 3_600,
            state,
        }
    }

    struct Harness {
        client: Arc<FakeClient>,
        episodes: Arc<FakeEpisodes>,
        movies: Arc<FakeMovies>,
        sink: Arc<RecordingSink>,
    }

    impl Harness {
        fn new(client: FakeClient, episodes: FakeEpisodes, movies: FakeMovies) -> Self {
            Self {
                client: Arc::new(client),
                episodes: Arc::new(episodes),
                movies: Arc::new(movies),
                sink: Arc::new(RecordingSink::new()),
            }
        }

        fn sweeper(&self, policy: CleanupPolicy) -> Sweeper {
            let resolver = Resolver::default()
                .with(Arc::new(EpisodeStrategy::new(self.episodes.clone())))
                .with(Arc::new(MovieStrategy::new(self.movies.clone())));
            Sweeper::new(
                self.client.clone(),
                resolver,
                FilterCriteria::stalled(1.0, 24.0, 0.0),
                policy,
                self.sink.clone(),
            )
        }
    }

    #[tokio::test]
    async fn stalled_episode_is_marked_and_removed() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default()
                .parses("Show.S01E02", 42)
                .history(42, &[(99, "grabbed")]),
            FakeMovies::default(),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        assert_eq!(report.status(), SweepStatus::Clean);
        let outcome = &report.outcomes[0];
        assert_eq!(
            outcome.resolution,
            Resolution::Episode {
                episode_id: EpisodeId::new(42).expect("id"),
                history_record_id: HistoryRecordId::new(99),
            }
        );
        assert_eq!(outcome.mark, MarkState::Marked);
        assert_eq!(outcome.removal, RemovalState::Removed);
        assert!((outcome.added_hours - 48.0).abs() < f64::EPSILON);
        assert_eq!(harness.episodes.marked(), vec![99]);
        assert_eq!(harness.client.deleted(), vec![("abc123".to_string(), true)]);
        assert_eq!(harness.movies.lookups(), 0);
    }

    #[tokio::test]
    async fn non_stalled_torrent_makes_no_service_calls() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::Downloading)]),
            FakeEpisodes::default().parses("Show.S01E02", 42),
            FakeMovies::default(),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        assert_eq!(report.torrents_seen, 1);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.status(), SweepStatus::Clean);
        assert_eq!(harness.episodes.parse_calls(), 0);
        assert_eq!(harness.movies.lookups(), 0);
        assert!(harness.client.deleted().is_empty());
    }

    #[tokio::test]
    async fn failed_mark_still_removes_known_candidate() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default()
                .parses("Show.S01E02", 42)
                .history(42, &[(99, "grabbed")])
                .rejecting_marks(),
            FakeMovies::default(),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        let outcome = &report.outcomes[0];
        assert!(matches!(outcome.mark, MarkState::Failed { .. }));
        assert_eq!(outcome.removal, RemovalState::Removed);
        assert_eq!(report.status(), SweepStatus::Partial);
    }

    #[tokio::test]
    async fn marked_requirement_keeps_torrent_after_failed_mark() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default()
                .parses("Show.S01E02", 42)
                .history(42, &[(99, "grabbed")])
                .rejecting_marks(),
            FakeMovies::default(),
        );
        let policy = CleanupPolicy {
            known_requires: KnownRequirement::Marked,
            ..CleanupPolicy::default()
        };

        let report = harness.sweeper(policy).run(now()).await.expect("sweep succeeds");

        assert_eq!(report.outcomes[0].removal, RemovalState::NotRemoved);
        assert!(harness.client.deleted().is_empty());
    }

    #[tokio::test]
    async fn disabled_removal_never_deletes() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default(),
            FakeMovies::default().finds("Show.S01E02", 8),
        );
        let policy = CleanupPolicy {
            always_remove: false,
            remove_if_known: false,
            known_requires: KnownRequirement::Resolved,
        };

        let report = harness.sweeper(policy).run(now()).await.expect("sweep succeeds");

        let outcome = &report.outcomes[0];
        assert_eq!(
            outcome.resolution,
            Resolution::Movie {
                movie_id: MovieId::new(8).expect("id")
            }
        );
        assert_eq!(harness.movies.marked(), vec![8]);
        assert_eq!(outcome.removal, RemovalState::NotRemoved);
        assert!(harness.client.deleted().is_empty());
    }

    #[tokio::test]
    async fn unresolved_candidate_is_reported_but_not_a_failure() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default(),
            FakeMovies::default(),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        let outcome = &report.outcomes[0];
        assert_eq!(outcome.resolution, Resolution::NoMatch);
        assert_eq!(outcome.mark, MarkState::NotAttempted);
        assert_eq!(outcome.removal, RemovalState::NotRemoved);
        assert_eq!(report.status(), SweepStatus::Clean);
        assert!(harness.sink.events().contains(&SweepEvent::Unresolved {
            title: "Show.S01E02".into()
        }));
    }

    #[tokio::test]
    async fn lookup_error_marks_run_partial() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default().failing_parse(),
            FakeMovies::default().finds("Show.S01E02", 8),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        let outcome = &report.outcomes[0];
        assert!(outcome.lookup_error.is_some());
        assert_eq!(harness.movies.lookups(), 0);
        assert_eq!(report.status(), SweepStatus::Partial);
    }

    #[tokio::test]
    async fn missing_history_skips_mark_and_reports_partial() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]),
            FakeEpisodes::default().parses("Show.S01E02", 42),
            FakeMovies::default(),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        let outcome = &report.outcomes[0];
        assert_eq!(outcome.mark, MarkState::Skipped);
        assert_eq!(outcome.removal, RemovalState::Removed);
        assert!(harness.episodes.marked().is_empty());
        assert_eq!(report.status(), SweepStatus::Partial);
    }

    #[tokio::test]
    async fn remove_failure_is_recorded() {
        let harness = Harness::new(
            FakeClient::with(vec![show(TorrentState::StalledDownload)]).rejecting_deletes(),
            FakeEpisodes::default()
                .parses("Show.S01E02", 42)
                .history(42, &[(99, "grabbed")]),
            FakeMovies::default(),
        );

        let report = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect("sweep succeeds");

        assert!(matches!(
            report.outcomes[0].removal,
            RemovalState::Failed { .. }
        ));
        assert_eq!(report.failures(), 1);
    }

    #[tokio::test]
    async fn listing_failure_aborts() {
        let harness = Harness::new(
            FakeClient::failing(),
            FakeEpisodes::default(),
            FakeMovies::default(),
        );

        let err = harness
            .sweeper(CleanupPolicy::default())
            .run(now())
            .await
            .expect_err("listing fails");

        assert!(matches!(err, SweepError::ListTorrents { .. }));
    }

    #[tokio::test]
    async fn candidates_lists_without_side_effects() {
        let harness = Harness::new(
            FakeClient::with(vec![
                show(TorrentState::StalledDownload),
                show(TorrentState::Uploading),
            ]),
            FakeEpisodes::default().parses("Show.S01E02", 42),
            FakeMovies::default(),
        );

        let selected = harness
            .sweeper(CleanupPolicy {
                always_remove: true,
                ..CleanupPolicy::default()
            })
            .candidates(now())
            .await
            .expect("listing succeeds");

        assert_eq!(selected.len(), 1);
        assert_eq!(harness.episodes.parse_calls(), 0);
        assert!(harness.client.deleted().is_empty());
    }
}
