//! Ordered strategy chain mapping a torrent title to a media record.
//!
//! # Design
//! - Each media service is a [`ResolverStrategy`]; the [`Resolver`] tries them
//!   in order and stops at the first match.
//! - A strategy that matches owns the candidate: later strategies are never
//!   consulted, even when the owner cannot find a history record.
//! - A transport failure stops the chain so a fuzzy fallback cannot claim a
//!   title only because the preferred service was unreachable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ServiceError, ServiceResult};
use crate::events::{EventSink, SweepEvent};
use crate::marker::FailureTarget;
use crate::model::{HistoryEntry, MediaService, Resolution};
use crate::service::{EpisodeCatalog, MovieCatalog};

/// One media service's way of recognising a title.
#[async_trait]
pub trait ResolverStrategy: Send + Sync {
    /// Service this strategy consults.
    fn service(&self) -> MediaService;

    /// Try to resolve a title. `Ok(None)` means the service does not know it.
    async fn attempt(&self, title: &str, events: &dyn EventSink)
    -> ServiceResult<Option<Resolution>>;

    /// Blocklist the release identified by `target`.
    async fn mark_failed(&self, target: FailureTarget) -> ServiceResult<()>;
}

/// Result of running the strategy chain for one title.
pub enum ResolveOutcome {
    /// A strategy claimed the title.
    Matched {
        /// What was found.
        resolution: Resolution,
        /// The strategy that found it, responsible for marking.
        owner: Arc<dyn ResolverStrategy>,
    },
    /// Every strategy missed.
    NoMatch,
    /// A strategy could not be queried; the chain stopped there.
    Failed {
        /// Service that failed.
        service: MediaService,
        /// Underlying failure.
        error: ServiceError,
    },
}

impl ResolveOutcome {
    /// Resolution recorded for the candidate.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        match self {
            Self::Matched { resolution, .. } => *resolution,
            Self::NoMatch | Self::Failed { .. } => Resolution::NoMatch,
        }
    }
}

/// Ordered list of strategies.
#[derive(Default, Clone)]
pub struct Resolver {
    strategies: Vec<Arc<dyn ResolverStrategy>>,
}

impl Resolver {
    /// Build a resolver that consults `strategies` in order.
    #[must_use]
    pub fn new(strategies: Vec<Arc<dyn ResolverStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a lower-priority strategy.
    #[must_use]
    pub fn with(mut self, strategy: Arc<dyn ResolverStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Services consulted, in priority order.
    #[must_use]
    pub fn services(&self) -> Vec<MediaService> {
        self.strategies.iter().map(|s| s.service()).collect()
    }

    /// Run the chain for `title`.
    pub async fn resolve(&self, title: &str, events: &dyn EventSink) -> ResolveOutcome {
        for strategy in &self.strategies {
            let service = strategy.service();
            events.emit(SweepEvent::CheckingService { service });
            match strategy.attempt(title, events).await {
                Ok(Some(resolution)) => {
                    return ResolveOutcome::Matched {
                        resolution,
                        owner: Arc::clone(strategy),
                    };
                }
                Ok(None) => events.emit(SweepEvent::LookupMiss {
                    service,
                    title: title.to_string(),
                }),
                Err(error) => {
                    events.emit(SweepEvent::LookupFailed {
                        service,
                        title: title.to_string(),
                        message: error.detail(),
                    });
                    return ResolveOutcome::Failed { service, error };
                }
            }
        }
        ResolveOutcome::NoMatch
    }
}

/// Parse the title into an episode, then find the grab to invalidate.
pub struct EpisodeStrategy {
    catalog: Arc<dyn EpisodeCatalog>,
}

impl EpisodeStrategy {
    /// Wrap an episodic catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn EpisodeCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResolverStrategy for EpisodeStrategy {
    fn service(&self) -> MediaService {
        MediaService::Sonarr
    }

    async fn attempt(
        &self,
        title: &str,
        events: &dyn EventSink,
    ) -> ServiceResult<Option<Resolution>> {
        let Some(episode_id) = self.catalog.parse_title(title).await? else {
            return Ok(None);
        };
        events.emit(SweepEvent::EpisodeFound { episode_id });

        let history_record_id = match self.catalog.history(episode_id).await {
            Ok(entries) => {
                let grabbed = entries
                    .into_iter()
                    .find(HistoryEntry::is_grab)
                    .and_then(|entry| entry.id);
                match grabbed {
                    Some(record_id) => events.emit(SweepEvent::HistoryRecordFound { record_id }),
                    None => events.emit(SweepEvent::HistoryRecordMissing {
                        title: title.to_string(),
                    }),
                }
                grabbed
            }
            Err(err) => {
                events.emit(SweepEvent::HistoryLookupFailed {
                    episode_id,
                    message: err.detail(),
                });
                None
            }
        };

        Ok(Some(Resolution::Episode {
            episode_id,
            history_record_id,
        }))
    }

    async fn mark_failed(&self, target: FailureTarget) -> ServiceResult<()> {
        match target {
            FailureTarget::HistoryRecord(record) => self.catalog.mark_failed(record).await,
            FailureTarget::Movie(_) => Err(ServiceError::Unsupported {
                service: MediaService::Sonarr.as_str(),
                operation: "mark_failed(movie)",
            }),
        }
    }
}

/// Fuzzy movie lookup taking the first result.
pub struct MovieStrategy {
    catalog: Arc<dyn MovieCatalog>,
}

impl MovieStrategy {
    /// Wrap a movie catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResolverStrategy for MovieStrategy {
    fn service(&self) -> MediaService {
        MediaService::Radarr
    }

    async fn attempt(
        &self,
        title: &str,
        events: &dyn EventSink,
    ) -> ServiceResult<Option<Resolution>> {
        let matches = self.catalog.lookup(title).await?;
        let Some(best) = matches.into_iter().next() else {
            return Ok(None);
        };
        let Some(movie_id) = best.id else {
            return Ok(None);
        };
        events.emit(SweepEvent::MovieFound {
            movie_id,
            title: best.title,
        });
        Ok(Some(Resolution::Movie { movie_id }))
    }

    async fn mark_failed(&self, target: FailureTarget) -> ServiceResult<()> {
        match target {
            FailureTarget::Movie(movie) => self.catalog.mark_failed(movie).await,
            FailureTarget::HistoryRecord(_) => Err(ServiceError::Unsupported {
                service: MediaService::Radarr.as_str(),
                operation: "mark_failed(history)",
            }),
        }
    }
}
