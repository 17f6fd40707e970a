#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, dead_code, unused)]

//! Decision pipeline for sweeping stalled torrents out of a download client.
//!
//! Layout:
//! - `model/`: torrent records, client states, and media identifiers
//! - `filter.rs`: threshold predicate selecting stalled candidates
//! - `service/`: collaborator traits implemented by HTTP adapters
//! - `resolver.rs`: ordered strategy chain mapping titles to media records
//! - `marker.rs`: failure marking against the owning service
//! - `cleanup.rs`: removal policy evaluated after resolution
//! - `events.rs`: typed sweep events and the sinks that receive them
//! - `sweep.rs`: the per-run orchestration and its report

pub mod cleanup;
pub mod error;
pub mod events;
pub mod filter;
pub mod marker;
pub mod model;
pub mod resolver;
pub mod service;
pub mod sweep;
#[cfg(test)]
mod testing;

pub use cleanup::{CleanupPolicy, KnownRequirement, RemovalState};
pub use error::{ServiceError, ServiceResult, SweepError};
pub use events::{EventSink, RecordingSink, SweepEvent, TracingSink};
pub use filter::{Candidate, FilterCriteria};
pub use marker::{FailureTarget, MarkState};
pub use model::{
    EpisodeId, HistoryEntry, HistoryRecordId, MediaService, MovieId, MovieMatch, Resolution,
    TorrentRecord, TorrentState,
};
pub use resolver::{EpisodeStrategy, MovieStrategy, ResolveOutcome, Resolver, ResolverStrategy};
pub use service::{DownloadClient, EpisodeCatalog, MovieCatalog};
pub use sweep::{CandidateOutcome, SweepReport, SweepStatus, Sweeper};
