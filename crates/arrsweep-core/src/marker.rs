//! Failure marking against the service that resolved a candidate.

use serde::Serialize;

use crate::events::{EventSink, SweepEvent};
use crate::model::{HistoryRecordId, MovieId, Resolution};
use crate::resolver::ResolverStrategy;

/// Identifier handed to a service's mark-failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureTarget {
    /// Grabbed history record on the episodic service.
    HistoryRecord(HistoryRecordId),
    /// Movie on the movie service.
    Movie(MovieId),
}

impl FailureTarget {
    /// Target for a resolution, if the resolution carries one.
    #[must_use]
    pub const fn for_resolution(resolution: &Resolution) -> Option<Self> {
        match resolution {
            Resolution::Episode {
                history_record_id: Some(record),
                ..
            } => Some(Self::HistoryRecord(*record)),
            Resolution::Movie { movie_id } => Some(Self::Movie(*movie_id)),
            Resolution::Episode {
                history_record_id: None,
                ..
            }
            | Resolution::NoMatch => None,
        }
    }
}

/// Outcome of the failure-marking step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarkState {
    /// Nothing resolved, so nothing to mark.
    NotAttempted,
    /// Resolved, but no history record to invalidate.
    Skipped,
    /// The owning service accepted the mark.
    Marked,
    /// The owning service rejected the mark or could not be reached.
    Failed {
        /// Error detail.
        reason: String,
    },
}

impl MarkState {
    /// Whether the release is now blocklisted.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        matches!(self, Self::Marked)
    }

    /// Whether this step needs operator attention.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, Self::Skipped | Self::Failed { .. })
    }

    /// Short label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotAttempted => "-",
            Self::Skipped => "mark_skipped",
            Self::Marked => "marked",
            Self::Failed { .. } => "mark_failed",
        }
    }
}

/// Invoke the owner's mark-failed operation exactly once.
pub async fn mark_failed(
    owner: &dyn ResolverStrategy,
    resolution: &Resolution,
    events: &dyn EventSink,
) -> MarkState {
    let Some(target) = FailureTarget::for_resolution(resolution) else {
        return if resolution.is_match() {
            MarkState::Skipped
        } else {
            MarkState::NotAttempted
        };
    };

    let service = owner.service();
    match owner.mark_failed(target).await {
        Ok(()) => {
            events.emit(SweepEvent::Marked { service });
            MarkState::Marked
        }
        Err(err) => {
            let reason = err.detail();
            events.emit(SweepEvent::MarkFailed {
                service,
                message: reason.clone(),
            });
            MarkState::Failed { reason }
        }
    }
}
