//! Removal policy evaluated after resolution and marking.

use serde::{Deserialize, Serialize};

use crate::marker::MarkState;
use crate::model::Resolution;

/// What makes a candidate "known" for `remove_if_known`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownRequirement {
    /// Any media service recognised the title.
    #[default]
    Resolved,
    /// The owning service accepted the failure mark.
    Marked,
}

/// The two removal switches plus the meaning of "known".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// Delete every candidate.
    pub always_remove: bool,
    /// Delete candidates that are known.
    pub remove_if_known: bool,
    /// Definition of "known".
    pub known_requires: KnownRequirement,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            always_remove: false,
            remove_if_known: true,
            known_requires: KnownRequirement::Resolved,
        }
    }
}

impl CleanupPolicy {
    /// Whether a candidate counts as known under this policy.
    #[must_use]
    pub const fn is_known(&self, resolution: &Resolution, mark: &MarkState) -> bool {
        match self.known_requires {
            KnownRequirement::Resolved => resolution.is_match(),
            KnownRequirement::Marked => mark.is_marked(),
        }
    }

    /// `always_remove || (remove_if_known && known)`.
    #[must_use]
    pub const fn should_remove(&self, resolution: &Resolution, mark: &MarkState) -> bool {
        self.always_remove || (self.remove_if_known && self.is_known(resolution, mark))
    }
}

/// Outcome of the cleanup step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemovalState {
    /// Policy kept the torrent.
    NotRemoved,
    /// The client deleted the torrent and its files.
    Removed,
    /// The client rejected the deletion.
    Failed {
        /// Error detail.
        reason: String,
    },
}

impl RemovalState {
    /// Short label used in reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotRemoved => "kept",
            Self::Removed => "removed",
            Self::Failed { .. } => "remove_failed",
        }
    }
}
