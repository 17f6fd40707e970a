//! Threshold predicate selecting stalled, under-available torrents.

use chrono::{DateTime, Utc};

use crate::model::{TorrentRecord, TorrentState};

/// Thresholds a torrent must cross before it is treated as a failed download.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Torrents at or above this availability (absolute value) are healthy.
    pub min_availability: f64,
    /// Minimum client-reported active hours.
    pub min_active_hours: f64,
    /// Minimum wall-clock hours since the torrent was added.
    pub min_added_hours: f64,
    /// The only state eligible for cleanup.
    pub target_state: TorrentState,
}

impl FilterCriteria {
    /// Criteria targeting stalled downloads with the supplied thresholds.
    #[must_use]
    pub const fn stalled(min_availability: f64, min_active_hours: f64, min_added_hours: f64) -> Self {
        Self {
            min_availability,
            min_active_hours,
            min_added_hours,
            target_state: TorrentState::StalledDownload,
        }
    }

    /// Whether a single torrent satisfies every threshold.
    #[must_use]
    pub fn matches(&self, torrent: &TorrentRecord, now: DateTime<Utc>) -> bool {
        torrent.availability.abs() < self.min_availability
            && torrent.added_hours(now) >= self.min_added_hours
            && torrent.active_hours() >= self.min_active_hours
            && torrent.state == self.target_state
    }

    /// Select candidates from a listing, preserving client order.
    #[must_use]
    pub fn select<'a>(&self, torrents: &'a [TorrentRecord], now: DateTime<Utc>) -> Vec<Candidate<'a>> {
        torrents
            .iter()
            .filter(|torrent| self.matches(torrent, now))
            .map(|torrent| Candidate { torrent })
            .collect()
    }
}

/// A torrent that passed the filter.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The torrent as listed by the client.
    pub torrent: &'a TorrentRecord,
}
