//! In-memory collaborators for pipeline tests.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{ServiceError, ServiceResult};
use crate::model::{EpisodeId, HistoryEntry, HistoryRecordId, MovieId, MovieMatch, TorrentRecord};
use crate::service::{DownloadClient, EpisodeCatalog, MovieCatalog};

fn unreachable(service: &'static str, operation: &'static str) -> ServiceError {
    ServiceError::transport(service, operation, io::Error::other("connection refused"))
}

fn rejected(service: &'static str, operation: &'static str) -> ServiceError {
    ServiceError::Rejected {
        service,
        operation,
        status: 500,
        body: "boom".into(),
    }
}

#[derive(Default)]
pub(crate) struct FakeEpisodes {
    parses: HashMap<String, i64>,
    history: HashMap<i64, Vec<HistoryEntry>>,
    fail_parse: bool,
    fail_history: bool,
    reject_marks: bool,
    parse_calls: AtomicUsize,
    history_calls: AtomicUsize,
    marked: Mutex<Vec<i64>>,
}

impl FakeEpisodes {
    pub(crate) fn parses(mut self, title: &str, episode: i64) -> Self {
        self.parses.insert(title.to_string(), episode);
        self
    }

    pub(crate) fn history(mut self, episode: i64, records: &[(i64, &str)]) -> Self {
        let entries = records
            .iter()
            .map(|(id, event_type)| HistoryEntry {
                id: HistoryRecordId::new(*id),
                event_type: (*event_type).to_string(),
            })
            .collect();
        self.history.insert(episode, entries);
        self
    }

    pub(crate) fn failing_parse(mut self) -> Self {
        self.fail_parse = true;
        self
    }

    pub(crate) fn failing_history(mut self) -> Self {
        self.fail_history = true;
        self
    }

    pub(crate) fn rejecting_marks(mut self) -> Self {
        self.reject_marks = true;
        self
    }

    pub(crate) fn parse_calls(&self) -> usize {
        self.parse_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn marked(&self) -> Vec<i64> {
        self.marked.lock().expect("marked mutex poisoned").clone()
    }
}

#[async_trait]
impl EpisodeCatalog for FakeEpisodes {
    async fn parse_title(&self, title: &str) -> ServiceResult<Option<EpisodeId>> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_parse {
            return Err(unreachable("Sonarr", "parse"));
        }
        Ok(self.parses.get(title).copied().and_then(EpisodeId::new))
    }

    async fn history(&self, episode: EpisodeId) -> ServiceResult<Vec<HistoryEntry>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_history {
            return Err(unreachable("Sonarr", "history"));
        }
        Ok(self.history.get(&episode.get()).cloned().unwrap_or_default())
    }

    async fn mark_failed(&self, record: HistoryRecordId) -> ServiceResult<()> {
        if self.reject_marks {
            return Err(rejected("Sonarr", "mark_failed"));
        }
        self.marked
            .lock()
            .expect("marked mutex poisoned")
            .push(record.get());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeMovies {
    results: HashMap<String, i64>,
    lookups: AtomicUsize,
    marked: Mutex<Vec<i64>>,
}

impl FakeMovies {
    pub(crate) fn finds(mut self, title: &str, movie: i64) -> Self {
        self.results.insert(title.to_string(), movie);
        self
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn marked(&self) -> Vec<i64> {
        self.marked.lock().expect("marked mutex poisoned").clone()
    }
}

#[async_trait]
impl MovieCatalog for FakeMovies {
    async fn lookup(&self, title: &str) -> ServiceResult<Vec<MovieMatch>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .results
            .get(title)
            .map(|id| {
                vec![MovieMatch {
                    id: MovieId::new(*id),
                    title: Some(title.to_string()),
                }]
            })
            .unwrap_or_default())
    }

    async fn mark_failed(&self, movie: MovieId) -> ServiceResult<()> {
        self.marked
            .lock()
            .expect("marked mutex poisoned")
            .push(movie.get());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeClient {
    torrents: Vec<TorrentRecord>,
    fail_list: bool,
    reject_deletes: bool,
    deleted: Mutex<Vec<(String, bool)>>,
}

impl FakeClient {
    pub(crate) fn with(torrents: Vec<TorrentRecord>) -> Self {
        Self {
            torrents,
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_list: true,
            ..Self::default()
        }
    }

    pub(crate) fn rejecting_deletes(mut self) -> Self {
        self.reject_deletes = true;
        self
    }

    pub(crate) fn deleted(&self) -> Vec<(String, bool)> {
        self.deleted.lock().expect("deleted mutex poisoned").clone()
    }
}

#[async_trait]
impl DownloadClient for FakeClient {
    async fn list_torrents(&self) -> ServiceResult<Vec<TorrentRecord>> {
        if self.fail_list {
            return Err(unreachable("qBittorrent", "list_torrents"));
        }
        Ok(self.torrents.clone())
    }

    async fn delete_torrent(&self, hash: &str, delete_files: bool) -> ServiceResult<()> {
        if self.reject_deletes {
            return Err(rejected("qBittorrent", "delete_torrent"));
        }
        self.deleted
            .lock()
            .expect("deleted mutex poisoned")
            .push((hash.to_string(), delete_files));
        Ok(())
    }
}
