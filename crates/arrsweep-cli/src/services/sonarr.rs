//! Sonarr API v3 adapter.

use arrsweep_core::{EpisodeCatalog, EpisodeId, HistoryEntry, HistoryRecordId, ServiceResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{HEADER_API_KEY, decode_ok, endpoint, expect_ok, send};

const SERVICE: &str = "Sonarr";

/// Episodic catalog backed by a Sonarr instance.
pub(crate) struct SonarrClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl SonarrClient {
    pub(crate) fn new(client: Client, base: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base,
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    episodes: Vec<EpisodeRef>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRef {
    #[serde(default)]
    id: i64,
}

#[derive(Debug, Deserialize)]
struct HistoryPage {
    #[serde(default)]
    records: Vec<HistoryRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRecord {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    event_type: String,
}

#[async_trait]
impl EpisodeCatalog for SonarrClient {
    async fn parse_title(&self, title: &str) -> ServiceResult<Option<EpisodeId>> {
        let url = endpoint(&self.base, "parse", SERVICE, "parse")?;
        let request = self
            .client
            .get(url)
            .header(HEADER_API_KEY, &self.api_key)
            .query(&[("title", title)]);
        let response = send(request, SERVICE, "parse").await?;
        let parsed: ParseResponse = decode_ok(response, SERVICE, "parse").await?;
        Ok(parsed
            .episodes
            .first()
            .and_then(|episode| EpisodeId::new(episode.id)))
    }

    async fn history(&self, episode: EpisodeId) -> ServiceResult<Vec<HistoryEntry>> {
        let url = endpoint(&self.base, "history", SERVICE, "history")?;
        let episode_id = episode.to_string();
        let request = self
            .client
            .get(url)
            .header(HEADER_API_KEY, &self.api_key)
            .query(&[
                ("sortKey", "date"),
                ("sortDir", "desc"),
                ("episodeId", episode_id.as_str()),
            ]);
        let response = send(request, SERVICE, "history").await?;
        let page: HistoryPage = decode_ok(response, SERVICE, "history").await?;
        Ok(page
            .records
            .into_iter()
            .map(|record| HistoryEntry {
                id: HistoryRecordId::new(record.id),
                event_type: record.event_type,
            })
            .collect())
    }

    async fn mark_failed(&self, record: HistoryRecordId) -> ServiceResult<()> {
        let path = format!("history/failed/{record}");
        let url = endpoint(&self.base, &path, SERVICE, "history/failed")?;
        let request = self.client.post(url).header(HEADER_API_KEY, &self.api_key);
        let response = send(request, SERVICE, "history/failed").await?;
        expect_ok(response, SERVICE, "history/failed").await?;
        Ok(())
    }
}
