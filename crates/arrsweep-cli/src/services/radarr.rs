//! Radarr API v3 adapter.

use arrsweep_core::{MovieCatalog, MovieId, MovieMatch, ServiceResult};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{HEADER_API_KEY, decode_ok, endpoint, expect_ok, send};

const SERVICE: &str = "Radarr";

/// Movie catalog backed by a Radarr instance.
pub(crate) struct RadarrClient {
    client: Client,
    base: Url,
    api_key: String,
}

impl RadarrClient {
    pub(crate) fn new(client: Client, base: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base,
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    title: Option<String>,
}

#[async_trait]
impl MovieCatalog for RadarrClient {
    async fn lookup(&self, title: &str) -> ServiceResult<Vec<MovieMatch>> {
        let url = endpoint(&self.base, "movie/lookup", SERVICE, "movie/lookup")?;
        let request = self
            .client
            .get(url)
            .header(HEADER_API_KEY, &self.api_key)
            .query(&[("term", title)]);
        let response = send(request, SERVICE, "movie/lookup").await?;
        let results: Vec<LookupResult> = decode_ok(response, SERVICE, "movie/lookup").await?;
        Ok(results
            .into_iter()
            .map(|result| MovieMatch {
                id: result.id.and_then(MovieId::new),
                title: result.title,
            })
            .collect())
    }

    async fn mark_failed(&self, movie: MovieId) -> ServiceResult<()> {
        let path = format!("history/failed/{movie}");
        let url = endpoint(&self.base, &path, SERVICE, "history/failed")?;
        let request = self.client.post(url).header(HEADER_API_KEY, &self.api_key);
        let response = send(request, SERVICE, "history/failed").await?;
        expect_ok(response, SERVICE, "history/failed").await?;
        Ok(())
    }
}
