//! qBittorrent Web API v2 session.

use arrsweep_core::{DownloadClient, ServiceError, ServiceResult, TorrentRecord, TorrentState};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::{REFERER, SET_COOKIE};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::{body_snippet, decode_ok, endpoint, expect_ok, send};

const SERVICE: &str = "qBittorrent";
const LOGIN_OK: &str = "Ok.";

/// Authenticated session.
///
/// The session cookie lives in the client's cookie jar, whatever name the
/// server gives it (`SID`, `QBT_SID_<port>`).
pub(crate) struct QbittorrentSession {
    client: Client,
    base: Url,
}

impl QbittorrentSession {
    /// Log in with the Web UI credentials.
    ///
    /// Succeeds only on HTTP 200 with the body `Ok.`. `client` must be built
    /// with a cookie store.
    pub(crate) async fn login(
        client: Client,
        base: Url,
        username: &str,
        password: &str,
    ) -> ServiceResult<Self> {
        let url = endpoint(&base, "auth/login", SERVICE, "login")?;
        let request = client
            .post(url)
            .header(REFERER, base.origin().ascii_serialization())
            .form(&[("username", username), ("password", password)]);
        let response = send(request, SERVICE, "login").await?;

        let status = response.status();
        let issued_cookie = response.headers().contains_key(SET_COOKIE);
        let body = body_snippet(response).await;
        if status != StatusCode::OK || body != LOGIN_OK {
            return Err(ServiceError::Unauthorized {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        if !issued_cookie {
            tracing::debug!("qBittorrent accepted the login without issuing a session cookie");
        }

        Ok(Self { client, base })
    }
}

#[derive(Debug, Deserialize)]
struct TorrentInfo {
    hash: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    availability: f64,
    added_on: i64,
    #[serde(default)]
    time_active: i64,
    state: TorrentState,
}

impl TorrentInfo {
    /// `None` when `added_on` is outside the representable range.
    fn into_record(self) -> Option<TorrentRecord> {
        let Some(added_at) = DateTime::from_timestamp(self.added_on, 0) else {
            tracing::warn!(
                hash = %self.hash,
                added_on = self.added_on,
                "skipping torrent with out-of-range added_on"
            );
            return None;
        };
        Some(TorrentRecord {
            hash: self.hash,
            name: self.name,
            availability: self.availability,
            added_at,
            active_seconds: self.time_active,
            state: self.state,
        })
    }
}

#[async_trait]
impl DownloadClient for QbittorrentSession {
    async fn list_torrents(&self) -> ServiceResult<Vec<TorrentRecord>> {
        let url = endpoint(&self.base, "torrents/info", SERVICE, "torrents/info")?;
        let response = send(self.client.get(url), SERVICE, "torrents/info").await?;
        let torrents: Vec<TorrentInfo> = decode_ok(response, SERVICE, "torrents/info").await?;
        Ok(torrents
            .into_iter()
            .filter_map(TorrentInfo::into_record)
            .collect())
    }

    async fn delete_torrent(&self, hash: &str, delete_files: bool) -> ServiceResult<()> {
        let url = endpoint(&self.base, "torrents/delete", SERVICE, "torrents/delete")?;
        let delete_files = if delete_files { "true" } else { "false" };
        let request = self
            .client
            .post(url)
            .form(&[("hashes", hash), ("deleteFiles", delete_files)]);
        let response = send(request, SERVICE, "torrents/delete").await?;
        expect_ok(response, SERVICE, "torrents/delete").await?;
        Ok(())
    }
}
