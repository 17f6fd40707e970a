//! HTTP adapters implementing the core collaborator traits.
//!
//! Every adapter shares one `reqwest::Client` (and therefore one timeout) and
//! resolves endpoints relative to a base URL that ends with `/`.

pub(crate) mod qbittorrent;
pub(crate) mod radarr;
pub(crate) mod sonarr;

use arrsweep_core::{ServiceError, ServiceResult};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

pub(crate) use qbittorrent::QbittorrentSession;
pub(crate) use radarr::RadarrClient;
pub(crate) use sonarr::SonarrClient;

/// Header carrying the Sonarr/Radarr API key.
pub(crate) const HEADER_API_KEY: &str = "x-api-key";

const BODY_SNIPPET_LIMIT: usize = 200;

/// Resolve `path` against a base URL.
pub(crate) fn endpoint(
    base: &Url,
    path: &str,
    service: &'static str,
    operation: &'static str,
) -> ServiceResult<Url> {
    base.join(path)
        .map_err(|err| ServiceError::transport(service, operation, err))
}

/// Send a prepared request, mapping connection failures and timeouts.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    service: &'static str,
    operation: &'static str,
) -> ServiceResult<Response> {
    request
        .send()
        .await
        .map_err(|err| ServiceError::transport(service, operation, err))
}

/// Require HTTP 200, turning anything else into [`ServiceError::Rejected`].
pub(crate) async fn expect_ok(
    response: Response,
    service: &'static str,
    operation: &'static str,
) -> ServiceResult<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    Err(ServiceError::Rejected {
        service,
        operation,
        status: status.as_u16(),
        body: body_snippet(response).await,
    })
}

/// Require HTTP 200 and decode the JSON body.
pub(crate) async fn decode_ok<T: DeserializeOwned>(
    response: Response,
    service: &'static str,
    operation: &'static str,
) -> ServiceResult<T> {
    let response = expect_ok(response, service, operation).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ServiceError::transport(service, operation, err))?;
    serde_json::from_slice(&bytes).map_err(|err| ServiceError::decode(service, operation, err))
}

/// Trimmed, bounded response body for diagnostics.
pub(crate) async fn body_snippet(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    let trimmed = text.trim();
    trimmed.chars().take(BODY_SNIPPET_LIMIT).collect()
}
