//! Command handlers grouped by concern, plus the wiring they share.

pub(crate) mod candidates;
pub(crate) mod config;
pub(crate) mod run;

use std::sync::Arc;

use anyhow::Context;
use arrsweep_config::{KnownRequires, RemovalConfig, SweepConfig, ThresholdConfig};
use arrsweep_core::{
    CleanupPolicy, EpisodeStrategy, EventSink, FilterCriteria, KnownRequirement, MovieStrategy,
    Resolver, ResolverStrategy, Sweeper,
};

use crate::client::{AppContext, CliError, CliResult, parse_url};
use crate::services::{QbittorrentSession, RadarrClient, SonarrClient};

/// Log in to the download client and assemble a sweeper from configuration.
pub(crate) async fn connect(ctx: &AppContext, events: Arc<dyn EventSink>) -> CliResult<Sweeper> {
    let config = &ctx.config;
    let base = parse_url("qbittorrent", &config.qbittorrent.url)?;
    let session = QbittorrentSession::login(
        ctx.client.clone(),
        base,
        &config.qbittorrent.username,
        &config.qbittorrent.password,
    )
    .await
    .context("qBittorrent login failed")
    .map_err(CliError::failure)?;
    tracing::debug!("authenticated with qBittorrent");

    Ok(Sweeper::new(
        Arc::new(session),
        resolver(ctx)?,
        criteria(&config.thresholds),
        policy(&config.removal),
        events,
    ))
}

/// Strategies for every enabled media service, episodic first.
pub(crate) fn resolver(ctx: &AppContext) -> CliResult<Resolver> {
    let config: &SweepConfig = &ctx.config;
    let mut strategies: Vec<Arc<dyn ResolverStrategy>> = Vec::new();
    if config.sonarr.enabled {
        let sonarr = SonarrClient::new(
            ctx.client.clone(),
            parse_url("sonarr", &config.sonarr.url)?,
            config.sonarr.api_key.clone(),
        );
        strategies.push(Arc::new(EpisodeStrategy::new(Arc::new(sonarr))));
    }
    if config.radarr.enabled {
        let radarr = RadarrClient::new(
            ctx.client.clone(),
            parse_url("radarr", &config.radarr.url)?,
            config.radarr.api_key.clone(),
        );
        strategies.push(Arc::new(MovieStrategy::new(Arc::new(radarr))));
    }
    if strategies.is_empty() {
        tracing::warn!("no media services enabled; candidates will stay unresolved");
    }
    Ok(Resolver::new(strategies))
}

pub(crate) const fn criteria(thresholds: &ThresholdConfig) -> FilterCriteria {
    FilterCriteria::stalled(
        thresholds.min_availability,
        thresholds.min_active_hours,
        thresholds.min_added_hours,
    )
}

pub(crate) const fn policy(removal: &RemovalConfig) -> CleanupPolicy {
    CleanupPolicy {
        always_remove: removal.always_remove,
        remove_if_known: removal.remove_if_known,
        known_requires: match removal.known_requires {
            KnownRequires::Resolved => KnownRequirement::Resolved,
            KnownRequires::Marked => KnownRequirement::Marked,
        },
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use arrsweep_config::SweepConfig;
    use httpmock::prelude::*;

    use crate::client::AppContext;

    /// Configuration pointing every service at mock servers.
    pub(crate) fn context(
        qbittorrent: &MockServer,
        sonarr: Option<&MockServer>,
        radarr: Option<&MockServer>,
    ) -> AppContext {
        let mut config = SweepConfig::default();
        config.qbittorrent.url = qbittorrent.url("/api/v2/");
        config.qbittorrent.password = "secret".into();
        config.sonarr.enabled = sonarr.is_some();
        if let Some(server) = sonarr {
            config.sonarr.url = server.url("/api/v3/");
            config.sonarr.api_key = "sonarr-key".into();
        }
        config.radarr.enabled = radarr.is_some();
        if let Some(server) = radarr {
            config.radarr.url = server.url("/api/v3/");
            config.radarr.api_key = "radarr-key".into();
        }
        AppContext::new(config).expect("http client builds")
    }

    /// Accept the default credentials and hand out a session cookie.
    pub(crate) fn accept_login(server: &MockServer) {
        server.mock(|when, then| {
            when.method(POST).path("/api/v2/auth/login");
            then.status(200)
                .header("set-cookie", "SID=test-session; path=/")
                .body("Ok.");
        });
    }
}
