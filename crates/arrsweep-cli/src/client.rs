//! Shared HTTP client, error types, and run context for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use arrsweep_config::SweepConfig;
use reqwest::{Client, Url};

const USER_AGENT: &str = concat!("arrsweep/", env!("CARGO_PKG_VERSION"));

/// CLI-level error type to distinguish validation, total, and partial failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    Partial(String),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Partial(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Partial(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) config: SweepConfig,
}

impl AppContext {
    /// Build the shared HTTP client from the configured timeout.
    ///
    /// The client keeps a cookie jar so the qBittorrent session survives
    /// between requests.
    pub(crate) fn new(config: SweepConfig) -> CliResult<Self> {
        let client = build_http_client(config.http.timeout())?;
        Ok(Self { client, config })
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> CliResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Parse a base URL from validated configuration.
pub(crate) fn parse_url(section: &str, input: &str) -> CliResult<Url> {
    input
        .parse::<Url>()
        .map_err(|err| CliError::validation(format!("invalid {section} URL '{input}': {err}")))
}
