//! Error types for collaborator calls and sweep runs.

use std::error::Error;

use thiserror::Error;

/// Failure raised by a remote collaborator (download client or media service).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("{service} {operation} request failed")]
    Transport {
        /// Collaborator name.
        service: &'static str,
        /// Operation identifier.
        operation: &'static str,
        /// Underlying transport failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The collaborator answered with a status the operation does not accept.
    #[error("{service} rejected {operation} with status {status}")]
    Rejected {
        /// Collaborator name.
        service: &'static str,
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code returned.
        status: u16,
        /// Response body, trimmed, for diagnostics.
        body: String,
    },
    /// The response body could not be decoded.
    #[error("{service} returned an unreadable {operation} payload")]
    Decode {
        /// Collaborator name.
        service: &'static str,
        /// Operation identifier.
        operation: &'static str,
        /// Underlying decoding failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Credentials were refused.
    #[error("{service} refused the supplied credentials (status {status}): {body}")]
    Unauthorized {
        /// Collaborator name.
        service: &'static str,
        /// HTTP status code returned.
        status: u16,
        /// Response body, trimmed, for diagnostics.
        body: String,
    },
    /// The collaborator cannot perform the requested operation.
    #[error("{service} does not support {operation}")]
    Unsupported {
        /// Collaborator name.
        service: &'static str,
        /// Operation identifier.
        operation: &'static str,
    },
}

impl ServiceError {
    /// Wrap a transport failure.
    pub fn transport(
        service: &'static str,
        operation: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            service,
            operation,
            source: source.into(),
        }
    }

    /// Wrap a decoding failure.
    pub fn decode(
        service: &'static str,
        operation: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Decode {
            service,
            operation,
            source: source.into(),
        }
    }

    /// Render the error and its source chain on one line.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Convenience alias for collaborator results.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure that aborts a whole sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The torrent list could not be fetched, so there is nothing to filter.
    #[error("failed to list torrents")]
    ListTorrents {
        /// Underlying collaborator failure.
        #[source]
        source: ServiceError,
    },
}
