//! Error types for the poller

use std::time::Duration;

use bda_client::ClientError;
use bda_core::domain::job::{ErrorDetail, JobHandle};
use thiserror::Error;

/// Ways a wait can end without a successful result
///
/// Every variant names the job it concerns; timeouts and query failures also
/// carry the elapsed time and the last status seen.
#[derive(Debug, Error)]
pub enum PollError {
    /// Rejected before any status query was made
    #[error("invalid poller configuration: {0}")]
    InvalidConfiguration(String),

    /// The service reported a terminal failure
    #[error("job {handle} failed with status {status}: {detail}")]
    JobFailed {
        handle: JobHandle,
        status: String,
        detail: ErrorDetail,
    },

    /// The deadline or poll budget ran out while the job was still running
    #[error(
        "job {handle} still running after {elapsed:?} ({polls} poll(s), last status {})",
        .last_status.as_deref().unwrap_or("unknown")
    )]
    JobTimeout {
        handle: JobHandle,
        elapsed: Duration,
        polls: u32,
        last_status: Option<String>,
    },

    /// Status queries kept failing with retryable errors
    #[error("status query for job {handle} failed after {attempts} attempt(s) ({elapsed:?} elapsed): {source}")]
    TransientQueryError {
        handle: JobHandle,
        attempts: u32,
        elapsed: Duration,
        last_status: Option<String>,
        source: ClientError,
    },

    /// A status query failed in a way retrying cannot fix
    #[error("status query for job {handle} was rejected: {source}")]
    QueryRejected {
        handle: JobHandle,
        last_status: Option<String>,
        source: ClientError,
    },
}

impl PollError {
    /// Job handle the error concerns, if any
    pub fn handle(&self) -> Option<&JobHandle> {
        match self {
            Self::InvalidConfiguration(_) => None,
            Self::JobFailed { handle, .. }
            | Self::JobTimeout { handle, .. }
            | Self::TransientQueryError { handle, .. }
            | Self::QueryRejected { handle, .. } => Some(handle),
        }
    }

    /// Last status observed before the wait ended
    pub fn last_status(&self) -> Option<&str> {
        match self {
            Self::InvalidConfiguration(_) => None,
            Self::JobFailed { status, .. } => Some(status),
            Self::JobTimeout { last_status, .. }
            | Self::TransientQueryError { last_status, .. }
            | Self::QueryRejected { last_status, .. } => last_status.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_last_status() {
        let err = PollError::JobTimeout {
            handle: JobHandle::new("job-1").unwrap(),
            elapsed: Duration::from_secs(10),
            polls: 2,
            last_status: Some("InProgress".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "job job-1 still running after 10s (2 poll(s), last status InProgress)"
        );
        assert_eq!(err.last_status(), Some("InProgress"));

        let err = PollError::JobTimeout {
            handle: JobHandle::new("job-1").unwrap(),
            elapsed: Duration::from_secs(10),
            polls: 0,
            last_status: None,
        };
        assert!(err.to_string().ends_with("last status unknown)"));
    }

    #[test]
    fn test_query_errors_keep_source() {
        use std::error::Error;

        let err = PollError::TransientQueryError {
            handle: JobHandle::new("job-1").unwrap(),
            attempts: 4,
            elapsed: Duration::from_secs(3),
            last_status: None,
            source: ClientError::api_error(503, "unavailable"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.handle().map(JobHandle::as_str), Some("job-1"));
    }
}
