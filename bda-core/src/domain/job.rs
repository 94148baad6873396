//! Job domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Opaque identifier of a job submitted to the external service
///
/// For the data automation API this is the invocation ARN. The poller only
/// observes jobs through their handle; it never creates or cancels them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(handle: impl Into<String>) -> Result<Self, CoreError> {
        let handle = handle.into();
        if handle.trim().is_empty() {
            return Err(CoreError::EmptyHandle);
        }
        Ok(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for JobHandle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classified job status
///
/// Anything the status rule does not recognise is `Other` and counts as
/// non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    InProgress,
    Success,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }
}

/// Structured error information reported by the service for a failed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub error_type: Option<String>,
    pub error_message: Option<String>,
    /// Full status payload the detail was extracted from
    pub payload: Value,
}

impl ErrorDetail {
    /// Extract error fields from a status payload
    ///
    /// Reads `errorType`/`errorMessage`; falls back to joining
    /// `failureReasons` when no message is present.
    pub fn from_payload(payload: &Value) -> Self {
        let error_type = payload
            .get("errorType")
            .and_then(Value::as_str)
            .map(str::to_string);

        let error_message = payload
            .get("errorMessage")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                let reasons: Vec<&str> = payload
                    .get("failureReasons")?
                    .as_array()?
                    .iter()
                    .filter_map(Value::as_str)
                    .collect();
                (!reasons.is_empty()).then(|| reasons.join("; "))
            });

        Self {
            error_type,
            error_message,
            payload: payload.clone(),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error_type, &self.error_message) {
            (Some(kind), Some(message)) => write!(f, "{}: {}", kind, message),
            (Some(kind), None) => f.write_str(kind),
            (None, Some(message)) => f.write_str(message),
            (None, None) => write!(f, "{}", self.payload),
        }
    }
}

/// Final payload of a job that reached terminal success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub handle: JobHandle,
    /// Raw status tag reported by the service (e.g. `Success`)
    pub status: String,
    /// Number of status queries issued before the job was seen terminal
    pub polls: u32,
    pub completed_at: DateTime<Utc>,
    pub payload: Value,
}

impl JobResult {
    /// Location of the job's output (`outputConfiguration.s3Uri`)
    pub fn output_uri(&self) -> Option<&str> {
        output_uri(&self.payload)
    }
}

/// Reads `outputConfiguration.s3Uri` from a raw status payload
pub fn output_uri(payload: &Value) -> Option<&str> {
    payload
        .get("outputConfiguration")
        .and_then(|out| out.get("s3Uri"))
        .and_then(Value::as_str)
}
