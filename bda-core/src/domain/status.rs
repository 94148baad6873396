//! Status classification
//!
//! A [`StatusRule`] says where the status tag lives in a payload and which
//! tags are terminal. Services disagree on both, so the rule is data rather
//! than code.

use std::fmt;

use serde_json::Value;

use crate::domain::job::JobStatus;
use crate::path::JsonPath;

/// Tag recorded when the status field is absent from a payload
pub const MISSING_STATUS: &str = "<missing>";

/// A status tag together with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedStatus {
    pub tag: String,
    pub status: JobStatus,
}

impl fmt::Display for ObservedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// Where to find the status tag and how to classify it
#[derive(Debug, Clone)]
pub struct StatusRule {
    path: JsonPath,
    success_states: Vec<String>,
    failure_states: Vec<String>,
    pending_states: Vec<String>,
}

impl StatusRule {
    /// Rule with no known states; every tag is non-terminal until configured
    pub fn new(path: JsonPath) -> Self {
        Self {
            path,
            success_states: Vec::new(),
            failure_states: Vec::new(),
            pending_states: Vec::new(),
        }
    }

    /// Rule for the data automation status API
    pub fn data_automation() -> Self {
        Self::new(JsonPath::field("status"))
            .with_success(["Success"])
            .with_failure(["ServiceError", "ClientError"])
            .with_pending(["Created", "InProgress"])
    }

    pub fn with_success<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.success_states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn with_failure<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failure_states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn with_pending<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending_states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Classify a raw tag
    ///
    /// Success wins over failure if a tag is listed in both.
    pub fn classify_tag(&self, tag: &str) -> JobStatus {
        let contains = |states: &[String]| states.iter().any(|s| s == tag);

        if contains(&self.success_states) {
            JobStatus::Success
        } else if contains(&self.failure_states) {
            JobStatus::Failed
        } else if contains(&self.pending_states) {
            JobStatus::InProgress
        } else {
            JobStatus::Other(tag.to_string())
        }
    }

    /// Extract and classify the status tag of a payload
    ///
    /// A missing field or a non-string value never yields a terminal status.
    pub fn observe(&self, payload: &Value) -> ObservedStatus {
        match self.path.lookup(payload) {
            Some(Value::String(tag)) => ObservedStatus {
                tag: tag.clone(),
                status: self.classify_tag(tag),
            },
            Some(other) => {
                let tag = other.to_string();
                ObservedStatus {
                    status: JobStatus::Other(tag.clone()),
                    tag,
                }
            }
            None => ObservedStatus {
                tag: MISSING_STATUS.to_string(),
                status: JobStatus::Other(MISSING_STATUS.to_string()),
            },
        }
    }
}

impl Default for StatusRule {
    fn default() -> Self {
        Self::data_automation()
    }
}
