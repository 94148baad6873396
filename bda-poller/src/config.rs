//! Poller configuration
//!
//! Defines the polling interval, the overall deadline and the retry policy
//! for failed status queries.

use std::time::Duration;

use anyhow::Context;

use crate::error::PollError;

/// Poller configuration
///
/// All timeouts and intervals are configurable to allow tuning for jobs that
/// finish in seconds as well as jobs that run for many minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Fixed wait between consecutive status queries
    pub poll_interval: Duration,

    /// Overall deadline for the wait; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Give up after this many status observations without a terminal state
    pub max_polls: Option<u32>,

    /// Consecutive transient query failures tolerated before giving up
    pub max_query_retries: u32,

    /// First retry delay after a transient failure; doubles up to `poll_interval`
    pub retry_initial_delay: Duration,
}

impl PollerConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: None,
            max_polls: None,
            max_query_retries: 3,
            retry_initial_delay: Duration::from_millis(500),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    pub fn with_max_polls(mut self, max_polls: impl Into<Option<u32>>) -> Self {
        self.max_polls = max_polls.into();
        self
    }

    pub fn with_max_query_retries(mut self, retries: u32) -> Self {
        self.max_query_retries = retries;
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional, durations in seconds):
    /// - BDA_POLL_INTERVAL (default: 5)
    /// - BDA_POLL_TIMEOUT (default: unbounded)
    /// - BDA_MAX_POLLS (default: unbounded)
    /// - BDA_MAX_QUERY_RETRIES (default: 3)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PollerConfig::from_env`], reading values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(interval) = parse_secs(&lookup, "BDA_POLL_INTERVAL")? {
            config.poll_interval = interval;
        }

        config.timeout = parse_secs(&lookup, "BDA_POLL_TIMEOUT")?;

        config.max_polls = lookup("BDA_MAX_POLLS")
            .map(|s| s.trim().parse::<u32>())
            .transpose()
            .context("BDA_MAX_POLLS must be a non-negative integer")?;

        if let Some(retries) = lookup("BDA_MAX_QUERY_RETRIES") {
            config.max_query_retries = retries
                .trim()
                .parse::<u32>()
                .context("BDA_MAX_QUERY_RETRIES must be a non-negative integer")?;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), PollError> {
        if self.poll_interval.is_zero() {
            return Err(PollError::InvalidConfiguration(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(PollError::InvalidConfiguration(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_polls == Some(0) {
            return Err(PollError::InvalidConfiguration(
                "max_polls must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a duration given in (possibly fractional) seconds
fn parse_secs<F>(lookup: &F, key: &str) -> anyhow::Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    let secs = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{} must be a number of seconds, got `{}`", key, raw))?;

    Duration::try_from_secs_f64(secs)
        .map(Some)
        .with_context(|| format!("{} must be a non-negative duration, got `{}`", key, raw))
}
