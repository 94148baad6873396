//! Job poller
//!
//! Queries a job's status at a fixed interval until the service reports a
//! terminal state, the deadline passes, or the status API keeps failing.

use std::time::Duration;

use bda_core::domain::job::{ErrorDetail, JobHandle, JobResult, JobStatus};
use bda_core::domain::status::StatusRule;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clock::{Clock, TokioClock};
use crate::config::PollerConfig;
use crate::error::PollError;
use crate::source::StatusSource;

/// Waits for jobs to finish by polling a [`StatusSource`]
pub struct JobPoller<S, C = TokioClock> {
    source: S,
    clock: C,
    config: PollerConfig,
    rule: StatusRule,
}

/// Bookkeeping for a single wait
struct WaitState<'a> {
    handle: &'a JobHandle,
    started: Instant,
    deadline: Option<Instant>,
    polls: u32,
    last_status: Option<String>,
}

impl<S: StatusSource> JobPoller<S, TokioClock> {
    /// Creates a poller using the real clock and the data automation status rule
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self {
            source,
            clock: TokioClock,
            config,
            rule: StatusRule::default(),
        }
    }
}

impl<S: StatusSource, C: Clock> JobPoller<S, C> {
    /// Replaces the clock used for sleeping and measuring elapsed time
    pub fn with_clock<C2: Clock>(self, clock: C2) -> JobPoller<S, C2> {
        JobPoller {
            source: self.source,
            clock,
            config: self.config,
            rule: self.rule,
        }
    }

    /// Replaces the rule used to find and classify the status tag
    pub fn with_rule(mut self, rule: StatusRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Polls until the job is terminal
    ///
    /// Returns the final payload on success. Fails with `JobFailed` on a
    /// terminal failure, `JobTimeout` when the deadline or poll budget runs
    /// out, and `TransientQueryError`/`QueryRejected` when the status API
    /// cannot be read. The configuration is validated before the first query.
    pub async fn wait_for_completion(&self, handle: &JobHandle) -> Result<JobResult, PollError> {
        self.config.validate()?;

        let started = self.clock.now();
        let mut wait = WaitState {
            handle,
            started,
            // A timeout too large to represent as an instant never expires
            deadline: self.config.timeout.and_then(|t| started.checked_add(t)),
            polls: 0,
            last_status: None,
        };

        info!(
            "Waiting for job {} (interval: {:?}, timeout: {:?})",
            handle, self.config.poll_interval, self.config.timeout
        );

        loop {
            let payload = self.fetch(&wait).await?;
            wait.polls += 1;

            let observed = self.rule.observe(&payload);
            if wait.last_status.as_deref() != Some(observed.tag.as_str()) {
                info!("Job {} status: {}", handle, observed.tag);
            } else {
                debug!("Job {} still {} (poll {})", handle, observed.tag, wait.polls);
            }
            wait.last_status = Some(observed.tag.clone());

            match observed.status {
                JobStatus::Success => {
                    info!(
                        "Job {} succeeded after {} poll(s) in {:?}",
                        handle,
                        wait.polls,
                        self.elapsed(&wait)
                    );
                    return Ok(JobResult {
                        handle: handle.clone(),
                        status: observed.tag,
                        polls: wait.polls,
                        completed_at: chrono::Utc::now(),
                        payload,
                    });
                }
                JobStatus::Failed => {
                    let detail = ErrorDetail::from_payload(&payload);
                    warn!("Job {} failed with status {}: {}", handle, observed.tag, detail);
                    return Err(PollError::JobFailed {
                        handle: handle.clone(),
                        status: observed.tag,
                        detail,
                    });
                }
                JobStatus::Other(tag) => {
                    debug!("Unrecognised status {} for job {}, polling again", tag, handle);
                }
                JobStatus::InProgress => {}
            }

            if self.config.max_polls.is_some_and(|max| wait.polls >= max) {
                return Err(self.timed_out(&wait));
            }

            self.pause(self.config.poll_interval, &wait).await;
            if self.deadline_passed(&wait) {
                return Err(self.timed_out(&wait));
            }
        }
    }

    /// Issues one status query, retrying transient failures
    async fn fetch(&self, wait: &WaitState<'_>) -> Result<Value, PollError> {
        let mut attempts = 0;
        let mut delay = self.config.retry_initial_delay;

        loop {
            attempts += 1;

            let err = match self.source.fetch_status(wait.handle).await {
                Ok(payload) => return Ok(payload),
                Err(err) => err,
            };

            if !err.is_transient() {
                return Err(PollError::QueryRejected {
                    handle: wait.handle.clone(),
                    last_status: wait.last_status.clone(),
                    source: err,
                });
            }

            if attempts > self.config.max_query_retries {
                return Err(PollError::TransientQueryError {
                    handle: wait.handle.clone(),
                    attempts,
                    elapsed: self.elapsed(wait),
                    last_status: wait.last_status.clone(),
                    source: err,
                });
            }

            warn!(
                "Status query for job {} failed (attempt {}/{}): {}",
                wait.handle,
                attempts,
                self.config.max_query_retries + 1,
                err
            );

            let backoff = delay.min(self.config.poll_interval);
            debug!("Retrying in {:?}", backoff);
            self.pause(backoff, wait).await;
            if self.deadline_passed(wait) {
                return Err(self.timed_out(wait));
            }

            delay = delay.saturating_mul(2);
        }
    }

    /// Sleeps for `duration`, cut short at the deadline
    async fn pause(&self, duration: Duration, wait: &WaitState<'_>) {
        let nap = match wait.deadline {
            Some(deadline) => duration.min(deadline.saturating_duration_since(self.clock.now())),
            None => duration,
        };
        self.clock.sleep(nap).await;
    }

    fn deadline_passed(&self, wait: &WaitState<'_>) -> bool {
        wait.deadline.is_some_and(|deadline| self.clock.now() >= deadline)
    }

    fn elapsed(&self, wait: &WaitState<'_>) -> Duration {
        self.clock.now().saturating_duration_since(wait.started)
    }

    fn timed_out(&self, wait: &WaitState<'_>) -> PollError {
        let elapsed = self.elapsed(wait);
        warn!(
            "Gave up waiting for job {} after {:?} ({} poll(s)); the job keeps running",
            wait.handle, elapsed, wait.polls
        );
        PollError::JobTimeout {
            handle: wait.handle.clone(),
            elapsed,
            polls: wait.polls,
            last_status: wait.last_status.clone(),
        }
    }
}

/// Waits for a job with the given interval and optional timeout
///
/// Uses the real clock, the data automation status rule and the default
/// retry policy. Build a [`JobPoller`] for anything else.
pub async fn wait_for_completion<S: StatusSource>(
    source: S,
    handle: &JobHandle,
    poll_interval: Duration,
    timeout: Option<Duration>,
) -> Result<JobResult, PollError> {
    let config = PollerConfig::new()
        .with_poll_interval(poll_interval)
        .with_timeout(timeout);

    JobPoller::new(source, config)
        .wait_for_completion(handle)
        .await
}
