//! BDA Poller
//!
//! Waits for an asynchronous job to reach a terminal state.
//!
//! Architecture:
//! - Configuration: interval, timeout and retry settings, from code or environment
//! - Sources: where status payloads come from (the HTTP client, or a test fake)
//! - Clock: how time passes (tokio timers, or a manual clock in tests)
//! - Poller: the fixed-interval wait loop itself
//!
//! The poller only observes jobs. It never submits or cancels them; a wait
//! that times out leaves the remote job running.

pub mod clock;
pub mod config;
pub mod error;
pub mod poller;
pub mod source;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::PollerConfig;
pub use error::PollError;
pub use poller::{JobPoller, wait_for_completion};
pub use source::StatusSource;
