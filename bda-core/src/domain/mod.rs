//! Core domain types
//!
//! These types describe an asynchronous job as seen from the outside: the
//! handle returned at submission, the status observed on each poll, and the
//! payload handed back once the job is terminal.

pub mod job;
pub mod status;
