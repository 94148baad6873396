//! BDA Core
//!
//! Core types and abstractions for talking to an asynchronous data automation API.
//!
//! This crate contains:
//! - Domain types: job handles, observed statuses, terminal results
//! - Status rules: how a status payload is classified as pending or terminal
//! - JSON paths: dotted lookups into service payloads
//! - DTOs: request/response bodies of the job submission and status APIs

pub mod domain;
pub mod dto;
pub mod error;
pub mod path;

pub use error::CoreError;
pub use path::JsonPath;
