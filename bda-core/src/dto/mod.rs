//! Data Transfer Objects for the data automation API
//!
//! Wire representations of the job submission and status query calls. Field
//! names follow the service's camelCase JSON.

pub mod invocation;
