//! Status sources
//!
//! The poller reads status payloads through [`StatusSource`] rather than
//! holding a client directly, so any status API (or a scripted fake) can be
//! plugged in.

use std::sync::Arc;

use async_trait::async_trait;
use bda_client::{ClientError, DataAutomationClient};
use bda_core::domain::job::JobHandle;
use serde_json::Value;

/// Something that can report the current status payload of a job
///
/// Each call must be an independent, read-only query.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, handle: &JobHandle) -> Result<Value, ClientError>;
}

#[async_trait]
impl StatusSource for DataAutomationClient {
    async fn fetch_status(&self, handle: &JobHandle) -> Result<Value, ClientError> {
        self.get_data_automation_status(handle).await
    }
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    async fn fetch_status(&self, handle: &JobHandle) -> Result<Value, ClientError> {
        (**self).fetch_status(handle).await
    }
}
