//! Job-related API endpoints

use bda_core::domain::job::JobHandle;
use bda_core::dto::invocation::{
    GetDataAutomationStatus, InvokeDataAutomation, InvokeDataAutomationResponse,
};
use serde_json::Value;

use crate::DataAutomationClient;
use crate::error::{ClientError, Result};

impl DataAutomationClient {
    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Submit a document for asynchronous processing
    ///
    /// The request is validated locally first; nothing is sent if it fails.
    ///
    /// # Returns
    /// The handle (invocation ARN) of the new job
    pub async fn invoke_data_automation(&self, req: InvokeDataAutomation) -> Result<JobHandle> {
        req.validate()?;

        let url = format!("{}/InvokeDataAutomationAsync", self.base_url);
        tracing::debug!(
            "Submitting {} to {}",
            req.input_configuration.s3_uri,
            url
        );
        let response = self.client.post(&url).json(&req).send().await?;

        let body: InvokeDataAutomationResponse = self.handle_response(response).await?;
        JobHandle::new(body.invocation_arn).map_err(|_| {
            ClientError::ParseError("Service returned an empty invocation ARN".to_string())
        })
    }

    // =============================================================================
    // Job Status
    // =============================================================================

    /// Fetch the current status payload of a job
    ///
    /// The payload is returned as-is; classifying it is up to the caller.
    pub async fn get_data_automation_status(&self, handle: &JobHandle) -> Result<Value> {
        let url = format!("{}/GetDataAutomationStatus", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&GetDataAutomationStatus {
                invocation_arn: handle.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
