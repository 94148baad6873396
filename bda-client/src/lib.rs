//! BDA HTTP Client
//!
//! A small, typed HTTP client for an asynchronous data automation API.
//!
//! The client covers the two calls a caller needs around a job: submitting it
//! (`InvokeDataAutomationAsync`) and reading its status
//! (`GetDataAutomationStatus`). Request signing and credential handling are
//! left to whatever sits in front of `base_url`.
//!
//! # Example
//!
//! ```no_run
//! use bda_client::DataAutomationClient;
//! use bda_core::dto::invocation::{InvokeDataAutomation, Stage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DataAutomationClient::new("http://localhost:4566");
//!
//!     let handle = client
//!         .invoke_data_automation(InvokeDataAutomation::for_project(
//!             "s3://bucket/input/claim.pdf",
//!             "s3://bucket/output",
//!             "arn:aws:bedrock:us-west-2:123456789012:data-automation-project/abc",
//!             Stage::Live,
//!         ))
//!         .await?;
//!
//!     println!("Submitted: {}", handle);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the data automation API
#[derive(Debug, Clone)]
pub struct DataAutomationClient {
    /// Base URL of the service endpoint (e.g., "https://bedrock-data-automation-runtime.us-west-2.amazonaws.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl DataAutomationClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use bda_client::DataAutomationClient;
    ///
    /// let client = DataAutomationClient::new("http://localhost:4566");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use bda_client::DataAutomationClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = DataAutomationClient::with_client("http://localhost:4566", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DataAutomationClient::new("http://localhost:4566");
        assert_eq!(client.base_url(), "http://localhost:4566");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = DataAutomationClient::new("http://localhost:4566/");
        assert_eq!(client.base_url(), "http://localhost:4566");
    }
}
