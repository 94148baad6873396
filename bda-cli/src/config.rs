//! Configuration module
//!
//! Handles CLI configuration: where the service lives and how long a single
//! request may take.

use std::time::Duration;

use anyhow::{Context, Result};
use bda_client::DataAutomationClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the data automation endpoint
    pub endpoint: String,

    /// Timeout applied to each HTTP request (not to the whole wait)
    pub request_timeout: Duration,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!("endpoint must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds a client for the configured endpoint
    pub fn client(&self) -> Result<DataAutomationClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            "Using endpoint {} (request timeout {:?})",
            self.endpoint,
            self.request_timeout
        );
        Ok(DataAutomationClient::with_client(&self.endpoint, http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(config("http://localhost:4566").validate().is_ok());
        assert!(config("https://bedrock-data-automation-runtime.us-west-2.amazonaws.com")
            .validate()
            .is_ok());
        assert!(config("localhost:4566").validate().is_err());

        let mut no_timeout = config("http://localhost:4566");
        no_timeout.request_timeout = Duration::ZERO;
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_client_uses_endpoint() {
        let client = config("http://localhost:4566/").client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:4566");
    }
}
