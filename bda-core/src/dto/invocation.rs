//! Invocation DTOs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Project or blueprint stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    #[default]
    Live,
    Development,
}

impl FromStr for Stage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LIVE" => Ok(Stage::Live),
            "DEVELOPMENT" => Ok(Stage::Development),
            other => Err(CoreError::InvalidRequest(format!(
                "unknown stage `{}` (expected LIVE or DEVELOPMENT)",
                other
            ))),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Live => f.write_str("LIVE"),
            Stage::Development => f.write_str("DEVELOPMENT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Location {
    pub s3_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAutomationConfiguration {
    pub data_automation_project_arn: String,
    pub stage: Stage,
}

/// Custom output blueprint applied to the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintRef {
    pub blueprint_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
}

/// Request body of `InvokeDataAutomationAsync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeDataAutomation {
    pub input_configuration: S3Location,
    pub output_configuration: S3Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_automation_configuration: Option<DataAutomationConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blueprints: Vec<BlueprintRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_automation_profile_arn: Option<String>,
    /// Idempotency token; resubmitting the same token returns the same job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

impl InvokeDataAutomation {
    /// Request with input and output locations and nothing else
    ///
    /// A project or at least one blueprint must be added before it validates.
    pub fn new(input_uri: impl Into<String>, output_uri: impl Into<String>) -> Self {
        Self {
            input_configuration: S3Location {
                s3_uri: input_uri.into(),
            },
            output_configuration: S3Location {
                s3_uri: output_uri.into(),
            },
            data_automation_configuration: None,
            blueprints: Vec::new(),
            data_automation_profile_arn: None,
            client_token: None,
        }
    }

    /// Request for a project-driven (standard or custom output) invocation
    pub fn for_project(
        input_uri: impl Into<String>,
        output_uri: impl Into<String>,
        project_arn: impl Into<String>,
        stage: Stage,
    ) -> Self {
        Self::new(input_uri, output_uri).with_project(project_arn, stage)
    }

    pub fn with_project(mut self, project_arn: impl Into<String>, stage: Stage) -> Self {
        self.data_automation_configuration = Some(DataAutomationConfiguration {
            data_automation_project_arn: project_arn.into(),
            stage,
        });
        self
    }

    pub fn with_blueprint(mut self, blueprint: BlueprintRef) -> Self {
        self.blueprints.push(blueprint);
        self
    }

    pub fn with_profile(mut self, profile_arn: impl Into<String>) -> Self {
        self.data_automation_profile_arn = Some(profile_arn.into());
        self
    }

    pub fn with_client_token(mut self, token: impl Into<String>) -> Self {
        self.client_token = Some(token.into());
        self
    }

    /// Local checks performed before anything is sent
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, location) in [
            ("input", &self.input_configuration),
            ("output", &self.output_configuration),
        ] {
            if !location.s3_uri.starts_with("s3://") {
                return Err(CoreError::InvalidRequest(format!(
                    "{} location must be an s3:// URI, got `{}`",
                    name, location.s3_uri
                )));
            }
        }

        if self.data_automation_configuration.is_none() && self.blueprints.is_empty() {
            return Err(CoreError::InvalidRequest(
                "either a project or at least one blueprint is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Response body of `InvokeDataAutomationAsync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeDataAutomationResponse {
    pub invocation_arn: String,
}

/// Request body of `GetDataAutomationStatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDataAutomationStatus {
    pub invocation_arn: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invoke_serializes_camel_case() {
        let req = InvokeDataAutomation::for_project(
            "s3://bucket/input/claim.pdf",
            "s3://bucket/output",
            "arn:aws:bedrock:us-west-2:123:data-automation-project/p1",
            Stage::Live,
        )
        .with_profile("arn:aws:bedrock:us-west-2:123:data-automation-profile/us.data-automation-v1");

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "inputConfiguration": { "s3Uri": "s3://bucket/input/claim.pdf" },
                "outputConfiguration": { "s3Uri": "s3://bucket/output" },
                "dataAutomationConfiguration": {
                    "dataAutomationProjectArn": "arn:aws:bedrock:us-west-2:123:data-automation-project/p1",
                    "stage": "LIVE"
                },
                "dataAutomationProfileArn": "arn:aws:bedrock:us-west-2:123:data-automation-profile/us.data-automation-v1"
            })
        );
    }

    #[test]
    fn test_validate() {
        let ok = InvokeDataAutomation::for_project("s3://b/in", "s3://b/out", "arn:p", Stage::Live);
        assert!(ok.validate().is_ok());

        let bad_input =
            InvokeDataAutomation::for_project("/tmp/in.pdf", "s3://b/out", "arn:p", Stage::Live);
        assert!(matches!(
            bad_input.validate(),
            Err(CoreError::InvalidRequest(msg)) if msg.contains("input")
        ));

        let mut no_target = ok.clone();
        no_target.data_automation_configuration = None;
        assert!(no_target.validate().is_err());

        let blueprint_only = no_target.with_blueprint(BlueprintRef {
            blueprint_arn: "arn:b".to_string(),
            version: None,
            stage: Some(Stage::Development),
        });
        assert!(blueprint_only.validate().is_ok());
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!("live".parse::<Stage>().unwrap(), Stage::Live);
        assert_eq!("DEVELOPMENT".parse::<Stage>().unwrap(), Stage::Development);
        assert!("staging".parse::<Stage>().is_err());
    }
}
