//! Job command handlers
//!
//! Handles submitting documents, checking job status and waiting for
//! completion.

use std::time::Duration;

use anyhow::{Context, Result};
use bda_client::DataAutomationClient;
use bda_core::domain::job::{ErrorDetail, JobHandle, JobResult, JobStatus, output_uri};
use bda_core::domain::status::StatusRule;
use bda_core::dto::invocation::{BlueprintRef, InvokeDataAutomation, Stage};
use bda_poller::{JobPoller, PollError, PollerConfig};
use clap::{Args, Subcommand};
use colored::*;
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Show the current status of a job
    Status {
        /// Job handle (invocation ARN)
        handle: String,

        /// Print the raw status payload
        #[arg(long)]
        json: bool,
    },
    /// Wait for a job to finish
    Wait {
        /// Job handle (invocation ARN)
        handle: String,

        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Submit a document for processing
    Invoke {
        /// S3 URI of the input document
        #[arg(long)]
        input: String,

        /// S3 URI prefix for the results
        #[arg(long)]
        output: String,

        /// Data automation project ARN
        #[arg(long)]
        project: Option<String>,

        /// Project stage
        #[arg(long, default_value = "LIVE")]
        stage: Stage,

        /// Blueprint ARN (repeatable)
        #[arg(long = "blueprint")]
        blueprints: Vec<String>,

        /// Data automation profile ARN
        #[arg(long)]
        profile: Option<String>,

        /// Idempotency token (generated when omitted)
        #[arg(long)]
        client_token: Option<String>,

        /// Wait for the job to finish after submitting it
        #[arg(long)]
        wait: bool,

        #[command(flatten)]
        wait_args: WaitArgs,
    },
}

/// Polling flags; unset flags fall back to BDA_* environment variables
#[derive(Args, Debug, Default)]
pub struct WaitArgs {
    /// Seconds between status queries
    #[arg(long)]
    interval: Option<f64>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Give up after this many status queries
    #[arg(long)]
    max_polls: Option<u32>,
}

impl WaitArgs {
    fn to_config(&self) -> Result<PollerConfig> {
        let mut config = PollerConfig::from_env().context("Invalid poller environment")?;

        if let Some(interval) = self.interval {
            config.poll_interval = secs("--interval", interval)?;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Some(secs("--timeout", timeout)?);
        }
        if let Some(max_polls) = self.max_polls {
            config.max_polls = Some(max_polls);
        }

        Ok(config)
    }
}

fn secs(flag: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{} must be a non-negative number of seconds", flag))
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        JobCommands::Status { handle, json } => {
            show_status(&client, &parse_handle(&handle)?, json).await
        }
        JobCommands::Wait { handle, wait } => {
            wait_for_job(client, &parse_handle(&handle)?, &wait).await
        }
        JobCommands::Invoke {
            input,
            output,
            project,
            stage,
            blueprints,
            profile,
            client_token,
            wait,
            wait_args,
        } => {
            let req = build_invocation(
                input,
                output,
                project,
                stage,
                blueprints,
                profile,
                client_token,
            );
            let handle = client
                .invoke_data_automation(req)
                .await
                .context("Failed to submit job")?;

            println!("{} {}", "Submitted job".green(), handle.to_string().cyan());

            if wait {
                wait_for_job(client, &handle, &wait_args).await?;
            }
            Ok(())
        }
    }
}

fn parse_handle(handle: &str) -> Result<JobHandle> {
    handle.parse().context("Invalid job handle")
}

fn build_invocation(
    input: String,
    output: String,
    project: Option<String>,
    stage: Stage,
    blueprints: Vec<String>,
    profile: Option<String>,
    client_token: Option<String>,
) -> InvokeDataAutomation {
    let mut req = InvokeDataAutomation::new(input, output)
        .with_client_token(client_token.unwrap_or_else(|| Uuid::new_v4().to_string()));

    if let Some(project) = project {
        req = req.with_project(project, stage);
    }
    for blueprint_arn in blueprints {
        req = req.with_blueprint(BlueprintRef {
            blueprint_arn,
            version: None,
            stage: Some(stage),
        });
    }
    if let Some(profile) = profile {
        req = req.with_profile(profile);
    }

    req
}

/// Query the status once and display it
async fn show_status(client: &DataAutomationClient, handle: &JobHandle, json: bool) -> Result<()> {
    let payload = client
        .get_data_automation_status(handle)
        .await
        .context("Failed to fetch job status")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_status(handle, &payload, &StatusRule::default());
    Ok(())
}

/// Block until the job is terminal and display the outcome
async fn wait_for_job(
    client: DataAutomationClient,
    handle: &JobHandle,
    args: &WaitArgs,
) -> Result<()> {
    let config = args.to_config()?;

    println!(
        "{} {} (every {:?})",
        "Waiting for job".bold(),
        handle.to_string().cyan(),
        config.poll_interval
    );

    match JobPoller::new(client, config).wait_for_completion(handle).await {
        Ok(result) => {
            print_result(&result);
            Ok(())
        }
        Err(err) => {
            print_poll_error(&err);
            Err(err.into())
        }
    }
}

/// Print the current status of a job
fn print_status(handle: &JobHandle, payload: &Value, rule: &StatusRule) {
    let observed = rule.observe(payload);

    println!("{}", "Job Status:".bold());
    println!("  Handle:  {}", handle.to_string().cyan());
    println!("  Status:  {}", colorize_status(&observed.status, &observed.tag));

    if let Some(uri) = output_uri(payload) {
        println!("  Output:  {}", uri);
    }

    if observed.status == JobStatus::Failed {
        print_error_detail(&ErrorDetail::from_payload(payload));
    }
}

/// Print a successful result
fn print_result(result: &JobResult) {
    println!(
        "{} {} after {} poll(s)",
        "✓".green(),
        result.status.green(),
        result.polls
    );
    println!(
        "  Completed: {}",
        result.completed_at.format("%Y-%m-%d %H:%M:%S")
    );
    match result.output_uri() {
        Some(uri) => println!("  Output:    {}", uri),
        None => println!("  Output:    {}", "(none reported)".dimmed()),
    }
}

/// Print why a wait ended without a result
fn print_poll_error(err: &PollError) {
    match err {
        PollError::JobFailed { status, detail, .. } => {
            println!("{} {}", "✗".red(), status.red());
            print_error_detail(detail);
        }
        PollError::JobTimeout {
            elapsed,
            polls,
            last_status,
            ..
        } => {
            println!(
                "{} still {} after {:?} ({} poll(s)); the job was not cancelled",
                "⚠".yellow(),
                last_status.as_deref().unwrap_or("unknown").yellow(),
                elapsed,
                polls
            );
        }
        other => println!("{} {}", "✗".red(), other.to_string().red()),
    }
}

fn print_error_detail(detail: &ErrorDetail) {
    println!("\n{}", "Error:".bold());
    println!("{}", detail.to_string().red());
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus, tag: &str) -> colored::ColoredString {
    match status {
        JobStatus::InProgress => tag.cyan(),
        JobStatus::Success => tag.green(),
        JobStatus::Failed => tag.red(),
        JobStatus::Other(_) => tag.yellow(),
    }
}
