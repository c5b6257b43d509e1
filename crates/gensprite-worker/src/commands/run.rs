//! Run command implementation
//!
//! Processes one job envelope end to end with the HTTP collaborators and
//! prints the handler output as JSON. The exit code is 0 only when the job
//! completed.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::WorkerConfig;
use crate::handler::{HandlerOutput, Worker};

/// Loads the config file when given, otherwise the environment.
pub fn load_config(config: Option<&str>) -> Result<WorkerConfig> {
    match config {
        Some(path) => WorkerConfig::load_from_file(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path)),
        None => WorkerConfig::from_env().context("Failed to read config from environment"),
    }
}

/// Run the run command
///
/// # Arguments
/// * `job` - Job envelope file
/// * `config` - Worker config file (default: environment)
pub fn run(job: &str, config: Option<&str>) -> Result<ExitCode> {
    let envelope =
        fs::read_to_string(job).with_context(|| format!("Failed to read job file: {}", job))?;
    let config = load_config(config)?;

    eprintln!(
        "{} {} (inference at {})",
        "Running job:".cyan().bold(),
        job,
        config.inference_url
    );

    let worker = Worker::from_config(config).context("Failed to build HTTP client")?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let output = rt.block_on(worker.process_json(&envelope));

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize output")?
    );

    match output {
        HandlerOutput::Completed { .. } => {
            eprintln!("{}", "SUCCESS".green().bold());
            Ok(ExitCode::SUCCESS)
        }
        HandlerOutput::Error { error } => {
            eprintln!("{} {}", "FAILED".red().bold(), error);
            Ok(ExitCode::from(1))
        }
    }
}
