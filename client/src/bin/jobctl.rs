//! # jobctl
//!
//! Command-line front end for the requirements automation backend: upload a
//! requirements file, drive it through parse / generate / execute, and print
//! where the Allure report lives.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use jobapi_client::{file_part_from_path, ClientConfig, JobApiClient, JobId};

#[derive(Parser, Debug)]
#[command(name = "jobctl")]
#[command(about = "Drive requirements automation jobs from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Backend base URL (default: $REACT_APP_API_BASE or http://localhost:3001)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a CSV/XLS/XLSX requirements file and create a job
    Upload {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Parse the uploaded file of a job into requirements
    Parse { job_id: u64 },
    /// Generate test cases and code for a job
    Generate { job_id: u64 },
    /// Execute the generated tests of a job
    Execute { job_id: u64 },
    /// Print the Allure report URL for the latest run of a job
    ReportUrl { job_id: u64 },
    /// List artifacts recorded for a job
    Artifacts { job_id: u64 },
    /// Check backend liveness
    Health,
    /// Upload, parse, generate and execute in one go
    Pipeline {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.api_base {
        Some(api_base) => ClientConfig::new(api_base),
        None => ClientConfig::from_env(),
    };
    info!(api_base = %config.api_base, "using backend");
    let client = JobApiClient::new(&config);

    match cli.command {
        Command::Upload { path } => {
            let file = file_part_from_path(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            print_json(&client.upload_file(file).await?.0)?;
        }
        Command::Parse { job_id } => print_json(&client.parse_job(JobId(job_id)).await?.0)?,
        Command::Generate { job_id } => print_json(&client.generate_job(JobId(job_id)).await?.0)?,
        Command::Execute { job_id } => print_json(&client.execute_job(JobId(job_id)).await?.0)?,
        Command::ReportUrl { job_id } => println!("{}", client.allure_index_url(JobId(job_id))),
        Command::Artifacts { job_id } => {
            let artifacts = client.list_artifacts(JobId(job_id)).await?;
            print_json(&Value::Array(artifacts.0))?;
        }
        Command::Health => print_json(&client.health().await?.0)?,
        Command::Pipeline { path } => {
            let file = file_part_from_path(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let job = client.upload_file(file).await?;
            let job_id = job.id().context("upload response carried no job id")?;
            info!(%job_id, "uploaded");
            print_json(&job.0)?;

            print_json(&client.parse_job(job_id).await?.0)?;
            info!(%job_id, "parsed");
            print_json(&client.generate_job(job_id).await?.0)?;
            info!(%job_id, "generated");
            let run = client.execute_job(job_id).await?;
            info!(%job_id, status = run.status().unwrap_or("unknown"), "executed");
            print_json(&run.0)?;

            println!("{}", client.allure_index_url(job_id));
        }
    }

    Ok(())
}
