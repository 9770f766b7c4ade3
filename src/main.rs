//! Tree Uploadr - upload a file or directory tree to S3-compatible storage

use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tree_uploadr::config::{Args, LogFormat};
use tree_uploadr::s3::S3Client;
use tree_uploadr::{RunReport, UploadScheduler};

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }

    Ok(())
}

async fn run(args: &Args) -> anyhow::Result<RunReport> {
    let config = args.to_config();
    config.validate()?;

    let client = S3Client::from_config(&config)
        .await
        .context("Failed to create object storage client")?;

    let scheduler = UploadScheduler::new(Arc::new(config), Arc::new(client));
    Ok(scheduler.run().await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    info!(
        source = %args.source.display(),
        bucket = %args.bucket,
        "Tree Uploadr v{} started",
        tree_uploadr::VERSION
    );

    let start_time = Instant::now();
    match run(&args).await {
        Ok(report) => {
            info!(
                mode = %report.mode,
                files = report.files,
                bytes = report.bytes,
                elapsed_ms = start_time.elapsed().as_millis(),
                "Tree Uploadr finished successfully"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Upload aborted");
            ExitCode::FAILURE
        }
    }
}
