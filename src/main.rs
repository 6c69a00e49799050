//! BucketSync CLI - parallel directory/object-storage sync
//!
//! Thin front end over the sync engine: parses arguments, wires up the
//! object store from environment and flags, and prints a run summary.

use anyhow::Context;
use bucketsync::config::{CliArgs, Commands, S3Config, SyncConfig};
use bucketsync::core::SyncEngine;
use bucketsync::progress::ProgressReporter;
use bucketsync::storage::S3Store;
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    let s3_config = S3Config::from_env().with_cli(&args);
    let store = Arc::new(S3Store::new(s3_config).context("object store configuration")?);

    let config = SyncConfig::from_cli(&args);

    let progress = if args.quiet || !args.progress {
        ProgressReporter::disabled()
    } else {
        ProgressReporter::new()
    };

    let engine = SyncEngine::new(store, config).with_progress(progress);

    let result = match &args.command {
        Commands::Upload {
            local_dir,
            remote_prefix,
        } => engine.upload_directory(local_dir, remote_prefix)?,
        Commands::Download {
            remote_prefix,
            local_dir,
        } => engine.download_directory(remote_prefix, local_dir)?,
    };

    if !args.quiet {
        result.print_summary();
        println!(
            "Finished in {}",
            humantime::format_duration(std::time::Duration::from_secs(
                start.elapsed().as_secs()
            ))
        );
    }

    Ok(())
}
