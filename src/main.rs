//! RDS Point-In-Time Restore Tool
//!
//! Re-provisions a staging Aurora cluster from a point-in-time snapshot of
//! a production cluster, replacing whatever currently sits at the
//! destination identifier.

// rdsrestoretool/src/main.rs
mod config;
mod errors;
mod rds;
mod restore;

use anyhow::{Context, Result};
use config::RestoreRequest;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Main entry point for the restore tool
#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Restore completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    // AWS credentials may live in a local .env during development; the SDK
    // reads them from the environment.
    dotenv::dotenv().ok();

    // Expects config.json in the same directory as the executable, or the
    // project root if running with `cargo run`.
    let config_path = PathBuf::from("config.json");
    let request = RestoreRequest::load_from_json(&config_path).context(format!(
        "Failed to load restore configuration from {}",
        config_path.display()
    ))?;

    println!(
        "🔄 Starting restore of [{}] from [{}] ...",
        request.destination_cluster_id, request.source_cluster_id
    );
    match request.restore_to_time {
        Some(restore_to) => println!("Restore time set to {restore_to}"),
        None => println!("Restore time set to latest available"),
    }

    let client = rds::init_rds_client(&request.region).await;

    // Ctrl-C stops the run at the next wait iteration instead of killing a
    // multi-hour poll mid-flight.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("⚠ Received Ctrl-C, stopping the run ...");
            signal_token.cancel();
        }
    });

    restore::run_restore_flow(&client, &request, &cancel)
        .await
        .context("Restore process failed")?;

    Ok(())
}
