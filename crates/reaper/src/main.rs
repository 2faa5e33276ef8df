mod config;

use anyhow::Context;
use clap::Parser;
use reaper_config::constants;
use reaper_core::{PassSummary, Reaper, RunSummary};
use reaper_provider::AzureProvider;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Deletes expired Azure images, disks and virtual machines
#[derive(Parser, Debug)]
#[command(name = "reaper")]
#[command(about = "Deletes expired Azure images, disks and virtual machines", long_about = None)]
struct Args {
    /// Azure SDK auth file with service principal credentials
    #[arg(short = 'a', long, env = "AZURE_AUTH_LOCATION")]
    azure_login: PathBuf,

    /// Policy configuration file (defaults are used when it does not exist)
    #[arg(short, long, env = "REAPER_CONFIG", default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory the CSV reports are written to
    #[arg(long, env = "REAPER_REPORT_DIR")]
    report_dir: Option<PathBuf>,

    /// Log what would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = config::resolve_config(&args.config, args.report_dir).await?;
    let provider = AzureProvider::from_auth_file(&args.azure_login)
        .await
        .with_context(|| {
            format!(
                "Failed to authenticate with {}",
                args.azure_login.display()
            )
        })?;

    let now = chrono::Utc::now();
    info!("Evaluating resources against {}", now);

    let summary = Reaper::new(Arc::new(provider), config.policy, now)
        .dry_run(args.dry_run)
        .run()
        .await?;

    reaper_core::write_reports(&config.reports, &summary.report)
        .context("Failed to write cleanup reports")?;
    log_summary(&summary);

    Ok(())
}

fn log_summary(summary: &RunSummary) {
    let passes: [(&str, &PassSummary); 3] = [
        ("images", &summary.images),
        ("disks", &summary.disks),
        ("virtual machines", &summary.virtual_machines),
    ];

    for (name, pass) in passes {
        info!(
            "Cleanup of {} complete: {} scanned, {} protected, {} expired, {} deleted, {} failed, {} skipped",
            name,
            pass.scanned,
            pass.protected,
            pass.expired,
            pass.deleted,
            pass.failed,
            pass.skipped
        );
    }
}
