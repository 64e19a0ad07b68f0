//! Luit CLI: upload water-quality photos and submit contamination reports.
//!
//! Set LUIT_API_URL (or API_URL) to point at the reporting backend; optional
//! LUIT_API_TOKEN enables Bearer auth. Pipeline limits come from MAX_IMAGES,
//! MAX_FILE_SIZE_MB, MAX_WIDTH_OR_HEIGHT and JPEG_QUALITY.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use luit_api_client::ApiClient;
use luit_cli::{ensure_completed, ensure_report_can_proceed, init_tracing, UploadSummary};
use luit_core::models::{ContaminationType, ReportRequest, WaterSource, WorkingList};
use luit_core::PipelineConfig;
use luit_processing::{BatchOutcome, BatchUploader, CancellationToken};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "luit", about = "Luit water report CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress and upload images, printing the resulting working list
    Upload {
        /// Image files, processed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Override the maximum number of images
        #[arg(long)]
        max_images: Option<usize>,
    },
    /// Upload images, then submit a contamination report
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    #[arg(long)]
    village: String,
    /// arsenic, fluoride, bacteria, turbidity or other
    #[arg(long)]
    contamination: ContaminationType,
    /// tubewell, pond, river, tap or well
    #[arg(long)]
    source: WaterSource,
    #[arg(long)]
    description: Option<String>,
    /// Number of people relying on this source
    #[arg(long, default_value = "0")]
    affected: u32,
    /// Reporter user id
    #[arg(long)]
    reporter: Option<String>,
    /// Reporter display name
    #[arg(long)]
    name: Option<String>,
    /// Photos of the source; only the first uploaded one is linked to the report
    images: Vec<PathBuf>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Token cancelled on Ctrl-C so an in-flight batch stops at the next step.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling upload");
            token.cancel();
        }
    });
    cancel
}

async fn run_batch(
    batch: &BatchUploader,
    files: &[PathBuf],
    working: &mut WorkingList,
) -> BatchOutcome {
    let cancel = cancel_on_ctrl_c();

    let outcome = batch
        .upload_files_with(files, working, &cancel, |list| {
            tracing::info!(count = list.len(), max = list.max_images(), "Working list updated");
        })
        .await;

    for notice in &outcome.notices {
        tracing::warn!(level = ?notice.level, "{}", notice.message);
    }
    outcome
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = PipelineConfig::from_env().context("Invalid pipeline configuration")?;
    let client = Arc::new(
        ApiClient::from_env()
            .context("Failed to create API client. Set LUIT_API_URL (or API_URL)")?,
    );

    match cli.command {
        Commands::Upload { files, max_images } => {
            if let Some(max_images) = max_images {
                config.max_images = max_images;
                config.validate()?;
            }
            let batch = BatchUploader::new(config, client);
            let mut working = batch.new_working_list();

            let outcome = run_batch(&batch, &files, &mut working).await;
            print_json(&UploadSummary::new(&working, &outcome))?;
            ensure_completed(&outcome)?;
        }
        Commands::Report(args) => {
            let batch = BatchUploader::new(config, client.clone());
            let mut working = batch.new_working_list();

            if !args.images.is_empty() {
                let outcome = run_batch(&batch, &args.images, &mut working).await;
                ensure_report_can_proceed(&outcome, &working)?;
            }

            let mut request =
                ReportRequest::new(args.lat, args.lon, args.village, args.contamination, args.source)
                    .with_affected_population(args.affected)
                    .with_first_image(&working);
            if let Some(description) = args.description {
                request = request.with_description(description);
            }
            if args.reporter.is_some() || args.name.is_some() {
                let reporter = args.reporter.unwrap_or_else(|| "anonymous".to_string());
                let name = args.name.unwrap_or_else(|| "Anonymous".to_string());
                request = request.with_reporter(reporter, name);
            }

            let response = client.create_report(&request).await?;
            print_json(&response)?;
        }
    }

    Ok(())
}
