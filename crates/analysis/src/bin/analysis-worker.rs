//! analysis-worker — one-shot contract processing.
//!
//! Runs the full pipeline over a single stored file: text extraction, clause
//! extraction with validation, severity classification, chat titling. The
//! derived fields are printed as JSON for the caller to persist.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use redline_analysis::DocumentPipeline;
use redline_core::{config, Config};

/// Contract analysis worker — processes one document end to end.
#[derive(Parser, Debug)]
#[command(name = "analysis-worker", version, about)]
struct Cli {
    /// Path to the stored document.
    file: PathBuf,

    /// Declared file extension; defaults to the path's own extension.
    #[arg(long, env = "ANALYSIS_EXTENSION")]
    extension: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let extension = cli
        .extension
        .clone()
        .or_else(|| {
            cli.file
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    let pipeline = DocumentPipeline::from_config(&config);

    // Extraction failures are fatal: the caller marks the owning record
    // failed and computes nothing further.
    let result = pipeline
        .process(&cli.file, &extension)
        .await
        .inspect_err(|e| error!(error = %e, path = %cli.file.display(), "processing failed"))?;

    info!(
        title = %result.title,
        severity = ?result.risk.overall,
        duration_ms = result.duration_ms,
        "processing complete"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
