//! Camera Store Migration CLI
//!
//! Loads the police CSV export and overwrites the JSON camera store with it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use speedcam_store::{CameraRepository, JsonFileRepository, parse_cameras_file};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "speedcam-migrate")]
#[command(about = "Import the speed-camera CSV export into the JSON store")]
struct Args {
    /// CSV export to read
    #[arg(long, default_value = "NPA_TD1.csv")]
    csv: PathBuf,

    /// JSON store to overwrite
    #[arg(long, env = "DB_PATH", default_value = "db.json")]
    db: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("speedcam_store=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let (records, stats) = parse_cameras_file(&args.csv)
        .with_context(|| format!("Failed to import {}", args.csv.display()))?;
    info!("Parsed {} records.", stats.parsed);

    let repo = JsonFileRepository::open(&args.db).await?;
    info!("Overwriting database with clean data...");
    let written = repo.replace_all(records).await?;

    info!(written, db = %args.db.display(), "Migration completed.");
    Ok(())
}
