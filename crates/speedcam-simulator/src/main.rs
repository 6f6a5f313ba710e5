//! Speed Camera Simulator CLI
//!
//! Reads driving commands from stdin and logs alerts as the vehicle moves.
//!
//! ```text
//! w / s      hold forward / backward     a / d   hold turn left / right
//! wd, sa...  combinations                (empty) release all
//! jump <lat> <lon>                       status  quit
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use speedcam_domain::GeoPoint;
use speedcam_simulator::{
    CameraFeed, Command, Control, EngineConfig, InputFlags, NominatimGeocoder, Runtime,
    RuntimeOptions, SimulationSession, parse_command,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "speedcam-simulator")]
#[command(about = "Drive a virtual vehicle and get speed-camera alerts")]
struct Args {
    /// Camera API endpoint returning all points
    #[arg(long, env = "CAMERA_API_URL", default_value = "http://localhost:3000/points")]
    api_url: String,

    /// Read cameras from a JSON store file instead of the API
    #[arg(long, env = "DB_PATH")]
    db: Option<PathBuf>,

    /// Tick interval in milliseconds
    #[arg(long, default_value = "33")]
    tick_ms: u64,

    /// Start latitude
    #[arg(long, default_value = "24.002083", allow_hyphen_values = true)]
    lat: f64,

    /// Start longitude
    #[arg(long, default_value = "121.599724", allow_hyphen_values = true)]
    lon: f64,

    /// Reverse geocoding endpoint
    #[arg(long, env = "GEOCODER_URL", default_value = NominatimGeocoder::DEFAULT_ENDPOINT)]
    geocoder_url: String,

    /// Quiet period before a reverse geocode, in milliseconds
    #[arg(long, default_value = "1000")]
    debounce_ms: u64,

    /// Offline mode (no reverse geocoding)
    #[arg(long)]
    offline: bool,

    /// Log a status line every N ticks (0 = only on alert changes)
    #[arg(long, default_value = "0")]
    report_every: u64,

    /// Stop after N ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("speedcam_simulator=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = EngineConfig {
        tick: Duration::from_millis(args.tick_ms.max(1)),
        start: GeoPoint::new(args.lat, args.lon),
        geocode_debounce: Duration::from_millis(args.debounce_ms),
        ..EngineConfig::default()
    };

    let feed = match args.db {
        Some(path) => CameraFeed::File { path },
        None => CameraFeed::Http { url: args.api_url },
    };

    info!("Camera source: {}", feed);
    info!("Tick: {}ms, start: {}", args.tick_ms, config.start);

    let mut runtime = Runtime::new(SimulationSession::new(config), feed).with_options(
        RuntimeOptions {
            report_every: args.report_every,
            max_ticks: args.max_ticks,
        },
    );
    if args.offline {
        info!("Reverse geocoding disabled");
    } else {
        let geocoder = NominatimGeocoder::new(args.geocoder_url)?;
        runtime = runtime.with_geocoder(Arc::new(geocoder));
    }

    let (input_tx, input_rx) = watch::channel(InputFlags::default());
    let (control_tx, control_rx) = mpsc::channel(16);
    tokio::spawn(read_commands(input_tx, control_tx));

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    let session = runtime.run(input_rx, control_rx, shutdown).await;
    let snapshot = session.snapshot();
    info!(
        "Final position {} heading {:.0} ({}) - {}",
        snapshot.position,
        snapshot.heading_deg,
        snapshot.cardinal.as_str(),
        snapshot.address
    );

    Ok(())
}

/// Route stdin lines: held controls to the watch channel, the rest to the
/// control queue.
async fn read_commands(input: watch::Sender<InputFlags>, control: mpsc::Sender<Control>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!("Failed to read stdin: {}", err);
                break;
            }
        };

        let forwarded = match parse_command(&line) {
            Some(Command::Hold(flags)) => {
                input.send_replace(flags);
                continue;
            }
            Some(Command::Jump { lat, lon }) => control.send(Control::Jump { lat, lon }).await,
            Some(Command::Status) => control.send(Control::Status).await,
            Some(Command::Quit) => {
                let _ = control.send(Control::Quit).await;
                break;
            }
            None => {
                warn!("Unknown command: {:?}", line.trim());
                continue;
            }
        };

        if forwarded.is_err() {
            break;
        }
    }
}
