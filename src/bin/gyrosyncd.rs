//! Gyroscope clock-synchronization daemon.
//!
//! Listens for three-connection sessions (two CSV uploads, one reply) and
//! answers each with the estimated offset between the two device clocks.
//!
//! # Usage
//!
//! ```bash
//! # Listen on the default port, store uploads in the current directory
//! gyrosyncd
//!
//! # Custom port and work directory, finer resampling grid
//! gyrosyncd --listen 0.0.0.0:9000 --work-dir /tmp/uploads --accuracy 0.01
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gyrosync::server::{self, ServerConfig};
use gyrosync::SyncConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Clock offset estimation service for paired gyroscope recordings
#[derive(Parser, Debug)]
#[command(name = "gyrosyncd")]
#[command(about = "Estimate the clock offset between two gyroscope recordings over TCP")]
#[command(version)]
struct Args {
    /// Address to listen on for upload and reply connections
    #[arg(short, long, default_value = "0.0.0.0:9428")]
    listen: SocketAddr,

    /// Directory uploaded recordings are written to
    #[arg(short, long, default_value = ".")]
    work_dir: PathBuf,

    /// Upper bound on the resampling interval, seconds
    #[arg(short, long, default_value_t = 1.0)]
    accuracy: f64,

    /// Correlate the raw samples directly instead of resampling first
    #[arg(long)]
    no_resample: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        work_dir: args.work_dir,
        sync: SyncConfig {
            accuracy: args.accuracy,
            resample: !args.no_resample,
        },
    };

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("binding {}", args.listen))?;
    server::serve(listener, config).await
}
