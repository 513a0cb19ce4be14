//! TCP service that turns a pair of gyroscope uploads into a clock offset.
//!
//! A session is three connections on the same listening port, in order:
//!
//! 1. upload of the first device's recording, streamed verbatim to disk,
//! 2. upload of the second device's recording,
//! 3. a reply connection that receives the estimated offset between the two
//!    device clocks as one big-endian IEEE-754 double, in nanoseconds.
//!
//! Uploads are the 4-column CSV format of [`crate::ingest`]. The offset is
//! the coarse mean timestamp difference plus the estimator's sub-sample
//! delay. A session that fails (bad upload, degenerate signals) is logged
//! and skipped without accepting its reply connection, and the server moves
//! on to the next session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::SyncConfig;
use crate::ingest::{self, NANOS_PER_SEC};
use crate::sync::Synchronizer;

/// File name for the first upload inside the work directory.
pub const FIRST_UPLOAD: &str = "gyro_file_0.csv";
/// File name for the second upload inside the work directory.
pub const SECOND_UPLOAD: &str = "gyro_file_1.csv";

/// Settings for [`serve`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory the uploaded recordings are written to.
    pub work_dir: PathBuf,
    /// Estimator settings applied to every session.
    pub sync: SyncConfig,
}

/// Accept sessions forever.
///
/// Each iteration runs one full session; failures are logged and do not
/// stop the server.
///
/// # Errors
///
/// Only configuration-level failures (unreadable listen address) abort the
/// loop.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> Result<()> {
    let local = listener.local_addr().context("reading listen address")?;
    info!("listening on {}", local);
    let mut session: u64 = 0;
    loop {
        session += 1;
        info!("session {}: waiting for uploads", session);
        match run_session(&listener, &config).await {
            Ok(offset) => info!("session {}: sent offset {:.9} s", session, offset),
            Err(err) => error!("session {}: {:#}", session, err),
        }
    }
}

/// Run a single three-connection session and return the offset that was
/// sent, in seconds.
///
/// # Errors
///
/// Any I/O failure, malformed upload, or estimator error. On error the
/// reply connection is never accepted.
pub async fn run_session(listener: &TcpListener, config: &ServerConfig) -> Result<f64> {
    let first_path = config.work_dir.join(FIRST_UPLOAD);
    let second_path = config.work_dir.join(SECOND_UPLOAD);

    receive_upload(listener, &first_path).await?;
    receive_upload(listener, &second_path).await?;

    let offset = estimate_offset(first_path, second_path, config.sync).await?;

    let (mut reply, peer) = listener.accept().await.context("accepting reply connection")?;
    reply
        .write_all(&encode_offset_ns(offset))
        .await
        .with_context(|| format!("sending offset to {}", peer))?;
    reply.shutdown().await.context("closing reply connection")?;
    Ok(offset)
}

/// Encode an offset in seconds as the reply payload: a big-endian IEEE-754
/// double holding nanoseconds.
pub fn encode_offset_ns(seconds: f64) -> [u8; 8] {
    (seconds * NANOS_PER_SEC).to_be_bytes()
}

async fn receive_upload(listener: &TcpListener, path: &Path) -> Result<()> {
    let (mut stream, peer) = listener.accept().await.context("accepting upload connection")?;
    let mut file = File::create(path)
        .await
        .with_context(|| format!("creating {}", path.display()))?;
    let bytes = tokio::io::copy(&mut stream, &mut file)
        .await
        .with_context(|| format!("storing upload from {}", peer))?;
    file.flush()
        .await
        .with_context(|| format!("flushing {}", path.display()))?;
    info!("stored {} bytes at {}", bytes, path.display());
    Ok(())
}

async fn estimate_offset(first: PathBuf, second: PathBuf, sync: SyncConfig) -> Result<f64> {
    let raw_first = tokio::fs::read(&first)
        .await
        .with_context(|| format!("reading {}", first.display()))?;
    let raw_second = tokio::fs::read(&second)
        .await
        .with_context(|| format!("reading {}", second.display()))?;

    // The estimator saturates the rayon pool, so it runs off the async
    // runtime's worker threads.
    let offset = tokio::task::spawn_blocking(move || -> Result<f64> {
        let (a, b) = ingest::align(
            ingest::parse_gyro_csv(&raw_first)?,
            ingest::parse_gyro_csv(&raw_second)?,
        );
        let first = ingest::to_signal(&a)?;
        let second = ingest::to_signal(&b)?;
        let coarse = ingest::coarse_offset(&a.times, &b.times);
        let estimate = Synchronizer::with_config(first, second, sync).run()?;
        Ok(coarse + estimate.seconds)
    })
    .await
    .context("estimation task")??;
    Ok(offset)
}
