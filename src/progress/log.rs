//! Sink that writes updates as structured `tracing` events

use super::traits::{ProgressSink, ProgressUpdate, SinkError};

/// Logs every update through `tracing`
///
/// State transitions and file completion go out at `info`, per-chunk byte counts
/// at `debug`, failures at `warn`. Pair with a JSON subscriber for machine-readable
/// progress logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, update: &ProgressUpdate) -> Result<(), SinkError> {
        match update {
            ProgressUpdate::State {
                order_id,
                state,
                attempt,
            } => {
                tracing::info!(order_id = %order_id, state = %state, attempt, "order state");
            }
            ProgressUpdate::FilesCompleted {
                order_id,
                completed,
                total,
            } => {
                tracing::info!(order_id = %order_id, completed, total, "files complete");
            }
            ProgressUpdate::FileBytes {
                name,
                downloaded,
                total,
            } => {
                tracing::debug!(file = %name, downloaded, total = ?total, "downloading");
            }
            ProgressUpdate::FileSkipped { name, path } => {
                tracing::info!(file = %name, path = ?path, "file exists, skipped");
            }
            ProgressUpdate::FileFailed {
                location,
                name,
                error,
            } => {
                tracing::warn!(location = %location, file = ?name, error = %error, "file failed");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
