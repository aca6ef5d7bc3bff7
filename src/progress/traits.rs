//! Traits and types for progress reporting

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::{OrderId, OrderState};

/// A single progress event
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressUpdate {
    /// An order's state was fetched (one per poll attempt)
    State {
        /// Order being polled
        order_id: OrderId,
        /// State returned by this fetch
        state: OrderState,
        /// 1-based attempt number
        attempt: u32,
    },

    /// Aggregate "N of M files complete" for an order download
    FilesCompleted {
        /// Order being downloaded
        order_id: OrderId,
        /// Artifacts finished so far (downloaded, skipped, or failed)
        completed: usize,
        /// Artifacts in the order
        total: usize,
    },

    /// Bytes received so far for one artifact
    FileBytes {
        /// Output filename
        name: String,
        /// Cumulative bytes written
        downloaded: u64,
        /// Expected size from Content-Length, if sent
        total: Option<u64>,
    },

    /// Artifact left untouched because it already exists
    FileSkipped {
        /// Output filename
        name: String,
        /// Existing path
        path: PathBuf,
    },

    /// Artifact could not be downloaded
    FileFailed {
        /// Download location
        location: String,
        /// Output filename, if it was resolved
        name: Option<String>,
        /// Rendered error
        error: String,
    },
}

impl ProgressUpdate {
    /// Numeric value of the update, for renderers that draw a single counter
    pub fn value(&self) -> u64 {
        match self {
            ProgressUpdate::State { attempt, .. } => u64::from(*attempt),
            ProgressUpdate::FilesCompleted { completed, .. } => *completed as u64,
            ProgressUpdate::FileBytes { downloaded, .. } => *downloaded,
            ProgressUpdate::FileSkipped { .. } | ProgressUpdate::FileFailed { .. } => 0,
        }
    }

    /// Short label describing the update
    pub fn label(&self) -> String {
        match self {
            ProgressUpdate::State { order_id, state, .. } => format!("order {order_id}: {state}"),
            ProgressUpdate::FilesCompleted {
                order_id,
                completed,
                total,
            } => format!("order {order_id}: {completed}/{total} files"),
            ProgressUpdate::FileBytes { name, .. } => name.clone(),
            ProgressUpdate::FileSkipped { name, .. } => format!("{name} (exists, skipped)"),
            ProgressUpdate::FileFailed { location, name, .. } => {
                format!("{} (failed)", name.as_deref().unwrap_or(location))
            }
        }
    }
}

/// Error returned by a sink; logged by the caller and otherwise ignored
#[derive(Debug, Error)]
#[error("progress sink error: {0}")]
pub struct SinkError(pub String);

impl SinkError {
    /// Create a sink error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receiver of progress updates
///
/// `report` is called inline from the polling and download paths, so
/// implementations must return quickly and must not block.
pub trait ProgressSink: Send + Sync {
    /// Handle one update
    fn report(&self, update: &ProgressUpdate) -> Result<(), SinkError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
