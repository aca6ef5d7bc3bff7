//! Error types for orders-dl
//!
//! This module provides the error taxonomy for the order lifecycle:
//! - Remote rejections (validation, not found, server errors) carrying the service body verbatim
//! - Network-level transport failures
//! - Polling and download outcomes (attempts exceeded, order not ready, partial download)
//! - Local filesystem problems with the destination directory

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::OrderState;

/// Result type alias for orders-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for orders-dl
#[derive(Debug, Error)]
pub enum Error {
    /// The service rejected the request body (HTTP 4xx other than 404)
    #[error("{body}")]
    Validation {
        /// HTTP status returned by the service
        status: u16,
        /// Response body exactly as the service sent it
        body: String,
    },

    /// The order (or another resource) does not exist (HTTP 404)
    #[error("{body}")]
    NotFound {
        /// Response body exactly as the service sent it
        body: String,
    },

    /// Unexpected non-2xx response, typically a 5xx from the service
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status returned by the service
        status: u16,
        /// Response body exactly as the service sent it
        body: String,
    },

    /// Network-level failure (connect, timeout, broken body stream)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Polling gave up before the order reached a terminal state
    ///
    /// This does not mean the order failed remotely; it is still running.
    #[error("maximum number of attempts ({max_attempts}) reached")]
    AttemptsExceeded {
        /// The configured attempt bound
        max_attempts: u32,
    },

    /// Download was requested for an order whose state has no downloadable results
    #[error("order state ({state}) is not a final state")]
    OrderNotReady {
        /// The state the order was actually in
        state: OrderState,
    },

    /// One or more artifacts of an order failed to download
    #[error("{} of {} artifacts failed to download", failed.len(), failed.len() + written.len())]
    PartialDownload {
        /// Failed artifacts, in manifest order
        failed: Vec<ArtifactFailure>,
        /// Paths that were written (or already present), in manifest order
        written: Vec<PathBuf>,
    },

    /// The local destination is unusable
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// Path that could not be created or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The order request failed local validation before being sent
    #[error("invalid order request: {0}")]
    InvalidRequest(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// HTTP status attached to this error, if it came from a service response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Validation { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Details about one artifact that could not be downloaded
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactFailure {
    /// Position of the artifact in the order's result list
    pub index: usize,
    /// Download location of the artifact
    pub location: String,
    /// Server-declared name, if known
    pub name: Option<String>,
    /// Rendered error message
    pub error: String,
}

impl std::fmt::Display for ArtifactFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}: {}", name, self.error),
            None => write!(f, "{}: {}", self.location, self.error),
        }
    }
}
