//! # orders-dl
//!
//! Client library for submitting, tracking, and retrieving bulk processing orders.
//!
//! ## Design Philosophy
//!
//! orders-dl is designed to be:
//! - **Lifecycle-focused** - Submit, wait, download; each step usable on its own
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Fault tolerant** - One bad artifact never aborts the rest of an order
//!
//! ## Quick Start
//!
//! ```no_run
//! use orders_dl::{ClientConfig, OrdersClient, OrderRequest, TracingProgress, product};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let client = OrdersClient::new(config.clone())?.with_progress(Arc::new(TracingProgress));
//!
//!     let request = OrderRequest::builder("my order")
//!         .product(product(&["20170614_113217_3163208_RapidEye-5"], "REOrthoTile", "analytic"))
//!         .email(true)
//!         .build()?;
//!
//!     let order = client.create(&request).await?;
//!     let order = client.wait(&order.id, &config.wait).await?;
//!     let paths = client.download_results(&order, &config.download).await?;
//!     println!("{} files downloaded", paths.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Order lifecycle client (decomposed into focused submodules)
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Progress reporting
pub mod progress;
/// Order creation request body
pub mod request;
/// Retry logic with exponential backoff
pub mod retry;
/// HTTP transport
pub mod transport;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use client::{OrderList, OrdersClient};
pub use config::{ClientConfig, DownloadOptions, RetryConfig, WaitOptions};
pub use error::{ArtifactFailure, Error, Result};
pub use progress::{
    BroadcastProgress, NoOpProgress, ProgressSink, ProgressUpdate, SinkError, TracingProgress,
};
pub use request::{OrderRequest, OrderRequestBuilder, product};
pub use types::{ListOptions, Order, OrderId, OrderState, ResultDescriptor};

use tokio_util::sync::CancellationToken;

/// Cancel `token` when the process receives a termination signal.
///
/// Spawns a task that waits for the signal, so long-running `wait_with_cancel`
/// and `download_*_with_cancel` calls stop cleanly instead of leaving partial files.
///
/// Listens for Ctrl+C everywhere and SIGTERM on Unix. The task also exits,
/// without doing anything, once `token` is cancelled by someone else.
///
/// # Example
///
/// ```no_run
/// use orders_dl::{ClientConfig, OrderId, OrdersClient, cancel_on_shutdown};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::default();
///     let client = OrdersClient::new(config.clone())?;
///
///     let cancel = CancellationToken::new();
///     cancel_on_shutdown(cancel.clone());
///
///     let id = OrderId::from("0a8b5f2d-3b1c-4e0e-9b44-6f1c2b1d7e55");
///     client.wait_with_cancel(&id, &config.wait, &cancel).await?;
///
///     Ok(())
/// }
/// ```
pub fn cancel_on_shutdown(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => {
                tracing::info!("cancelling in-flight order operations");
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}

/// Resolves on Ctrl+C, or on SIGTERM where that exists
///
/// A listener that cannot be installed is logged and never fires, so the other
/// one still can.
async fn wait_for_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "interrupt listener unavailable");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = interrupt => tracing::info!(signal = "interrupt", "shutdown requested"),
        () = terminate() => tracing::info!(signal = "terminate", "shutdown requested"),
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM listener unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
