//! Progress reporting for polling and downloads
//!
//! The core reports through the narrow [`ProgressSink`] trait. Rendering is up to
//! the implementation; the crate ships three:
//!
//! - [`NoOpProgress`]: discards everything
//! - [`TracingProgress`]: structured log lines via `tracing`
//! - [`BroadcastProgress`]: forwards updates to any number of subscribers
//!
//! Sinks are advisory. A sink that returns an error is logged and ignored; it
//! never fails a poll or a download.
//!
//! ## Usage
//!
//! ```no_run
//! use orders_dl::progress::BroadcastProgress;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(BroadcastProgress::new(256));
//! let mut updates = sink.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(update) = updates.recv().await {
//!         println!("{:?}", update);
//!     }
//! });
//! ```

mod broadcast;
mod log;
mod noop;
mod traits;

pub use broadcast::BroadcastProgress;
pub use log::TracingProgress;
pub use noop::NoOpProgress;
pub use traits::{ProgressSink, ProgressUpdate, SinkError};

/// Deliver an update, swallowing sink failures
pub(crate) fn emit(sink: &dyn ProgressSink, update: ProgressUpdate) {
    if let Err(e) = sink.report(&update) {
        tracing::warn!(sink = sink.name(), error = %e, "progress sink failed, ignoring");
    }
}
