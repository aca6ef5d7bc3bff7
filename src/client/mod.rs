//! Order lifecycle client split into focused submodules.
//!
//! The `OrdersClient` struct and its methods are organized by phase:
//! - [`gateway`] - Create, get, list and cancel orders
//! - [`pagination`] - Lazy page-following over the order listing
//! - [`wait`] - Poll an order until it reaches a terminal state
//! - [`download`] - Fetch every result of a finished order
//! - [`artifact`] - Transfer of a single result file

mod artifact;
mod download;
mod gateway;
mod pagination;
mod wait;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use pagination::OrderList;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::progress::{NoOpProgress, ProgressSink};
use crate::transport::Transport;

/// Path of the orders collection below the service root
const ORDERS_PATH: &str = "/orders/v2";

/// Client for the order lifecycle: submit, track, and retrieve
///
/// Cheap to clone; clones share the HTTP connection pool and progress sink.
#[derive(Clone)]
pub struct OrdersClient {
    pub(crate) transport: Transport,
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) progress: Arc<dyn ProgressSink>,
}

impl std::fmt::Debug for OrdersClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersClient")
            .field("base_url", &self.transport.base_url())
            .field("progress", &self.progress.name())
            .finish()
    }
}

impl OrdersClient {
    /// Create a client from configuration
    ///
    /// Progress goes nowhere until a sink is attached with [`with_progress`](Self::with_progress).
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = Transport::new(&config)?;

        tracing::debug!(base_url = %transport.base_url(), "orders client ready");

        Ok(Self {
            transport,
            config: Arc::new(config),
            progress: Arc::new(NoOpProgress),
        })
    }

    /// Report polling and download progress to `sink`
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the orders collection
    pub fn orders_url(&self) -> String {
        self.transport.url(ORDERS_PATH)
    }

    fn order_url(&self, id: &str) -> String {
        format!("{}/{}", self.orders_url(), id)
    }
}
