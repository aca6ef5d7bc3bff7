//! Shared test helpers for exercising OrdersClient against a mock service.

use crate::client::OrdersClient;
use crate::config::{ClientConfig, DownloadOptions, RetryConfig};
use crate::progress::{ProgressSink, ProgressUpdate, SinkError};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

/// Progress sink that remembers every update it receives
#[derive(Default)]
pub(crate) struct RecordingProgress {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingProgress {
    pub(crate) fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn states(&self) -> Vec<String> {
        self.updates()
            .into_iter()
            .filter_map(|u| match u {
                ProgressUpdate::State { state, .. } => Some(state.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, update: &ProgressUpdate) -> Result<(), SinkError> {
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Progress sink whose every report fails
pub(crate) struct FailingProgress;

impl ProgressSink for FailingProgress {
    fn report(&self, _update: &ProgressUpdate) -> Result<(), SinkError> {
        Err(SinkError::new("display closed"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Client pointed at the mock server, with a recording sink attached
pub(crate) fn client_for(server: &MockServer) -> (OrdersClient, Arc<RecordingProgress>) {
    let mut config = ClientConfig::with_base_url(server.uri());
    config.request_timeout = Some(Duration::from_secs(5));
    let progress = Arc::new(RecordingProgress::default());
    let client = OrdersClient::new(config)
        .unwrap()
        .with_progress(progress.clone());
    (client, progress)
}

/// Download options for `dir` that never retry
pub(crate) fn download_options(dir: &Path) -> DownloadOptions {
    DownloadOptions {
        retry: RetryConfig::disabled(),
        ..DownloadOptions::into_dir(dir)
    }
}

/// Order record as the service returns it
pub(crate) fn order_json(id: &str, state: &str) -> Value {
    json!({
        "id": id,
        "name": "test",
        "state": state,
        "products": [{
            "item_ids": ["4500474_2133707_2021-05-20_2419"],
            "item_type": "PSOrthoTile",
            "product_bundle": "analytic"
        }],
        "_links": {
            "_self": format!("http://example.com/orders/v2/{id}")
        }
    })
}

/// Successful order listing `(location, name)` result descriptors
pub(crate) fn finished_order_json(id: &str, results: &[(String, Option<&str>)]) -> Value {
    let mut order = order_json(id, "success");
    let results: Vec<Value> = results
        .iter()
        .map(|(location, name)| match name {
            Some(name) => json!({"location": location, "name": name}),
            None => json!({"location": location}),
        })
        .collect();
    order["_links"]["results"] = Value::Array(results);
    order
}
