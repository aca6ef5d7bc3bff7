//! Core types for orders-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique identifier for an order, assigned by the service
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Create a new OrderId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order state as reported by the service
///
/// The vocabulary is service-defined. Values outside the known set are kept
/// verbatim in [`OrderState::Other`] and treated as non-terminal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    /// Accepted and waiting to be processed
    Queued,
    /// Being processed
    Running,
    /// Completed, all results available
    Success,
    /// Completed with some results missing
    Partial,
    /// Processing failed
    Failed,
    /// Cancelled before completion
    Cancelled,
    /// Any other service-defined state
    Other(String),
}

impl OrderState {
    /// Service string for this state
    pub fn as_str(&self) -> &str {
        match self {
            OrderState::Queued => "queued",
            OrderState::Running => "running",
            OrderState::Success => "success",
            OrderState::Partial => "partial",
            OrderState::Failed => "failed",
            OrderState::Cancelled => "cancelled",
            OrderState::Other(s) => s,
        }
    }

    /// Returns true once no further server-side transition will occur
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Success | OrderState::Partial | OrderState::Failed | OrderState::Cancelled
        )
    }

    /// Returns true if the order has results that can be downloaded
    ///
    /// `partial` counts: some declared results may still be unretrievable.
    pub fn is_downloadable(&self) -> bool {
        matches!(self, OrderState::Success | OrderState::Partial)
    }
}

impl From<String> for OrderState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "queued" => OrderState::Queued,
            "running" => OrderState::Running,
            "success" => OrderState::Success,
            "partial" => OrderState::Partial,
            "failed" => OrderState::Failed,
            "cancelled" => OrderState::Cancelled,
            _ => OrderState::Other(s),
        }
    }
}

impl From<&str> for OrderState {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<OrderState> for String {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One downloadable result of a completed order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultDescriptor {
    /// Download URL (usually carries a short-lived token)
    pub location: String,
    /// Server-declared artifact name, e.g. `"<order>/<item>/file.tif"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Any other fields the service attached (expiry, checksums, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultDescriptor {
    /// Create a descriptor from a location and optional name
    pub fn new(location: impl Into<String>, name: Option<String>) -> Self {
        Self {
            location: location.into(),
            name,
            extra: Map::new(),
        }
    }
}

/// The `_links` section of an order record
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderLinks {
    /// Canonical URL of the order
    #[serde(rename = "_self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Result descriptors, present once the order succeeded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ResultDescriptor>,
    /// Other links
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An order record as returned by the service
///
/// The client never mutates this locally; it is refreshed by re-fetching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: OrderId,
    /// Current state
    pub state: OrderState,
    /// Human-readable order name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Product descriptions (opaque)
    #[serde(default)]
    pub products: Vec<Value>,
    /// Processing tools (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Delivery configuration (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Value>,
    /// Notification settings (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Value>,
    /// When the order was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// When the order last changed state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Service hints explaining a failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_hints: Vec<String>,
    /// Links, including the result manifest
    #[serde(rename = "_links", default)]
    pub links: OrderLinks,
    /// Fields not modelled above, preserved for lossless JSON output
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Result descriptors in service order
    pub fn results(&self) -> &[ResultDescriptor] {
        &self.links.results
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        let mut out = format!("order {}", self.id);
        if let Some(name) = &self.name {
            out.push_str(&format!(" ({})", name));
        }
        out.push_str(&format!(" - {}", self.state));
        if !self.links.results.is_empty() {
            out.push_str(&format!(" - {} results", self.links.results.len()));
        }
        out
    }
}

/// Options for listing orders
#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    /// Only return orders in this state
    pub state: Option<OrderState>,
    /// Maximum number of orders to yield (0 = unbounded)
    pub limit: usize,
}

impl ListOptions {
    /// List orders in the given state
    pub fn with_state(mut self, state: OrderState) -> Self {
        self.state = Some(state);
        self
    }

    /// Stop after `limit` orders (0 = unbounded)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn terminal_and_downloadable_sets() {
        for state in [
            OrderState::Success,
            OrderState::Partial,
            OrderState::Failed,
            OrderState::Cancelled,
        ] {
            assert!(state.is_terminal(), "{state} should be terminal");
        }
        for state in [
            OrderState::Queued,
            OrderState::Running,
            OrderState::Other("initializing".into()),
        ] {
            assert!(!state.is_terminal(), "{state} should not be terminal");
            assert!(!state.is_downloadable());
        }
        assert!(OrderState::Success.is_downloadable());
        assert!(OrderState::Partial.is_downloadable());
        assert!(!OrderState::Failed.is_downloadable());
        assert!(!OrderState::Cancelled.is_downloadable());
    }

    #[test]
    fn unknown_state_is_preserved_verbatim() {
        let state: OrderState = serde_json::from_value(json!("initializing")).unwrap();
        assert_eq!(state, OrderState::Other("initializing".to_string()));
        assert_eq!(serde_json::to_value(&state).unwrap(), json!("initializing"));
    }

    #[test]
    fn order_parses_service_record() {
        let order: Order = serde_json::from_value(json!({
            "id": "oid-1",
            "name": "test",
            "state": "success",
            "created_on": "2021-05-20T10:00:00.000Z",
            "last_modified": "2021-05-20T10:05:00.000Z",
            "products": [{"item_ids": ["a"], "item_type": "PSScene", "product_bundle": "visual"}],
            "_links": {
                "_self": "http://example.com/orders/v2/oid-1",
                "results": [
                    {"location": "http://example.com/dl/1", "name": "oid-1/a/m1.json", "expires_at": "x"},
                    {"location": "http://example.com/dl/2"}
                ]
            },
            "subscription_id": 0
        }))
        .unwrap();

        assert_eq!(order.id.as_str(), "oid-1");
        assert_eq!(order.state, OrderState::Success);
        assert_eq!(order.results().len(), 2);
        assert_eq!(order.results()[0].name.as_deref(), Some("oid-1/a/m1.json"));
        assert_eq!(order.results()[0].extra["expires_at"], json!("x"));
        assert!(order.results()[1].name.is_none());
        assert_eq!(order.extra["subscription_id"], json!(0));
        assert!(order.created_on.is_some());
    }

    #[test]
    fn order_round_trips_unknown_fields() {
        let raw = json!({
            "id": "oid-2",
            "state": "running",
            "products": [],
            "_links": {"_self": "s"},
            "source_type": "scenes"
        });
        let order: Order = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&order).unwrap(), raw);
    }

    #[test]
    fn summary_mentions_state_and_results() {
        let mut order: Order =
            serde_json::from_value(json!({"id": "oid-3", "name": "n", "state": "success"}))
                .unwrap();
        order
            .links
            .results
            .push(ResultDescriptor::new("http://example.com/1", None));
        assert_eq!(order.summary(), "order oid-3 (n) - success - 1 results");
    }
}
