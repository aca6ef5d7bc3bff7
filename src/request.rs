//! Order creation request body
//!
//! [`OrderRequest`] builds the JSON body for `create`. Product entries, tools and
//! delivery settings are opaque JSON to this crate; only the structural rules
//! the service would otherwise reject late are checked locally.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// JSON body for creating an order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OrderRequest {
    /// Order name
    pub name: String,
    /// Product descriptions
    pub products: Vec<Value>,
    /// Processing tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Delivery configuration (e.g. a cloud bucket)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Value>,
    /// Notification settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Value>,
}

impl OrderRequest {
    /// Start a builder for an order named `name`
    pub fn builder(name: impl Into<String>) -> OrderRequestBuilder {
        OrderRequestBuilder {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Build a product description
///
/// Item ids must be non-empty strings; item type and bundle are passed through unchecked.
pub fn product(item_ids: &[&str], item_type: &str, product_bundle: &str) -> Value {
    json!({
        "item_ids": item_ids,
        "item_type": item_type,
        "product_bundle": product_bundle,
    })
}

/// Builder for [`OrderRequest`]
#[derive(Clone, Debug, Default)]
pub struct OrderRequestBuilder {
    name: String,
    products: Vec<Value>,
    tools: Option<Vec<Value>>,
    clip: Option<Value>,
    delivery: Option<Value>,
    email: bool,
}

impl OrderRequestBuilder {
    /// Add a product description
    pub fn product(mut self, product: Value) -> Self {
        self.products.push(product);
        self
    }

    /// Set the processing tool chain
    pub fn tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Clip all products to an area of interest
    ///
    /// Shorthand for `tools: [{"clip": {"aoi": geometry}}]`; cannot be combined with
    /// [`tools`](Self::tools). `aoi` may be a Polygon or MultiPolygon geometry, a
    /// Feature wrapping one, or a FeatureCollection holding exactly one such Feature.
    pub fn clip(mut self, aoi: Value) -> Self {
        self.clip = Some(aoi);
        self
    }

    /// Deliver results somewhere other than the default download location
    pub fn delivery(mut self, delivery: Value) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Ask the service to email on completion
    pub fn email(mut self, enabled: bool) -> Self {
        self.email = enabled;
        self
    }

    /// Validate and produce the request body
    pub fn build(self) -> Result<OrderRequest> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRequest("order name cannot be empty".into()));
        }
        if self.products.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one product is required".into(),
            ));
        }
        for product in &self.products {
            check_item_ids(product)?;
        }

        let tools = match (self.clip, self.tools) {
            (Some(_), Some(_)) => {
                return Err(Error::InvalidRequest(
                    "specify only one of clip or tools".into(),
                ));
            }
            (Some(aoi), None) => Some(vec![json!({"clip": {"aoi": clip_geometry(aoi)?}})]),
            (None, tools) => tools,
        };

        let notifications = self.email.then(|| json!({"email": true}));

        Ok(OrderRequest {
            name: self.name,
            products: self.products,
            tools,
            delivery: self.delivery,
            notifications,
        })
    }
}

/// Reduce a GeoJSON value to the polygonal geometry a clip tool accepts
fn clip_geometry(aoi: Value) -> Result<Value> {
    let geometry = match aoi.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = aoi
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| Error::InvalidRequest("FeatureCollection has no features".into()))?;
            match features.as_slice() {
                [feature] => feature_geometry(feature)?,
                [] => {
                    return Err(Error::InvalidRequest(
                        "FeatureCollection has no features".into(),
                    ));
                }
                _ => {
                    return Err(Error::InvalidRequest(format!(
                        "FeatureCollection must contain a single feature, found {}",
                        features.len()
                    )));
                }
            }
        }
        Some("Feature") => feature_geometry(&aoi)?,
        _ => aoi,
    };

    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon" | "MultiPolygon") => {}
        Some(other) => {
            return Err(Error::InvalidRequest(format!(
                "Invalid geometry type: {other} is not Polygon."
            )));
        }
        None => return Err(Error::InvalidRequest("geometry has no type".into())),
    }
    if !geometry.get("coordinates").is_some_and(Value::is_array) {
        return Err(Error::InvalidRequest("geometry has no coordinates".into()));
    }
    Ok(geometry)
}

fn feature_geometry(feature: &Value) -> Result<Value> {
    feature
        .get("geometry")
        .filter(|g| g.is_object())
        .cloned()
        .ok_or_else(|| Error::InvalidRequest("feature has no geometry".into()))
}

fn check_item_ids(product: &Value) -> Result<()> {
    let Some(ids) = product.get("item_ids") else {
        return Ok(());
    };
    let ids = ids
        .as_array()
        .ok_or_else(|| Error::InvalidRequest("item_ids must be a list".into()))?;
    if ids.is_empty() {
        return Err(Error::InvalidRequest("item_ids cannot be empty".into()));
    }
    if ids
        .iter()
        .any(|id| id.as_str().is_none_or(|s| s.trim().is_empty()))
    {
        return Err(Error::InvalidRequest(
            "item id cannot be an empty string".into(),
        ));
    }
    Ok(())
}
