//! Mock orders service fixtures

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Item id used by every fixture order
pub const ITEM_ID: &str = "4500474_2133707_2021-05-20_2419";

/// Artifact bodies served by [`mount_artifacts`]
pub const MANIFEST: &str = r#"{"name": "manifest"}"#;
pub const METADATA: &str = r#"{"key": "value"}"#;

/// Order record in `state`, with results once the state is `success`
pub fn order_record(server: &MockServer, id: &str, state: &str) -> Value {
    let mut links = json!({"_self": format!("{}/orders/v2/{id}", server.uri())});
    if state == "success" {
        links["results"] = json!([
            {"location": format!("{}/dl/manifest?token=t1", server.uri()), "name": format!("{id}/manifest.json")},
            {"location": format!("{}/dl/metadata?token=t2", server.uri()), "name": format!("{id}/{ITEM_ID}/metadata.json")}
        ]);
    }
    json!({
        "id": id,
        "name": "lifecycle",
        "state": state,
        "created_on": "2021-05-20T10:00:00.000Z",
        "last_modified": "2021-05-20T10:05:00.000Z",
        "products": [{
            "item_ids": [ITEM_ID],
            "item_type": "PSOrthoTile",
            "product_bundle": "analytic"
        }],
        "_links": links
    })
}

/// Serve the two artifacts referenced by a successful [`order_record`]
pub async fn mount_artifacts(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/dl/manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_string(METADATA))
        .expect(1)
        .mount(server)
        .await;
}

/// Respond to fetches of order `id` with `state`, `times` times
pub async fn mount_state(server: &MockServer, id: &str, state: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/orders/v2/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_record(server, id, state)))
        .up_to_n_times(times)
        .mount(server)
        .await;
}
