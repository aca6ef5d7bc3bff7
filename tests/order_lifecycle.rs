//! End-to-end order lifecycle against a mock orders service
//!
//! Exercises the public API the way an embedding application would:
//! create an order, wait for it to finish, then download its results.

mod common;

use common::{ITEM_ID, MANIFEST, METADATA, mount_artifacts, mount_state, order_record};
use orders_dl::{
    BroadcastProgress, ClientConfig, DownloadOptions, Error, ListOptions, OrderId, OrderRequest,
    OrderState, OrdersClient, ProgressUpdate, RetryConfig, WaitOptions, product,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, dir: &std::path::Path) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_secs(5)),
        wait: WaitOptions {
            delay: Duration::ZERO,
            max_attempts: 10,
        },
        download: DownloadOptions {
            retry: RetryConfig::disabled(),
            ..DownloadOptions::into_dir(dir)
        },
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn create_wait_download() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/orders/v2"))
        .respond_with(ResponseTemplate::new(202).set_body_json(order_record(&server, "oid", "queued")))
        .expect(1)
        .mount(&server)
        .await;
    mount_state(&server, "oid", "queued", 1).await;
    mount_state(&server, "oid", "running", 2).await;
    mount_state(&server, "oid", "success", 10).await;
    mount_artifacts(&server).await;

    let config = config_for(&server, temp.path());
    let sink = Arc::new(BroadcastProgress::new(256));
    let mut updates = sink.subscribe();
    let client = OrdersClient::new(config.clone())
        .unwrap()
        .with_progress(sink.clone());

    let request = OrderRequest::builder("lifecycle")
        .product(product(&[ITEM_ID], "PSOrthoTile", "analytic"))
        .build()
        .unwrap();
    let created = client.create(&request).await.unwrap();
    assert_eq!(created.state, OrderState::Queued);

    let finished = client.wait(&created.id, &config.wait).await.unwrap();
    assert_eq!(finished.state, OrderState::Success);
    assert_eq!(finished.results().len(), 2);

    let paths = client
        .download_results(&finished, &config.download)
        .await
        .unwrap();
    assert_eq!(
        paths,
        [
            temp.path().join("manifest.json"),
            temp.path().join("metadata.json")
        ]
    );
    assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), MANIFEST);
    assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), METADATA);

    let mut states = Vec::new();
    let mut last_completed = None;
    while let Ok(update) = updates.try_recv() {
        match update {
            ProgressUpdate::State { state, .. } => states.push(state.to_string()),
            ProgressUpdate::FilesCompleted {
                completed, total, ..
            } => last_completed = Some((completed, total)),
            _ => {}
        }
    }
    assert_eq!(states, ["queued", "running", "running", "success"]);
    assert_eq!(last_completed, Some((2, 2)));
}

#[tokio::test]
async fn second_download_skips_existing_files() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    mount_state(&server, "oid", "success", 2).await;
    mount_artifacts(&server).await;

    let config = config_for(&server, temp.path());
    let client = OrdersClient::new(config.clone()).unwrap();
    let id = OrderId::from("oid");

    let first = client.download_order(&id, &config.download).await.unwrap();
    // mount_artifacts expects exactly one request per artifact
    let second = client.download_order(&id, &config.download).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn list_then_download_each_finished_order() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/orders/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_links": {"_self": "self"},
            "orders": [order_record(&server, "oid", "success")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_artifacts(&server).await;

    let config = config_for(&server, temp.path());
    let client = OrdersClient::new(config.clone()).unwrap();

    let orders = client
        .list(ListOptions::default().with_state(OrderState::Success))
        .try_collect_all()
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);

    let dir = temp.path().join(orders[0].id.as_str());
    let options = DownloadOptions {
        directory: dir.clone(),
        ..config.download.clone()
    };
    let paths = client.download_results(&orders[0], &options).await.unwrap();
    assert!(paths.iter().all(|p| p.starts_with(&dir)));
}

#[tokio::test]
async fn invalid_configuration_is_rejected_up_front() {
    let mut config = ClientConfig::with_base_url("not a url");
    assert!(matches!(
        OrdersClient::new(config.clone()),
        Err(Error::Config { .. })
    ));

    config.base_url = "http://localhost:1".to_string();
    config.download.max_concurrent_downloads = 0;
    assert!(matches!(
        OrdersClient::new(config),
        Err(Error::Config { .. })
    ));
}
