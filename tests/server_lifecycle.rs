//! End-to-end tests against a real listener.
//!
//! Boots the server from a snapshot file, drives it over HTTP with reqwest,
//! and shuts it down through the broadcast channel.

use std::fs;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use service_lb::config::AppConfig;
use service_lb::lifecycle::{startup, Shutdown};

struct RunningServer {
    base: String,
    shutdown: Shutdown,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

async fn start_server(config: AppConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = startup::build_server(config);

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    RunningServer {
        base: format!("http://{addr}"),
        shutdown,
        handle,
    }
}

fn config_for(path: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.services.snapshot_path = path.to_string_lossy().into_owned();
    config
}

#[tokio::test]
async fn test_serves_services_from_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"web": {"hosts": ["w1", "w2"], "routes": ["/home"], "healthcheck": "/ping"}}"#,
    )
    .unwrap();

    let server = start_server(config_for(&path)).await;
    let client = reqwest::Client::new();

    let list: Value = client
        .get(format!("{}/services", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list, json!({ "services": ["web"] }));

    let mut seen = Vec::new();
    for _ in 0..4 {
        let res = client
            .get(format!("{}/web/home", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        let body: Value = res.json().await.unwrap();
        seen.push(body["message"].as_str().unwrap().to_string());
    }
    assert_eq!(
        seen,
        vec![
            "Forwarded GET request to http://w1/home",
            "Forwarded GET request to http://w2/home",
            "Forwarded GET request to http://w1/home",
            "Forwarded GET request to http://w2/home",
        ]
    );

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_missing_snapshot_starts_empty_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let server = start_server(config_for(&path)).await;
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

    let client = reqwest::Client::new();
    let res = client
        .put(format!("{}/services/api", server.base))
        .json(&json!({ "hosts": ["a1"], "routes": ["v1"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let res = client
        .post(format!("{}/services/save", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        saved,
        json!({
            "api": {
                "hosts": ["a1"],
                "routes": ["v1"],
                "routing": "RR",
                "healthcheck": "/status"
            }
        })
    );

    server.shutdown.trigger();
    let _ = tokio::time::timeout(Duration::from_secs(5), server.handle).await;
}

#[tokio::test]
async fn test_broken_snapshot_does_not_prevent_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "not json at all").unwrap();

    let server = start_server(config_for(&path)).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/services", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "services": [] }));

    server.shutdown.trigger();
    let _ = tokio::time::timeout(Duration::from_secs(5), server.handle).await;
}
