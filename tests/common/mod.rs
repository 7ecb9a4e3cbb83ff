//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use service_lb::catalog::ServiceCatalog;
use service_lb::config::AppConfig;
use service_lb::http::HttpServer;

/// In-process app with its own empty catalog.
pub struct TestApp {
    pub router: Router,
    #[allow(dead_code)]
    pub catalog: Arc<ServiceCatalog>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let catalog = Arc::new(ServiceCatalog::new());
        let server = HttpServer::new(config, catalog.clone());
        Self {
            router: server.router(),
            catalog,
        }
    }

    /// Send a request and return the body exactly as written.
    #[allow(dead_code)]
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let (status, bytes) = self.exchange(method, uri, body).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request and decode the JSON response body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.exchange(method, uri, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    async fn exchange(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, axum::body::Bytes) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    /// Forward through the service and return (status, message).
    #[allow(dead_code)]
    pub async fn forward(&self, uri: &str) -> (StatusCode, String) {
        let (status, body) = self.get(uri).await;
        let message = body["message"].as_str().unwrap_or_default().to_string();
        (status, message)
    }
}

/// The two-host service used across tests.
pub fn basic_service() -> Value {
    json!({
        "hosts": ["thing1:8080", "thing2"],
        "routes": ["theCat", "/in/the/hat"]
    })
}
