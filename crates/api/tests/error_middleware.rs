use std::sync::Arc;

use axum::{Router, routing::get};
use reqwest::StatusCode;
use serde_json::{Value, json};

use crewdash_api::app::errors::Failure;
use crewdash_api::config::AppConfig;
use crewdash_api::middleware::{REQUEST_ID_HEADER, error_middleware, security_headers};
use crewdash_auth::ProviderError;
use crewdash_core::ApiError;

/// Failing handlers behind the same middleware stack as the real app.
fn app(config: AppConfig) -> Router {
    let config = Arc::new(config);
    Router::new()
        .route(
            "/boom",
            get(|| async { Err::<(), Failure>(anyhow::anyhow!("pool exhausted at db-3").into()) }),
        )
        .route(
            "/project",
            get(|| async { Err::<(), Failure>(ApiError::not_found(Some("Project")).into()) }),
        )
        .route(
            "/upstream",
            get(|| async {
                let body = json!({ "error_description": "Invalid token" });
                Err::<(), Failure>(ProviderError::from_body(&body).into())
            }),
        )
        .layer(axum::middleware::from_fn_with_state(config.clone(), security_headers))
        .layer(axum::middleware::from_fn_with_state(config, error_middleware))
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(config: AppConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let app = app(config);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn get(&self, path: &str) -> (StatusCode, reqwest::header::HeaderMap, Value) {
        let res = reqwest::get(format!("{}{}", self.base_url, path)).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        (status, headers, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn unclassified_failure_gets_generic_message_and_reference() {
    let srv = TestServer::spawn(AppConfig::production()).await;
    let (status, headers, body) = srv.get("/boom").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal server error");

    let reference = headers[REQUEST_ID_HEADER].to_str().unwrap();
    assert_eq!(body["error"]["reference"], reference);
    assert!(!body.to_string().contains("db-3"));
}

#[tokio::test]
async fn taxonomy_failure_keeps_its_status() {
    let srv = TestServer::spawn(AppConfig::default()).await;
    let (status, _, body) = srv.get("/project").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": { "message": "Project not found", "details": null } }));
}

#[tokio::test]
async fn provider_failure_is_bad_request() {
    let srv = TestServer::spawn(AppConfig::default()).await;
    let (status, _, body) = srv.get("/upstream").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid token");
}

#[tokio::test]
async fn rendered_failures_keep_security_headers() {
    let srv = TestServer::spawn(AppConfig::production()).await;
    let (_, headers, _) = srv.get("/boom").await;

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["content-type"], "application/json");
}
