// src/health.rs

//! Liveness endpoint for hosting platforms.
//!
//! Answers with a static acknowledgment; it shares no state with the
//! check and summary cycles.

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::HealthConfig;

/// Body of `GET /`.
pub const RUNNING_MESSAGE: &str = "✅ Quest Notifier is running!";

/// Routes served by the health endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { RUNNING_MESSAGE }))
        .route("/health", get(|| async { "ok" }))
}

/// Bind the configured address and serve in a background task.
///
/// Binding errors are returned; errors while serving are logged.
pub async fn spawn(config: &HealthConfig) -> Result<JoinHandle<()>> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    log::info!("Health endpoint listening on {}", addr);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            log::error!("Health endpoint stopped: {}", e);
        }
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt as _;

    use super::*;

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("build request");

        let resp = router().oneshot(req).await.expect("oneshot");
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf8"))
    }

    #[tokio::test]
    async fn root_reports_running() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, RUNNING_MESSAGE);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = get_body("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, _) = get_body("/quests").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn spawn_serves_on_ephemeral_port() {
        let config = HealthConfig {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let handle = spawn(&config).await.unwrap();
        assert!(!handle.is_finished());
        handle.abort();
    }
}
