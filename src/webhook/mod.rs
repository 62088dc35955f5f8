//! HTTP surface: `POST /webhook` receives pull request events, `GET /health`
//! answers liveness probes. The webhook route always answers `200 OK` with a
//! plain-text body, whatever happened while processing the event.

pub mod process;

pub use process::Processor;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::pr::event::{self, PullRequestEvent};
use crate::report::Reply;

pub fn build_router(processor: Arc<Processor>) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(processor)
}

async fn health() -> &'static str {
    "ok"
}

/// POST /webhook - decode the event (form `payload` field or raw JSON) and
/// run it through the processor.
async fn receive_webhook(State(processor): State<Arc<Processor>>, req: Request) -> String {
    let payload = match event::extract_payload(req).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "could not read webhook payload");
            return Reply::Unparseable.to_string();
        }
    };

    let event = match PullRequestEvent::parse(&payload) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "could not parse PR event");
            debug!(payload = %String::from_utf8_lossy(&payload), "raw payload");
            return Reply::Unparseable.to_string();
        }
    };

    processor.handle(event).await.to_string()
}

#[cfg(test)]
mod tests {
    use super::process::tests::{processor, Call, RecordingApi};
    use super::*;
    use crate::config::Config;

    const OPENED_42: &str = r#"{"action":"opened","pull_request":{"number":42},"repository":{"name":"repo","owner":{"login":"acme"}}}"#;

    async fn spawn_server(api: Arc<RecordingApi>) -> String {
        let app = build_router(Arc::new(processor(api, &Config::default())));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_json_webhook_end_to_end() {
        let api = Arc::new(RecordingApi::with_files(&["forbidden.txt"]));
        let url = spawn_server(api.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{url}/webhook"))
            .header("content-type", "application/json")
            .body(OPENED_42)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body = response.text().await.unwrap();
        assert!(body.contains("PR #42 validation complete. Status: failure"));
        assert_eq!(api.calls().last(), Some(&Call::Close(42)));
    }

    #[tokio::test]
    async fn test_form_webhook_end_to_end() {
        let api = Arc::new(RecordingApi::with_files(&["ok.txt"]));
        let url = spawn_server(api.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{url}/webhook"))
            .form(&[("payload", OPENED_42)])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body = response.text().await.unwrap();
        assert!(body.contains("PR #42 validation complete. Status: success"));
        assert!(!api.calls().contains(&Call::Close(42)));
    }

    #[tokio::test]
    async fn test_garbage_payload_still_returns_ok() {
        let api = Arc::new(RecordingApi::default());
        let url = spawn_server(api.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{url}/webhook"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.text().await.unwrap(),
            "Webhook received, but could not parse PR event"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let url = spawn_server(Arc::new(RecordingApi::default())).await;
        let body = reqwest::get(format!("{url}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }
}
