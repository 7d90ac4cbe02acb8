//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/mode/:mode", post(mode_handler))
        .route("/presets", put(presets_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Presets;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(0, "127.0.0.1".to_string(), Presets::default()))
    }

    fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app()
            .oneshot(request(Method::GET, "/health", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn start_then_status_reports_running() {
        let app = app();

        let response = app
            .clone()
            .oneshot(request(Method::POST, "/start", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(Method::GET, "/status", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let status: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(status["timer"]["phase"], "running");
        assert_eq!(status["timer"]["total_seconds"], 25 * 60);
        assert_eq!(status["presets"]["focus"], 25);
        assert_eq!(status["last_action"], "start");
    }

    #[tokio::test]
    async fn mode_endpoint_applies_preset() {
        let response = app()
            .oneshot(request(Method::POST, "/mode/short", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply["timer"]["mode"], "short");
        assert_eq!(reply["timer"]["total_seconds"], 5 * 60);
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let response = app()
            .oneshot(request(Method::POST, "/mode/nap", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn zero_minute_presets_are_rejected() {
        let response = app()
            .oneshot(request(
                Method::PUT,
                "/presets",
                Body::from(r#"{"focus":0,"short":5,"long":15}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn oversized_presets_are_rejected() {
        let response = app()
            .oneshot(request(
                Method::PUT,
                "/presets",
                Body::from(r#"{"focus":18446744073709551615,"short":5,"long":15}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn saving_presets_reapplies_current_mode() {
        let response = app()
            .oneshot(request(
                Method::PUT,
                "/presets",
                Body::from(r#"{"focus":50,"short":10,"long":20}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply["timer"]["total_seconds"], 50 * 60);
        assert_eq!(reply["timer"]["phase"], "idle");
    }
}
