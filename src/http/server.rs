//! HTTP gateway setup.
//!
//! # Responsibilities
//! - Create Axum Router with the check, ping and watch handlers
//! - Wire up middleware (tracing, request ID)
//! - Serve on a bound listener until shutdown
//! - Translate aggregate results into HTTP status codes and JSON bodies

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::grpc::ServingStatus;
use crate::health::{self, Aggregator, CheckReport, HealthError};
use crate::http::request::UuidRequestId;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

/// Body of `GET /v1/check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckBody {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `GET /v1/ping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PongBody {
    pub pong: bool,
}

/// Body of gateway errors; `code` is the matching gRPC status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i32,
    pub message: String,
}

/// HTTP gateway in front of the health aggregator.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            router: router(aggregator),
        }
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP gateway starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(address = %addr, "HTTP gateway stopped");
        Ok(())
    }
}

/// Gateway routes, for hosts that serve them on their own listener.
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/v1/check", get(check_handler))
        .route("/v1/ping", get(ping_handler))
        .route("/v1/watch", get(watch_handler))
        .with_state(AppState { aggregator })
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

async fn check_handler(State(state): State<AppState>) -> Response {
    // Axum drops the handler when the client disconnects.
    let request = CancellationToken::new();
    let _guard = request.clone().drop_guard();

    match state.aggregator.check(&request).await {
        Ok(CheckReport::Serving) => (
            StatusCode::OK,
            Json(CheckBody {
                status: ServingStatus::Serving.as_str_name().to_string(),
                message: None,
            }),
        )
            .into_response(),
        Ok(CheckReport::NotServing(failure)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(CheckBody {
                status: ServingStatus::NotServing.as_str_name().to_string(),
                message: Some(failure.message),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn ping_handler() -> Json<PongBody> {
    Json(PongBody {
        pong: health::ping().alive,
    })
}

async fn watch_handler(State(state): State<AppState>) -> Response {
    match state.aggregator.watch() {
        Ok(never) => match never {},
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for HealthError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            HealthError::Cancelled => (
                StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT),
                tonic::Code::Cancelled,
            ),
            HealthError::WatchUnsupported => (StatusCode::NOT_IMPLEMENTED, tonic::Code::Unimplemented),
        };
        let body = ErrorBody {
            code: code as i32,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{checker_fn, Checker};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(checkers: Vec<Arc<dyn Checker>>) -> Router {
        router(Arc::new(Aggregator::new(checkers)))
    }

    async fn get(app: Router, path: &str) -> (StatusCode, serde_json::Value, Option<String>) {
        let response = app
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap(), request_id)
    }

    #[tokio::test]
    async fn check_serving() {
        let (status, body, request_id) = get(app(vec![]), "/v1/check").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "status": "SERVING_STATUS_SERVING" }));
        assert!(request_id.is_some());
    }

    #[tokio::test]
    async fn check_not_serving() {
        let down: Arc<dyn Checker> = Arc::new(checker_fn("kafka", |_| async { false }));
        let (status, body, _) = get(app(vec![down]), "/v1/check").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "SERVING_STATUS_NOT_SERVING");
        assert!(body["message"].as_str().unwrap().contains("kafka"));
    }

    #[tokio::test]
    async fn ping_is_always_true() {
        let down: Arc<dyn Checker> = Arc::new(checker_fn("kafka", |_| async { false }));
        let (status, body, _) = get(app(vec![down]), "/v1/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "pong": true }));
    }

    #[tokio::test]
    async fn watch_is_not_implemented() {
        let (status, body, _) = get(app(vec![]), "/v1/watch").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["code"], 12);
    }

    #[tokio::test]
    async fn client_request_id_is_echoed() {
        let response = app(vec![])
            .oneshot(
                Request::get("/v1/ping")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
