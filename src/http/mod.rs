//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes)
//!     → request.rs (request ID assigned / propagated)
//!     → GET /v1/check → aggregator → 200 SERVING | 503 NOT_SERVING
//!     → GET /v1/ping  → liveness  → 200 {"pong": true}
//!     → GET /v1/watch → 501
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{router, CheckBody, ErrorBody, HttpServer, PongBody};
