//! RPC transport subsystem.
//!
//! # Data Flow
//! ```text
//! gRPC request (/healthz.v1.HealthService/*)
//!     → server.rs (path routing, prost codec)
//!     → service.rs (maps to the aggregator / liveness responder)
//!     → CheckResponse | Status::unavailable(cause) | PongResponse
//!
//! Reflection (/grpc.reflection.v1.ServerReflection/*)
//!     → descriptor.rs (schema built in code, served by tonic-reflection)
//! ```
//!
//! # Design Decisions
//! - Messages are hand-written prost types; no protoc at build time
//! - Not serving is reported as `UNAVAILABLE` carrying the failing dependency
//! - Watch is part of the schema but always answers `UNIMPLEMENTED`
//! - Reflection is mounted only on the RPC server this crate manages

pub mod client;
pub mod descriptor;
pub mod proto;
pub mod server;
pub mod service;

pub use client::HealthServiceClient;
pub use descriptor::{file_descriptor_set, FILE_NAME};
pub use proto::{CheckRequest, CheckResponse, PingRequest, PongResponse, ServingStatus};
pub use server::{HealthService, HealthServiceServer};
pub use service::GrpcHealth;
