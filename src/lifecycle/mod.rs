//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (registration.rs, startup.rs):
//!     Options/config → Bind listeners → Spawn RPC server + HTTP gateway
//!
//! Shutdown (shutdown.rs):
//!     Healthz::shutdown → broadcast → servers drain → ports released
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary calls Healthz::shutdown
//! ```
//!
//! # Design Decisions
//! - The registration is an owned value; there is no process-global state
//! - Listeners bind before anything is spawned: bind failure aborts startup
//! - After shutdown a fresh registration can reuse the same ports

pub mod registration;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use registration::{Healthz, HealthzBuilder, HealthzError, RpcTransport};
pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
pub use startup::build_checker;
