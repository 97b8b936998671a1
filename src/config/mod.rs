//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HealthzConfig (validated, immutable)
//!     → HealthzBuilder::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the checker list never changes while
//!   checks are in flight
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CheckerConfig, CheckerKind, HealthzConfig, LogFormat, ObservabilityConfig, ProbeConfig,
    ServerConfig, DEFAULT_GRPC_PORT, DEFAULT_HTTP_PORT,
};
pub use validation::{validate_config, ValidationError};
