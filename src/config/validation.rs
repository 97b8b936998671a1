//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, distinct ports)
//! - Validate checker targets and names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HealthzConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use url::Url;

use crate::config::schema::{CheckerKind, HealthzConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("probe.timeout_secs must be greater than zero")]
    ZeroProbeTimeout,
    #[error("server.grpc_port and server.http_port are both {0}")]
    PortConflict(u16),
    #[error("checker name must not be empty")]
    EmptyCheckerName,
    #[error("checker `{0}` is defined more than once")]
    DuplicateChecker(String),
    #[error("checker `{name}` has invalid http target `{target}`")]
    InvalidHttpTarget { name: String, target: String },
    #[error("checker `{name}` has invalid tcp target `{target}` (expected host:port)")]
    InvalidTcpTarget { name: String, target: String },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &HealthzConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }

    let server = &config.server;
    if !server.external_rpc_server && server.grpc_port != 0 && server.grpc_port == server.http_port {
        errors.push(ValidationError::PortConflict(server.grpc_port));
    }

    let mut seen = HashSet::new();
    for checker in &config.checkers {
        if checker.name.trim().is_empty() {
            errors.push(ValidationError::EmptyCheckerName);
        } else if !seen.insert(checker.name.as_str()) {
            errors.push(ValidationError::DuplicateChecker(checker.name.clone()));
        }

        match checker.kind {
            CheckerKind::Http => {
                let valid = Url::parse(&checker.target)
                    .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
                    .unwrap_or(false);
                if !valid {
                    errors.push(ValidationError::InvalidHttpTarget {
                        name: checker.name.clone(),
                        target: checker.target.clone(),
                    });
                }
            }
            CheckerKind::Tcp => {
                if !is_host_port(&checker.target) {
                    errors.push(ValidationError::InvalidTcpTarget {
                        name: checker.name.clone(),
                        target: checker.target.clone(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_host_port(target: &str) -> bool {
    match target.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
