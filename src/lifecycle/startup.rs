//! Startup from a configuration file.
//!
//! # Responsibilities
//! - Validate configuration
//! - Turn configured dependencies into checkers
//! - Carry listener and probe settings into the builder
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Checkers are built once; the list never changes after start

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::{validate_config, CheckerConfig, CheckerKind, ConfigError, HealthzConfig, ValidationError};
use crate::health::{Checker, HttpChecker, TcpChecker};
use crate::lifecycle::registration::{HealthzBuilder, RpcTransport};

impl HealthzBuilder {
    /// Builder preloaded with every setting and checker from `config`.
    pub fn from_config(config: &HealthzConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let mut builder = HealthzBuilder::new()
            .with_bind_address(config.server.bind_address)
            .with_grpc_port(config.server.grpc_port)
            .with_http_port(config.server.http_port)
            .with_probe_timeout(Duration::from_secs(config.probe.timeout_secs));
        if config.server.external_rpc_server {
            builder.rpc = RpcTransport::External;
        }

        for checker in &config.checkers {
            builder = builder.with_shared_checker(build_checker(checker)?);
        }
        Ok(builder)
    }
}

/// Create the built-in checker described by `config`.
pub fn build_checker(config: &CheckerConfig) -> Result<Arc<dyn Checker>, ConfigError> {
    match config.kind {
        CheckerKind::Http => {
            let url = Url::parse(&config.target).map_err(|_| {
                ConfigError::Validation(vec![ValidationError::InvalidHttpTarget {
                    name: config.name.clone(),
                    target: config.target.clone(),
                }])
            })?;
            Ok(Arc::new(HttpChecker::new(config.name.clone(), url)))
        }
        CheckerKind::Tcp => Ok(Arc::new(TcpChecker::new(config.name.clone(), config.target.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn builder_follows_config() {
        let config = parse_config(
            r#"
            [server]
            grpc_port = 0
            http_port = 0
            external_rpc_server = true

            [probe]
            timeout_secs = 2

            [[checkers]]
            name = "db"
            kind = "tcp"
            target = "127.0.0.1:5432"
            "#,
        )
        .unwrap();

        let builder = HealthzBuilder::from_config(&config).unwrap();
        assert_eq!(builder.grpc_port, 0);
        assert_eq!(builder.rpc, RpcTransport::External);
        assert_eq!(builder.probe_timeout, Duration::from_secs(2));
        assert_eq!(builder.checkers.len(), 1);
        assert_eq!(builder.checkers[0].name(), "db");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = HealthzConfig::default();
        config.checkers.push(CheckerConfig {
            name: "api".into(),
            kind: CheckerKind::Http,
            target: "not a url".into(),
        });
        assert!(matches!(
            HealthzBuilder::from_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
