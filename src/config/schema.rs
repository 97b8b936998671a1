//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the health
//! endpoint. All types derive Serde traits for deserialization from config files.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Default RPC listen port.
pub const DEFAULT_GRPC_PORT: u16 = 8080;

/// Default HTTP gateway listen port.
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HealthzConfig {
    /// Listener settings for the RPC server and HTTP gateway.
    pub server: ServerConfig,

    /// Probe settings.
    pub probe: ProbeConfig,

    /// Dependencies to check.
    pub checkers: Vec<CheckerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address both listeners bind to.
    pub bind_address: IpAddr,

    /// RPC listen port (0 picks an ephemeral port).
    pub grpc_port: u16,

    /// HTTP gateway listen port (0 picks an ephemeral port).
    pub http_port: u16,

    /// Do not start an RPC server; the host application mounts the service.
    pub external_rpc_server: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            grpc_port: DEFAULT_GRPC_PORT,
            http_port: DEFAULT_HTTP_PORT,
            external_rpc_server: false,
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-checker deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// A dependency to check.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CheckerConfig {
    /// Label reported when this dependency fails.
    pub name: String,

    /// How to probe the dependency.
    pub kind: CheckerKind,

    /// URL for `http`, `host:port` for `tcp`.
    pub target: String,
}

/// Built-in checker kinds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckerKind {
    Http,
    Tcp,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus scrape address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: "healthz=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: HealthzConfig = toml::from_str("").unwrap();
        assert_eq!(config, HealthzConfig::default());
        assert_eq!(config.server.grpc_port, 8080);
        assert_eq!(config.server.http_port, 8081);
        assert_eq!(config.probe.timeout_secs, 5);
        assert!(config.checkers.is_empty());
    }

    #[test]
    fn parses_checkers() {
        let config: HealthzConfig = toml::from_str(
            r#"
            [server]
            grpc_port = 9000

            [[checkers]]
            name = "postgres"
            kind = "tcp"
            target = "localhost:5432"

            [[checkers]]
            name = "search"
            kind = "http"
            target = "http://localhost:9200/_cluster/health"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.grpc_port, 9000);
        assert_eq!(config.server.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.checkers.len(), 2);
        assert_eq!(config.checkers[0].kind, CheckerKind::Tcp);
        assert_eq!(config.checkers[1].kind, CheckerKind::Http);
    }
}
