//! Ready-made checkers for common dependencies.
//!
//! # Responsibilities
//! - Probe an HTTP endpoint (healthy on 2xx)
//! - Probe a TCP endpoint (healthy if a connection can be opened)
//!
//! # Design Decisions
//! - Both stop work as soon as the probe is cancelled and then report no
//!   verdict; an abandoned request says nothing about the dependency
//! - Transport errors are logged and reported as unhealthy

use async_trait::async_trait;
use reqwest::Client;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::health::checker::Checker;

/// Checks an HTTP endpoint with a GET request.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    name: String,
    url: Url,
    client: Client,
}

impl HttpChecker {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self::with_client(name, url, Client::new())
    }

    /// Reuse an existing client (connection pool, TLS settings, proxies).
    pub fn with_client(name: impl Into<String>, url: Url, client: Client) -> Self {
        Self {
            name: name.into(),
            url,
            client,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn check(&self, cancel: CancellationToken) -> bool {
        self.try_check(cancel).await.unwrap_or(false)
    }

    async fn try_check(&self, cancel: CancellationToken) -> Option<bool> {
        let request = self
            .client
            .get(self.url.clone())
            .header("user-agent", "healthz-checker")
            .send();

        tokio::select! {
            response = request => match response {
                Ok(response) => {
                    let success = response.status().is_success();
                    if !success {
                        tracing::warn!(
                            checker = %self.name,
                            url = %self.url,
                            status = %response.status(),
                            "Health check failed: non-success status"
                        );
                    }
                    Some(success)
                }
                Err(e) => {
                    tracing::warn!(checker = %self.name, url = %self.url, error = %e, "Health check failed: request error");
                    Some(false)
                }
            },
            _ = cancel.cancelled() => None,
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Checks that a TCP endpoint accepts connections.
#[derive(Debug, Clone)]
pub struct TcpChecker {
    name: String,
    address: String,
}

impl TcpChecker {
    /// `address` is anything `TcpStream::connect` accepts, e.g. `"db:5432"`.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl Checker for TcpChecker {
    async fn check(&self, cancel: CancellationToken) -> bool {
        self.try_check(cancel).await.unwrap_or(false)
    }

    async fn try_check(&self, cancel: CancellationToken) -> Option<bool> {
        tokio::select! {
            connected = TcpStream::connect(&self.address) => match connected {
                Ok(_) => Some(true),
                Err(e) => {
                    tracing::warn!(checker = %self.name, address = %self.address, error = %e, "Health check failed: connection error");
                    Some(false)
                }
            },
            _ = cancel.cancelled() => None,
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn tcp_checker_reports_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let checker = TcpChecker::new("db", addr.to_string());
        assert!(checker.check(CancellationToken::new()).await);
    }

    #[tokio::test]
    async fn tcp_checker_reports_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let checker = TcpChecker::new("db", addr.to_string());
        assert!(!checker.check(CancellationToken::new()).await);
    }

    #[tokio::test]
    async fn cancelled_http_checker_gives_no_verdict() {
        // Non-routable address: the request would hang until cancelled.
        let url = Url::parse("http://10.255.255.1:81/health").unwrap();
        let checker = HttpChecker::new("upstream", url);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(checker.try_check(cancel.clone()).await, None);
        assert!(!checker.check(cancel).await);
    }
}
