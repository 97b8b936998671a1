//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use healthz::{checker_fn, Checker};
use tokio_util::sync::CancellationToken;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A checker that always answers `healthy`.
pub fn fixed(name: &'static str, healthy: bool) -> Arc<dyn Checker> {
    Arc::new(checker_fn(name, move |_| async move { healthy }))
}

/// A checker that ignores cancellation, sleeps, then answers `healthy`.
pub fn sleeping(name: &'static str, delay: Duration, healthy: bool) -> Arc<dyn Checker> {
    Arc::new(checker_fn(name, move |_| async move {
        tokio::time::sleep(delay).await;
        healthy
    }))
}

/// A checker counting how often it ran.
pub fn counting(name: &'static str, healthy: bool) -> (Arc<dyn Checker>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let checker = checker_fn(name, move |_| {
        let seen = seen.clone();
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
            healthy
        }
    });
    (Arc::new(checker), calls)
}

/// A checker whose healthy state can be flipped between calls.
pub fn switchable(name: &'static str, healthy: Arc<AtomicBool>) -> Arc<dyn Checker> {
    Arc::new(checker_fn(name, move |_| {
        let healthy = healthy.clone();
        async move { healthy.load(Ordering::SeqCst) }
    }))
}

/// Answers healthy after `delay_ms`, or gives up without a verdict when
/// cancelled first. Built-in checkers behave the same way.
pub struct Abandoning {
    pub delay_ms: Arc<AtomicU64>,
    pub gave_up: Arc<AtomicBool>,
}

impl Abandoning {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: Arc::new(AtomicU64::new(delay.as_millis() as u64)),
            gave_up: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl Checker for Abandoning {
    async fn check(&self, cancel: CancellationToken) -> bool {
        self.try_check(cancel).await.unwrap_or(false)
    }

    async fn try_check(&self, cancel: CancellationToken) -> Option<bool> {
        let delay = Duration::from_millis(self.delay_ms.load(Ordering::SeqCst));
        tokio::select! {
            _ = cancel.cancelled() => {
                self.gave_up.store(true, Ordering::SeqCst);
                None
            }
            _ = tokio::time::sleep(delay) => Some(true),
        }
    }

    fn name(&self) -> String {
        "abandoning".to_string()
    }
}

/// Start a mock HTTP dependency answering 200, waiting `delays[n]` before
/// the n-th response (the last delay repeats).
pub async fn start_scripted_backend(delays: Vec<Duration>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let n = served.fetch_add(1, Ordering::SeqCst);
            let delay = delays
                .get(n)
                .or_else(|| delays.last())
                .copied()
                .unwrap_or_default();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let response = "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock HTTP dependency answering every request with `status`.
pub async fn start_mock_backend(status: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let status_text = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status_text
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
