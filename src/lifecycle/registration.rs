//! Registration of checkers and ownership of the transports.

use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, DEFAULT_GRPC_PORT, DEFAULT_HTTP_PORT};
use crate::grpc::{self, GrpcHealth, HealthServiceServer};
use crate::health::{self, Aggregator, CheckReport, Checker, HealthError, Pong, DEFAULT_PROBE_TIMEOUT};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;

/// Error type for registration and teardown.
#[derive(Debug, thiserror::Error)]
pub enum HealthzError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("RPC server error: {0}")]
    Transport(#[from] tonic::transport::Error),
    #[error("RPC reflection setup failed: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),
    #[error("HTTP gateway error: {0}")]
    Http(#[source] std::io::Error),
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Who owns the RPC server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RpcTransport {
    /// Start and stop an RPC server on the configured port.
    #[default]
    Managed,
    /// The host application mounts [`Healthz::grpc_service`] on its own server.
    External,
}

/// Options collected before [`HealthzBuilder::start`].
pub struct HealthzBuilder {
    pub(crate) checkers: Vec<Arc<dyn Checker>>,
    pub(crate) bind_address: IpAddr,
    pub(crate) grpc_port: u16,
    pub(crate) http_port: u16,
    pub(crate) rpc: RpcTransport,
    pub(crate) probe_timeout: Duration,
}

impl Default for HealthzBuilder {
    fn default() -> Self {
        Self {
            checkers: Vec::new(),
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            grpc_port: DEFAULT_GRPC_PORT,
            http_port: DEFAULT_HTTP_PORT,
            rpc: RpcTransport::Managed,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl HealthzBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one dependency to check. May be called any number of times.
    pub fn with_checker(mut self, checker: impl Checker) -> Self {
        self.checkers.push(Arc::new(checker));
        self
    }

    /// Add a checker that is also held elsewhere.
    pub fn with_shared_checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.checkers.push(checker);
        self
    }

    /// Do not create an RPC server; see [`RpcTransport::External`].
    pub fn with_external_rpc_server(mut self) -> Self {
        self.rpc = RpcTransport::External;
        self
    }

    pub fn with_grpc_port(mut self, port: u16) -> Self {
        self.grpc_port = port;
        self
    }

    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    pub fn with_bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Bind the listeners and start serving.
    ///
    /// Listeners are bound before anything is spawned, so a port that cannot
    /// be bound fails the whole registration.
    pub async fn start(self) -> Result<Healthz, HealthzError> {
        let aggregator = Arc::new(Aggregator::with_timeout(self.checkers, self.probe_timeout));

        let http_listener = bind(SocketAddr::new(self.bind_address, self.http_port)).await?;
        let grpc_listener = match self.rpc {
            RpcTransport::Managed => {
                Some(bind(SocketAddr::new(self.bind_address, self.grpc_port)).await?)
            }
            RpcTransport::External => None,
        };

        let http_addr = http_listener
            .local_addr()
            .map_err(HealthzError::Http)?;
        let grpc_addr = match &grpc_listener {
            Some(listener) => Some(listener.local_addr().map_err(|source| HealthzError::Bind {
                addr: SocketAddr::new(self.bind_address, self.grpc_port),
                source,
            })?),
            None => None,
        };

        let shutdown = Shutdown::new();
        let mut tasks = Vec::with_capacity(2);

        if let Some(listener) = grpc_listener {
            let service = HealthServiceServer::new(GrpcHealth::new(Arc::clone(&aggregator)));
            let reflection = tonic_reflection::server::Builder::configure()
                .register_file_descriptor_set(grpc::file_descriptor_set())
                .build_v1()?;
            let stop = shutdown.signal();
            tasks.push(tokio::spawn(async move {
                tonic::transport::Server::builder()
                    .add_service(service)
                    .add_service(reflection)
                    .serve_with_incoming_shutdown(TcpListenerStream::new(listener), stop)
                    .await?;
                tracing::info!("RPC server stopped");
                Ok::<(), HealthzError>(())
            }));
        }

        let gateway = HttpServer::new(Arc::clone(&aggregator));
        let stop = shutdown.signal();
        tasks.push(tokio::spawn(async move {
            gateway.run(http_listener, stop).await.map_err(HealthzError::Http)
        }));

        tracing::info!(
            checkers = aggregator.len(),
            grpc_address = ?grpc_addr,
            http_address = %http_addr,
            probe_timeout_ms = self.probe_timeout.as_millis() as u64,
            "Health endpoint registered"
        );

        Ok(Healthz {
            aggregator,
            shutdown,
            grpc_addr,
            http_addr,
            tasks,
        })
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, HealthzError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| HealthzError::Bind { addr, source })
}

/// A running health endpoint.
///
/// Dropping it stops the servers without waiting; [`Healthz::shutdown`] waits
/// for them and releases the ports before returning.
pub struct Healthz {
    aggregator: Arc<Aggregator>,
    shutdown: Shutdown,
    grpc_addr: Option<SocketAddr>,
    http_addr: SocketAddr,
    tasks: Vec<JoinHandle<Result<(), HealthzError>>>,
}

impl Healthz {
    pub fn builder() -> HealthzBuilder {
        HealthzBuilder::new()
    }

    /// Run an aggregate check in-process.
    pub async fn check(&self, cancel: &CancellationToken) -> Result<CheckReport, HealthError> {
        self.aggregator.check(cancel).await
    }

    pub fn ping(&self) -> Pong {
        health::ping()
    }

    pub fn watch(&self) -> Result<Infallible, HealthError> {
        self.aggregator.watch()
    }

    /// RPC service to mount on a host-owned tonic server.
    pub fn grpc_service(&self) -> HealthServiceServer<GrpcHealth> {
        HealthServiceServer::new(GrpcHealth::new(Arc::clone(&self.aggregator)))
    }

    pub fn aggregator(&self) -> &Arc<Aggregator> {
        &self.aggregator
    }

    /// Bound RPC address, `None` when the RPC server is external.
    pub fn grpc_addr(&self) -> Option<SocketAddr> {
        self.grpc_addr
    }

    pub fn http_addr(&self) -> SocketAddr {
        self.http_addr
    }

    /// Stop accepting checks and wait for both servers to exit.
    pub async fn shutdown(mut self) -> Result<(), HealthzError> {
        tracing::info!("Health endpoint shutting down");
        self.shutdown.trigger();

        let mut result = Ok(());
        for task in std::mem::take(&mut self.tasks) {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(HealthzError::Join(e)),
            };
            if let Err(e) = outcome {
                tracing::error!(error = %e, "Server exited with error");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        tracing::info!("Health endpoint unregistered");
        result
    }
}

impl Drop for Healthz {
    fn drop(&mut self) {
        if !self.tasks.is_empty() && self.shutdown.trigger() {
            tracing::debug!("Health endpoint dropped without shutdown");
        }
    }
}

impl std::fmt::Debug for Healthz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Healthz")
            .field("checkers", &self.aggregator.len())
            .field("grpc_addr", &self.grpc_addr)
            .field("http_addr", &self.http_addr)
            .finish()
    }
}
