//! Server side of `healthz.v1.HealthService`.
//!
//! Mirrors what tonic's code generator emits: a service trait plus a tower
//! `Service` that routes gRPC paths to it.

use futures_util::Stream;
use tonic::codegen::*;
use tonic::{Request, Response, Status};

use crate::grpc::proto::{CheckRequest, CheckResponse, PingRequest, PongResponse, SERVICE_NAME};

/// Methods of `healthz.v1.HealthService`.
#[tonic::async_trait]
pub trait HealthService: Send + Sync + 'static {
    /// Aggregate health of every registered dependency.
    async fn check(&self, request: Request<CheckRequest>) -> Result<Response<CheckResponse>, Status>;

    /// Stream type returned by `watch`.
    type WatchStream: Stream<Item = Result<CheckResponse, Status>> + Send + 'static;

    /// Continuous health updates.
    async fn watch(&self, request: Request<CheckRequest>) -> Result<Response<Self::WatchStream>, Status>;

    /// Liveness.
    async fn ping(&self, request: Request<PingRequest>) -> Result<Response<PongResponse>, Status>;
}

/// Tower service exposing a [`HealthService`] over gRPC.
#[derive(Debug)]
pub struct HealthServiceServer<T> {
    inner: Arc<T>,
}

impl<T> HealthServiceServer<T> {
    pub fn new(inner: T) -> Self {
        Self::from_arc(Arc::new(inner))
    }

    pub fn from_arc(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

impl<T> Clone for HealthServiceServer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, B> Service<http::Request<B>> for HealthServiceServer<T>
where
    T: HealthService,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        match req.uri().path() {
            "/healthz.v1.HealthService/Check" => {
                struct CheckSvc<T: HealthService>(Arc<T>);
                impl<T: HealthService> tonic::server::UnaryService<CheckRequest> for CheckSvc<T> {
                    type Response = CheckResponse;
                    type Future = BoxFuture<Response<Self::Response>, Status>;
                    fn call(&mut self, request: Request<CheckRequest>) -> Self::Future {
                        let inner = Arc::clone(&self.0);
                        Box::pin(async move { <T as HealthService>::check(&inner, request).await })
                    }
                }
                let inner = Arc::clone(&self.inner);
                Box::pin(async move {
                    let mut grpc = tonic::server::Grpc::new(tonic::codec::ProstCodec::default());
                    Ok(grpc.unary(CheckSvc(inner), req).await)
                })
            }
            "/healthz.v1.HealthService/Watch" => {
                struct WatchSvc<T: HealthService>(Arc<T>);
                impl<T: HealthService> tonic::server::ServerStreamingService<CheckRequest> for WatchSvc<T> {
                    type Response = CheckResponse;
                    type ResponseStream = T::WatchStream;
                    type Future = BoxFuture<Response<Self::ResponseStream>, Status>;
                    fn call(&mut self, request: Request<CheckRequest>) -> Self::Future {
                        let inner = Arc::clone(&self.0);
                        Box::pin(async move { <T as HealthService>::watch(&inner, request).await })
                    }
                }
                let inner = Arc::clone(&self.inner);
                Box::pin(async move {
                    let mut grpc = tonic::server::Grpc::new(tonic::codec::ProstCodec::default());
                    Ok(grpc.server_streaming(WatchSvc(inner), req).await)
                })
            }
            "/healthz.v1.HealthService/Ping" => {
                struct PingSvc<T: HealthService>(Arc<T>);
                impl<T: HealthService> tonic::server::UnaryService<PingRequest> for PingSvc<T> {
                    type Response = PongResponse;
                    type Future = BoxFuture<Response<Self::Response>, Status>;
                    fn call(&mut self, request: Request<PingRequest>) -> Self::Future {
                        let inner = Arc::clone(&self.0);
                        Box::pin(async move { <T as HealthService>::ping(&inner, request).await })
                    }
                }
                let inner = Arc::clone(&self.inner);
                Box::pin(async move {
                    let mut grpc = tonic::server::Grpc::new(tonic::codec::ProstCodec::default());
                    Ok(grpc.unary(PingSvc(inner), req).await)
                })
            }
            _ => Box::pin(async move {
                let mut response = http::Response::new(empty_body());
                let headers = response.headers_mut();
                headers.insert("grpc-status", http::HeaderValue::from(tonic::Code::Unimplemented as i32));
                headers.insert(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("application/grpc"),
                );
                Ok(response)
            }),
        }
    }
}

impl<T> tonic::server::NamedService for HealthServiceServer<T> {
    const NAME: &'static str = SERVICE_NAME;
}
