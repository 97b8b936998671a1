//! Client side of `healthz.v1.HealthService`.

use tonic::codegen::*;
use tonic::{IntoRequest, Response, Status};

use crate::grpc::proto::{CheckRequest, CheckResponse, PingRequest, PongResponse};

#[derive(Debug, Clone)]
pub struct HealthServiceClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl HealthServiceClient<tonic::transport::Channel> {
    /// Connect to a server, e.g. `"http://127.0.0.1:8080"`.
    pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
    where
        D: TryInto<tonic::transport::Endpoint>,
        D::Error: Into<StdError>,
    {
        let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
        Ok(Self::new(conn))
    }
}

impl<T> HealthServiceClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner.ready().await.map_err(|e| {
            Status::unknown(format!("Service was not ready: {}", e.into()))
        })
    }

    pub async fn check(
        &mut self,
        request: impl IntoRequest<CheckRequest>,
    ) -> Result<Response<CheckResponse>, Status> {
        self.ready().await?;
        let path = http::uri::PathAndQuery::from_static("/healthz.v1.HealthService/Check");
        self.inner
            .unary(request.into_request(), path, tonic::codec::ProstCodec::default())
            .await
    }

    pub async fn watch(
        &mut self,
        request: impl IntoRequest<CheckRequest>,
    ) -> Result<Response<tonic::codec::Streaming<CheckResponse>>, Status> {
        self.ready().await?;
        let path = http::uri::PathAndQuery::from_static("/healthz.v1.HealthService/Watch");
        self.inner
            .server_streaming(request.into_request(), path, tonic::codec::ProstCodec::default())
            .await
    }

    pub async fn ping(
        &mut self,
        request: impl IntoRequest<PingRequest>,
    ) -> Result<Response<PongResponse>, Status> {
        self.ready().await?;
        let path = http::uri::PathAndQuery::from_static("/healthz.v1.HealthService/Ping");
        self.inner
            .unary(request.into_request(), path, tonic::codec::ProstCodec::default())
            .await
    }
}
