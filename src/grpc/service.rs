//! Binds the health aggregator to the RPC service trait.

use std::sync::Arc;

use futures_util::stream::BoxStream;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

use crate::grpc::proto::{CheckRequest, CheckResponse, PingRequest, PongResponse};
use crate::grpc::server::HealthService;
use crate::health::{self, Aggregator, CheckReport, HealthError};

/// [`HealthService`] backed by an [`Aggregator`].
#[derive(Debug, Clone)]
pub struct GrpcHealth {
    aggregator: Arc<Aggregator>,
}

impl GrpcHealth {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }
}

impl From<HealthError> for Status {
    fn from(err: HealthError) -> Self {
        match err {
            HealthError::Cancelled => Status::cancelled(err.to_string()),
            HealthError::WatchUnsupported => Status::unimplemented(err.to_string()),
        }
    }
}

#[tonic::async_trait]
impl HealthService for GrpcHealth {
    async fn check(&self, _request: Request<CheckRequest>) -> Result<Response<CheckResponse>, Status> {
        // tonic drops this future when the client goes away; the guard turns
        // that into a cancelled request token.
        let request = CancellationToken::new();
        let _guard = request.clone().drop_guard();

        match self.aggregator.check(&request).await? {
            CheckReport::Serving => Ok(Response::new(CheckResponse::serving())),
            CheckReport::NotServing(failure) => Err(Status::unavailable(failure.message)),
        }
    }

    type WatchStream = BoxStream<'static, Result<CheckResponse, Status>>;

    async fn watch(&self, _request: Request<CheckRequest>) -> Result<Response<Self::WatchStream>, Status> {
        tracing::warn!("Rejected watch request: streaming health is not supported");
        match self.aggregator.watch() {
            Ok(never) => match never {},
            Err(e) => Err(e.into()),
        }
    }

    async fn ping(&self, _request: Request<PingRequest>) -> Result<Response<PongResponse>, Status> {
        Ok(Response::new(PongResponse {
            pong: health::ping().alive,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{checker_fn, Checker};
    use tonic::Code;

    fn service(checkers: Vec<Arc<dyn Checker>>) -> GrpcHealth {
        GrpcHealth::new(Arc::new(Aggregator::new(checkers)))
    }

    #[tokio::test]
    async fn serving_maps_to_serving_status() {
        let response = service(vec![]).check(Request::new(CheckRequest {})).await.unwrap();
        assert_eq!(response.into_inner(), CheckResponse::serving());
    }

    #[tokio::test]
    async fn not_serving_maps_to_unavailable() {
        let down: Arc<dyn Checker> = Arc::new(checker_fn("redis", |_| async { false }));
        let status = service(vec![down]).check(Request::new(CheckRequest {})).await.unwrap_err();
        assert_eq!(status.code(), Code::Unavailable);
        assert!(status.message().contains("redis"));
    }

    #[tokio::test]
    async fn watch_is_unimplemented() {
        let status = service(vec![]).watch(Request::new(CheckRequest {})).await.err().unwrap();
        assert_eq!(status.code(), Code::Unimplemented);
    }

    #[tokio::test]
    async fn ping_ignores_checkers() {
        let down: Arc<dyn Checker> = Arc::new(checker_fn("redis", |_| async { false }));
        let pong = service(vec![down]).ping(Request::new(PingRequest {})).await.unwrap();
        assert!(pong.into_inner().pong);
    }
}
