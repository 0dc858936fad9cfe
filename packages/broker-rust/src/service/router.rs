//! Request routing: dispatches `BrokerRequest` to the orchestrator by variant.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use osb_core::ServiceBrokerError;
use tower::Service;

use super::operation::{BrokerRequest, BrokerResponse};
use super::orchestrator::BrokerOrchestrator;

type BoxedFuture = Pin<Box<dyn Future<Output = Result<BrokerResponse, ServiceBrokerError>> + Send>>;

// ---------------------------------------------------------------------------
// BrokerDispatcher
// ---------------------------------------------------------------------------

/// Innermost service of the pipeline.
///
/// Each call clones the orchestrator handle into its own future, so the
/// dispatcher is always ready and calls never block one another.
#[derive(Clone)]
pub struct BrokerDispatcher {
    orchestrator: Arc<BrokerOrchestrator>,
}

impl BrokerDispatcher {
    #[must_use]
    pub fn new(orchestrator: Arc<BrokerOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

impl Service<BrokerRequest> for BrokerDispatcher {
    type Response = BrokerResponse;
    type Error = ServiceBrokerError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: BrokerRequest) -> Self::Future {
        let orchestrator = Arc::clone(&self.orchestrator);
        Box::pin(async move {
            let response = match request {
                BrokerRequest::CreateInstance(r) => BrokerResponse::CreateInstance(
                    orchestrator.create_service_instance(*r).await?,
                ),
                BrokerRequest::UpdateInstance(r) => BrokerResponse::UpdateInstance(
                    orchestrator.update_service_instance(*r).await?,
                ),
                BrokerRequest::DeleteInstance(r) => BrokerResponse::DeleteInstance(
                    orchestrator.delete_service_instance(*r).await?,
                ),
                BrokerRequest::GetInstance(r) => {
                    BrokerResponse::GetInstance(orchestrator.get_service_instance(r).await?)
                }
                BrokerRequest::LastOperation(r) => {
                    BrokerResponse::LastOperation(orchestrator.get_last_operation(r).await?)
                }
                BrokerRequest::CreateBinding(r) => BrokerResponse::CreateBinding(
                    orchestrator.create_service_instance_binding(*r).await?,
                ),
                BrokerRequest::DeleteBinding(r) => BrokerResponse::DeleteBinding(
                    orchestrator.delete_service_instance_binding(*r).await?,
                ),
                BrokerRequest::GetBinding(r) => BrokerResponse::GetBinding(
                    orchestrator.get_service_instance_binding(r).await?,
                ),
                BrokerRequest::LastBindingOperation(r) => BrokerResponse::LastBindingOperation(
                    orchestrator.get_last_binding_operation(r).await?,
                ),
            };
            Ok(response)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
