//! Admission control for state-changing broker operations.
//!
//! Provision, update, deprovision, bind and unbind share one budget of
//! `max_concurrent_operations` permits. Fetches and last-operation polls are
//! always admitted: a saturated broker must still answer the platform polling
//! the operations it already accepted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use osb_core::ServiceBrokerError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tower::{Layer, Service};

use crate::service::operation::{BrokerRequest, BrokerResponse, OperationKind};

type BoxedFuture =
    Pin<Box<dyn Future<Output = Result<BrokerResponse, ServiceBrokerError>> + Send>>;

// ---------------------------------------------------------------------------
// LoadShedLayer
// ---------------------------------------------------------------------------

/// Tower layer that sheds state-changing operations once the budget is spent.
///
/// Clones of the layer, and every service it builds, share the same budget.
#[derive(Debug, Clone)]
pub struct LoadShedLayer {
    budget: Arc<MutationBudget>,
}

impl LoadShedLayer {
    #[must_use]
    pub fn new(max_concurrent_operations: u32) -> Self {
        Self {
            budget: Arc::new(MutationBudget::new(max_concurrent_operations)),
        }
    }

    /// State-changing operations currently holding a permit.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.budget.in_flight()
    }
}

impl<S> Layer<S> for LoadShedLayer {
    type Service = LoadShedService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoadShedService {
            inner,
            budget: Arc::clone(&self.budget),
        }
    }
}

// ---------------------------------------------------------------------------
// MutationBudget
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MutationBudget {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// Outcome of admitting one request.
enum Admission {
    /// Read-only request; holds nothing.
    Exempt,
    /// Holds a permit until the request settles.
    Admitted(OwnedSemaphorePermit),
    Rejected { in_flight: usize },
}

impl MutationBudget {
    fn new(max_concurrent_operations: u32) -> Self {
        let capacity = max_concurrent_operations as usize;
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    fn in_flight(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    fn admit(&self, kind: OperationKind) -> Admission {
        if kind.is_read_only() {
            return Admission::Exempt;
        }
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => Admission::Admitted(permit),
            Err(_) => Admission::Rejected {
                in_flight: self.in_flight(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// LoadShedService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadShedService<S> {
    inner: S,
    budget: Arc<MutationBudget>,
}

impl<S> Service<BrokerRequest> for LoadShedService<S>
where
    S: Service<BrokerRequest, Response = BrokerResponse, Error = ServiceBrokerError> + Send,
    S::Future: Send + 'static,
{
    type Response = BrokerResponse;
    type Error = ServiceBrokerError;
    type Future = BoxedFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: BrokerRequest) -> Self::Future {
        let kind = request.kind();
        let permit = match self.budget.admit(kind) {
            Admission::Exempt => None,
            Admission::Admitted(permit) => Some(permit),
            Admission::Rejected { in_flight } => {
                tracing::warn!(
                    operation = kind.as_str(),
                    service_instance_id = request.service_instance_id(),
                    in_flight = in_flight,
                    "shedding state-changing operation"
                );
                return Box::pin(async move {
                    Err(ServiceBrokerError::Unavailable {
                        message: format!(
                            "{in_flight} operations in flight, rejected {}",
                            kind.as_str()
                        ),
                    })
                });
            }
        };

        let fut = self.inner.call(request);
        Box::pin(async move {
            let result = fut.await;
            drop(permit);
            result
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
