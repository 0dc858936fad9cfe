//! Metrics middleware for broker requests.
//!
//! Records request duration and outcome using `tracing` spans and events.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use osb_core::ServiceBrokerError;
use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::operation::{BrokerRequest, BrokerResponse};

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments broker requests with timing and outcome.
#[derive(Debug, Clone)]
pub struct MetricsLayer {
    broker_name: Arc<str>,
}

impl MetricsLayer {
    #[must_use]
    pub fn new(broker_name: &str) -> Self {
        Self {
            broker_name: Arc::from(broker_name),
        }
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService {
            inner,
            broker_name: Arc::clone(&self.broker_name),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricsService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
    broker_name: Arc<str>,
}

impl<S> Service<BrokerRequest> for MetricsService<S>
where
    S: Service<BrokerRequest, Response = BrokerResponse, Error = ServiceBrokerError> + Send,
    S::Future: Send + 'static,
{
    type Response = BrokerResponse;
    type Error = ServiceBrokerError;
    type Future = Pin<Box<dyn Future<Output = Result<BrokerResponse, ServiceBrokerError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: BrokerRequest) -> Self::Future {
        let operation = request.kind().as_str();

        let span = info_span!(
            "broker_request",
            broker = %self.broker_name,
            operation = operation,
            service_instance_id = request.service_instance_id(),
            binding_id = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );
        if let Some(binding_id) = request.binding_id() {
            span.record("binding_id", binding_id);
        }

        let fut = self.inner.call(request);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                let outcome = match &result {
                    Ok(_) => "ok",
                    Err(_) => "error",
                };

                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                match &result {
                    Ok(_) => tracing::info!(
                        operation = operation,
                        duration_ms = duration_ms,
                        outcome = outcome,
                        "broker request complete"
                    ),
                    Err(error) => tracing::info!(
                        operation = operation,
                        duration_ms = duration_ms,
                        outcome = outcome,
                        status = error.status_code().as_u16(),
                        error = %error,
                        "broker request complete"
                    ),
                }

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
