//! Pipeline composition: combines all middleware layers into a single service stack.

use tower::ServiceBuilder;

use super::load_shed::{LoadShedLayer, LoadShedService};
use super::metrics::{MetricsLayer, MetricsService};
use crate::service::config::BrokerConfig;
use crate::service::router::BrokerDispatcher;

/// The composed service stack. Clone it per connection or task; clones share
/// the load-shed permits.
pub type BrokerPipeline = LoadShedService<MetricsService<BrokerDispatcher>>;

/// Build the broker pipeline by wrapping the `BrokerDispatcher` with middleware layers.
///
/// Layer order (outermost to innermost):
/// 1. `LoadShedLayer` -- shed state-changing operations once the budget is spent
/// 2. `MetricsLayer` -- record timing and outcome
///
/// No timeout layer: hooks and services run to completion.
#[must_use]
pub fn build_broker_pipeline(
    dispatcher: BrokerDispatcher,
    config: &BrokerConfig,
) -> BrokerPipeline {
    ServiceBuilder::new()
        .layer(LoadShedLayer::new(config.max_concurrent_operations))
        .layer(MetricsLayer::new(&config.broker_name))
        .service(dispatcher)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
