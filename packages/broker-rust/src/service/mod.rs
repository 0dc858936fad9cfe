//! Broker request handling.
//!
//! 1. **Operations** (`operation`): typed `BrokerRequest` / `BrokerResponse`
//! 2. **Orchestration** (`orchestrator`): event flows around each service call
//! 3. **Routing** (`router`): `tower::Service` dispatch into the orchestrator
//! 4. **Middleware** (`middleware`): Tower layers (metrics, load-shedding)

pub mod config;
pub mod middleware;
pub mod operation;
pub mod orchestrator;
pub mod router;

pub use config::BrokerConfig;
pub use middleware::{build_broker_pipeline, BrokerPipeline};
pub use operation::{BrokerRequest, BrokerResponse, OperationKind};
pub use orchestrator::BrokerOrchestrator;
pub use router::BrokerDispatcher;
