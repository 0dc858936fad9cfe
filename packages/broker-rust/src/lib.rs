//! Open Service Broker event flows: pluggable hooks around the provisioning
//! and binding lifecycle, the orchestrator that sequences them, and a
//! `tower` pipeline to dispatch requests through it.

pub mod flow;
pub mod service;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use flow::{
    CompletionFlow, ErrorFlow, EventFlowConfig, EventFlowRegistries, EventFlowRegistry,
    InitializationFlow, RegistryConfig,
};
pub use service::{
    build_broker_pipeline, BrokerConfig, BrokerDispatcher, BrokerOrchestrator, BrokerPipeline,
    BrokerRequest, BrokerResponse, OperationKind,
};
pub use traits::{
    resolve_catalog_entries, CatalogService, ServiceInstanceBindingService, ServiceInstanceService,
};
