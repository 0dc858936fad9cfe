//! Event flows: pluggable hooks run around broker operations.
//!
//! 1. **Hooks** (`hooks`): initialization, completion and error traits
//! 2. **Registry** (`registry`): frozen hook lists for one operation, with the
//!    concurrent fan-out / fan-in merge
//! 3. **Registries** (`registries`): one registry per operation, built once

pub mod hooks;
pub mod registries;
pub mod registry;

pub use hooks::{CompletionFlow, ErrorFlow, InitializationFlow};
pub use registries::{
    CreateBindingEventFlowRegistry, CreateInstanceEventFlowRegistry,
    DeleteBindingEventFlowRegistry, DeleteInstanceEventFlowRegistry, EventFlowConfig,
    EventFlowRegistries, LastBindingOperationEventFlowRegistry, LastOperationEventFlowRegistry,
    UpdateInstanceEventFlowRegistry,
};
pub use registry::{EventFlowRegistry, FlowPhase, RegistryConfig};
