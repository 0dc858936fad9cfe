//! The bundle of all seven per-operation registries.

use osb_core::messages::{
    CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse,
    CreateServiceInstanceRequest, CreateServiceInstanceResponse,
    DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse,
    DeleteServiceInstanceRequest, DeleteServiceInstanceResponse,
    GetLastServiceBindingOperationRequest, GetLastServiceBindingOperationResponse,
    GetLastServiceOperationRequest, GetLastServiceOperationResponse, UpdateServiceInstanceRequest,
    UpdateServiceInstanceResponse,
};

use super::registry::{EventFlowRegistry, RegistryConfig};

pub type CreateInstanceEventFlowRegistry =
    EventFlowRegistry<CreateServiceInstanceRequest, CreateServiceInstanceResponse>;
pub type UpdateInstanceEventFlowRegistry =
    EventFlowRegistry<UpdateServiceInstanceRequest, UpdateServiceInstanceResponse>;
pub type DeleteInstanceEventFlowRegistry =
    EventFlowRegistry<DeleteServiceInstanceRequest, DeleteServiceInstanceResponse>;
pub type LastOperationEventFlowRegistry =
    EventFlowRegistry<GetLastServiceOperationRequest, GetLastServiceOperationResponse>;
pub type CreateBindingEventFlowRegistry =
    EventFlowRegistry<CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse>;
pub type DeleteBindingEventFlowRegistry =
    EventFlowRegistry<DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse>;
pub type LastBindingOperationEventFlowRegistry = EventFlowRegistry<
    GetLastServiceBindingOperationRequest,
    GetLastServiceBindingOperationResponse,
>;

/// Hook configuration for every operation, assembled once at startup.
///
/// All fields default to empty, so callers only fill in the operations they
/// extend.
#[derive(Debug, Default)]
pub struct EventFlowConfig {
    pub create_instance:
        RegistryConfig<CreateServiceInstanceRequest, CreateServiceInstanceResponse>,
    pub update_instance:
        RegistryConfig<UpdateServiceInstanceRequest, UpdateServiceInstanceResponse>,
    pub delete_instance:
        RegistryConfig<DeleteServiceInstanceRequest, DeleteServiceInstanceResponse>,
    pub last_operation:
        RegistryConfig<GetLastServiceOperationRequest, GetLastServiceOperationResponse>,
    pub create_binding:
        RegistryConfig<CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse>,
    pub delete_binding:
        RegistryConfig<DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse>,
    pub last_binding_operation: RegistryConfig<
        GetLastServiceBindingOperationRequest,
        GetLastServiceBindingOperationResponse,
    >,
}

/// One frozen registry per broker operation. Shared as `Arc<EventFlowRegistries>`.
#[derive(Debug, Default)]
pub struct EventFlowRegistries {
    create_instance: CreateInstanceEventFlowRegistry,
    update_instance: UpdateInstanceEventFlowRegistry,
    delete_instance: DeleteInstanceEventFlowRegistry,
    last_operation: LastOperationEventFlowRegistry,
    create_binding: CreateBindingEventFlowRegistry,
    delete_binding: DeleteBindingEventFlowRegistry,
    last_binding_operation: LastBindingOperationEventFlowRegistry,
}

impl EventFlowRegistries {
    #[must_use]
    pub fn new(config: EventFlowConfig) -> Self {
        Self {
            create_instance: EventFlowRegistry::new(config.create_instance),
            update_instance: EventFlowRegistry::new(config.update_instance),
            delete_instance: EventFlowRegistry::new(config.delete_instance),
            last_operation: EventFlowRegistry::new(config.last_operation),
            create_binding: EventFlowRegistry::new(config.create_binding),
            delete_binding: EventFlowRegistry::new(config.delete_binding),
            last_binding_operation: EventFlowRegistry::new(config.last_binding_operation),
        }
    }

    #[must_use]
    pub fn create_instance(&self) -> &CreateInstanceEventFlowRegistry {
        &self.create_instance
    }

    #[must_use]
    pub fn update_instance(&self) -> &UpdateInstanceEventFlowRegistry {
        &self.update_instance
    }

    #[must_use]
    pub fn delete_instance(&self) -> &DeleteInstanceEventFlowRegistry {
        &self.delete_instance
    }

    #[must_use]
    pub fn last_operation(&self) -> &LastOperationEventFlowRegistry {
        &self.last_operation
    }

    #[must_use]
    pub fn create_binding(&self) -> &CreateBindingEventFlowRegistry {
        &self.create_binding
    }

    #[must_use]
    pub fn delete_binding(&self) -> &DeleteBindingEventFlowRegistry {
        &self.delete_binding
    }

    #[must_use]
    pub fn last_binding_operation(&self) -> &LastBindingOperationEventFlowRegistry {
        &self.last_binding_operation
    }
}
