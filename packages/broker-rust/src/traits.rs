use async_trait::async_trait;
use osb_core::messages::{
    CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse,
    CreateServiceInstanceRequest, CreateServiceInstanceResponse,
    DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse,
    DeleteServiceInstanceRequest, DeleteServiceInstanceResponse,
    GetLastServiceBindingOperationRequest, GetLastServiceBindingOperationResponse,
    GetLastServiceOperationRequest, GetLastServiceOperationResponse,
    GetServiceInstanceBindingRequest, GetServiceInstanceBindingResponse,
    GetServiceInstanceRequest, GetServiceInstanceResponse, UpdateServiceInstanceRequest,
    UpdateServiceInstanceResponse,
};
use osb_core::{Catalog, Plan, ServiceBrokerError, ServiceDefinition};

/// Broker-specific service instance lifecycle.
/// Implementations own all instance state; the orchestrator only sequences calls.
#[async_trait]
pub trait ServiceInstanceService: Send + Sync {
    /// Provision a new service instance.
    async fn create_service_instance(
        &self,
        request: &CreateServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, ServiceBrokerError>;

    /// Change the plan or parameters of an instance. Unsupported unless overridden.
    async fn update_service_instance(
        &self,
        _request: &UpdateServiceInstanceRequest,
    ) -> Result<UpdateServiceInstanceResponse, ServiceBrokerError> {
        Err(ServiceBrokerError::Unsupported {
            operation: "update_service_instance",
        })
    }

    /// Deprovision a service instance.
    async fn delete_service_instance(
        &self,
        request: &DeleteServiceInstanceRequest,
    ) -> Result<DeleteServiceInstanceResponse, ServiceBrokerError>;

    /// Fetch a provisioned instance. Unsupported unless overridden.
    async fn get_service_instance(
        &self,
        _request: &GetServiceInstanceRequest,
    ) -> Result<GetServiceInstanceResponse, ServiceBrokerError> {
        Err(ServiceBrokerError::Unsupported {
            operation: "get_service_instance",
        })
    }

    /// Report the state of the last asynchronous instance operation.
    /// Unsupported unless overridden; brokers that answer `async = true` must override it.
    async fn get_last_operation(
        &self,
        _request: &GetLastServiceOperationRequest,
    ) -> Result<GetLastServiceOperationResponse, ServiceBrokerError> {
        Err(ServiceBrokerError::Unsupported {
            operation: "get_last_operation",
        })
    }
}

/// Broker-specific binding lifecycle.
#[async_trait]
pub trait ServiceInstanceBindingService: Send + Sync {
    /// Create a binding to an existing instance.
    async fn create_service_instance_binding(
        &self,
        request: &CreateServiceInstanceBindingRequest,
    ) -> Result<CreateServiceInstanceBindingResponse, ServiceBrokerError>;

    /// Delete a binding.
    async fn delete_service_instance_binding(
        &self,
        request: &DeleteServiceInstanceBindingRequest,
    ) -> Result<DeleteServiceInstanceBindingResponse, ServiceBrokerError>;

    /// Fetch an existing binding. Unsupported unless overridden.
    async fn get_service_instance_binding(
        &self,
        _request: &GetServiceInstanceBindingRequest,
    ) -> Result<GetServiceInstanceBindingResponse, ServiceBrokerError> {
        Err(ServiceBrokerError::Unsupported {
            operation: "get_service_instance_binding",
        })
    }

    /// Report the state of the last asynchronous binding operation.
    async fn get_last_operation(
        &self,
        _request: &GetLastServiceBindingOperationRequest,
    ) -> Result<GetLastServiceBindingOperationResponse, ServiceBrokerError> {
        Err(ServiceBrokerError::Unsupported {
            operation: "get_last_binding_operation",
        })
    }
}

/// Read access to the broker's catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// The full catalog advertised to platforms.
    async fn get_catalog(&self) -> Result<Catalog, ServiceBrokerError>;

    /// A single service offering by id, or `None` if it is not in the catalog.
    async fn get_service_definition(
        &self,
        service_definition_id: &str,
    ) -> Result<Option<ServiceDefinition>, ServiceBrokerError>;
}

/// Resolves the catalog entries a request refers to.
///
/// The transport layer calls this before building a request so hooks can read
/// the offering and plan without another lookup. `plan_id` is optional because
/// updates may omit it.
///
/// # Errors
///
/// Returns `ServiceDefinitionDoesNotExist` or `PlanDoesNotExist` when an id is
/// unknown, or whatever the catalog service itself fails with.
pub async fn resolve_catalog_entries(
    catalog: &dyn CatalogService,
    service_definition_id: &str,
    plan_id: Option<&str>,
) -> Result<(ServiceDefinition, Option<Plan>), ServiceBrokerError> {
    let service_definition = catalog
        .get_service_definition(service_definition_id)
        .await?
        .ok_or_else(|| ServiceBrokerError::ServiceDefinitionDoesNotExist {
            service_definition_id: service_definition_id.to_string(),
        })?;

    let plan = match plan_id {
        Some(plan_id) => Some(service_definition.find_plan(plan_id).cloned().ok_or_else(
            || ServiceBrokerError::PlanDoesNotExist {
                plan_id: plan_id.to_string(),
            },
        )?),
        None => None,
    };

    Ok((service_definition, plan))
}
