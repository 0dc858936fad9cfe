//! Broker orchestration: runs the event flows around each service call.
//!
//! Every event-flow operation follows the same sequence:
//!
//! 1. **Initialization** hooks run concurrently. A failure skips the service.
//! 2. The user **service** is invoked with the request.
//! 3. **Completion** hooks run concurrently with the request and response.
//! 4. On success the response is returned unchanged.
//!
//! A failure at any of steps 1-3 runs the **error** hooks with the triggering
//! error and then returns that same error. Error hook failures are logged and
//! dropped.

use std::future::Future;
use std::sync::Arc;

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
use osb_core::{AsyncResponse, ServiceBrokerError};
use tracing::{info_span, Instrument, Span};

use super::operation::OperationKind;
use crate::flow::{EventFlowRegistries, EventFlowRegistry, FlowPhase};
use crate::traits::{ServiceInstanceBindingService, ServiceInstanceService};

/// Sequences event flows and user service calls for every broker operation.
pub struct BrokerOrchestrator {
    instance_service: Arc<dyn ServiceInstanceService>,
    binding_service: Arc<dyn ServiceInstanceBindingService>,
    registries: Arc<EventFlowRegistries>,
}

impl BrokerOrchestrator {
    #[must_use]
    pub fn new(
        instance_service: Arc<dyn ServiceInstanceService>,
        binding_service: Arc<dyn ServiceInstanceBindingService>,
        registries: Arc<EventFlowRegistries>,
    ) -> Self {
        Self {
            instance_service,
            binding_service,
            registries,
        }
    }

    /// Returns a shared reference to the event flow registries.
    #[must_use]
    pub fn registries(&self) -> Arc<EventFlowRegistries> {
        Arc::clone(&self.registries)
    }

    /// Provision a service instance.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the initialization hooks, the service, or
    /// the completion hooks, after the error hooks have run.
    pub async fn create_service_instance(
        &self,
        request: CreateServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, ServiceBrokerError> {
        let kind = OperationKind::CreateInstance;
        let span = operation_span(kind, &request.service_instance_id);
        let service = &self.instance_service;
        let response = execute(kind, self.registries.create_instance(), &request, || {
            service.create_service_instance(&request)
        })
        .instrument(span)
        .await?;
        check_async_contract(kind, &response);
        Ok(response)
    }

    /// Update a service instance.
    ///
    /// # Errors
    ///
    /// See [`Self::create_service_instance`].
    pub async fn update_service_instance(
        &self,
        request: UpdateServiceInstanceRequest,
    ) -> Result<UpdateServiceInstanceResponse, ServiceBrokerError> {
        let kind = OperationKind::UpdateInstance;
        let span = operation_span(kind, &request.service_instance_id);
        let service = &self.instance_service;
        let response = execute(kind, self.registries.update_instance(), &request, || {
            service.update_service_instance(&request)
        })
        .instrument(span)
        .await?;
        check_async_contract(kind, &response);
        Ok(response)
    }

    /// Deprovision a service instance.
    ///
    /// # Errors
    ///
    /// See [`Self::create_service_instance`].
    pub async fn delete_service_instance(
        &self,
        request: DeleteServiceInstanceRequest,
    ) -> Result<DeleteServiceInstanceResponse, ServiceBrokerError> {
        let kind = OperationKind::DeleteInstance;
        let span = operation_span(kind, &request.service_instance_id);
        let service = &self.instance_service;
        let response = execute(kind, self.registries.delete_instance(), &request, || {
            service.delete_service_instance(&request)
        })
        .instrument(span)
        .await?;
        check_async_contract(kind, &response);
        Ok(response)
    }

    /// Poll the last operation on a service instance.
    ///
    /// # Errors
    ///
    /// See [`Self::create_service_instance`].
    pub async fn get_last_operation(
        &self,
        request: GetLastServiceOperationRequest,
    ) -> Result<GetLastServiceOperationResponse, ServiceBrokerError> {
        let kind = OperationKind::LastOperation;
        let span = operation_span(kind, &request.service_instance_id);
        let service = &self.instance_service;
        execute(kind, self.registries.last_operation(), &request, || {
            service.get_last_operation(&request)
        })
        .instrument(span)
        .await
    }

    /// Fetch a service instance. No event flows run for fetches.
    ///
    /// # Errors
    ///
    /// Returns whatever the service fails with.
    pub async fn get_service_instance(
        &self,
        request: GetServiceInstanceRequest,
    ) -> Result<GetServiceInstanceResponse, ServiceBrokerError> {
        let span = operation_span(OperationKind::GetInstance, &request.service_instance_id);
        self.instance_service
            .get_service_instance(&request)
            .instrument(span)
            .await
    }

    /// Create a binding.
    ///
    /// # Errors
    ///
    /// See [`Self::create_service_instance`].
    pub async fn create_service_instance_binding(
        &self,
        request: CreateServiceInstanceBindingRequest,
    ) -> Result<CreateServiceInstanceBindingResponse, ServiceBrokerError> {
        let kind = OperationKind::CreateBinding;
        let span = operation_span(kind, &request.service_instance_id);
        span.record("binding_id", request.binding_id.as_str());
        let service = &self.binding_service;
        let response = execute(kind, self.registries.create_binding(), &request, || {
            service.create_service_instance_binding(&request)
        })
        .instrument(span)
        .await?;
        check_async_contract(kind, &response);
        Ok(response)
    }

    /// Delete a binding.
    ///
    /// # Errors
    ///
    /// See [`Self::create_service_instance`].
    pub async fn delete_service_instance_binding(
        &self,
        request: DeleteServiceInstanceBindingRequest,
    ) -> Result<DeleteServiceInstanceBindingResponse, ServiceBrokerError> {
        let kind = OperationKind::DeleteBinding;
        let span = operation_span(kind, &request.service_instance_id);
        span.record("binding_id", request.binding_id.as_str());
        let service = &self.binding_service;
        let response = execute(kind, self.registries.delete_binding(), &request, || {
            service.delete_service_instance_binding(&request)
        })
        .instrument(span)
        .await?;
        check_async_contract(kind, &response);
        Ok(response)
    }

    /// Fetch a binding. No event flows run for fetches.
    ///
    /// # Errors
    ///
    /// Returns whatever the service fails with.
    pub async fn get_service_instance_binding(
        &self,
        request: GetServiceInstanceBindingRequest,
    ) -> Result<GetServiceInstanceBindingResponse, ServiceBrokerError> {
        let span = operation_span(OperationKind::GetBinding, &request.service_instance_id);
        span.record("binding_id", request.binding_id.as_str());
        self.binding_service
            .get_service_instance_binding(&request)
            .instrument(span)
            .await
    }

    /// Poll the last operation on a binding.
    ///
    /// # Errors
    ///
    /// See [`Self::create_service_instance`].
    pub async fn get_last_binding_operation(
        &self,
        request: GetLastServiceBindingOperationRequest,
    ) -> Result<GetLastServiceBindingOperationResponse, ServiceBrokerError> {
        let kind = OperationKind::LastBindingOperation;
        let span = operation_span(kind, &request.service_instance_id);
        span.record("binding_id", request.binding_id.as_str());
        let service = &self.binding_service;
        execute(kind, self.registries.last_binding_operation(), &request, || {
            service.get_last_operation(&request)
        })
        .instrument(span)
        .await
    }
}

fn operation_span(kind: OperationKind, service_instance_id: &str) -> Span {
    info_span!(
        "broker_operation",
        operation = kind.as_str(),
        service_instance_id = service_instance_id,
        binding_id = tracing::field::Empty,
    )
}

/// Warns when a synchronous response carries an operation token. The
/// response is passed on untouched.
fn check_async_contract<R: AsyncResponse>(kind: OperationKind, response: &R) {
    if response.violates_async_contract() {
        tracing::warn!(
            operation = kind.as_str(),
            token = response.operation().unwrap_or_default(),
            "synchronous response carries an operation token"
        );
    } else {
        tracing::debug!(
            operation = kind.as_str(),
            is_async = response.is_async(),
            token = response.operation().unwrap_or_default(),
            "service accepted operation"
        );
    }
}

/// Runs one operation through initialization, invocation and completion,
/// falling back to the error flows on any failure.
async fn execute<Req, Res, F, Fut>(
    kind: OperationKind,
    registry: &EventFlowRegistry<Req, Res>,
    request: &Req,
    invoke: F,
) -> Result<Res, ServiceBrokerError>
where
    Req: Sync,
    Res: Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Res, ServiceBrokerError>>,
{
    let error = match run_phases(kind, registry, request, invoke).await {
        Ok(response) => return Ok(response),
        Err(error) => error,
    };

    tracing::debug!(
        operation = kind.as_str(),
        phase = FlowPhase::Error.as_str(),
        error = %error,
        "running error flows"
    );
    if let Err(hook_error) = registry.run_error_flows(request, &error).await {
        tracing::warn!(
            operation = kind.as_str(),
            error = %error,
            hook_error = %hook_error,
            "error flow failed while handling operation failure"
        );
    }

    Err(error)
}

async fn run_phases<Req, Res, F, Fut>(
    kind: OperationKind,
    registry: &EventFlowRegistry<Req, Res>,
    request: &Req,
    invoke: F,
) -> Result<Res, ServiceBrokerError>
where
    Req: Sync,
    Res: Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Res, ServiceBrokerError>>,
{
    registry.run_initialization_flows(request).await?;
    tracing::debug!(
        operation = kind.as_str(),
        phase = FlowPhase::Initialization.as_str(),
        "phase settled"
    );

    let response = invoke().await?;

    registry.run_completion_flows(request, &response).await?;
    tracing::debug!(
        operation = kind.as_str(),
        phase = FlowPhase::Completion.as_str(),
        "phase settled"
    );

    Ok(response)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
