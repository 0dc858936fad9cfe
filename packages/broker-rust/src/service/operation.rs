//! Typed broker operations dispatched through the pipeline.

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

/// The broker operations, named for logs and spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateInstance,
    UpdateInstance,
    DeleteInstance,
    GetInstance,
    LastOperation,
    CreateBinding,
    DeleteBinding,
    GetBinding,
    LastBindingOperation,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateInstance => "create_service_instance",
            Self::UpdateInstance => "update_service_instance",
            Self::DeleteInstance => "delete_service_instance",
            Self::GetInstance => "get_service_instance",
            Self::LastOperation => "get_last_operation",
            Self::CreateBinding => "create_service_instance_binding",
            Self::DeleteBinding => "delete_service_instance_binding",
            Self::GetBinding => "get_service_instance_binding",
            Self::LastBindingOperation => "get_last_binding_operation",
        }
    }

    /// Fetches and last-operation polls. They never change broker state.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Self::GetInstance | Self::LastOperation | Self::GetBinding | Self::LastBindingOperation
        )
    }
}

/// An inbound broker request, one variant per operation.
#[derive(Debug, Clone)]
pub enum BrokerRequest {
    CreateInstance(Box<CreateServiceInstanceRequest>),
    UpdateInstance(Box<UpdateServiceInstanceRequest>),
    DeleteInstance(Box<DeleteServiceInstanceRequest>),
    GetInstance(GetServiceInstanceRequest),
    LastOperation(GetLastServiceOperationRequest),
    CreateBinding(Box<CreateServiceInstanceBindingRequest>),
    DeleteBinding(Box<DeleteServiceInstanceBindingRequest>),
    GetBinding(GetServiceInstanceBindingRequest),
    LastBindingOperation(GetLastServiceBindingOperationRequest),
}

impl BrokerRequest {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateInstance(_) => OperationKind::CreateInstance,
            Self::UpdateInstance(_) => OperationKind::UpdateInstance,
            Self::DeleteInstance(_) => OperationKind::DeleteInstance,
            Self::GetInstance(_) => OperationKind::GetInstance,
            Self::LastOperation(_) => OperationKind::LastOperation,
            Self::CreateBinding(_) => OperationKind::CreateBinding,
            Self::DeleteBinding(_) => OperationKind::DeleteBinding,
            Self::GetBinding(_) => OperationKind::GetBinding,
            Self::LastBindingOperation(_) => OperationKind::LastBindingOperation,
        }
    }

    #[must_use]
    pub fn service_instance_id(&self) -> &str {
        match self {
            Self::CreateInstance(r) => &r.service_instance_id,
            Self::UpdateInstance(r) => &r.service_instance_id,
            Self::DeleteInstance(r) => &r.service_instance_id,
            Self::GetInstance(r) => &r.service_instance_id,
            Self::LastOperation(r) => &r.service_instance_id,
            Self::CreateBinding(r) => &r.service_instance_id,
            Self::DeleteBinding(r) => &r.service_instance_id,
            Self::GetBinding(r) => &r.service_instance_id,
            Self::LastBindingOperation(r) => &r.service_instance_id,
        }
    }

    /// Binding id for binding operations.
    #[must_use]
    pub fn binding_id(&self) -> Option<&str> {
        match self {
            Self::CreateBinding(r) => Some(&r.binding_id),
            Self::DeleteBinding(r) => Some(&r.binding_id),
            Self::GetBinding(r) => Some(&r.binding_id),
            Self::LastBindingOperation(r) => Some(&r.binding_id),
            _ => None,
        }
    }
}

/// Successful result of a broker request, matching the request variant.
#[derive(Debug, Clone)]
pub enum BrokerResponse {
    CreateInstance(CreateServiceInstanceResponse),
    UpdateInstance(UpdateServiceInstanceResponse),
    DeleteInstance(DeleteServiceInstanceResponse),
    GetInstance(GetServiceInstanceResponse),
    LastOperation(GetLastServiceOperationResponse),
    CreateBinding(CreateServiceInstanceBindingResponse),
    DeleteBinding(DeleteServiceInstanceBindingResponse),
    GetBinding(GetServiceInstanceBindingResponse),
    LastBindingOperation(GetLastServiceBindingOperationResponse),
}

impl BrokerResponse {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateInstance(_) => OperationKind::CreateInstance,
            Self::UpdateInstance(_) => OperationKind::UpdateInstance,
            Self::DeleteInstance(_) => OperationKind::DeleteInstance,
            Self::GetInstance(_) => OperationKind::GetInstance,
            Self::LastOperation(_) => OperationKind::LastOperation,
            Self::CreateBinding(_) => OperationKind::CreateBinding,
            Self::DeleteBinding(_) => OperationKind::DeleteBinding,
            Self::GetBinding(_) => OperationKind::GetBinding,
            Self::LastBindingOperation(_) => OperationKind::LastBindingOperation,
        }
    }
}
