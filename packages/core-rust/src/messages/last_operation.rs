//! Polling requests and results for asynchronous operations.

use serde::{Deserialize, Serialize};

use crate::context::PlatformMetadata;
use crate::state::OperationState;

/// Poll for the state of the last operation on a service instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetLastServiceOperationRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(rename = "service_id", skip_serializing_if = "Option::is_none", default)]
    pub service_definition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan_id: Option<String>,
    /// Token returned by the operation being polled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
}

impl GetLastServiceOperationRequest {
    #[must_use]
    pub fn new(service_instance_id: impl Into<String>) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

/// State of the last operation on a service instance.
///
/// `delete_operation` marks the result of a deprovision; together with
/// `Succeeded` it means the instance is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLastServiceOperationResponse {
    pub state: OperationState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub delete_operation: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instance_usable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub update_repeatable: Option<bool>,
}

impl GetLastServiceOperationResponse {
    #[must_use]
    pub fn new(state: OperationState) -> Self {
        Self {
            state,
            description: None,
            delete_operation: false,
            instance_usable: None,
            update_repeatable: None,
        }
    }

    /// Whether the polled resource has been deleted.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.delete_operation && self.state == OperationState::Succeeded
    }
}

/// Poll for the state of the last operation on a binding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetLastServiceBindingOperationRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(default)]
    pub binding_id: String,
    #[serde(rename = "service_id", skip_serializing_if = "Option::is_none", default)]
    pub service_definition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
}

impl GetLastServiceBindingOperationRequest {
    #[must_use]
    pub fn new(service_instance_id: impl Into<String>, binding_id: impl Into<String>) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            binding_id: binding_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

/// State of the last operation on a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLastServiceBindingOperationResponse {
    pub state: OperationState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub delete_operation: bool,
}

impl GetLastServiceBindingOperationResponse {
    #[must_use]
    pub fn new(state: OperationState) -> Self {
        Self {
            state,
            description: None,
            delete_operation: false,
        }
    }

    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.delete_operation && self.state == OperationState::Succeeded
    }
}
