//! Service instance requests and responses.
//!
//! Field names follow the OSB wire format. Identifiers the transport layer
//! takes from the path or query string (`service_instance_id`,
//! `async_accepted`) default when absent from a body.

use serde::{Deserialize, Serialize};

use super::AsyncResponse;
use crate::catalog::{Plan, ServiceDefinition};
use crate::context::{Context, PlatformMetadata};
use crate::types::{InstanceMetadata, MaintenanceInfo, Parameters, PreviousValues};

// ---------------------------------------------------------------------------
// Provision
// ---------------------------------------------------------------------------

/// Request to provision a new service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateServiceInstanceRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub organization_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub space_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<Context>,
    #[serde(skip_serializing_if = "Parameters::is_empty", default)]
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maintenance_info: Option<MaintenanceInfo>,
    /// Whether the platform accepts an asynchronous response.
    #[serde(default)]
    pub async_accepted: bool,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
    /// Resolved catalog entry for `service_definition_id`, if the transport looked it up.
    #[serde(skip)]
    pub service_definition: Option<ServiceDefinition>,
    /// Resolved catalog entry for `plan_id`.
    #[serde(skip)]
    pub plan: Option<Plan>,
}

impl CreateServiceInstanceRequest {
    #[must_use]
    pub fn new(
        service_instance_id: impl Into<String>,
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }
}

/// Result of provisioning a service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateServiceInstanceResponse {
    #[serde(rename = "async", default)]
    pub r#async: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dashboard_url: Option<String>,
    /// The instance already existed with identical attributes. Not an error.
    #[serde(skip)]
    pub instance_existed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<InstanceMetadata>,
}

impl CreateServiceInstanceResponse {
    /// A response for an instance that was provisioned synchronously.
    #[must_use]
    pub fn completed() -> Self {
        Self::default()
    }

    /// A response for a provision that continues in the background.
    #[must_use]
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            r#async: true,
            operation: Some(operation.into()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Request to change the plan or parameters of an existing instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateServiceInstanceRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    /// Target plan. Absent when only parameters change.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_values: Option<PreviousValues>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<Context>,
    #[serde(skip_serializing_if = "Parameters::is_empty", default)]
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maintenance_info: Option<MaintenanceInfo>,
    #[serde(default)]
    pub async_accepted: bool,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
    #[serde(skip)]
    pub service_definition: Option<ServiceDefinition>,
    #[serde(skip)]
    pub plan: Option<Plan>,
}

impl UpdateServiceInstanceRequest {
    #[must_use]
    pub fn new(
        service_instance_id: impl Into<String>,
        service_definition_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            service_definition_id: service_definition_id.into(),
            ..Self::default()
        }
    }

    /// Whether the request moves the instance to a different plan.
    #[must_use]
    pub fn changes_plan(&self) -> bool {
        match (&self.plan_id, &self.previous_values) {
            (Some(target), Some(previous)) => previous.plan_id.as_deref() != Some(target.as_str()),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Result of updating a service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateServiceInstanceResponse {
    #[serde(rename = "async", default)]
    pub r#async: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<InstanceMetadata>,
}

impl UpdateServiceInstanceResponse {
    #[must_use]
    pub fn completed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            r#async: true,
            operation: Some(operation.into()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Deprovision
// ---------------------------------------------------------------------------

/// Request to deprovision a service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteServiceInstanceRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    pub plan_id: String,
    #[serde(default)]
    pub async_accepted: bool,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
    #[serde(skip)]
    pub service_definition: Option<ServiceDefinition>,
    #[serde(skip)]
    pub plan: Option<Plan>,
}

impl DeleteServiceInstanceRequest {
    #[must_use]
    pub fn new(
        service_instance_id: impl Into<String>,
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }
}

/// Result of deprovisioning a service instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteServiceInstanceResponse {
    #[serde(rename = "async", default)]
    pub r#async: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
}

impl DeleteServiceInstanceResponse {
    #[must_use]
    pub fn completed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            r#async: true,
            operation: Some(operation.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Request to fetch a provisioned service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetServiceInstanceRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
}

impl GetServiceInstanceRequest {
    #[must_use]
    pub fn new(service_instance_id: impl Into<String>) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            ..Self::default()
        }
    }
}

/// A provisioned service instance as reported by the broker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetServiceInstanceResponse {
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Parameters::is_empty", default)]
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maintenance_info: Option<MaintenanceInfo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<InstanceMetadata>,
}

// ---------------------------------------------------------------------------
// AsyncResponse impls
// ---------------------------------------------------------------------------

macro_rules! async_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl AsyncResponse for $ty {
                fn is_async(&self) -> bool {
                    self.r#async
                }

                fn operation(&self) -> Option<&str> {
                    self.operation.as_deref()
                }
            }
        )+
    };
}

async_response!(
    CreateServiceInstanceResponse,
    UpdateServiceInstanceResponse,
    DeleteServiceInstanceResponse,
);
