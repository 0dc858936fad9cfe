//! Service instance binding requests and responses.

use serde::{Deserialize, Serialize};

use super::AsyncResponse;
use crate::catalog::{Plan, ServiceDefinition};
use crate::context::{Context, PlatformMetadata};
use crate::types::{BindResource, BindingMetadata, Endpoint, Parameters, VolumeMount};

// ---------------------------------------------------------------------------
// Binding payloads
// ---------------------------------------------------------------------------

/// Outcome of a create-binding call with respect to pre-existing bindings.
///
/// `ExistsWithIdenticalParameters` is a success: the platform answers 200
/// instead of 201.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BindingStatus {
    #[default]
    New,
    ExistsWithIdenticalParameters,
    ExistsWithDifferentParameters,
}

impl BindingStatus {
    #[must_use]
    pub fn binding_existed(self) -> bool {
        !matches!(self, Self::New)
    }
}

/// Credentials and connectivity handed to a bound application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppBinding {
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub credentials: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub syslog_drain_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub volume_mounts: Vec<VolumeMount>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub endpoints: Vec<Endpoint>,
}

/// Route service URL handed to the platform router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBinding {
    pub route_service_url: String,
}

/// What a binding grants. Flattened into the response body.
///
/// Route bindings are tried first when reading a body because every
/// application binding field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingKind {
    Route(RouteBinding),
    App(AppBinding),
}

impl Default for BindingKind {
    fn default() -> Self {
        Self::App(AppBinding::default())
    }
}

impl BindingKind {
    #[must_use]
    pub fn credentials(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Self::App(app) => Some(&app.credentials),
            Self::Route(_) => None,
        }
    }

    #[must_use]
    pub fn route_service_url(&self) -> Option<&str> {
        match self {
            Self::Route(route) => Some(&route.route_service_url),
            Self::App(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Bind
// ---------------------------------------------------------------------------

/// Request to create a binding to a service instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateServiceInstanceBindingRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(default)]
    pub binding_id: String,
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    pub plan_id: String,
    /// Superseded by `bind_resource.app_guid`, still sent by older platforms.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub app_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bind_resource: Option<BindResource>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<Context>,
    #[serde(skip_serializing_if = "Parameters::is_empty", default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub async_accepted: bool,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
    #[serde(skip)]
    pub service_definition: Option<ServiceDefinition>,
    #[serde(skip)]
    pub plan: Option<Plan>,
}

impl CreateServiceInstanceBindingRequest {
    #[must_use]
    pub fn new(
        service_instance_id: impl Into<String>,
        binding_id: impl Into<String>,
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            binding_id: binding_id.into(),
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }

    /// The bound application's GUID, from `bind_resource` or the legacy field.
    #[must_use]
    pub fn app_guid(&self) -> Option<&str> {
        self.bind_resource
            .as_ref()
            .and_then(|resource| resource.app_guid.as_deref())
            .or(self.app_guid.as_deref())
    }

    /// The bound route, if this is a route binding.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.bind_resource
            .as_ref()
            .and_then(|resource| resource.route.as_deref())
    }
}

/// Result of creating a binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateServiceInstanceBindingResponse {
    #[serde(rename = "async", default)]
    pub r#async: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
    #[serde(skip)]
    pub binding_status: BindingStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<BindingMetadata>,
    #[serde(flatten)]
    pub kind: BindingKind,
}

impl CreateServiceInstanceBindingResponse {
    /// A synchronous application binding carrying `credentials`.
    #[must_use]
    pub fn app(credentials: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            kind: BindingKind::App(AppBinding {
                credentials,
                ..AppBinding::default()
            }),
            ..Self::default()
        }
    }

    /// A synchronous route binding.
    #[must_use]
    pub fn route(route_service_url: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Route(RouteBinding {
                route_service_url: route_service_url.into(),
            }),
            ..Self::default()
        }
    }

    /// A binding that is still being created in the background.
    #[must_use]
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            r#async: true,
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, binding_status: BindingStatus) -> Self {
        self.binding_status = binding_status;
        self
    }

    #[must_use]
    pub fn binding_existed(&self) -> bool {
        self.binding_status.binding_existed()
    }
}

// ---------------------------------------------------------------------------
// Unbind
// ---------------------------------------------------------------------------

/// Request to delete a binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteServiceInstanceBindingRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(default)]
    pub binding_id: String,
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

impl DeleteServiceInstanceBindingRequest {
    #[must_use]
    pub fn new(
        service_instance_id: impl Into<String>,
        binding_id: impl Into<String>,
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            binding_id: binding_id.into(),
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }
}

/// Result of deleting a binding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteServiceInstanceBindingResponse {
    #[serde(rename = "async", default)]
    pub r#async: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation: Option<String>,
}

impl DeleteServiceInstanceBindingResponse {
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

/// Request to fetch an existing binding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetServiceInstanceBindingRequest {
    #[serde(default)]
    pub service_instance_id: String,
    #[serde(default)]
    pub binding_id: String,
    #[serde(flatten)]
    pub platform: PlatformMetadata,
}

impl GetServiceInstanceBindingRequest {
    #[must_use]
    pub fn new(service_instance_id: impl Into<String>, binding_id: impl Into<String>) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            binding_id: binding_id.into(),
            ..Self::default()
        }
    }
}

/// An existing binding as reported by the broker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetServiceInstanceBindingResponse {
    #[serde(skip_serializing_if = "Parameters::is_empty", default)]
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<BindingMetadata>,
    #[serde(flatten)]
    pub kind: BindingKind,
}

impl AsyncResponse for CreateServiceInstanceBindingResponse {
    fn is_async(&self) -> bool {
        self.r#async
    }

    fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

impl AsyncResponse for DeleteServiceInstanceBindingResponse {
    fn is_async(&self) -> bool {
        self.r#async
    }

    fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}
