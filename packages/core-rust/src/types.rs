use serde::{Deserialize, Serialize};

/// Free-form configuration parameters supplied by the platform user.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Maintenance version of a plan or service instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaintenanceInfo {
    /// Semantic version string.
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

/// Values an instance had before an update request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviousValues {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub space_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maintenance_info: Option<MaintenanceInfo>,
}

/// Resource a binding is created for: an application, a route, or neither.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BindResource {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub app_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub route: Option<String>,
    /// Platform-specific extra fields.
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// Labels and attributes attached to a provisioned instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceMetadata {
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub labels: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Credential lifetime hints attached to a binding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BindingMetadata {
    /// RFC 3339 timestamp after which the credentials stop working.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<String>,
    /// RFC 3339 timestamp after which the platform should rotate the binding.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub renew_before: Option<String>,
}

/// Volume service mount returned by an application binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub driver: String,
    pub container_dir: String,
    /// `"r"` or `"rw"`.
    pub mode: String,
    pub device_type: String,
    pub device: serde_json::Value,
}

/// Network endpoint the bound application may need to reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub protocol: Option<String>,
}
