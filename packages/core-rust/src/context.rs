use serde::{Deserialize, Serialize};

/// Platform-supplied context object, passed through without interpretation.
///
/// Cloud Foundry sends `organization_guid`/`space_guid`, Kubernetes sends
/// `namespace`/`clusterid`; both land in `properties`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Context {
    /// Platform discriminator, e.g. `"cloudfoundry"` or `"kubernetes"`.
    pub platform: String,
    /// Every other field of the context object.
    #[serde(flatten)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Context {
    /// Creates an empty context for the given platform.
    #[must_use]
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            properties: serde_json::Map::new(),
        }
    }

    /// Adds a property, replacing any previous value under the same key.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Looks up a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

/// Per-request platform metadata carried by every broker request.
///
/// Populated by the transport layer from path segments and `X-Broker-API-*`
/// headers. Threaded through the hook pipeline for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformMetadata {
    /// Identifier of the platform instance, for brokers serving several platforms.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub platform_instance_id: Option<String>,
    /// Location of the platform's API info endpoint.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub api_info_location: Option<String>,
    /// Identity of the end user that triggered the request.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub originating_identity: Option<Context>,
    /// Platform-assigned request identifier for correlation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_identity: Option<String>,
}
