//! Minimal catalog references.
//!
//! Only the fields hooks and the resolution helpers need. Schemas, dashboard
//! clients and the rest of the catalog document belong to the catalog layer.

use serde::{Deserialize, Serialize};

use crate::types::MaintenanceInfo;

/// The catalog of service offerings advertised by the broker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<ServiceDefinition>,
}

impl Catalog {
    /// Finds a service offering by its id.
    #[must_use]
    pub fn find_service(&self, service_definition_id: &str) -> Option<&ServiceDefinition> {
        self.services
            .iter()
            .find(|service| service.id == service_definition_id)
    }
}

/// A service offering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    #[serde(default)]
    pub plan_updateable: bool,
    #[serde(default)]
    pub instances_retrievable: bool,
    #[serde(default)]
    pub bindings_retrievable: bool,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ServiceDefinition {
    /// Finds one of this offering's plans by id.
    #[must_use]
    pub fn find_plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

/// A plan of a service offering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_free")]
    pub free: bool,
    /// Overrides the offering's `bindable` flag when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bindable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maintenance_info: Option<MaintenanceInfo>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

fn default_free() -> bool {
    true
}
