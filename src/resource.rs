use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Labor,
    NonLabor,
    Material,
}

impl ResourceType {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "RT_Labor" => ResourceType::Labor,
            "RT_Equip" => ResourceType::NonLabor,
            "RT_Mat" => ResourceType::Material,
            other => {
                tracing::debug!("unknown resource type token '{other}', defaulting to RT_Labor");
                ResourceType::Labor
            }
        }
    }

    pub fn as_raw(&self) -> &'static str {
        match self {
            ResourceType::Labor => "RT_Labor",
            ResourceType::NonLabor => "RT_Equip",
            ResourceType::Material => "RT_Mat",
        }
    }
}

/// A person, crew, piece of equipment, or material pool, global to the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub short_name: String,
    pub name: String,
    pub resource_type: ResourceType,
    pub unit: Option<String>,
    pub default_units_per_time: f64,
}

impl Resource {
    pub fn new(id: impl Into<String>, short_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            name: name.into(),
            resource_type: ResourceType::Labor,
            unit: None,
            default_units_per_time: 1.0,
        }
    }
}

/// Assignment of a resource to a task. Identity is the (task, resource) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAssignment {
    pub task_id: String,
    pub resource_id: String,
    pub project_id: String,
    pub target_quantity: f64,
    pub actual_quantity: f64,
    pub remaining_quantity: f64,
    pub target_cost: f64,
    pub actual_cost: f64,
}
