use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityCodeScope {
    Global,
    Eps,
    Project,
}

impl ActivityCodeScope {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "AS_Global" => ActivityCodeScope::Global,
            "AS_EPS" => ActivityCodeScope::Eps,
            "AS_Project" => ActivityCodeScope::Project,
            other => {
                tracing::debug!("unknown code scope token '{other}', defaulting to AS_Project");
                ActivityCodeScope::Project
            }
        }
    }

    pub fn as_raw(&self) -> &'static str {
        match self {
            ActivityCodeScope::Global => "AS_Global",
            ActivityCodeScope::Eps => "AS_EPS",
            ActivityCodeScope::Project => "AS_Project",
        }
    }
}

/// A category of activity codes, e.g. "Phase" or "Responsibility".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCodeType {
    pub id: String,
    pub name: String,
    pub short_length: i64,
    pub sequence_number: i64,
    pub project_id: Option<String>,
    pub scope: ActivityCodeScope,
}

/// A value within an activity-code type; may nest via `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCode {
    pub id: String,
    pub type_id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub short_name: String,
    pub sequence_number: i64,
    pub color: Option<String>,
}

/// Assignment of a code value to a task. Identity is the (task, code) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskActivityCode {
    pub task_id: String,
    pub code_id: String,
    pub type_id: String,
    pub project_id: String,
}
