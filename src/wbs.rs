use serde::{Deserialize, Serialize};

/// Work-breakdown-structure node. Forms a forest per project via `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WbsElement {
    pub id: String,
    pub project_id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub short_name: String,
    pub sequence_number: i64,
}

impl WbsElement {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
