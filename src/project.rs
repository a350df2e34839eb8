use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Top-level container from the PROJECT table. Every task belongs to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub short_name: String,
    pub name: String,
    pub plan_start: Option<NaiveDateTime>,
    pub plan_end: Option<NaiveDateTime>,
    pub data_date: Option<NaiveDateTime>,
}

impl Project {
    pub fn new(id: impl Into<String>, short_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            short_name: short_name.into(),
            name: name.into(),
            plan_start: None,
            plan_end: None,
            data_date: None,
        }
    }
}
