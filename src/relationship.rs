use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl RelationshipType {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "PR_FS" => RelationshipType::FinishToStart,
            "PR_SS" => RelationshipType::StartToStart,
            "PR_FF" => RelationshipType::FinishToFinish,
            "PR_SF" => RelationshipType::StartToFinish,
            other => {
                tracing::debug!("unknown relationship type token '{other}', defaulting to PR_FS");
                RelationshipType::FinishToStart
            }
        }
    }

    pub fn as_raw(&self) -> &'static str {
        match self {
            RelationshipType::FinishToStart => "PR_FS",
            RelationshipType::StartToStart => "PR_SS",
            RelationshipType::FinishToFinish => "PR_FF",
            RelationshipType::StartToFinish => "PR_SF",
        }
    }
}

/// Directed dependency edge between two tasks.
///
/// Identity is the whole tuple; the export has no surrogate key for edges.
/// Lag is stored in days (the XER field is hours, divided by 8 at build time);
/// a negative lag is a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub successor_task_id: String,
    pub predecessor_task_id: String,
    pub kind: RelationshipType,
    pub lag_days: f64,
}

impl Relationship {
    pub fn new(
        successor_task_id: impl Into<String>,
        predecessor_task_id: impl Into<String>,
        kind: RelationshipType,
        lag_days: f64,
    ) -> Self {
        Self {
            successor_task_id: successor_task_id.into(),
            predecessor_task_id: predecessor_task_id.into(),
            kind,
            lag_days,
        }
    }

    pub fn is_lead(&self) -> bool {
        self.lag_days < 0.0
    }
}
