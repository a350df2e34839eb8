use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schedule::HOURS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    TaskDependent,
    ResourceDependent,
    LevelOfEffort,
    StartMilestone,
    FinishMilestone,
    WbsSummary,
}

impl TaskType {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "TT_Task" => TaskType::TaskDependent,
            "TT_Rsrc" => TaskType::ResourceDependent,
            "TT_LOE" => TaskType::LevelOfEffort,
            "TT_Mile" => TaskType::StartMilestone,
            "TT_FinMile" => TaskType::FinishMilestone,
            "TT_WBS" => TaskType::WbsSummary,
            other => {
                tracing::debug!("unknown task type token '{other}', defaulting to TT_Task");
                TaskType::TaskDependent
            }
        }
    }

    pub fn as_raw(&self) -> &'static str {
        match self {
            TaskType::TaskDependent => "TT_Task",
            TaskType::ResourceDependent => "TT_Rsrc",
            TaskType::LevelOfEffort => "TT_LOE",
            TaskType::StartMilestone => "TT_Mile",
            TaskType::FinishMilestone => "TT_FinMile",
            TaskType::WbsSummary => "TT_WBS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "TK_NotStart" => TaskStatus::NotStarted,
            "TK_Active" => TaskStatus::InProgress,
            "TK_Complete" => TaskStatus::Completed,
            other => {
                tracing::debug!("unknown task status token '{other}', defaulting to TK_NotStart");
                TaskStatus::NotStarted
            }
        }
    }

    pub fn as_raw(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "TK_NotStart",
            TaskStatus::InProgress => "TK_Active",
            TaskStatus::Completed => "TK_Complete",
        }
    }
}

/// One activity from the source export.
///
/// Descriptive fields are fixed by the builder; the early/late/float fields
/// are written once by the CPM engine during `Schedule::recalculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub wbs_id: Option<String>,
    pub task_code: String,
    pub name: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub percent_complete: f64,
    pub target_start: Option<NaiveDateTime>,
    pub target_end: Option<NaiveDateTime>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_end: Option<NaiveDateTime>,
    pub early_start: Option<NaiveDateTime>,
    pub early_end: Option<NaiveDateTime>,
    pub late_start: Option<NaiveDateTime>,
    pub late_end: Option<NaiveDateTime>,
    pub target_duration_hours: f64,
    pub remaining_duration_hours: f64,
    pub total_float_hours: Option<f64>,
    pub free_float_hours: Option<f64>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        task_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            wbs_id: None,
            task_code: task_code.into(),
            name: name.into(),
            task_type: TaskType::TaskDependent,
            status: TaskStatus::NotStarted,
            percent_complete: 0.0,
            target_start: None,
            target_end: None,
            actual_start: None,
            actual_end: None,
            early_start: None,
            early_end: None,
            late_start: None,
            late_end: None,
            target_duration_hours: 0.0,
            remaining_duration_hours: 0.0,
            total_float_hours: None,
            free_float_hours: None,
        }
    }

    /// Whole working days at the fixed 8-hour day, rounded down.
    pub fn duration_days(&self) -> i64 {
        (self.target_duration_hours / HOURS_PER_DAY).floor() as i64
    }

    /// Total float in whole working days, rounded down.
    pub fn float_days(&self) -> i64 {
        (self.total_float_hours.unwrap_or(0.0) / HOURS_PER_DAY).floor() as i64
    }

    /// Zero or negative total float puts the task on the critical path.
    pub fn is_critical(&self) -> bool {
        self.total_float_hours.map_or(false, |float| float <= 0.0)
    }

    pub fn is_milestone(&self) -> bool {
        matches!(
            self.task_type,
            TaskType::StartMilestone | TaskType::FinishMilestone
        )
    }
}
