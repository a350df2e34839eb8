//! Read-only analyses over a CPM-populated schedule.

pub mod dcma;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::relationship::Relationship;
use crate::schedule::Schedule;
use crate::task::TaskType;

pub use dcma::{DcmaAssessment, DcmaCheck};

/// Float bucket boundary, in working days.
pub const DEFAULT_FLOAT_THRESHOLD_DAYS: i64 = 5;

/// More concurrent assignments than this flags a resource as over-allocated.
pub const OVER_ALLOCATION_ASSIGNMENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPathSummary {
    /// Critical task ids ordered by target start, undated tasks last.
    pub task_ids: Vec<String>,
    pub total_duration_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatAnalysis {
    pub threshold_days: i64,
    pub high_float: Vec<String>,
    pub negative_float: Vec<String>,
    pub near_critical: Vec<String>,
    pub average_float_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicCheck {
    pub open_starts: Vec<String>,
    pub open_ends: Vec<String>,
    pub dangling: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUtilization {
    pub resource_id: String,
    pub resource_name: String,
    pub total_target_quantity: f64,
    pub assignment_count: usize,
    pub over_allocated: bool,
}

/// How to bucket tasks for grouped views. The activity-code variant carries
/// only the code-type id, so equality and hashing follow that id alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskGrouping {
    Wbs,
    ActivityCodeType(String),
}

pub struct ScheduleAnalyzer<'a> {
    schedule: &'a Schedule,
}

impl<'a> ScheduleAnalyzer<'a> {
    pub fn new(schedule: &'a Schedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &Schedule {
        self.schedule
    }

    pub fn critical_path(&self) -> CriticalPathSummary {
        let mut critical: Vec<(Option<NaiveDateTime>, &str, i64)> = self
            .schedule
            .tasks
            .iter()
            .filter(|task| task.is_critical())
            .map(|task| (task.target_start, task.id.as_str(), task.duration_days()))
            .collect();
        critical.sort_by_key(|&(start, _, _)| start.unwrap_or(NaiveDateTime::MAX));

        CriticalPathSummary {
            total_duration_days: critical.iter().map(|&(_, _, days)| days).sum(),
            task_ids: critical.into_iter().map(|(_, id, _)| id.to_string()).collect(),
        }
    }

    pub fn float_analysis(&self, threshold_days: i64) -> FloatAnalysis {
        let mut high_float = Vec::new();
        let mut negative_float = Vec::new();
        let mut near_critical = Vec::new();
        let mut float_sum = 0.0;

        for task in &self.schedule.tasks {
            let float_hours = task.total_float_hours.unwrap_or(0.0);
            let float_days = task.float_days();
            float_sum += float_hours;
            if float_days > threshold_days {
                high_float.push(task.id.clone());
            }
            if float_hours < 0.0 {
                negative_float.push(task.id.clone());
            }
            if float_days > 0 && float_days <= threshold_days {
                near_critical.push(task.id.clone());
            }
        }

        let average_float_hours = if self.schedule.tasks.is_empty() {
            0.0
        } else {
            float_sum / self.schedule.tasks.len() as f64
        };

        FloatAnalysis {
            threshold_days,
            high_float,
            negative_float,
            near_critical,
            average_float_hours,
        }
    }

    /// Open ends and edges whose endpoints never made it into the task set.
    pub fn logic_check(&self) -> LogicCheck {
        let task_ids = self.schedule.task_id_set();

        let mut open_starts = Vec::new();
        let mut open_ends = Vec::new();
        for task in &self.schedule.tasks {
            let has_predecessor = self
                .schedule
                .relationships
                .iter()
                .any(|rel| rel.successor_task_id == task.id);
            let has_successor = self
                .schedule
                .relationships
                .iter()
                .any(|rel| rel.predecessor_task_id == task.id);
            if !has_predecessor && task.task_type != TaskType::StartMilestone {
                open_starts.push(task.id.clone());
            }
            if !has_successor && task.task_type != TaskType::FinishMilestone {
                open_ends.push(task.id.clone());
            }
        }

        let dangling = self
            .schedule
            .relationships
            .iter()
            .filter(|rel| {
                !task_ids.contains(rel.successor_task_id.as_str())
                    || !task_ids.contains(rel.predecessor_task_id.as_str())
            })
            .cloned()
            .collect();

        LogicCheck {
            open_starts,
            open_ends,
            dangling,
        }
    }

    pub fn resource_loading(&self) -> Vec<ResourceUtilization> {
        self.schedule
            .resources
            .iter()
            .map(|resource| {
                let mut total_target_quantity = 0.0;
                let mut assignment_count = 0usize;
                for assignment in &self.schedule.assignments {
                    if assignment.resource_id == resource.id {
                        total_target_quantity += assignment.target_quantity;
                        assignment_count += 1;
                    }
                }
                ResourceUtilization {
                    resource_id: resource.id.clone(),
                    resource_name: resource.name.clone(),
                    total_target_quantity,
                    assignment_count,
                    over_allocated: assignment_count > OVER_ALLOCATION_ASSIGNMENTS,
                }
            })
            .collect()
    }

    /// Buckets task ids by group key; tasks outside every bucket land under
    /// the empty key.
    pub fn group_tasks(&self, grouping: &TaskGrouping) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        match grouping {
            TaskGrouping::Wbs => {
                for task in &self.schedule.tasks {
                    let key = task.wbs_id.clone().unwrap_or_default();
                    groups.entry(key).or_default().push(task.id.clone());
                }
            }
            TaskGrouping::ActivityCodeType(type_id) => {
                for task in &self.schedule.tasks {
                    let key = self
                        .schedule
                        .task_activity_codes
                        .iter()
                        .find(|code| code.task_id == task.id && code.type_id == *type_id)
                        .map(|code| code.code_id.clone())
                        .unwrap_or_default();
                    groups.entry(key).or_default().push(task.id.clone());
                }
            }
        }
        groups
    }
}
