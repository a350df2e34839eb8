use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::activity_code::{ActivityCode, ActivityCodeType, TaskActivityCode};
use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::forward_pass::ForwardPass;
use crate::calendar::{CalendarException, WorkCalendar};
use crate::graph::schedule_dag::ScheduleDag;
use crate::project::Project;
use crate::relationship::Relationship;
use crate::resource::{Resource, ResourceAssignment};
use crate::task::Task;
use crate::wbs::WbsElement;

/// Fixed working-day length used for all hour/day conversions. Calendars are
/// stored on the schedule but never consulted here.
pub const HOURS_PER_DAY: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    MissingHeader,
    OrphanTask,
    DuplicateTaskId,
    GraphCycle,
}

/// A within-document anomaly the builder or engine tolerated. Never a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Counts reported by `Schedule::recalculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalcSummary {
    pub task_count: usize,
    pub critical_count: usize,
    pub latest_early_end: Option<NaiveDateTime>,
}

/// The normalized in-memory model: every entity parsed from the export plus
/// the diagnostics accumulated while building it.
///
/// Tasks keep their declaration order from the source; the CPM traversal
/// follows that order, so repeated parses of the same bytes produce identical
/// computed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub projects: Vec<Project>,
    pub wbs_elements: Vec<WbsElement>,
    pub tasks: Vec<Task>,
    pub relationships: Vec<Relationship>,
    pub resources: Vec<Resource>,
    pub assignments: Vec<ResourceAssignment>,
    pub calendars: Vec<WorkCalendar>,
    pub calendar_exceptions: Vec<CalendarException>,
    pub activity_code_types: Vec<ActivityCodeType>,
    pub activity_codes: Vec<ActivityCode>,
    pub task_activity_codes: Vec<TaskActivityCode>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn resource_by_id(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.id == id)
    }

    /// Id set of all tasks, for membership checks against relationship ends.
    pub fn task_id_set(&self) -> HashSet<&str> {
        self.tasks.iter().map(|task| task.id.as_str()).collect()
    }

    pub fn push_diagnostic(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(kind, message));
    }

    /// Runs the forward and backward CPM passes and writes early/late dates
    /// and total float into the task records. This is the single computed-field
    /// write pass; afterwards the schedule is handed to the analyzer read-only.
    pub fn recalculate(&mut self) -> RecalcSummary {
        let dag = ScheduleDag::build(self);

        if dag.cyclic_node_count > 0 {
            tracing::warn!(
                "dependency graph contains a cycle; {} task(s) scheduled best-effort",
                dag.cyclic_node_count
            );
            self.push_diagnostic(
                DiagnosticKind::GraphCycle,
                format!(
                    "dependency graph contains a cycle; {} task(s) scheduled best-effort",
                    dag.cyclic_node_count
                ),
            );
        }

        let early = ForwardPass::new(self, &dag).execute();
        let late = BackwardPass::new(self, &dag).execute(&early);

        let mut critical_count = 0usize;
        let mut latest_early_end: Option<NaiveDateTime> = None;
        for task in &mut self.tasks {
            if let Some(&(early_start, early_end)) = early.get(task.id.as_str()) {
                task.early_start = Some(early_start);
                task.early_end = Some(early_end);
                latest_early_end = Some(match latest_early_end {
                    Some(current) if current >= early_end => current,
                    _ => early_end,
                });
            }
            if let Some(&(late_start, late_end)) = late.get(task.id.as_str()) {
                task.late_start = Some(late_start);
                task.late_end = Some(late_end);
            }
            if let (Some(late_start), Some(early_start)) = (task.late_start, task.early_start) {
                let float_hours = (late_start - early_start).num_seconds() as f64 / 3600.0;
                task.total_float_hours = Some(float_hours);
                if float_hours <= 0.0 {
                    critical_count += 1;
                }
            }
        }

        RecalcSummary {
            task_count: self.tasks.len(),
            critical_count,
            latest_early_end,
        }
    }
}
