//! DCMA-style schedule quality panel.
//!
//! Eleven of the DCMA fourteen points are computable from an export alone;
//! the hard-constraint check needs constraint data the formats do not carry
//! and is reported as not-applicable.

use serde::{Deserialize, Serialize};

use super::ScheduleAnalyzer;
use crate::relationship::RelationshipType;

/// Float and duration ceiling used by the high-float and high-duration
/// checks, in working days.
const HIGH_DAYS: i64 = 44;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcmaCheck {
    pub name: String,
    pub description: String,
    pub threshold: f64,
    /// None when the check is not computable from the available data.
    pub actual_value: Option<f64>,
    pub passed: bool,
}

impl DcmaCheck {
    fn new(
        name: &str,
        description: impl Into<String>,
        threshold: f64,
        actual_value: f64,
        passed: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.into(),
            threshold,
            actual_value: Some(actual_value),
            passed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcmaAssessment {
    pub checks: Vec<DcmaCheck>,
    /// Passed checks over total checks, as a percentage.
    pub overall_score: f64,
}

fn percentage(count: usize, total: usize) -> f64 {
    count as f64 / total.max(1) as f64 * 100.0
}

impl<'a> ScheduleAnalyzer<'a> {
    pub fn dcma_assessment(&self) -> DcmaAssessment {
        let schedule = self.schedule();
        let task_count = schedule.tasks.len();
        let relationship_count = schedule.relationships.len();
        let logic = self.logic_check();

        let mut checks = Vec::with_capacity(11);

        let logic_ratio = relationship_count as f64 / task_count.max(1) as f64;
        checks.push(DcmaCheck::new(
            "Logic",
            "Relationships per task; schedules need enough logic to drive dates",
            1.5,
            logic_ratio,
            logic_ratio >= 1.5,
        ));

        let leads = schedule
            .relationships
            .iter()
            .filter(|rel| rel.lag_days < 0.0)
            .count();
        let leads_pct = percentage(leads, relationship_count);
        checks.push(DcmaCheck::new(
            "Leads",
            "Share of relationships with negative lag",
            5.0,
            leads_pct,
            leads_pct < 5.0,
        ));

        let lags = schedule
            .relationships
            .iter()
            .filter(|rel| rel.lag_days > 0.0)
            .count();
        let lags_pct = percentage(lags, relationship_count);
        checks.push(DcmaCheck::new(
            "Lags",
            "Share of relationships with positive lag",
            5.0,
            lags_pct,
            lags_pct < 5.0,
        ));

        let non_fs = schedule
            .relationships
            .iter()
            .filter(|rel| rel.kind != RelationshipType::FinishToStart)
            .count();
        let non_fs_pct = percentage(non_fs, relationship_count);
        checks.push(DcmaCheck::new(
            "Relationship Types",
            "Share of relationships that are not finish-to-start",
            10.0,
            non_fs_pct,
            non_fs_pct < 10.0,
        ));

        checks.push(DcmaCheck {
            name: "Hard Constraints".to_string(),
            description: "Constraint data is not present in the export; not assessed".to_string(),
            threshold: 5.0,
            actual_value: None,
            passed: true,
        });

        let high_float = schedule
            .tasks
            .iter()
            .filter(|task| task.float_days() > HIGH_DAYS)
            .count();
        let high_float_pct = percentage(high_float, task_count);
        checks.push(DcmaCheck::new(
            "High Float",
            format!("Share of tasks with more than {HIGH_DAYS} days of total float"),
            5.0,
            high_float_pct,
            high_float_pct < 5.0,
        ));

        let negative_float = schedule
            .tasks
            .iter()
            .filter(|task| task.total_float_hours.unwrap_or(0.0) < 0.0)
            .count();
        let negative_float_pct = percentage(negative_float, task_count);
        checks.push(DcmaCheck::new(
            "Negative Float",
            "Share of tasks with negative total float",
            0.0,
            negative_float_pct,
            negative_float == 0,
        ));

        let high_duration = schedule
            .tasks
            .iter()
            .filter(|task| task.duration_days() > HIGH_DAYS)
            .count();
        let high_duration_pct = percentage(high_duration, task_count);
        checks.push(DcmaCheck::new(
            "High Duration",
            format!("Share of tasks longer than {HIGH_DAYS} working days"),
            5.0,
            high_duration_pct,
            high_duration_pct < 5.0,
        ));

        let invalid_dates = schedule
            .tasks
            .iter()
            .filter(|task| match (task.actual_start, task.actual_end) {
                (Some(start), Some(end)) => end < start,
                _ => false,
            })
            .count();
        checks.push(DcmaCheck::new(
            "Invalid Dates",
            "Tasks whose actual finish precedes their actual start",
            0.0,
            invalid_dates as f64,
            invalid_dates == 0,
        ));

        let missing_pred_pct = percentage(logic.open_starts.len(), task_count);
        checks.push(DcmaCheck::new(
            "Missing Predecessors",
            "Share of non-milestone tasks with no incoming relationship",
            5.0,
            missing_pred_pct,
            missing_pred_pct < 5.0,
        ));

        let missing_succ_pct = percentage(logic.open_ends.len(), task_count);
        checks.push(DcmaCheck::new(
            "Missing Successors",
            "Share of non-milestone tasks with no outgoing relationship",
            5.0,
            missing_succ_pct,
            missing_succ_pct < 5.0,
        ));

        let passed = checks.iter().filter(|check| check.passed).count();
        let overall_score = percentage(passed, checks.len());

        DcmaAssessment {
            checks,
            overall_score,
        }
    }
}
