use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::{hours, lag};
use crate::graph::schedule_dag::ScheduleDag;
use crate::relationship::RelationshipType;
use crate::schedule::Schedule;
use crate::task::Task;

/// Computes late start/end per task by walking the processing order in
/// reverse, anchoring open-ended tasks to the project finish.
pub struct BackwardPass<'a> {
    schedule: &'a Schedule,
    dag: &'a ScheduleDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(schedule: &'a Schedule, dag: &'a ScheduleDag) -> Self {
        Self { schedule, dag }
    }

    pub fn execute(
        &self,
        early: &HashMap<String, (NaiveDateTime, NaiveDateTime)>,
    ) -> HashMap<String, (NaiveDateTime, NaiveDateTime)> {
        let project_end = early
            .values()
            .map(|&(_, early_end)| early_end)
            .max()
            .unwrap_or_else(|| Utc::now().naive_utc());

        let tasks: HashMap<&str, &Task> = self
            .schedule
            .tasks
            .iter()
            .map(|task| (task.id.as_str(), task))
            .collect();

        let mut results: HashMap<String, (NaiveDateTime, NaiveDateTime)> =
            HashMap::with_capacity(self.schedule.tasks.len());

        for &node_ix in self.dag.order.iter().rev() {
            let task_id = self.dag.graph[node_ix].as_str();
            let Some(task) = tasks.get(task_id) else {
                continue;
            };
            let duration = hours(task.target_duration_hours);

            let mut late_finish = project_end;
            for edge in self.dag.graph.edges_directed(node_ix, Direction::Outgoing) {
                let succ_id = self.dag.graph[edge.target()].as_str();
                let Some(&(succ_late_start, succ_late_end)) = results.get(succ_id) else {
                    continue;
                };
                let link = edge.weight();
                // SF takes the successor's late end verbatim, with no
                // duration adjustment mirroring the forward pass.
                let candidate = match link.kind {
                    RelationshipType::FinishToStart => succ_late_start,
                    RelationshipType::StartToStart => succ_late_start + duration,
                    RelationshipType::FinishToFinish => succ_late_end,
                    RelationshipType::StartToFinish => succ_late_end,
                } - lag(link.lag_days);
                if candidate < late_finish {
                    late_finish = candidate;
                }
            }

            let late_start = late_finish - duration;
            results.insert(task.id.clone(), (late_start, late_finish));
        }

        results
    }
}
