use std::collections::HashMap;

use chrono::NaiveDateTime;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::{early_sentinel, hours, lag};
use crate::graph::schedule_dag::ScheduleDag;
use crate::relationship::RelationshipType;
use crate::schedule::Schedule;
use crate::task::Task;

/// Computes early start/end per task by walking the dependency graph in
/// processing order, so every predecessor is settled before its successors
/// (cycles excepted, where earlier best-effort values are used as-is).
pub struct ForwardPass<'a> {
    schedule: &'a Schedule,
    dag: &'a ScheduleDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(schedule: &'a Schedule, dag: &'a ScheduleDag) -> Self {
        Self { schedule, dag }
    }

    pub fn execute(&self) -> HashMap<String, (NaiveDateTime, NaiveDateTime)> {
        let tasks: HashMap<&str, &Task> = self
            .schedule
            .tasks
            .iter()
            .map(|task| (task.id.as_str(), task))
            .collect();

        let mut results: HashMap<String, (NaiveDateTime, NaiveDateTime)> =
            HashMap::with_capacity(self.schedule.tasks.len());

        for &node_ix in &self.dag.order {
            let task_id = self.dag.graph[node_ix].as_str();
            let Some(task) = tasks.get(task_id) else {
                continue;
            };
            let duration = hours(task.target_duration_hours);

            let mut early_start = task.target_start.unwrap_or_else(early_sentinel);
            for edge in self.dag.graph.edges_directed(node_ix, Direction::Incoming) {
                let pred_id = self.dag.graph[edge.source()].as_str();
                let Some(&(pred_start, pred_end)) = results.get(pred_id) else {
                    continue;
                };
                let link = edge.weight();
                let candidate = match link.kind {
                    RelationshipType::FinishToStart => pred_end,
                    RelationshipType::StartToStart => pred_start,
                    RelationshipType::FinishToFinish => pred_end - duration,
                    RelationshipType::StartToFinish => pred_start - duration,
                } + lag(link.lag_days);
                if candidate > early_start {
                    early_start = candidate;
                }
            }

            let early_end = early_start + duration;
            results.insert(task.id.clone(), (early_start, early_end));
        }

        results
    }
}
