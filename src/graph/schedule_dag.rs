use std::collections::{HashMap, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::relationship::RelationshipType;
use crate::schedule::Schedule;

#[derive(Debug, Clone, Copy)]
pub struct DependencyEdge {
    pub kind: RelationshipType,
    pub lag_days: f64,
}

/// Task dependency graph plus the traversal order both CPM passes share.
///
/// Nodes are added in task declaration order and the processing order is
/// derived with a queue seeded in that order, so repeated runs over the same
/// input visit tasks identically. Tasks caught in a cycle end up after the
/// acyclic portion, again in declaration order, and are processed once with
/// best-effort values.
pub struct ScheduleDag {
    pub graph: DiGraph<String, DependencyEdge>,
    pub id_to_index: HashMap<String, NodeIndex>,
    pub durations: HashMap<String, f64>,
    pub order: Vec<NodeIndex>,
    pub cyclic_node_count: usize,
}

impl ScheduleDag {
    pub fn build(schedule: &Schedule) -> Self {
        let mut graph: DiGraph<String, DependencyEdge> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut durations: HashMap<String, f64> = HashMap::new();

        for task in &schedule.tasks {
            let node_ix = graph.add_node(task.id.clone());
            id_to_index.insert(task.id.clone(), node_ix);
            durations.insert(task.id.clone(), task.target_duration_hours);
        }

        // Edges run predecessor -> successor. Edges naming unknown tasks stay
        // on the schedule for the logic check but cannot join the graph.
        for rel in &schedule.relationships {
            match (
                id_to_index.get(rel.predecessor_task_id.as_str()),
                id_to_index.get(rel.successor_task_id.as_str()),
            ) {
                (Some(&from), Some(&to)) => {
                    graph.add_edge(
                        from,
                        to,
                        DependencyEdge {
                            kind: rel.kind,
                            lag_days: rel.lag_days,
                        },
                    );
                }
                _ => {
                    tracing::debug!(
                        "relationship {} -> {} references an unknown task; excluded from CPM",
                        rel.predecessor_task_id,
                        rel.successor_task_id
                    );
                }
            }
        }

        let (order, cyclic_node_count) = Self::processing_order(&graph);

        Self {
            graph,
            id_to_index,
            durations,
            order,
            cyclic_node_count,
        }
    }

    /// Kahn's algorithm with a declaration-order queue. Nodes still holding
    /// indegree after the queue drains sit on a cycle or behind one; they are
    /// appended in declaration order so each is still visited exactly once.
    fn processing_order(graph: &DiGraph<String, DependencyEdge>) -> (Vec<NodeIndex>, usize) {
        let mut indegree: HashMap<NodeIndex, usize> = HashMap::with_capacity(graph.node_count());
        for node_ix in graph.node_indices() {
            indegree.insert(
                node_ix,
                graph.neighbors_directed(node_ix, Direction::Incoming).count(),
            );
        }

        let mut queue: VecDeque<NodeIndex> = graph
            .node_indices()
            .filter(|node_ix| indegree[node_ix] == 0)
            .collect();
        let mut order = Vec::with_capacity(graph.node_count());

        while let Some(node_ix) = queue.pop_front() {
            order.push(node_ix);
            for succ_ix in graph.neighbors_directed(node_ix, Direction::Outgoing) {
                if let Some(remaining) = indegree.get_mut(&succ_ix) {
                    *remaining -= 1;
                    if *remaining == 0 {
                        queue.push_back(succ_ix);
                    }
                }
            }
        }

        let mut cyclic = 0usize;
        if order.len() < graph.node_count() {
            for node_ix in graph.node_indices() {
                if indegree[&node_ix] > 0 {
                    order.push(node_ix);
                    cyclic += 1;
                }
            }
        }

        (order, cyclic)
    }
}
