//! Graph tracker: vertex status, traversal focus, the queue / stack / PQ
//! line, distance or key arrays and the final edge set.

use log::debug;

use dsviz_api_core::{
    EngineRequest, EngineResponse, EntityStatus, FinalResult, GraphAlgorithm, GraphRequest,
    Metric, PqEntry, Snapshot, StepRecord, StructureKind,
};

use super::{AuxDisplay, Narration, VisualState, VisualStateTracker};

#[derive(Debug, Clone, Default)]
pub struct GraphTracker {
    state: VisualState<u32>,
    algorithm: Option<GraphAlgorithm>,
    vertex_count: usize,
}

impl GraphTracker {
    /// Algorithm of the run being (or last) replayed.
    pub fn algorithm(&self) -> Option<GraphAlgorithm> {
        self.algorithm
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn clear_run(&mut self) {
        self.state.clear();
        self.algorithm = None;
    }

    fn observe(&mut self, snapshot: &Snapshot) {
        if let Snapshot::Graph(graph) = snapshot {
            self.vertex_count = graph.vertex_count;
        }
        let n = self.vertex_count;
        self.state.purge(|v| (*v as usize) < n);
    }

    // Records from a response without a known request still say which
    // algorithm produced them.
    fn algorithm_for(&self, step: &StepRecord) -> Option<GraphAlgorithm> {
        if self.algorithm.is_some() {
            return self.algorithm;
        }
        match step {
            StepRecord::VisitStart { .. }
            | StepRecord::Enqueue { .. }
            | StepRecord::Dequeue { .. } => Some(GraphAlgorithm::Bfs),
            StepRecord::PushStart { .. }
            | StepRecord::Push { .. }
            | StepRecord::Visit { .. }
            | StepRecord::Pop { .. }
            | StepRecord::PopBacktrack { .. } => Some(GraphAlgorithm::Dfs),
            StepRecord::Relax { .. } => Some(GraphAlgorithm::Dijkstra),
            StepRecord::KeyUpdate { .. } => Some(GraphAlgorithm::Prims),
            StepRecord::InitStart { key, .. } | StepRecord::ExtractMin { key, .. } => {
                if key.is_some() {
                    Some(GraphAlgorithm::Prims)
                } else {
                    Some(GraphAlgorithm::Dijkstra)
                }
            }
            _ => None,
        }
    }

    fn update_aux(&mut self, step: &StepRecord, algorithm: Option<GraphAlgorithm>) {
        let label = |suffix: &str| {
            let name = algorithm.map_or("Queue/Stack/PQ", GraphAlgorithm::label);
            format!("{name} {suffix}")
        };
        let aux = match step {
            StepRecord::VisitStart { queue, .. }
            | StepRecord::Enqueue { queue, .. }
            | StepRecord::Dequeue { queue, .. } => {
                AuxDisplay::new(label("Queue"), queue.iter().map(u32::to_string).collect())
            }
            StepRecord::PushStart { stack, .. }
            | StepRecord::Push { stack, .. }
            | StepRecord::Visit { stack, .. }
            | StepRecord::Pop { stack, .. }
            | StepRecord::PopBacktrack { stack, .. } => {
                AuxDisplay::new(label("Stack"), stack.iter().map(u32::to_string).collect())
            }
            StepRecord::InitStart { pq, .. }
            | StepRecord::ExtractMin { pq, .. }
            | StepRecord::Relax { pq, .. }
            | StepRecord::KeyUpdate { pq, .. } => {
                AuxDisplay::new(label("PQ"), pq.iter().map(pq_item).collect())
            }
            _ => return,
        };
        self.state.aux = Some(aux);
    }
}

fn pq_item(entry: &PqEntry) -> String {
    format!("{}({})", entry.vertex, entry.priority)
}

fn metric_at(metrics: Option<&[Metric]>, index: u32) -> String {
    metrics
        .and_then(|m| m.get(index as usize))
        .map_or_else(|| "?".to_string(), Metric::to_string)
}

impl VisualStateTracker for GraphTracker {
    type Id = u32;

    fn kind(&self) -> StructureKind {
        StructureKind::Graph
    }

    fn state(&self) -> &VisualState<u32> {
        &self.state
    }

    fn begin_operation(&mut self, request: &EngineRequest, response: &EngineResponse) {
        match request {
            EngineRequest::Graph(GraphRequest::Run { algorithm, .. }) => {
                self.clear_run();
                self.algorithm = Some(*algorithm);
                self.state.semantics = algorithm.edge_semantics();
            }
            EngineRequest::Graph(GraphRequest::Init { .. }) => self.clear_run(),
            _ => {}
        }
        self.state.concluded = false;
        self.observe(&response.snapshot);
    }

    fn apply_step(&mut self, step: &StepRecord) -> Option<Narration> {
        if !self.state.admit(step) {
            return None;
        }
        match step {
            StepRecord::FinalResult(result) => return self.apply_final(result),
            StepRecord::Note { text } => return Some(Narration::detail(text.clone())),
            StepRecord::Unknown => {
                debug!("graph tracker: ignoring unknown step");
                return None;
            }
            _ => {}
        }

        let n = self.vertex_count;
        for mark in step.marks() {
            if (mark.vertex as usize) < n {
                self.state.mark(mark.vertex, mark.status);
            }
        }
        self.state.focus = step.vertex().filter(|v| (*v as usize) < n);
        self.state.active_edge = match step {
            StepRecord::Enqueue { edge, .. } | StepRecord::Push { edge, .. } => *edge,
            StepRecord::Relax { edge, .. } | StepRecord::KeyUpdate { edge, .. } => Some(*edge),
            _ => None,
        };

        let algorithm = self.algorithm_for(step);
        self.update_aux(step, algorithm);
        if let Some(metrics) = step.metrics() {
            self.state.metrics = Some(metrics.to_vec());
        }

        let label = algorithm.map_or("GRAPH", GraphAlgorithm::label);
        let array = if algorithm == Some(GraphAlgorithm::Prims) {
            "key"
        } else {
            "dist"
        };
        let text = match step {
            StepRecord::Dequeue { vertex, .. } => {
                format!("BFS: Dequeued node {vertex}. Visiting neighbors.")
            }
            StepRecord::Enqueue { vertex, .. } => format!("BFS: Enqueued neighbor {vertex}."),
            StepRecord::Visit { vertex, .. } => {
                format!("DFS: Visiting node {vertex}. Pushed next neighbor.")
            }
            StepRecord::Pop { vertex, .. } | StepRecord::PopBacktrack { vertex, .. } => {
                format!("DFS: Pop/Backtracking from node {vertex}.")
            }
            StepRecord::ExtractMin { vertex, .. } => {
                format!("{label}: Extracted minimum {array} node {vertex}.")
            }
            StepRecord::Relax { edge, dist, .. } => format!(
                "{label}: Relaxed edge {} -> {}. New {array}: {}",
                edge.0,
                edge.1,
                metric_at(Some(dist), edge.1)
            ),
            StepRecord::KeyUpdate { edge, key, .. } => format!(
                "{label}: Updated Key edge {} -> {}. New {array}: {}",
                edge.0,
                edge.1,
                metric_at(Some(key), edge.1)
            ),
            _ => return None,
        };
        Some(Narration::detail(text))
    }

    fn apply_final(&mut self, result: &FinalResult) -> Option<Narration> {
        if let Some(metrics) = result.metrics() {
            self.state.metrics = Some(metrics.to_vec());
        }
        if let Some((edges, semantics)) = result.edges() {
            self.state.finalized_edges = edges.to_vec();
            self.state.semantics = semantics;
        }
        self.state.finalize_pending();
        self.state.active_edge = None;

        let text = match self.algorithm {
            Some(GraphAlgorithm::Bfs | GraphAlgorithm::Dfs) => return None,
            Some(GraphAlgorithm::Prims) => match result.final_cost {
                Some(cost) => format!("FINAL PRIMS MST COST: {cost}"),
                None => "FINAL PRIMS MST COST: N/A".to_string(),
            },
            _ => {
                let values: Vec<String> = result
                    .metrics()
                    .unwrap_or_default()
                    .iter()
                    .map(Metric::to_string)
                    .collect();
                format!(
                    "FINAL DIJKSTRA: Shortest Paths calculated. Distances: [{}]",
                    values.join(",")
                )
            }
        };
        Some(Narration::conclusive(text))
    }

    fn settle(&mut self) {
        for status in self.state.status.values_mut() {
            *status = EntityStatus::Finalized;
        }
        self.state.focus = None;
        self.state.active_edge = None;
    }

    fn reset(&mut self, snapshot: &Snapshot) {
        self.clear_run();
        self.observe(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::{GraphEdge, GraphSnapshot, StatusMark};

    fn tracker(n: usize, algorithm: GraphAlgorithm) -> GraphTracker {
        let mut t = GraphTracker::default();
        let response = EngineResponse {
            kind: StructureKind::Graph,
            action: "run".into(),
            value: Some(0),
            outcome: None,
            snapshot: Snapshot::Graph(GraphSnapshot::new(n, vec![])),
            steps: vec![],
            vertex_count_inferred: false,
        };
        t.begin_operation(
            &EngineRequest::Graph(GraphRequest::Run {
                algorithm,
                start: 0,
            }),
            &response,
        );
        t
    }

    #[test]
    fn enqueue_marks_focuses_and_shows_queue() {
        let mut t = tracker(3, GraphAlgorithm::Bfs);
        let narration = t.apply_step(&StepRecord::Enqueue {
            vertex: 2,
            queue: vec![1, 2],
            edge: Some((0, 2)),
            nodes: vec![StatusMark {
                vertex: 2,
                status: EntityStatus::Pending,
            }],
        });
        assert_eq!(
            narration,
            Some(Narration::detail("BFS: Enqueued neighbor 2."))
        );
        let state = t.state();
        assert_eq!(state.status_of(&2), EntityStatus::Pending);
        assert_eq!(state.focus, Some(2));
        assert_eq!(state.active_edge, Some((0, 2)));
        assert_eq!(state.aux.as_ref().map(ToString::to_string).as_deref(), Some("BFS Queue: [1, 2]"));
    }

    #[test]
    fn relax_reports_new_distance() {
        let mut t = tracker(2, GraphAlgorithm::Dijkstra);
        let narration = t.apply_step(&StepRecord::Relax {
            edge: (0, 1),
            pq: vec![PqEntry {
                vertex: 1,
                priority: 4,
            }],
            dist: vec![Metric::Finite(0), Metric::Finite(4)],
            nodes: vec![],
        });
        assert_eq!(
            narration.map(|n| n.text).as_deref(),
            Some("DIJKSTRA: Relaxed edge 0 -> 1. New dist: 4")
        );
        assert_eq!(
            t.state().aux.as_ref().map(ToString::to_string).as_deref(),
            Some("DIJKSTRA PQ: [1(4)]")
        );
    }

    #[test]
    fn final_result_promotes_pending_and_sets_edges() {
        let mut t = tracker(3, GraphAlgorithm::Prims);
        t.state.mark(1, EntityStatus::Pending);
        let narration = t.apply_final(&FinalResult {
            final_cost: Some(2),
            final_key: Some(vec![Metric::Finite(0), Metric::Finite(1), Metric::Finite(1)]),
            final_mst_edges: Some(vec![GraphEdge::new(2, 1, 1)]),
            ..FinalResult::default()
        });
        assert_eq!(narration, Some(Narration::conclusive("FINAL PRIMS MST COST: 2")));
        assert_eq!(t.state().status_of(&1), EntityStatus::Finalized);
        assert!(t.state().is_edge_finalized(1, 2));
    }

    #[test]
    fn marks_outside_the_vertex_range_are_dropped() {
        let mut t = tracker(2, GraphAlgorithm::Bfs);
        t.apply_step(&StepRecord::VisitStart {
            vertex: 5,
            queue: vec![5],
            nodes: vec![StatusMark {
                vertex: 5,
                status: EntityStatus::Pending,
            }],
        });
        assert!(t.state().status.is_empty());
        assert_eq!(t.state().focus, None);
    }

    #[test]
    fn records_after_final_result_are_ignored() {
        let mut t = tracker(3, GraphAlgorithm::Bfs);
        let enqueue = StepRecord::Enqueue {
            vertex: 2,
            queue: vec![2],
            edge: Some((0, 2)),
            nodes: vec![StatusMark {
                vertex: 2,
                status: EntityStatus::Pending,
            }],
        };
        t.apply_step(&StepRecord::FinalResult(FinalResult::default()));
        assert!(t.state().concluded);
        let before = t.state().clone();
        assert_eq!(t.apply_step(&enqueue), None);
        assert_eq!(t.state(), &before);
        assert_eq!(t.state().status_of(&2), EntityStatus::Default);
        assert_eq!(t.state().focus, None);

        // A new run starts open again.
        let mut t = tracker(3, GraphAlgorithm::Bfs);
        t.apply_step(&enqueue);
        assert_eq!(t.state().focus, Some(2));
    }

    #[test]
    fn settle_finalizes_everything_touched() {
        let mut t = tracker(3, GraphAlgorithm::Dfs);
        t.state.mark(0, EntityStatus::Pending);
        t.state.mark(2, EntityStatus::Finalized);
        t.state.focus = Some(0);
        t.settle();
        assert_eq!(t.state().status_of(&0), EntityStatus::Finalized);
        assert_eq!(t.state().status_of(&1), EntityStatus::Default);
        assert_eq!(t.state().focus, None);
    }
}
