//! Weighted directed graph with narrated traversals.
//!
//! Edges are kept in insertion order and traversals visit outgoing edges in
//! that order. Removing a vertex drops its incident edges but keeps every
//! vertex id stable.

use std::collections::VecDeque;

use dsviz_api_core::{
    EntityStatus, FinalResult, GraphAlgorithm, GraphEdge, GraphSnapshot, Key, Metric, Outcome,
    StatusMark, StepRecord,
};

use crate::pq::PriorityQueue;
use crate::{Applied, OpError};

fn mark(vertex: u32, status: EntityStatus) -> Vec<StatusMark> {
    vec![StatusMark { vertex, status }]
}

fn to_metrics(values: &[Option<i64>]) -> Vec<Metric> {
    values
        .iter()
        .map(|v| v.map_or(Metric::Infinite, Metric::Finite))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seen {
    Unseen,
    Queued,
    Visited,
}

/// Per-vertex bookkeeping shared by Dijkstra and Prim.
struct PriorityRun {
    metric: Vec<Option<i64>>,
    // (parent, weight of the edge that set the metric)
    via: Vec<Option<(u32, i64)>>,
    done: Vec<bool>,
    pq: PriorityQueue,
}

impl PriorityRun {
    fn new(n: usize, start: u32) -> Self {
        let mut metric = vec![None; n];
        metric[start as usize] = Some(0);
        let mut pq = PriorityQueue::new();
        pq.push(start, 0);
        Self {
            metric,
            via: vec![None; n],
            done: vec![false; n],
            pq,
        }
    }

    /// Parent-tree edges, one per reached non-start vertex, by vertex id.
    fn tree_edges(&self) -> Vec<GraphEdge> {
        self.via
            .iter()
            .enumerate()
            .filter_map(|(v, via)| via.map(|(p, w)| GraphEdge::new(p, v as u32, w)))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.vertex_count, self.edges.clone())
    }

    fn contains(&self, v: u32) -> bool {
        (v as usize) < self.vertex_count
    }

    fn outgoing(&self, u: u32) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.from == u)
    }

    pub(crate) fn init_applied(&self) -> Applied {
        Applied::new(
            "init",
            Some(self.vertex_count as Key),
            None,
            vec![StepRecord::note(format!(
                "Initialized graph with {} vertices.",
                self.vertex_count
            ))],
        )
    }

    pub fn add_edge(&mut self, from: u32, to: u32, weight: i64) -> Result<Applied, OpError> {
        if !self.contains(from) || !self.contains(to) {
            return Err(OpError::InvalidEdge { from, to });
        }
        self.edges.push(GraphEdge::new(from, to, weight));
        Ok(Applied::new(
            "add_edge",
            None,
            Some(Outcome::Inserted),
            vec![StepRecord::note(format!(
                "Added edge {from} -> {to} (w={weight})."
            ))],
        ))
    }

    /// Remove the first edge `from -> to`.
    pub fn remove_edge(&mut self, from: u32, to: u32) -> Result<Applied, OpError> {
        if !self.contains(from) || !self.contains(to) {
            return Err(OpError::InvalidEdge { from, to });
        }
        let (outcome, text) = match self.edges.iter().position(|e| e.from == from && e.to == to) {
            Some(i) => {
                self.edges.remove(i);
                (Outcome::Deleted, format!("Removed edge {from} -> {to}."))
            }
            None => (Outcome::NotFound, format!("Edge {from} -> {to} not found.")),
        };
        Ok(Applied::new(
            "remove_edge",
            None,
            Some(outcome),
            vec![StepRecord::note(text)],
        ))
    }

    pub fn remove_vertex(&mut self, vertex: u32) -> Result<Applied, OpError> {
        if !self.contains(vertex) {
            return Err(OpError::InvalidVertex(vertex));
        }
        self.edges.retain(|e| e.from != vertex && e.to != vertex);
        Ok(Applied::new(
            "remove_vertex",
            Some(Key::from(vertex)),
            Some(Outcome::Deleted),
            vec![StepRecord::note(format!(
                "Removed vertex {vertex} and all connected edges."
            ))],
        ))
    }

    pub fn run(&self, algorithm: GraphAlgorithm, start: u32) -> Result<Applied, OpError> {
        if !self.contains(start) {
            return Err(OpError::InvalidStart(start));
        }
        let (action, steps) = match algorithm {
            GraphAlgorithm::Bfs => ("run_bfs", self.bfs(start)),
            GraphAlgorithm::Dfs => ("run_dfs", self.dfs(start)),
            GraphAlgorithm::Dijkstra => ("run_dijkstra", self.dijkstra(start)),
            GraphAlgorithm::Prims => ("run_prims", self.prims(start)),
        };
        Ok(Applied::new(
            action,
            Some(Key::from(start)),
            Some(Outcome::Completed),
            steps,
        ))
    }

    fn bfs(&self, start: u32) -> Vec<StepRecord> {
        let mut seen = vec![Seen::Unseen; self.vertex_count];
        let mut queue = VecDeque::from([start]);
        seen[start as usize] = Seen::Queued;
        let mut steps = vec![
            StepRecord::note(format!("Initialized BFS. Start node: {start}.")),
            StepRecord::VisitStart {
                vertex: start,
                queue: vec![start],
                nodes: mark(start, EntityStatus::Pending),
            },
        ];
        while let Some(u) = queue.pop_front() {
            seen[u as usize] = Seen::Visited;
            steps.push(StepRecord::Dequeue {
                vertex: u,
                queue: queue.iter().copied().collect(),
                nodes: mark(u, EntityStatus::Finalized),
            });
            for edge in self.outgoing(u) {
                let v = edge.to;
                if seen[v as usize] != Seen::Unseen {
                    continue;
                }
                seen[v as usize] = Seen::Queued;
                queue.push_back(v);
                steps.push(StepRecord::Enqueue {
                    vertex: v,
                    queue: queue.iter().copied().collect(),
                    edge: Some((u, v)),
                    nodes: mark(v, EntityStatus::Pending),
                });
            }
        }
        steps
    }

    fn dfs(&self, start: u32) -> Vec<StepRecord> {
        let mut seen = vec![Seen::Unseen; self.vertex_count];
        // Bottom first; shown top first.
        let mut stack = vec![start];
        let shown = |stack: &[u32]| stack.iter().rev().copied().collect::<Vec<_>>();
        seen[start as usize] = Seen::Queued;
        let mut steps = vec![
            StepRecord::note(format!("Initialized DFS. Start node: {start}.")),
            StepRecord::PushStart {
                vertex: start,
                stack: shown(&stack),
                nodes: mark(start, EntityStatus::Pending),
            },
        ];
        while let Some(&u) = stack.last() {
            let revisit = seen[u as usize] == Seen::Visited;
            if !revisit {
                seen[u as usize] = Seen::Visited;
                steps.push(StepRecord::Visit {
                    vertex: u,
                    stack: shown(&stack),
                    nodes: mark(u, EntityStatus::Finalized),
                });
            }
            let next = self
                .outgoing(u)
                .map(|e| e.to)
                .find(|v| seen[*v as usize] == Seen::Unseen);
            match next {
                Some(v) => {
                    seen[v as usize] = Seen::Queued;
                    stack.push(v);
                    steps.push(StepRecord::Push {
                        vertex: v,
                        stack: shown(&stack),
                        edge: Some((u, v)),
                        nodes: mark(v, EntityStatus::Pending),
                    });
                }
                None => {
                    stack.pop();
                    let (vertex, stack, nodes) =
                        (u, shown(&stack), mark(u, EntityStatus::Finalized));
                    // A vertex with no unvisited neighbour on its first visit
                    // is a dead end; later pops unwind finished vertices.
                    steps.push(if revisit {
                        StepRecord::Pop {
                            vertex,
                            stack,
                            nodes,
                        }
                    } else {
                        StepRecord::PopBacktrack {
                            vertex,
                            stack,
                            nodes,
                        }
                    });
                }
            }
        }
        steps
    }

    fn dijkstra(&self, start: u32) -> Vec<StepRecord> {
        let mut run = PriorityRun::new(self.vertex_count, start);
        let mut steps = vec![
            StepRecord::note(format!("Initialized Dijkstra's. Start node: {start}.")),
            StepRecord::InitStart {
                vertex: start,
                pq: run.pq.contents(),
                dist: Some(to_metrics(&run.metric)),
                key: None,
                nodes: mark(start, EntityStatus::Pending),
            },
        ];
        while let Some(entry) = run.pq.pop() {
            let u = entry.vertex;
            if run.done[u as usize] {
                continue;
            }
            run.done[u as usize] = true;
            steps.push(StepRecord::ExtractMin {
                vertex: u,
                pq: run.pq.contents(),
                dist: Some(to_metrics(&run.metric)),
                key: None,
                nodes: mark(u, EntityStatus::Finalized),
            });
            let Some(du) = run.metric[u as usize] else {
                continue;
            };
            for edge in self.outgoing(u) {
                let v = edge.to;
                if run.done[v as usize] {
                    continue;
                }
                let candidate = du.saturating_add(edge.weight);
                if run.metric[v as usize].map_or(true, |dv| candidate < dv) {
                    run.metric[v as usize] = Some(candidate);
                    run.via[v as usize] = Some((u, edge.weight));
                    run.pq.push(v, candidate);
                    steps.push(StepRecord::Relax {
                        edge: (u, v),
                        pq: run.pq.contents(),
                        dist: to_metrics(&run.metric),
                        nodes: mark(v, EntityStatus::Pending),
                    });
                }
            }
        }
        steps.push(StepRecord::note(
            "Dijkstra's complete. Final shortest paths calculated.",
        ));
        steps.push(StepRecord::FinalResult(FinalResult {
            final_dist: Some(to_metrics(&run.metric)),
            final_sp_edges: Some(run.tree_edges()),
            ..FinalResult::default()
        }));
        steps
    }

    /// Prim treats every edge as undirected: a vertex's outgoing edges are
    /// considered first, then its incoming ones.
    fn prims(&self, start: u32) -> Vec<StepRecord> {
        let mut run = PriorityRun::new(self.vertex_count, start);
        let mut cost: i64 = 0;
        let mut steps = vec![
            StepRecord::note(format!("Initialized Prim's. Start node: {start}.")),
            StepRecord::InitStart {
                vertex: start,
                pq: run.pq.contents(),
                dist: None,
                key: Some(to_metrics(&run.metric)),
                nodes: mark(start, EntityStatus::Pending),
            },
        ];
        while let Some(entry) = run.pq.pop() {
            let u = entry.vertex;
            if run.done[u as usize] {
                continue;
            }
            run.done[u as usize] = true;
            if run.via[u as usize].is_some() {
                cost = cost.saturating_add(entry.priority);
            }
            steps.push(StepRecord::ExtractMin {
                vertex: u,
                pq: run.pq.contents(),
                dist: None,
                key: Some(to_metrics(&run.metric)),
                nodes: mark(u, EntityStatus::Finalized),
            });
            let outgoing = self.outgoing(u).map(|e| (e.to, e.weight));
            let incoming = self
                .edges
                .iter()
                .filter(move |e| e.to == u)
                .map(|e| (e.from, e.weight));
            for (v, weight) in outgoing.chain(incoming) {
                if run.done[v as usize] {
                    continue;
                }
                if run.metric[v as usize].map_or(true, |kv| weight < kv) {
                    run.metric[v as usize] = Some(weight);
                    run.via[v as usize] = Some((u, weight));
                    run.pq.push(v, weight);
                    steps.push(StepRecord::KeyUpdate {
                        edge: (u, v),
                        pq: run.pq.contents(),
                        key: to_metrics(&run.metric),
                        nodes: mark(v, EntityStatus::Pending),
                    });
                }
            }
        }
        steps.push(StepRecord::note(format!(
            "Prim's complete. Total MST Cost: {cost}"
        )));
        steps.push(StepRecord::FinalResult(FinalResult {
            final_cost: Some(cost),
            final_key: Some(to_metrics(&run.metric)),
            final_mst_edges: Some(run.tree_edges()),
            ..FinalResult::default()
        }));
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::PqEntry;

    /// 0->2 (1), 0->1 (4), 1->3 (5), 2->1 (2)
    fn sample() -> Graph {
        let mut g = Graph::new(4);
        for (f, t, w) in [(0, 2, 1), (0, 1, 4), (1, 3, 5), (2, 1, 2)] {
            g.add_edge(f, t, w).unwrap();
        }
        g
    }

    fn actions(steps: &[StepRecord]) -> Vec<&'static str> {
        steps.iter().map(StepRecord::action).collect()
    }

    #[test]
    fn bfs_enqueues_in_edge_order() {
        let steps = sample().run(GraphAlgorithm::Bfs, 0).unwrap().steps;
        assert_eq!(
            actions(&steps),
            vec![
                "note",
                "visit_start",
                "dequeue",
                "enqueue",
                "enqueue",
                "dequeue",
                "dequeue",
                "enqueue",
                "dequeue"
            ]
        );
        assert_eq!(
            steps[4],
            StepRecord::Enqueue {
                vertex: 1,
                queue: vec![2, 1],
                edge: Some((0, 1)),
                nodes: mark(1, EntityStatus::Pending),
            }
        );
    }

    #[test]
    fn dfs_backtracks_and_pops_visited_entries() {
        let steps = sample().run(GraphAlgorithm::Dfs, 0).unwrap().steps;
        let pushes: Vec<(u32, u32)> = steps
            .iter()
            .filter_map(|s| match s {
                StepRecord::Push { edge, .. } => *edge,
                _ => None,
            })
            .collect();
        assert_eq!(pushes, vec![(0, 2), (2, 1), (1, 3)]);
        assert_eq!(
            steps[9],
            StepRecord::PopBacktrack {
                vertex: 3,
                stack: vec![1, 2, 0],
                nodes: mark(3, EntityStatus::Finalized),
            }
        );
        assert_eq!(
            steps.last(),
            Some(&StepRecord::Pop {
                vertex: 0,
                stack: vec![],
                nodes: mark(0, EntityStatus::Finalized),
            })
        );
    }

    #[test]
    fn dfs_resumes_siblings_after_backtracking() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(0, 2, 1).unwrap();
        let steps = g.run(GraphAlgorithm::Dfs, 0).unwrap().steps;
        let visited: Vec<u32> = steps
            .iter()
            .filter_map(|s| match s {
                StepRecord::Visit { vertex, .. } => Some(*vertex),
                _ => None,
            })
            .collect();
        assert_eq!(visited, vec![0, 1, 2]);
        assert!(steps.iter().any(|s| matches!(
            s,
            StepRecord::Push {
                edge: Some((0, 2)),
                ..
            }
        )));
    }

    #[test]
    fn dijkstra_final_distances_and_tree() {
        let steps = sample().run(GraphAlgorithm::Dijkstra, 0).unwrap().steps;
        let Some(StepRecord::FinalResult(result)) = steps.last() else {
            panic!("missing final result");
        };
        assert_eq!(
            result.final_dist,
            Some(vec![
                Metric::Finite(0),
                Metric::Finite(3),
                Metric::Finite(1),
                Metric::Finite(8)
            ])
        );
        assert_eq!(
            result.final_sp_edges,
            Some(vec![
                GraphEdge::new(2, 1, 2),
                GraphEdge::new(0, 2, 1),
                GraphEdge::new(1, 3, 5)
            ])
        );
        let relax_pq = steps.iter().find_map(|s| match s {
            StepRecord::Relax { edge: (2, 1), pq, .. } => Some(pq.clone()),
            _ => None,
        });
        assert_eq!(
            relax_pq,
            Some(vec![
                PqEntry {
                    vertex: 1,
                    priority: 3
                },
                PqEntry {
                    vertex: 1,
                    priority: 4
                }
            ])
        );
    }

    #[test]
    fn unreachable_vertices_stay_infinite() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1, 7).unwrap();
        let steps = g.run(GraphAlgorithm::Dijkstra, 0).unwrap().steps;
        let Some(StepRecord::FinalResult(result)) = steps.last() else {
            panic!("missing final result");
        };
        assert_eq!(result.metrics().unwrap()[2], Metric::Infinite);
    }

    #[test]
    fn prims_uses_both_orientations() {
        let mut g = Graph::new(3);
        g.add_edge(1, 0, 2).unwrap();
        g.add_edge(2, 1, 3).unwrap();
        g.add_edge(0, 2, 9).unwrap();
        let steps = g.run(GraphAlgorithm::Prims, 0).unwrap().steps;
        assert_eq!(
            steps[steps.len() - 2].text(),
            Some("Prim's complete. Total MST Cost: 5")
        );
        let Some(StepRecord::FinalResult(result)) = steps.last() else {
            panic!("missing final result");
        };
        assert_eq!(result.final_cost, Some(5));
        assert_eq!(
            result.final_mst_edges,
            Some(vec![GraphEdge::new(0, 1, 2), GraphEdge::new(1, 2, 3)])
        );
    }

    #[test]
    fn edits_validate_endpoints() {
        let mut g = sample();
        assert_eq!(
            g.add_edge(0, 4, 1),
            Err(OpError::InvalidEdge { from: 0, to: 4 })
        );
        assert_eq!(
            g.run(GraphAlgorithm::Bfs, 9).unwrap_err().to_string(),
            "Error: Invalid start vertex."
        );
        let removed = g.remove_edge(1, 0).unwrap();
        assert_eq!(removed.outcome, Some(Outcome::NotFound));
        g.remove_vertex(1).unwrap();
        assert_eq!(g.snapshot().edges, vec![GraphEdge::new(0, 2, 1)]);
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut g = Graph::new(2);
        g.add_edge(0, 1, 5).unwrap();
        g.add_edge(0, 1, 2).unwrap();
        g.remove_edge(0, 1).unwrap();
        assert_eq!(g.snapshot().edges, vec![GraphEdge::new(0, 1, 2)]);
    }
}
