//! Typed requests sent to a Computation Engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kind::StructureKind;
use crate::snapshot::Key;
use crate::step::EdgeSemantics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphAlgorithm {
    Bfs,
    Dfs,
    Dijkstra,
    Prims,
}

impl GraphAlgorithm {
    pub const ALL: [GraphAlgorithm; 4] = [
        GraphAlgorithm::Bfs,
        GraphAlgorithm::Dfs,
        GraphAlgorithm::Dijkstra,
        GraphAlgorithm::Prims,
    ];

    /// Upper-case label used in status and auxiliary lines.
    pub fn label(self) -> &'static str {
        match self {
            GraphAlgorithm::Bfs => "BFS",
            GraphAlgorithm::Dfs => "DFS",
            GraphAlgorithm::Dijkstra => "DIJKSTRA",
            GraphAlgorithm::Prims => "PRIMS",
        }
    }

    /// How the final edge set of this algorithm is matched against edges.
    pub fn edge_semantics(self) -> EdgeSemantics {
        match self {
            GraphAlgorithm::Prims => EdgeSemantics::Undirected,
            _ => EdgeSemantics::Directed,
        }
    }

    pub fn uses_priority_queue(self) -> bool {
        matches!(self, GraphAlgorithm::Dijkstra | GraphAlgorithm::Prims)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bfs" => Some(GraphAlgorithm::Bfs),
            "dfs" => Some(GraphAlgorithm::Dfs),
            "dijkstra" => Some(GraphAlgorithm::Dijkstra),
            "prims" | "prim" => Some(GraphAlgorithm::Prims),
            _ => None,
        }
    }
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeRequest {
    Init,
    Insert { value: Key },
    Delete { value: Key },
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GraphRequest {
    Init { vertices: usize },
    AddEdge { from: u32, to: u32, weight: i64 },
    RemoveEdge { from: u32, to: u32 },
    RemoveVertex { vertex: u32 },
    Run { algorithm: GraphAlgorithm, start: u32 },
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HashRequest {
    Init { buckets: usize },
    Insert { value: Key },
    Search { value: Key },
    Delete { value: Key },
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HeapRequest {
    Init { capacity: usize },
    Insert { value: Key },
    Extract,
    State,
}

/// Operation name plus typed arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "request")]
pub enum EngineRequest {
    #[serde(rename = "avl")]
    Tree(TreeRequest),
    #[serde(rename = "graph")]
    Graph(GraphRequest),
    #[serde(rename = "hash")]
    Hash(HashRequest),
    #[serde(rename = "minheap")]
    Heap(HeapRequest),
}

impl EngineRequest {
    pub fn kind(&self) -> StructureKind {
        match self {
            EngineRequest::Tree(_) => StructureKind::Tree,
            EngineRequest::Graph(_) => StructureKind::Graph,
            EngineRequest::Hash(_) => StructureKind::Hash,
            EngineRequest::Heap(_) => StructureKind::Heap,
        }
    }

    /// Engine entry point name, e.g. `avl_insert` or `graph_dijkstra`.
    pub fn symbol(&self) -> &'static str {
        match self {
            EngineRequest::Tree(r) => match r {
                TreeRequest::Init => "avl_init",
                TreeRequest::Insert { .. } => "avl_insert",
                TreeRequest::Delete { .. } => "avl_delete",
                TreeRequest::State => "avl_get_state",
            },
            EngineRequest::Graph(r) => match r {
                GraphRequest::Init { .. } => "graph_init",
                GraphRequest::AddEdge { .. } => "graph_add_edge",
                GraphRequest::RemoveEdge { .. } => "graph_remove_edge",
                GraphRequest::RemoveVertex { .. } => "graph_remove_vertex",
                GraphRequest::Run { algorithm, .. } => match algorithm {
                    GraphAlgorithm::Bfs => "graph_bfs",
                    GraphAlgorithm::Dfs => "graph_dfs",
                    GraphAlgorithm::Dijkstra => "graph_dijkstra",
                    GraphAlgorithm::Prims => "graph_prims",
                },
                GraphRequest::State => "graph_get_state",
            },
            EngineRequest::Hash(r) => match r {
                HashRequest::Init { .. } => "hash_init",
                HashRequest::Insert { .. } => "hash_insert",
                HashRequest::Search { .. } => "hash_search",
                HashRequest::Delete { .. } => "hash_delete",
                HashRequest::State => "hash_get_state",
            },
            EngineRequest::Heap(r) => match r {
                HeapRequest::Init { .. } => "heap_init",
                HeapRequest::Insert { .. } => "heap_insert",
                HeapRequest::Extract => "heap_extract_min",
                HeapRequest::State => "heap_get_state",
            },
        }
    }

    /// Pure state queries return a snapshot and no steps.
    pub fn is_state_query(&self) -> bool {
        matches!(
            self,
            EngineRequest::Tree(TreeRequest::State)
                | EngineRequest::Graph(GraphRequest::State)
                | EngineRequest::Hash(HashRequest::State)
                | EngineRequest::Heap(HeapRequest::State)
        )
    }

    /// Graph algorithm this request runs, if any.
    pub fn algorithm(&self) -> Option<GraphAlgorithm> {
        match self {
            EngineRequest::Graph(GraphRequest::Run { algorithm, .. }) => Some(*algorithm),
            _ => None,
        }
    }

    /// The key an insert/delete/search operates on.
    pub fn operand(&self) -> Option<Key> {
        match self {
            EngineRequest::Tree(TreeRequest::Insert { value })
            | EngineRequest::Tree(TreeRequest::Delete { value })
            | EngineRequest::Hash(HashRequest::Insert { value })
            | EngineRequest::Hash(HashRequest::Search { value })
            | EngineRequest::Hash(HashRequest::Delete { value })
            | EngineRequest::Heap(HeapRequest::Insert { value }) => Some(*value),
            _ => None,
        }
    }

    /// The state query for the same structure.
    pub fn state_query(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Tree => EngineRequest::Tree(TreeRequest::State),
            StructureKind::Graph => EngineRequest::Graph(GraphRequest::State),
            StructureKind::Hash => EngineRequest::Hash(HashRequest::State),
            StructureKind::Heap => EngineRequest::Heap(HeapRequest::State),
        }
    }
}
