//! dsviz-engine-core: an in-process Computation Engine for the four
//! structure families.
//!
//! Each request is executed synchronously; the JSON response is written into
//! an engine-owned buffer that the caller reads and then releases. Failed
//! operations still produce a buffer holding an `action: "error"` response.

use hashbrown::HashMap;
use log::{debug, warn};
use thiserror::Error;

use dsviz_api_core::{
    encode_error, encode_response, BufferId, ComputationEngine, EngineError, EngineRequest,
    EngineResponse, GraphRequest, HashRequest, HeapRequest, Key, Outcome, Snapshot, StepRecord,
    StructureKind, TreeRequest,
};

pub mod avl;
pub mod graph;
pub mod hash;
pub mod heap;
mod pq;

pub use avl::AvlTree;
pub use graph::Graph;
pub use hash::ChainedHashTable;
pub use heap::MinHeap;

/// Result of one structure operation before it is wrapped in a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub action: &'static str,
    pub value: Option<Key>,
    pub outcome: Option<Outcome>,
    pub steps: Vec<StepRecord>,
}

impl Applied {
    pub fn new(
        action: &'static str,
        value: Option<Key>,
        outcome: Option<Outcome>,
        steps: Vec<StepRecord>,
    ) -> Self {
        Self {
            action,
            value,
            outcome,
            steps,
        }
    }
}

/// Operation failures. The display text is the reason sent to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("Error: {0} not initialized.")]
    NotInitialized(&'static str),
    #[error("Error: Invalid start vertex.")]
    InvalidStart(u32),
    #[error("Error: Invalid edge {from} -> {to}.")]
    InvalidEdge { from: u32, to: u32 },
    #[error("Error: Invalid vertex {0}.")]
    InvalidVertex(u32),
    #[error("Error: Heap is full.")]
    HeapFull,
    #[error("Error: Heap is empty.")]
    HeapEmpty,
    #[error("Error: {0} size must be at least 1.")]
    InvalidSize(&'static str),
}

/// Reference engine holding one instance of each structure.
#[derive(Debug, Default)]
pub struct ReferenceEngine {
    tree: Option<AvlTree>,
    graph: Option<Graph>,
    hash: Option<ChainedHashTable>,
    heap: Option<MinHeap>,
    buffers: HashMap<BufferId, String>,
    next_id: u64,
}

impl ReferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of response buffers not yet released.
    pub fn outstanding(&self) -> usize {
        self.buffers.len()
    }

    fn store(&mut self, text: String) -> BufferId {
        self.next_id += 1;
        let id = BufferId(self.next_id);
        self.buffers.insert(id, text);
        id
    }

    fn execute(&mut self, request: &EngineRequest) -> Result<EngineResponse, OpError> {
        let kind = request.kind();
        let applied = match request {
            EngineRequest::Tree(r) => self.execute_tree(r)?,
            EngineRequest::Graph(r) => self.execute_graph(r)?,
            EngineRequest::Hash(r) => self.execute_hash(r)?,
            EngineRequest::Heap(r) => self.execute_heap(r)?,
        };
        Ok(EngineResponse {
            kind,
            action: applied.action.to_string(),
            value: applied.value,
            outcome: applied.outcome,
            snapshot: self.snapshot(kind),
            steps: applied.steps,
            vertex_count_inferred: false,
        })
    }

    fn snapshot(&self, kind: StructureKind) -> Snapshot {
        match kind {
            StructureKind::Tree => self
                .tree
                .as_ref()
                .map_or_else(|| Snapshot::empty(kind), |t| Snapshot::Tree(t.snapshot())),
            StructureKind::Graph => self
                .graph
                .as_ref()
                .map_or_else(|| Snapshot::empty(kind), |g| Snapshot::Graph(g.snapshot())),
            StructureKind::Hash => self
                .hash
                .as_ref()
                .map_or_else(|| Snapshot::empty(kind), |h| Snapshot::Hash(h.snapshot())),
            StructureKind::Heap => self
                .heap
                .as_ref()
                .map_or_else(|| Snapshot::empty(kind), |h| Snapshot::Heap(h.snapshot())),
        }
    }

    fn execute_tree(&mut self, request: &TreeRequest) -> Result<Applied, OpError> {
        if let TreeRequest::Init = request {
            self.tree = Some(AvlTree::new());
            return Ok(Applied::new(
                "init",
                None,
                None,
                vec![StepRecord::note("AVL Tree initialized.")],
            ));
        }
        let tree = self.tree.as_mut().ok_or(OpError::NotInitialized("Tree"))?;
        Ok(match request {
            TreeRequest::Insert { value } => tree.insert(*value),
            TreeRequest::Delete { value } => tree.delete(*value),
            TreeRequest::Init | TreeRequest::State => state_applied(),
        })
    }

    fn execute_graph(&mut self, request: &GraphRequest) -> Result<Applied, OpError> {
        if let GraphRequest::Init { vertices } = request {
            let graph = Graph::new(*vertices);
            let applied = graph.init_applied();
            self.graph = Some(graph);
            return Ok(applied);
        }
        let graph = self.graph.as_mut().ok_or(OpError::NotInitialized("Graph"))?;
        match request {
            GraphRequest::AddEdge { from, to, weight } => graph.add_edge(*from, *to, *weight),
            GraphRequest::RemoveEdge { from, to } => graph.remove_edge(*from, *to),
            GraphRequest::RemoveVertex { vertex } => graph.remove_vertex(*vertex),
            GraphRequest::Run { algorithm, start } => graph.run(*algorithm, *start),
            GraphRequest::Init { .. } | GraphRequest::State => Ok(state_applied()),
        }
    }

    fn execute_hash(&mut self, request: &HashRequest) -> Result<Applied, OpError> {
        if let HashRequest::Init { buckets } = request {
            let table = ChainedHashTable::new(*buckets)?;
            let applied = table.init_applied();
            self.hash = Some(table);
            return Ok(applied);
        }
        let table = self
            .hash
            .as_mut()
            .ok_or(OpError::NotInitialized("Hash Table"))?;
        Ok(match request {
            HashRequest::Insert { value } => table.insert(*value),
            HashRequest::Search { value } => table.search(*value),
            HashRequest::Delete { value } => table.delete(*value),
            HashRequest::Init { .. } | HashRequest::State => state_applied(),
        })
    }

    fn execute_heap(&mut self, request: &HeapRequest) -> Result<Applied, OpError> {
        if let HeapRequest::Init { capacity } = request {
            let heap = MinHeap::with_capacity(*capacity)?;
            let applied = heap.init_applied();
            self.heap = Some(heap);
            return Ok(applied);
        }
        let heap = self.heap.as_mut().ok_or(OpError::NotInitialized("Heap"))?;
        match request {
            HeapRequest::Insert { value } => heap.insert(*value),
            HeapRequest::Extract => heap.extract_min(),
            HeapRequest::Init { .. } | HeapRequest::State => Ok(state_applied()),
        }
    }
}

fn state_applied() -> Applied {
    Applied::new("state", None, None, vec![StepRecord::note("Current state.")])
}

/// Operand echoed back in error responses.
fn error_value(request: &EngineRequest) -> Option<Key> {
    match request {
        EngineRequest::Graph(GraphRequest::Run { start, .. }) => Some(Key::from(*start)),
        other => other.operand(),
    }
}

impl ComputationEngine for ReferenceEngine {
    fn invoke(&mut self, request: &EngineRequest) -> Result<BufferId, EngineError> {
        debug!("engine: {}", request.symbol());
        let text = match self.execute(request) {
            Ok(response) => encode_response(&response),
            Err(err) => {
                debug!("engine: {} failed: {err}", request.symbol());
                encode_error(request.kind(), error_value(request), &err.to_string())
            }
        }
        .map_err(|e| EngineError::Encode(e.to_string()))?;
        Ok(self.store(text))
    }

    fn read(&self, buffer: BufferId) -> Option<&str> {
        self.buffers.get(&buffer).map(String::as_str)
    }

    fn release(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_none() {
            warn!("engine: release of unknown buffer {buffer}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::{call_engine, EngineReply};

    #[test]
    fn uninitialized_structures_reply_with_errors() {
        let mut engine = ReferenceEngine::new();
        let reply = call_engine(
            &mut engine,
            &EngineRequest::Hash(HashRequest::Insert { value: 3 }),
        )
        .unwrap();
        assert_eq!(
            reply,
            EngineReply::Error {
                kind: Some(StructureKind::Hash),
                reason: "Error: Hash Table not initialized.".into()
            }
        );
        assert_eq!(engine.outstanding(), 0);
    }

    #[test]
    fn buffers_live_until_released() {
        let mut engine = ReferenceEngine::new();
        let a = engine
            .invoke(&EngineRequest::Tree(TreeRequest::Init))
            .unwrap();
        let b = engine
            .invoke(&EngineRequest::Tree(TreeRequest::State))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.outstanding(), 2);
        assert!(engine.read(a).unwrap().contains(r#""tree":null"#));
        engine.release(a);
        engine.release(a);
        assert_eq!(engine.read(a), None);
        assert_eq!(engine.outstanding(), 1);
    }

    #[test]
    fn state_query_carries_snapshot() {
        let mut engine = ReferenceEngine::new();
        call_engine(&mut engine, &EngineRequest::Heap(HeapRequest::Init { capacity: 4 })).unwrap();
        call_engine(&mut engine, &EngineRequest::Heap(HeapRequest::Insert { value: 9 })).unwrap();
        let EngineReply::Ok(response) =
            call_engine(&mut engine, &EngineRequest::Heap(HeapRequest::State)).unwrap()
        else {
            panic!("expected ok");
        };
        assert_eq!(response.action, "state");
        assert_eq!(response.steps, vec![StepRecord::note("Current state.")]);
        let Snapshot::Heap(heap) = response.snapshot else {
            panic!("expected heap snapshot");
        };
        assert_eq!(heap.values, vec![9]);
    }
}
