//! Visual state trackers: per-structure mutable display state driven by step
//! records.
//!
//! A tracker never touches the snapshot itself. It keeps entity status, focus,
//! the auxiliary container line, metric arrays and the finalized edge set,
//! and purges entries that no longer name an entity of the latest snapshot.

pub mod graph;
pub mod hash;
pub mod heap;
pub mod tree;

use hashbrown::HashMap;
use std::fmt;
use std::hash::Hash;

use dsviz_api_core::{
    EdgeSemantics, EngineRequest, EngineResponse, EntityStatus, FinalResult, GraphEdge, Key,
    Metric, RotationCase, Snapshot, StepRecord, StructureKind,
};
use dsviz_layout_core::HashCell;

pub use graph::GraphTracker;
pub use hash::HashTracker;
pub use heap::HeapTracker;
pub use tree::TreeTracker;

/// Labelled auxiliary container (queue / stack / priority queue) as shown in
/// the single-line display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxDisplay {
    pub label: String,
    pub items: Vec<String>,
}

impl AuxDisplay {
    pub fn new(label: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

impl fmt::Display for AuxDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}]", self.label, self.items.join(", "))
    }
}

/// A human-readable line produced while applying a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    /// Reports an end result rather than progress.
    pub conclusive: bool,
}

impl Narration {
    pub fn detail(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conclusive: false,
        }
    }

    pub fn conclusive(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conclusive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualState<K: Hash + Eq> {
    pub status: HashMap<K, EntityStatus>,
    pub focus: Option<K>,
    /// Rotation being illustrated (tree only).
    pub rotation: Option<RotationCase>,
    /// Edge being traversed by the current step (graph only).
    pub active_edge: Option<(u32, u32)>,
    pub aux: Option<AuxDisplay>,
    pub metrics: Option<Vec<Metric>>,
    pub finalized_edges: Vec<GraphEdge>,
    pub semantics: EdgeSemantics,
    /// A terminal record was applied; the rest of the run is ignored.
    pub concluded: bool,
}

impl<K: Hash + Eq> Default for VisualState<K> {
    fn default() -> Self {
        Self {
            status: HashMap::new(),
            focus: None,
            rotation: None,
            active_edge: None,
            aux: None,
            metrics: None,
            finalized_edges: Vec::new(),
            semantics: EdgeSemantics::Directed,
            concluded: false,
        }
    }
}

impl<K: Hash + Eq + Clone> VisualState<K> {
    pub fn status_of(&self, id: &K) -> EntityStatus {
        self.status.get(id).copied().unwrap_or_default()
    }

    pub fn mark(&mut self, id: K, status: EntityStatus) {
        if status == EntityStatus::Default {
            self.status.remove(&id);
        } else {
            self.status.insert(id, status);
        }
    }

    pub fn is_focus(&self, id: &K) -> bool {
        self.focus.as_ref() == Some(id)
    }

    /// Membership in the final MST / shortest-path edge set. A spanning tree
    /// matches either orientation; a shortest-path tree only the exact one.
    pub fn is_edge_finalized(&self, from: u32, to: u32) -> bool {
        self.finalized_edges.iter().any(|e| {
            (e.from == from && e.to == to)
                || (self.semantics == EdgeSemantics::Undirected && e.from == to && e.to == from)
        })
    }

    /// Promote every pending entity to finalized.
    pub fn finalize_pending(&mut self) {
        for status in self.status.values_mut() {
            if *status == EntityStatus::Pending {
                *status = EntityStatus::Finalized;
            }
        }
    }

    /// Drop status and focus entries that fail `valid`.
    pub fn purge(&mut self, valid: impl Fn(&K) -> bool) {
        self.status.retain(|id, _| valid(id));
        if self.focus.as_ref().is_some_and(|f| !valid(f)) {
            self.focus = None;
        }
    }

    /// Whether `step` may still change this state. The first terminal record
    /// is admitted and closes the run.
    pub fn admit(&mut self, step: &StepRecord) -> bool {
        if self.concluded {
            return false;
        }
        self.concluded = step.is_terminal();
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Per-structure step interpretation.
pub trait VisualStateTracker {
    type Id: Hash + Eq + Clone + fmt::Debug;

    fn kind(&self) -> StructureKind;

    fn state(&self) -> &VisualState<Self::Id>;

    /// Prepare for replaying `response.steps`.
    fn begin_operation(&mut self, request: &EngineRequest, response: &EngineResponse);

    /// Interpret one record; unknown actions are ignored.
    fn apply_step(&mut self, step: &StepRecord) -> Option<Narration>;

    /// Take over the aggregate output of a terminal record.
    fn apply_final(&mut self, result: &FinalResult) -> Option<Narration>;

    /// Resting state after the last step.
    fn settle(&mut self);

    /// Clear derived state and re-derive it from `snapshot`.
    fn reset(&mut self, snapshot: &Snapshot);
}

/// Tracker for any structure kind, as held by a workbench.
#[derive(Debug, Clone)]
pub enum AnyTracker {
    Tree(TreeTracker),
    Graph(GraphTracker),
    Hash(HashTracker),
    Heap(HeapTracker),
}

impl AnyTracker {
    pub fn for_kind(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Tree => AnyTracker::Tree(TreeTracker::default()),
            StructureKind::Graph => AnyTracker::Graph(GraphTracker::default()),
            StructureKind::Hash => AnyTracker::Hash(HashTracker::default()),
            StructureKind::Heap => AnyTracker::Heap(HeapTracker::default()),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            AnyTracker::Tree(t) => t.kind(),
            AnyTracker::Graph(t) => t.kind(),
            AnyTracker::Hash(t) => t.kind(),
            AnyTracker::Heap(t) => t.kind(),
        }
    }

    pub fn begin_operation(&mut self, request: &EngineRequest, response: &EngineResponse) {
        match self {
            AnyTracker::Tree(t) => t.begin_operation(request, response),
            AnyTracker::Graph(t) => t.begin_operation(request, response),
            AnyTracker::Hash(t) => t.begin_operation(request, response),
            AnyTracker::Heap(t) => t.begin_operation(request, response),
        }
    }

    pub fn apply_step(&mut self, step: &StepRecord) -> Option<Narration> {
        match self {
            AnyTracker::Tree(t) => t.apply_step(step),
            AnyTracker::Graph(t) => t.apply_step(step),
            AnyTracker::Hash(t) => t.apply_step(step),
            AnyTracker::Heap(t) => t.apply_step(step),
        }
    }

    pub fn settle(&mut self) {
        match self {
            AnyTracker::Tree(t) => t.settle(),
            AnyTracker::Graph(t) => t.settle(),
            AnyTracker::Hash(t) => t.settle(),
            AnyTracker::Heap(t) => t.settle(),
        }
    }

    pub fn reset(&mut self, snapshot: &Snapshot) {
        match self {
            AnyTracker::Tree(t) => t.reset(snapshot),
            AnyTracker::Graph(t) => t.reset(snapshot),
            AnyTracker::Hash(t) => t.reset(snapshot),
            AnyTracker::Heap(t) => t.reset(snapshot),
        }
    }

    /// The active auxiliary container, if the structure shows one.
    pub fn aux(&self) -> Option<&AuxDisplay> {
        match self {
            AnyTracker::Graph(t) => t.state().aux.as_ref(),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&VisualState<Key>> {
        match self {
            AnyTracker::Tree(t) => Some(t.state()),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&VisualState<u32>> {
        match self {
            AnyTracker::Graph(t) => Some(t.state()),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&VisualState<HashCell>> {
        match self {
            AnyTracker::Hash(t) => Some(t.state()),
            _ => None,
        }
    }

    pub fn as_heap(&self) -> Option<&VisualState<Key>> {
        match self {
            AnyTracker::Heap(t) => Some(t.state()),
            _ => None,
        }
    }
}

/// First integer following `marker` in `text`, e.g. `"at 10."` → 10.
///
/// Only consulted for unstructured legacy notes; structured records carry
/// their vertex, key or case as fields.
pub(crate) fn number_after(text: &str, marker: &str) -> Option<Key> {
    let rest = &text[text.find(marker)? + marker.len()..];
    let token = rest.split_whitespace().next()?;
    token
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()
}
