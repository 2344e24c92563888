use serde::{Deserialize, Serialize};
use std::fmt;

/// The four structure families the visualizer knows about.
///
/// Serialized with the engine's `type` tags (`avl`, `graph`, `hash`, `minheap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StructureKind {
    #[serde(rename = "avl", alias = "tree")]
    Tree,
    #[serde(rename = "graph")]
    Graph,
    #[serde(rename = "hash")]
    Hash,
    #[serde(rename = "minheap", alias = "heap")]
    Heap,
}

impl StructureKind {
    pub const ALL: [StructureKind; 4] = [
        StructureKind::Tree,
        StructureKind::Graph,
        StructureKind::Hash,
        StructureKind::Heap,
    ];

    /// Tag used on the wire.
    pub fn wire_tag(self) -> &'static str {
        match self {
            StructureKind::Tree => "avl",
            StructureKind::Graph => "graph",
            StructureKind::Hash => "hash",
            StructureKind::Heap => "minheap",
        }
    }

    /// Identifier of the host view that displays this structure.
    pub fn view_id(self) -> &'static str {
        match self {
            StructureKind::Tree => "avl-view",
            StructureKind::Graph => "graph-view",
            StructureKind::Hash => "hash-view",
            StructureKind::Heap => "heap-view",
        }
    }

    pub fn from_view_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.view_id() == id)
    }

    /// Human-readable name used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            StructureKind::Tree => "AVL Tree",
            StructureKind::Graph => "Graph",
            StructureKind::Hash => "Hash Table",
            StructureKind::Heap => "Heap",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
