//! Engine response parsing.
//!
//! Every response is a JSON object carrying the structure `type`, the
//! `action` performed, the operand `value`, a structure-specific snapshot
//! field (`tree`, `edges`, `hashTable`, `heap`) and the ordered `steps`.
//! `action: "error"` turns the whole response into [`EngineReply::Error`].

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::kind::StructureKind;
use crate::snapshot::{
    nullable_node, Bucket, GraphEdge, GraphSnapshot, HashSnapshot, HeapSnapshot, Key, Snapshot,
    TreeNode, TreeSnapshot,
};
use crate::step::{StepRecord, WireStep};

mod encode;

pub use encode::{encode_error, encode_response};

/// Errors produced while decoding an engine response buffer.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("engine response parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("engine response for {0} carries no snapshot")]
    MissingSnapshot(StructureKind),
    #[error("expected a {expected} response, got {actual}")]
    KindMismatch {
        expected: StructureKind,
        actual: StructureKind,
    },
    #[error("empty engine response")]
    Empty,
}

/// Structured result of an operation, reported by the engine alongside the
/// narrative steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Inserted,
    Duplicate,
    Found,
    NotFound,
    Deleted,
    Extracted,
    Completed,
}

impl Outcome {
    /// Whether the operation reached its goal.
    pub fn is_positive(self) -> bool {
        !matches!(self, Outcome::NotFound | Outcome::Duplicate)
    }
}

/// A successful engine response.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineResponse {
    pub kind: StructureKind,
    pub action: String,
    pub value: Option<Key>,
    pub outcome: Option<Outcome>,
    pub snapshot: Snapshot,
    pub steps: Vec<StepRecord>,
    /// The graph vertex count was derived from edge endpoints because the
    /// response did not report it.
    pub vertex_count_inferred: bool,
}

impl EngineResponse {
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    Ok(EngineResponse),
    Error {
        kind: Option<StructureKind>,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "type", default)]
    kind: Option<StructureKind>,
    #[serde(default)]
    action: String,
    #[serde(default)]
    value: Option<JsonValue>,
    #[serde(default)]
    outcome: Option<Outcome>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default, deserialize_with = "present_tree")]
    tree: Option<Option<Box<TreeNode>>>,
    #[serde(default)]
    vertices: Option<usize>,
    #[serde(default)]
    edges: Option<Vec<GraphEdge>>,
    #[serde(rename = "hashTable", default)]
    hash_table: Option<Vec<Bucket>>,
    #[serde(default)]
    heap: Option<Vec<Key>>,
    #[serde(default)]
    steps: Vec<WireStep>,
}

/// Distinguishes an absent `tree` field (outer `None`) from `tree: null`.
fn present_tree<'de, D>(deserializer: D) -> Result<Option<Option<Box<TreeNode>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    nullable_node(deserializer).map(Some)
}

fn value_as_key(value: &Option<JsonValue>) -> Option<Key> {
    match value.as_ref()? {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode one engine response buffer.
pub fn parse_response(text: &str) -> Result<EngineReply, WireError> {
    if text.trim().is_empty() {
        return Err(WireError::Empty);
    }
    let raw: RawResponse = serde_json::from_str(text)?;
    let value = value_as_key(&raw.value);

    if raw.action == "error" {
        let reason = match raw.reason {
            Some(reason) => reason,
            None => raw
                .steps
                .into_iter()
                .map(StepRecord::from)
                .filter_map(|s| s.text().map(str::to_owned))
                .collect::<Vec<_>>()
                .join(" "),
        };
        let reason = if reason.is_empty() {
            "Unknown engine error".to_string()
        } else {
            reason
        };
        return Ok(EngineReply::Error {
            kind: raw.kind,
            reason,
        });
    }

    let kind = match raw.kind {
        Some(kind) => kind,
        None => infer_kind(&raw).ok_or(WireError::Empty)?,
    };

    let mut vertex_count_inferred = false;
    let snapshot = match kind {
        StructureKind::Tree => {
            let root = raw.tree.ok_or(WireError::MissingSnapshot(kind))?;
            Snapshot::Tree(TreeSnapshot::new(root))
        }
        StructureKind::Graph => {
            let edges = raw.edges.ok_or(WireError::MissingSnapshot(kind))?;
            let mut graph = GraphSnapshot::new(0, edges);
            graph.vertex_count = match raw.vertices {
                Some(n) => n,
                None if raw.action == "init" => value.map(|v| v.max(0) as usize).unwrap_or(0),
                None => {
                    vertex_count_inferred = true;
                    graph.min_vertex_count()
                }
            };
            Snapshot::Graph(graph)
        }
        StructureKind::Hash => {
            let buckets = raw.hash_table.ok_or(WireError::MissingSnapshot(kind))?;
            Snapshot::Hash(HashSnapshot::new(buckets))
        }
        StructureKind::Heap => {
            let values = raw.heap.ok_or(WireError::MissingSnapshot(kind))?;
            Snapshot::Heap(HeapSnapshot::new(values))
        }
    };

    Ok(EngineReply::Ok(EngineResponse {
        kind,
        action: raw.action,
        value,
        outcome: raw.outcome,
        snapshot,
        steps: raw.steps.into_iter().map(StepRecord::from).collect(),
        vertex_count_inferred,
    }))
}

fn infer_kind(raw: &RawResponse) -> Option<StructureKind> {
    if raw.tree.is_some() {
        Some(StructureKind::Tree)
    } else if raw.edges.is_some() {
        Some(StructureKind::Graph)
    } else if raw.hash_table.is_some() {
        Some(StructureKind::Hash)
    } else if raw.heap.is_some() {
        Some(StructureKind::Heap)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_reason_joins_steps() {
        let reply = parse_response(
            r#"{"type":"minheap","action":"error","value":0,"heap":[],"steps":["Error:","Heap is full."]}"#,
        )
        .unwrap();
        assert_eq!(
            reply,
            EngineReply::Error {
                kind: Some(StructureKind::Heap),
                reason: "Error: Heap is full.".into()
            }
        );
    }

    #[test]
    fn graph_vertex_count_sources() {
        let EngineReply::Ok(init) = parse_response(
            r#"{"type":"graph","action":"init","value":4,"edges":[],"steps":["Initialized graph with 4 vertices."]}"#,
        )
        .unwrap() else {
            panic!("expected ok");
        };
        assert_eq!(init.snapshot, Snapshot::Graph(GraphSnapshot::new(4, vec![])));
        assert!(!init.vertex_count_inferred);

        let EngineReply::Ok(add) = parse_response(
            r#"{"type":"graph","action":"add_edge","value":0,"edges":[{"f":0,"t":2,"w":5}],"steps":[]}"#,
        )
        .unwrap() else {
            panic!("expected ok");
        };
        assert!(add.vertex_count_inferred);
        assert_eq!(
            add.snapshot,
            Snapshot::Graph(GraphSnapshot::new(3, vec![GraphEdge::new(0, 2, 5)]))
        );
    }

    #[test]
    fn missing_snapshot_is_malformed() {
        let err = parse_response(r#"{"type":"hash","action":"insert","value":3,"steps":[]}"#)
            .unwrap_err();
        assert!(matches!(err, WireError::MissingSnapshot(StructureKind::Hash)));
        assert!(matches!(parse_response("  "), Err(WireError::Empty)));
        assert!(matches!(parse_response("{oops"), Err(WireError::Parse(_))));
    }

    #[test]
    fn empty_tree_is_not_missing() {
        let EngineReply::Ok(r) =
            parse_response(r#"{"type":"avl","action":"delete","value":5,"tree":null,"steps":[]}"#)
                .unwrap()
        else {
            panic!("expected ok");
        };
        assert!(r.snapshot.is_empty());
        assert!(!r.has_steps());
    }
}
