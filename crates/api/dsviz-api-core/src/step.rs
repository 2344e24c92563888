//! Step records: one discrete unit of algorithm progress, replayed in order.
//!
//! Records are a closed sum type keyed by the wire `action` tag. Families:
//! - traversal: `visit_start`, `enqueue`, `dequeue`, `push_start`, `push`,
//!   `visit`, `pop`, `pop_backtrack`
//! - priority: `init_start`, `extract_min`, `relax`, `key_update`
//! - terminal: `final_result`
//! - structural: `rebalance`, `focus`, `swap`, `bucket`, `probe`, `note`
//!
//! Actions this build does not know decode to [`StepRecord::Unknown`] and are
//! skipped by trackers.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::metric::Metric;
use crate::snapshot::{GraphEdge, Key};

/// Display status of a single entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityStatus {
    #[default]
    Default,
    /// Queued / pushed / tentatively reached.
    Pending,
    /// Visited / confirmed part of the result.
    Finalized,
}

impl EntityStatus {
    pub fn code(self) -> u8 {
        match self {
            EntityStatus::Default => 0,
            EntityStatus::Pending => 1,
            EntityStatus::Finalized => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EntityStatus::Default),
            1 => Some(EntityStatus::Pending),
            2 => Some(EntityStatus::Finalized),
            _ => None,
        }
    }
}

// On the wire statuses are the engine's numeric codes (0/1/2).
impl Serialize for EntityStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for EntityStatus {
    fn deserialize<D>(deserializer: D) -> Result<EntityStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        EntityStatus::from_code(code)
            .ok_or_else(|| de::Error::custom(format!("unknown status code {code}")))
    }
}

/// Status change for one vertex carried by a traversal / priority step.
/// DFS records spell the status key `st`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMark {
    #[serde(rename = "n")]
    pub vertex: u32,
    #[serde(rename = "s", alias = "st")]
    pub status: EntityStatus,
}

/// One priority-queue entry as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PqEntry {
    #[serde(rename = "v")]
    pub vertex: u32,
    #[serde(rename = "d")]
    pub priority: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationCase {
    #[serde(rename = "LL")]
    LeftLeft,
    #[serde(rename = "RR")]
    RightRight,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl RotationCase {
    pub fn code(self) -> &'static str {
        match self {
            RotationCase::LeftLeft => "LL",
            RotationCase::RightRight => "RR",
            RotationCase::LeftRight => "LR",
            RotationCase::RightLeft => "RL",
        }
    }

    pub fn rotation(self) -> &'static str {
        match self {
            RotationCase::LeftLeft => "Right Rotation",
            RotationCase::RightRight => "Left Rotation",
            RotationCase::LeftRight | RotationCase::RightLeft => "Double Rotation",
        }
    }
}

impl fmt::Display for RotationCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Case: {}", self.code(), self.rotation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapDirection {
    Parent,
    Child,
}

/// How a finalized edge set is matched against drawn edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSemantics {
    /// Minimum spanning tree: either orientation matches.
    Undirected,
    /// Shortest-path tree: only the exact orientation matches.
    Directed,
}

/// Terminal record carrying the algorithm's aggregate output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_dist: Option<Vec<Metric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_key: Option<Vec<Metric>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cost: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_sp_edges: Option<Vec<GraphEdge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_mst_edges: Option<Vec<GraphEdge>>,
}

impl FinalResult {
    /// Final distance (shortest path) or key (MST) array.
    pub fn metrics(&self) -> Option<&[Metric]> {
        self.final_dist
            .as_deref()
            .or(self.final_key.as_deref())
    }

    /// Final edge set and the orientation rule it is matched with.
    pub fn edges(&self) -> Option<(&[GraphEdge], EdgeSemantics)> {
        if let Some(edges) = self.final_mst_edges.as_deref() {
            return Some((edges, EdgeSemantics::Undirected));
        }
        self.final_sp_edges
            .as_deref()
            .map(|edges| (edges, EdgeSemantics::Directed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepRecord {
    // Traversal family (BFS queue / DFS stack).
    VisitStart {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "q", default)]
        queue: Vec<u32>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    Enqueue {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "q", default)]
        queue: Vec<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edge: Option<(u32, u32)>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    Dequeue {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "q", default)]
        queue: Vec<u32>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    PushStart {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "s", default)]
        stack: Vec<u32>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    Push {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "s", default)]
        stack: Vec<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edge: Option<(u32, u32)>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    Visit {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "s", default)]
        stack: Vec<u32>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    Pop {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "s", default)]
        stack: Vec<u32>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    PopBacktrack {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(rename = "s", default)]
        stack: Vec<u32>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },

    // Priority family (Dijkstra distances / Prim keys).
    InitStart {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(default)]
        pq: Vec<PqEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dist: Option<Vec<Metric>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<Vec<Metric>>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    ExtractMin {
        #[serde(rename = "v")]
        vertex: u32,
        #[serde(default)]
        pq: Vec<PqEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dist: Option<Vec<Metric>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<Vec<Metric>>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    Relax {
        edge: (u32, u32),
        #[serde(default)]
        pq: Vec<PqEntry>,
        dist: Vec<Metric>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },
    KeyUpdate {
        edge: (u32, u32),
        #[serde(default)]
        pq: Vec<PqEntry>,
        key: Vec<Metric>,
        #[serde(default)]
        nodes: Vec<StatusMark>,
    },

    // Terminal.
    FinalResult(FinalResult),

    // Structural family (tree / heap / hash).
    Rebalance {
        at: Key,
        case: RotationCase,
        #[serde(default)]
        text: String,
    },
    Focus {
        #[serde(rename = "v")]
        value: Key,
        #[serde(default)]
        text: String,
    },
    Swap {
        #[serde(rename = "v")]
        value: Key,
        with: Key,
        toward: SwapDirection,
        #[serde(default)]
        text: String,
    },
    Bucket {
        bucket: usize,
        #[serde(rename = "v")]
        value: Key,
    },
    Probe {
        bucket: usize,
        position: usize,
        #[serde(rename = "v")]
        value: Key,
        hit: bool,
    },
    /// Free-text narration with no structured payload.
    Note { text: String },

    #[serde(other)]
    Unknown,
}

impl StepRecord {
    pub fn note(text: impl Into<String>) -> Self {
        StepRecord::Note { text: text.into() }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StepRecord::FinalResult(_))
    }

    /// Wire action tag.
    pub fn action(&self) -> &'static str {
        match self {
            StepRecord::VisitStart { .. } => "visit_start",
            StepRecord::Enqueue { .. } => "enqueue",
            StepRecord::Dequeue { .. } => "dequeue",
            StepRecord::PushStart { .. } => "push_start",
            StepRecord::Push { .. } => "push",
            StepRecord::Visit { .. } => "visit",
            StepRecord::Pop { .. } => "pop",
            StepRecord::PopBacktrack { .. } => "pop_backtrack",
            StepRecord::InitStart { .. } => "init_start",
            StepRecord::ExtractMin { .. } => "extract_min",
            StepRecord::Relax { .. } => "relax",
            StepRecord::KeyUpdate { .. } => "key_update",
            StepRecord::FinalResult(_) => "final_result",
            StepRecord::Rebalance { .. } => "rebalance",
            StepRecord::Focus { .. } => "focus",
            StepRecord::Swap { .. } => "swap",
            StepRecord::Bucket { .. } => "bucket",
            StepRecord::Probe { .. } => "probe",
            StepRecord::Note { .. } => "note",
            StepRecord::Unknown => "unknown",
        }
    }

    /// Vertex a traversal / priority step is about, if any.
    pub fn vertex(&self) -> Option<u32> {
        match self {
            StepRecord::VisitStart { vertex, .. }
            | StepRecord::Enqueue { vertex, .. }
            | StepRecord::Dequeue { vertex, .. }
            | StepRecord::PushStart { vertex, .. }
            | StepRecord::Push { vertex, .. }
            | StepRecord::Visit { vertex, .. }
            | StepRecord::Pop { vertex, .. }
            | StepRecord::PopBacktrack { vertex, .. }
            | StepRecord::InitStart { vertex, .. }
            | StepRecord::ExtractMin { vertex, .. } => Some(*vertex),
            StepRecord::Relax { edge, .. } | StepRecord::KeyUpdate { edge, .. } => Some(edge.1),
            _ => None,
        }
    }

    /// Status marks carried by the record.
    pub fn marks(&self) -> &[StatusMark] {
        match self {
            StepRecord::VisitStart { nodes, .. }
            | StepRecord::Enqueue { nodes, .. }
            | StepRecord::Dequeue { nodes, .. }
            | StepRecord::PushStart { nodes, .. }
            | StepRecord::Push { nodes, .. }
            | StepRecord::Visit { nodes, .. }
            | StepRecord::Pop { nodes, .. }
            | StepRecord::PopBacktrack { nodes, .. }
            | StepRecord::InitStart { nodes, .. }
            | StepRecord::ExtractMin { nodes, .. }
            | StepRecord::Relax { nodes, .. }
            | StepRecord::KeyUpdate { nodes, .. } => nodes,
            _ => &[],
        }
    }

    /// Distance / key snapshot carried by priority records.
    pub fn metrics(&self) -> Option<&[Metric]> {
        match self {
            StepRecord::InitStart { dist, key, .. } | StepRecord::ExtractMin { dist, key, .. } => {
                dist.as_deref().or(key.as_deref())
            }
            StepRecord::Relax { dist, .. } => Some(dist),
            StepRecord::KeyUpdate { key, .. } => Some(key),
            StepRecord::FinalResult(result) => result.metrics(),
            _ => None,
        }
    }

    /// Free text attached to the record, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            StepRecord::Rebalance { text, .. }
            | StepRecord::Focus { text, .. }
            | StepRecord::Swap { text, .. }
            | StepRecord::Note { text } => Some(text.as_str()).filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}

/// A step as it appears on the wire: either a structured record or a plain
/// narrative string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireStep {
    Text(String),
    Record(StepRecord),
}

impl From<WireStep> for StepRecord {
    fn from(step: WireStep) -> Self {
        match step {
            WireStep::Text(text) => StepRecord::Note { text },
            WireStep::Record(record) => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bfs_enqueue() {
        let raw = r#"{"q":[1,2], "v":2, "action":"enqueue", "edge":[0,2], "nodes":[{"n":2,"s":1}]}"#;
        let step: StepRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(
            step,
            StepRecord::Enqueue {
                vertex: 2,
                queue: vec![1, 2],
                edge: Some((0, 2)),
                nodes: vec![StatusMark {
                    vertex: 2,
                    status: EntityStatus::Pending
                }],
            }
        );
        assert_eq!(step.vertex(), Some(2));
    }

    #[test]
    fn decodes_dfs_status_alias() {
        let raw = r#"{"s":[], "v":0, "action":"pop_backtrack", "nodes":[{"n":0,"st":2}]}"#;
        let step: StepRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(step.marks()[0].status, EntityStatus::Finalized);
        assert_eq!(step.action(), "pop_backtrack");
    }

    #[test]
    fn decodes_final_result_with_mst_edges() {
        let raw = r#"{"final_cost":4, "final_key":[0,1,"INF"], "final_mst_edges":[{"f":0,"t":1,"w":1}], "action":"final_result"}"#;
        let step: StepRecord = serde_json::from_str(raw).unwrap();
        let StepRecord::FinalResult(result) = &step else {
            panic!("expected final_result, got {step:?}");
        };
        assert_eq!(result.final_cost, Some(4));
        let (edges, semantics) = result.edges().unwrap();
        assert_eq!(semantics, EdgeSemantics::Undirected);
        assert_eq!(edges, &[GraphEdge::new(0, 1, 1)]);
        assert_eq!(step.metrics().unwrap()[2], Metric::Infinite);
    }

    #[test]
    fn unknown_actions_are_tolerated() {
        let raw = r#"{"action":"teleport","v":3}"#;
        let step: StepRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(step, StepRecord::Unknown);
    }

    #[test]
    fn plain_strings_become_notes() {
        let steps: Vec<WireStep> =
            serde_json::from_str(r#"["Inserted node 5.", {"action":"note","text":"x"}]"#).unwrap();
        let steps: Vec<StepRecord> = steps.into_iter().map(Into::into).collect();
        assert_eq!(steps[0], StepRecord::note("Inserted node 5."));
        assert_eq!(steps[1].text(), Some("x"));
    }

    #[test]
    fn rotation_case_display() {
        assert_eq!(RotationCase::RightRight.to_string(), "RR Case: Left Rotation");
        let c: RotationCase = serde_json::from_str("\"LR\"").unwrap();
        assert_eq!(c, RotationCase::LeftRight);
    }
}
