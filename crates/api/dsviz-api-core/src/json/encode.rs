//! Engine-side encoding of responses into the wire format read by
//! [`parse_response`](super::parse_response).

use serde::Serialize;

use crate::kind::StructureKind;
use crate::snapshot::{Bucket, GraphEdge, Key, Snapshot, TreeNode};
use crate::step::StepRecord;

use super::{EngineResponse, Outcome};

#[derive(Serialize)]
#[serde(untagged)]
enum WireSnapshot<'a> {
    Tree {
        tree: &'a Option<Box<TreeNode>>,
    },
    Graph {
        vertices: usize,
        edges: &'a [GraphEdge],
    },
    Hash {
        #[serde(rename = "hashTable")]
        hash_table: &'a [Bucket],
    },
    Heap {
        heap: &'a [Key],
    },
}

impl<'a> From<&'a Snapshot> for WireSnapshot<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        match snapshot {
            Snapshot::Tree(tree) => WireSnapshot::Tree { tree: &tree.root },
            Snapshot::Graph(graph) => WireSnapshot::Graph {
                vertices: graph.vertex_count,
                edges: &graph.edges,
            },
            Snapshot::Hash(table) => WireSnapshot::Hash {
                hash_table: &table.buckets,
            },
            Snapshot::Heap(heap) => WireSnapshot::Heap { heap: &heap.values },
        }
    }
}

#[derive(Serialize)]
struct WireResponse<'a> {
    #[serde(rename = "type")]
    kind: StructureKind,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Key>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(flatten)]
    snapshot: Option<WireSnapshot<'a>>,
    steps: &'a [StepRecord],
}

/// Encode a successful response.
pub fn encode_response(response: &EngineResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireResponse {
        kind: response.kind,
        action: &response.action,
        value: response.value,
        outcome: response.outcome,
        reason: None,
        snapshot: Some(WireSnapshot::from(&response.snapshot)),
        steps: &response.steps,
    })
}

/// Encode an `action: "error"` response. The reason is repeated as the only
/// step for readers that only look at steps.
pub fn encode_error(
    kind: StructureKind,
    value: Option<Key>,
    reason: &str,
) -> Result<String, serde_json::Error> {
    let steps = [StepRecord::note(reason)];
    serde_json::to_string(&WireResponse {
        kind,
        action: "error",
        value,
        outcome: None,
        reason: Some(reason),
        snapshot: None,
        steps: &steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{parse_response, EngineReply};
    use crate::snapshot::{GraphSnapshot, TreeSnapshot};
    use crate::step::RotationCase;

    #[test]
    fn encoded_tree_response_parses_back() {
        let response = EngineResponse {
            kind: StructureKind::Tree,
            action: "insert".into(),
            value: Some(30),
            outcome: Some(Outcome::Inserted),
            snapshot: Snapshot::Tree(TreeSnapshot::new(Some(Box::new(TreeNode::leaf(30))))),
            steps: vec![
                StepRecord::note("Insertion of 30 started."),
                StepRecord::Rebalance {
                    at: 10,
                    case: RotationCase::RightRight,
                    text: "Unbalance at 10. RR Case: Left Rotation.".into(),
                },
            ],
            vertex_count_inferred: false,
        };
        let text = encode_response(&response).unwrap();
        assert_eq!(parse_response(&text).unwrap(), EngineReply::Ok(response));
    }

    #[test]
    fn empty_tree_is_encoded_as_null() {
        let response = EngineResponse {
            kind: StructureKind::Tree,
            action: "state".into(),
            value: None,
            outcome: None,
            snapshot: Snapshot::Tree(TreeSnapshot::default()),
            steps: vec![],
            vertex_count_inferred: false,
        };
        let text = encode_response(&response).unwrap();
        assert!(text.contains(r#""tree":null"#), "{text}");
    }

    #[test]
    fn graph_carries_vertex_count() {
        let response = EngineResponse {
            kind: StructureKind::Graph,
            action: "add_edge".into(),
            value: None,
            outcome: None,
            snapshot: Snapshot::Graph(GraphSnapshot::new(6, vec![GraphEdge::new(0, 1, 2)])),
            steps: vec![],
            vertex_count_inferred: false,
        };
        let EngineReply::Ok(back) = parse_response(&encode_response(&response).unwrap()).unwrap()
        else {
            panic!("expected ok");
        };
        assert_eq!(back.snapshot, response.snapshot);
        assert!(!back.vertex_count_inferred);
    }

    #[test]
    fn error_carries_reason() {
        let text = encode_error(StructureKind::Heap, Some(4), "Error: Heap is full.").unwrap();
        assert_eq!(
            parse_response(&text).unwrap(),
            EngineReply::Error {
                kind: Some(StructureKind::Heap),
                reason: "Error: Heap is full.".into()
            }
        );
    }
}
