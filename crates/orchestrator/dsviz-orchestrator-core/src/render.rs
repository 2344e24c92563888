//! Frame assembly: snapshot + layout + visual state → drawable sprites.
//!
//! A [`Frame`] is plain data. Hosts draw it through a [`Renderer`]; the wasm
//! crate hands it to JavaScript as JSON.

use serde::Serialize;
use std::fmt::Write as _;

use dsviz_animation_core::{AnyTracker, VisualState};
use dsviz_api_core::{EntityStatus, Key, Snapshot, StructureKind};
use dsviz_layout_core::{loop_anchor, Canvas, HashCell, LayoutCache, NodeMetrics, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Default,
    Pending,
    Finalized,
    Focus,
    Unbalanced,
}

impl Appearance {
    // Focus beats status; status beats the balance warning.
    fn resolve(focus: bool, status: EntityStatus, unbalanced: bool) -> Self {
        if focus {
            return Appearance::Focus;
        }
        match status {
            EntityStatus::Finalized => Appearance::Finalized,
            EntityStatus::Pending => Appearance::Pending,
            EntityStatus::Default if unbalanced => Appearance::Unbalanced,
            EntityStatus::Default => Appearance::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSprite {
    pub label: String,
    pub at: Point,
    pub radius: f64,
    pub appearance: Appearance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<NodeMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Normal,
    Active,
    Finalized,
}

/// Circle drawn for a self-loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoopCircle {
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSprite {
    pub from: Point,
    pub to: Point,
    pub directed: bool,
    pub style: EdgeStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_loop: Option<LoopCircle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub kind: StructureKind,
    /// Placeholder text shown instead of sprites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    /// Rotation currently being illustrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub nodes: Vec<NodeSprite>,
    pub edges: Vec<EdgeSprite>,
    /// Queue / stack / PQ line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<String>,
    /// Per-vertex distance or key labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<String>>,
    /// Level-order heap array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<Vec<Key>>,
}

impl Frame {
    fn new(kind: StructureKind) -> Self {
        Self {
            kind,
            empty_message: None,
            caption: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            aux: None,
            metrics: None,
            array: None,
        }
    }

    fn empty(kind: StructureKind, message: &str) -> Self {
        Self {
            empty_message: Some(message.to_string()),
            ..Self::new(kind)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty_message.is_some()
    }

    /// Node with the given label, if drawn.
    pub fn node(&self, label: &str) -> Option<&NodeSprite> {
        self.nodes.iter().find(|n| n.label == label)
    }
}

/// A drawing backend. Called once per frame with the full scene.
pub trait Renderer {
    type Output;

    fn render(&mut self, frame: &Frame) -> Self::Output;
}

/// Line-per-sprite text dump, used for logs and snapshot tests.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, frame: &Frame) -> String {
        let mut out = String::new();
        if let Some(message) = &frame.empty_message {
            let _ = writeln!(out, "{message}");
            return out;
        }
        for node in &frame.nodes {
            let _ = writeln!(
                out,
                "node {} ({:.1}, {:.1}) {:?}",
                node.label, node.at.x, node.at.y, node.appearance
            );
        }
        for edge in &frame.edges {
            let _ = writeln!(
                out,
                "edge ({:.1}, {:.1}) -> ({:.1}, {:.1}) {:?}{}",
                edge.from.x,
                edge.from.y,
                edge.to.x,
                edge.to.y,
                edge.style,
                edge.label.as_deref().map(|l| format!(" w={l}")).unwrap_or_default()
            );
        }
        if let Some(aux) = &frame.aux {
            let _ = writeln!(out, "{aux}");
        }
        out
    }
}

/// Build the frame for `snapshot` under the tracker's current visual state.
pub fn render_frame(
    snapshot: &Snapshot,
    tracker: &AnyTracker,
    layouts: &mut LayoutCache,
    canvas: Canvas,
) -> Frame {
    let mut frame = match snapshot {
        Snapshot::Tree(tree) => {
            if tree.is_empty() {
                return Frame::empty(StructureKind::Tree, "AVL Tree is Empty");
            }
            let radius = layouts.config().tree_node_radius;
            let state = tracker.as_tree();
            let layout = layouts.tree(tree, canvas);
            let mut frame = Frame::new(StructureKind::Tree);
            for (key, at) in layout.iter() {
                let unbalanced = at.metrics.is_some_and(|m| m.balance.abs() > 1);
                frame.nodes.push(NodeSprite {
                    label: key.to_string(),
                    at: at.point(),
                    radius,
                    appearance: appearance(state, key, unbalanced),
                    metrics: at.metrics,
                });
            }
            for (parent, child) in tree.links() {
                if let (Some(from), Some(to)) = (layout.point(&parent), layout.point(&child)) {
                    frame.edges.push(plain_edge(from, to, false));
                }
            }
            frame.caption = state.and_then(|s| s.rotation).map(|r| r.to_string());
            frame
        }
        Snapshot::Graph(graph) => {
            if graph.vertex_count == 0 {
                return Frame::empty(StructureKind::Graph, "Graph is Empty");
            }
            let config = layouts.config().clone();
            let state = tracker.as_graph();
            let layout = layouts.graph(graph.vertex_count, canvas);
            let mut frame = Frame::new(StructureKind::Graph);
            for (v, at) in layout.iter() {
                frame.nodes.push(NodeSprite {
                    label: v.to_string(),
                    at: at.point(),
                    radius: config.graph_node_radius,
                    appearance: appearance(state, v, false),
                    metrics: None,
                });
            }
            for edge in &graph.edges {
                let style = match state {
                    Some(s) if s.active_edge == Some((edge.from, edge.to)) => EdgeStyle::Active,
                    Some(s) if s.is_edge_finalized(edge.from, edge.to) => EdgeStyle::Finalized,
                    _ => EdgeStyle::Normal,
                };
                let label = Some(edge.weight.to_string());
                if edge.is_self_loop() {
                    if let Some(anchor) = loop_anchor(layout, edge.from, &config) {
                        frame.edges.push(EdgeSprite {
                            from: anchor.vertex,
                            to: anchor.label(),
                            directed: true,
                            style,
                            label,
                            self_loop: Some(LoopCircle {
                                center: anchor.center,
                                radius: anchor.radius,
                            }),
                        });
                    }
                    continue;
                }
                if let (Some(from), Some(to)) = (layout.point(&edge.from), layout.point(&edge.to)) {
                    frame.edges.push(EdgeSprite {
                        style,
                        label,
                        ..plain_edge(from, to, true)
                    });
                }
            }
            frame.metrics = state
                .and_then(|s| s.metrics.as_ref())
                .map(|m| m.iter().map(ToString::to_string).collect());
            frame
        }
        Snapshot::Hash(table) => {
            if table.bucket_count() == 0 {
                return Frame::empty(StructureKind::Hash, "Hash Table not initialized.");
            }
            let state = tracker.as_hash();
            let layout = layouts.hash(table, canvas);
            let mut frame = Frame::new(StructureKind::Hash);
            for (cell, at) in layout.iter() {
                let label = match *cell {
                    HashCell::Label { bucket } => format!("[{bucket}]"),
                    HashCell::Item { bucket, position } => {
                        match table.bucket(bucket).and_then(|b| b.chain.get(position)) {
                            Some(v) => v.to_string(),
                            None => continue,
                        }
                    }
                };
                frame.nodes.push(NodeSprite {
                    label,
                    at: at.point(),
                    radius: 0.0,
                    appearance: appearance(state, cell, false),
                    metrics: None,
                });
            }
            for bucket in &table.buckets {
                for position in 1..bucket.chain.len() {
                    let prev = HashCell::Item {
                        bucket: bucket.index,
                        position: position - 1,
                    };
                    let next = HashCell::Item {
                        bucket: bucket.index,
                        position,
                    };
                    if let (Some(from), Some(to)) = (layout.point(&prev), layout.point(&next)) {
                        frame.edges.push(plain_edge(from, to, true));
                    }
                }
            }
            frame
        }
        Snapshot::Heap(heap) => {
            if heap.is_empty() {
                return Frame::empty(StructureKind::Heap, "Heap is Empty");
            }
            let radius = layouts.config().heap_node_radius;
            let state = tracker.as_heap();
            let layout = layouts.heap(heap.len(), canvas);
            let mut frame = Frame::new(StructureKind::Heap);
            for (index, at) in layout.iter() {
                let Some(value) = heap.values.get(*index) else {
                    continue;
                };
                frame.nodes.push(NodeSprite {
                    label: value.to_string(),
                    at: at.point(),
                    radius,
                    appearance: appearance(state, value, false),
                    metrics: None,
                });
            }
            for child in 1..heap.len() {
                let parent = (child - 1) / 2;
                if let (Some(from), Some(to)) = (layout.point(&parent), layout.point(&child)) {
                    frame.edges.push(plain_edge(from, to, false));
                }
            }
            frame.array = Some(heap.values.clone());
            frame
        }
    };
    frame.aux = tracker.aux().map(ToString::to_string);
    frame
}

fn appearance<K>(state: Option<&VisualState<K>>, id: &K, unbalanced: bool) -> Appearance
where
    K: std::hash::Hash + Eq + Clone,
{
    match state {
        Some(s) => Appearance::resolve(s.is_focus(id), s.status_of(id), unbalanced),
        None => Appearance::resolve(false, EntityStatus::Default, unbalanced),
    }
}

fn plain_edge(from: Point, to: Point, directed: bool) -> EdgeSprite {
    EdgeSprite {
        from,
        to,
        directed,
        style: EdgeStyle::Normal,
        label: None,
        self_loop: None,
    }
}
