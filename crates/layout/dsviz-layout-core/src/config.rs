//! Layout geometry constants.

use serde::{Deserialize, Serialize};

/// Drawing surface size in pixels. Read once per full redraw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800.0, 450.0)
    }
}

/// Spacing, offsets and node radii used by every layout strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal unit between consecutive in-order tree nodes.
    pub h_spacing: f64,
    /// Vertical distance between tree levels.
    pub v_spacing: f64,
    /// Distance from the top edge to the tree root.
    pub top_offset: f64,

    pub tree_node_radius: f64,
    pub graph_node_radius: f64,
    pub heap_node_radius: f64,

    /// Extra distance between a vertex and its self-loop circle.
    pub loop_gap: f64,
    /// Ring radius is `min(width, height) / graph_radius_divisor`.
    pub graph_radius_divisor: f64,

    pub hash_row_height: f64,
    pub hash_top: f64,
    pub hash_label_width: f64,
    pub hash_cell_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            h_spacing: 65.0,
            v_spacing: 70.0,
            top_offset: 30.0,
            tree_node_radius: 15.0,
            graph_node_radius: 25.0,
            heap_node_radius: 20.0,
            loop_gap: 12.0,
            graph_radius_divisor: 2.5,
            hash_row_height: 48.0,
            hash_top: 30.0,
            hash_label_width: 60.0,
            hash_cell_width: 64.0,
        }
    }
}

impl LayoutConfig {
    /// Distance from a vertex centre to the centre of its self-loop.
    pub fn loop_radius(&self) -> f64 {
        self.graph_node_radius + self.loop_gap
    }
}
