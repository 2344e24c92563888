//! dsviz-layout-core: pure snapshot → placement layouts.
//!
//! Every strategy is a deterministic function of (shape, canvas, config) and
//! handles size zero by returning an empty [`Layout`].

pub mod cache;
pub mod config;
pub mod graph;
pub mod hash;
pub mod heap;
pub mod layout;
pub mod tree;

pub use cache::LayoutCache;
pub use config::{Canvas, LayoutConfig};
pub use graph::{layout_graph, loop_anchor, LoopAnchor};
pub use hash::{layout_hash, HashCell};
pub use heap::layout_heap;
pub use layout::{Layout, NodeMetrics, Placement, Point};
pub use tree::layout_tree;
