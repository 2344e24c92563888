//! Memoized layouts. A layout is reused until the shape it was computed from
//! (or the canvas) changes, so the steps of one operation share a layout.

use log::debug;
use std::hash::Hash;

use dsviz_api_core::{HashSnapshot, Key, TreeSnapshot};

use crate::config::{Canvas, LayoutConfig};
use crate::graph::layout_graph;
use crate::hash::{layout_hash, HashCell};
use crate::heap::layout_heap;
use crate::layout::Layout;
use crate::tree::layout_tree;

#[derive(Debug)]
struct Cached<S, K: Hash + Eq> {
    shape: S,
    canvas: Canvas,
    layout: Layout<K>,
}

impl<S: PartialEq, K: Hash + Eq> Cached<S, K> {
    fn fresh(&self, shape: &S, canvas: Canvas) -> bool {
        self.shape == *shape && self.canvas == canvas
    }
}

#[derive(Debug, Default)]
pub struct LayoutCache {
    config: LayoutConfig,
    tree: Option<Cached<TreeSnapshot, Key>>,
    graph: Option<Cached<usize, u32>>,
    heap: Option<Cached<usize, usize>>,
    hash: Option<Cached<Vec<usize>, HashCell>>,
    recomputes: usize,
}

impl LayoutCache {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Number of layouts computed since creation.
    pub fn recomputes(&self) -> usize {
        self.recomputes
    }

    /// Drop every cached layout.
    pub fn invalidate(&mut self) {
        self.tree = None;
        self.graph = None;
        self.heap = None;
        self.hash = None;
    }

    pub fn tree(&mut self, tree: &TreeSnapshot, canvas: Canvas) -> &Layout<Key> {
        if !self.tree.as_ref().is_some_and(|c| c.fresh(tree, canvas)) {
            self.tree = None;
        }
        let config = &self.config;
        let recomputes = &mut self.recomputes;
        &self
            .tree
            .get_or_insert_with(|| {
                *recomputes += 1;
                debug!("tree layout recomputed ({} nodes)", tree.len());
                Cached {
                    shape: tree.clone(),
                    canvas,
                    layout: layout_tree(tree, canvas, config),
                }
            })
            .layout
    }

    /// Radial layout depends only on the vertex count, so edge edits reuse it.
    pub fn graph(&mut self, vertex_count: usize, canvas: Canvas) -> &Layout<u32> {
        if !self
            .graph
            .as_ref()
            .is_some_and(|c| c.fresh(&vertex_count, canvas))
        {
            self.graph = None;
        }
        let config = &self.config;
        let recomputes = &mut self.recomputes;
        &self
            .graph
            .get_or_insert_with(|| {
                *recomputes += 1;
                debug!("graph layout recomputed ({vertex_count} vertices)");
                Cached {
                    shape: vertex_count,
                    canvas,
                    layout: layout_graph(vertex_count, canvas, config),
                }
            })
            .layout
    }

    pub fn heap(&mut self, len: usize, canvas: Canvas) -> &Layout<usize> {
        if !self.heap.as_ref().is_some_and(|c| c.fresh(&len, canvas)) {
            self.heap = None;
        }
        let recomputes = &mut self.recomputes;
        &self
            .heap
            .get_or_insert_with(|| {
                *recomputes += 1;
                debug!("heap layout recomputed ({len} nodes)");
                Cached {
                    shape: len,
                    canvas,
                    layout: layout_heap(len, canvas),
                }
            })
            .layout
    }

    /// Hash rows depend on chain lengths only; the canvas is ignored.
    pub fn hash(&mut self, table: &HashSnapshot, canvas: Canvas) -> &Layout<HashCell> {
        let shape: Vec<usize> = table.buckets.iter().map(|b| b.chain.len()).collect();
        if !self.hash.as_ref().is_some_and(|c| c.fresh(&shape, canvas)) {
            self.hash = None;
        }
        let config = &self.config;
        let recomputes = &mut self.recomputes;
        &self
            .hash
            .get_or_insert_with(|| {
                *recomputes += 1;
                debug!("hash layout recomputed ({} buckets)", shape.len());
                Cached {
                    layout: layout_hash(table, config),
                    shape,
                    canvas,
                }
            })
            .layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::TreeNode;

    #[test]
    fn graph_layout_survives_edge_edits() {
        let mut cache = LayoutCache::default();
        let canvas = Canvas::new(800.0, 500.0);
        let first = cache.graph(5, canvas).clone();
        let again = cache.graph(5, canvas).clone();
        assert_eq!(first, again);
        assert_eq!(cache.recomputes(), 1);

        cache.graph(6, canvas);
        assert_eq!(cache.recomputes(), 2);
        cache.graph(6, Canvas::new(640.0, 480.0));
        assert_eq!(cache.recomputes(), 3);
    }

    #[test]
    fn tree_layout_tracks_shape() {
        let mut cache = LayoutCache::default();
        let canvas = Canvas::default();
        let one = TreeSnapshot::new(Some(Box::new(TreeNode::leaf(1))));
        cache.tree(&one, canvas);
        cache.tree(&one, canvas);
        assert_eq!(cache.recomputes(), 1);

        let mut two = one.clone();
        if let Some(root) = two.root.as_mut() {
            root.right = Some(Box::new(TreeNode::leaf(2)));
        }
        assert_eq!(cache.tree(&two, canvas).len(), 2);
        assert_eq!(cache.recomputes(), 2);
    }
}
