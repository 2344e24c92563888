//! In-order tree layout.
//!
//! Nodes take consecutive horizontal units in key order, so x grows strictly
//! with the key. Depth picks the row. The finished drawing is centred on the
//! canvas.

use dsviz_api_core::{Key, TreeSnapshot};

use crate::config::{Canvas, LayoutConfig};
use crate::layout::{Layout, NodeMetrics, Placement};

pub fn layout_tree(tree: &TreeSnapshot, canvas: Canvas, config: &LayoutConfig) -> Layout<Key> {
    let mut layout = Layout::default();
    let mut unit = 0usize;

    tree.walk_in_order(|node, depth| {
        let x = unit as f64 * config.h_spacing + config.h_spacing / 2.0;
        let y = depth as f64 * config.v_spacing + config.top_offset;
        layout.insert(
            node.key,
            Placement {
                x,
                y,
                metrics: Some(NodeMetrics {
                    height: node.height,
                    balance: node.balance,
                }),
            },
        );
        unit += 1;
    });

    let shift = (canvas.width - unit as f64 * config.h_spacing) / 2.0;
    for placement in layout.placements_mut() {
        placement.x += shift;
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::TreeNode;

    fn node(key: Key, left: Option<TreeNode>, right: Option<TreeNode>) -> TreeNode {
        TreeNode {
            key,
            height: 1,
            balance: 0,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    #[test]
    fn three_nodes_centre_on_canvas() {
        let tree = TreeSnapshot::new(Some(Box::new(node(
            20,
            Some(node(10, None, None)),
            Some(node(30, None, None)),
        ))));
        let cfg = LayoutConfig::default();
        let layout = layout_tree(&tree, Canvas::new(800.0, 450.0), &cfg);

        // total width 3 * 65 = 195, shift (800 - 195) / 2 = 302.5
        assert_eq!(layout.point(&10).unwrap().x, 32.5 + 302.5);
        assert_eq!(layout.point(&20).unwrap().x, 97.5 + 302.5);
        assert_eq!(layout.point(&30).unwrap().x, 162.5 + 302.5);
        assert_eq!(layout.point(&20).unwrap().y, 30.0);
        assert_eq!(layout.point(&10).unwrap().y, 100.0);
        assert_eq!(
            layout.get(&20).unwrap().metrics,
            Some(NodeMetrics {
                height: 1,
                balance: 0
            })
        );
    }

    #[test]
    fn empty_tree_is_empty_layout() {
        let layout = layout_tree(
            &TreeSnapshot::default(),
            Canvas::default(),
            &LayoutConfig::default(),
        );
        assert!(layout.is_empty());
    }
}
