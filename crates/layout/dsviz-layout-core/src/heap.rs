//! Complete-binary-tree heap layout keyed by array index.
//!
//! Each level splits the canvas width into equal slots; each node sits in the
//! middle of its slot. Levels are spread evenly over the canvas height.

use crate::config::Canvas;
use crate::layout::{Layout, Placement};

pub fn depth_of(index: usize) -> u32 {
    (index + 1).ilog2()
}

pub fn layout_heap(len: usize, canvas: Canvas) -> Layout<usize> {
    let mut layout = Layout::with_capacity(len);
    if len == 0 {
        return layout;
    }
    // ceil(log2(len + 1))
    let max_depth = usize::BITS - len.leading_zeros();
    let v_step = canvas.height / (max_depth as f64 + 1.0);

    for i in 0..len {
        let depth = depth_of(i);
        let nodes_at_depth = 1usize << depth;
        let index_at_depth = i - (nodes_at_depth - 1);
        let slot = canvas.width / nodes_at_depth as f64;
        layout.insert(
            i,
            Placement::at(
                slot * (index_at_depth as f64 + 0.5),
                v_step * (depth as f64 + 1.0),
            ),
        );
    }
    layout
}
