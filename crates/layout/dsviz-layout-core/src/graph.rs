//! Radial graph layout: vertices evenly spaced on a ring, vertex 0 at
//! twelve o'clock, continuing clockwise.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::config::{Canvas, LayoutConfig};
use crate::layout::{Layout, Placement, Point};

pub fn layout_graph(vertex_count: usize, canvas: Canvas, config: &LayoutConfig) -> Layout<u32> {
    let mut layout = Layout::with_capacity(vertex_count);
    if vertex_count == 0 {
        return layout;
    }
    let (cx, cy) = canvas.center();
    let radius = canvas.width.min(canvas.height) / config.graph_radius_divisor;
    for i in 0..vertex_count {
        let angle = (i as f64 / vertex_count as f64) * TAU - FRAC_PI_2;
        layout.insert(
            i as u32,
            Placement::at(cx + radius * angle.cos(), cy + radius * angle.sin()),
        );
    }
    layout
}

/// Geometry of a self-loop drawn above its vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopAnchor {
    pub vertex: Point,
    pub center: Point,
    pub radius: f64,
}

impl LoopAnchor {
    /// Point above the loop where the weight label goes.
    pub fn label(&self) -> Point {
        Point::new(self.center.x, self.center.y - self.radius - 8.0)
    }
}

pub fn loop_anchor(layout: &Layout<u32>, vertex: u32, config: &LayoutConfig) -> Option<LoopAnchor> {
    let at = layout.point(&vertex)?;
    let radius = config.loop_radius();
    Some(LoopAnchor {
        vertex: at,
        center: Point::new(at.x, at.y - radius),
        radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn vertex_zero_at_top_then_clockwise() {
        let cfg = LayoutConfig::default();
        let canvas = Canvas::new(800.0, 500.0);
        let layout = layout_graph(4, canvas, &cfg);
        let r = 500.0 / 2.5;

        let v0 = layout.point(&0).unwrap();
        assert!((v0.x - 400.0).abs() < EPS);
        assert!((v0.y - (250.0 - r)).abs() < EPS);

        // screen y grows downward, so a quarter turn lands on the right
        let v1 = layout.point(&1).unwrap();
        assert!((v1.x - (400.0 + r)).abs() < EPS);
        assert!((v1.y - 250.0).abs() < EPS);
    }

    #[test]
    fn zero_vertices_is_empty() {
        assert!(layout_graph(0, Canvas::default(), &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn self_loop_sits_above_vertex() {
        let cfg = LayoutConfig::default();
        let layout = layout_graph(3, Canvas::default(), &cfg);
        let anchor = loop_anchor(&layout, 2, &cfg).unwrap();
        assert_eq!(anchor.radius, 37.0);
        assert_eq!(anchor.center.x, anchor.vertex.x);
        assert_eq!(anchor.center.y, anchor.vertex.y - 37.0);
        assert!(loop_anchor(&layout, 9, &cfg).is_none());
    }
}
