//! Core configuration for dsviz-animation-core.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use dsviz_api_core::StructureKind;
use dsviz_layout_core::{Canvas, LayoutConfig};

/// How a running sequencer advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// One step per fixed delay, driven by the timer queue.
    #[default]
    Timed,
    /// One step per explicit `step_now` call.
    Manual,
}

/// Per-structure playback settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Delay between consecutive steps, in milliseconds.
    pub delay_ms: u64,
    #[serde(default)]
    pub pacing: Pacing,
    pub canvas: Canvas,
}

impl StructureConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tree: StructureConfig,
    pub graph: StructureConfig,
    pub hash: StructureConfig,
    pub heap: StructureConfig,
    pub layout: LayoutConfig,
    /// Maximum retained status lines; older lines fall off the end.
    pub status_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        let canvas = Canvas::new(800.0, 450.0);
        Self {
            tree: StructureConfig {
                delay_ms: 1000,
                pacing: Pacing::Timed,
                canvas,
            },
            graph: StructureConfig {
                delay_ms: 800,
                pacing: Pacing::Timed,
                canvas: Canvas::new(800.0, 500.0),
            },
            hash: StructureConfig {
                delay_ms: 1000,
                pacing: Pacing::Timed,
                canvas,
            },
            heap: StructureConfig {
                delay_ms: 500,
                pacing: Pacing::Timed,
                canvas,
            },
            layout: LayoutConfig::default(),
            status_capacity: 200,
        }
    }
}

impl Config {
    pub fn structure(&self, kind: StructureKind) -> &StructureConfig {
        match kind {
            StructureKind::Tree => &self.tree,
            StructureKind::Graph => &self.graph,
            StructureKind::Hash => &self.hash,
            StructureKind::Heap => &self.heap,
        }
    }

    pub fn structure_mut(&mut self, kind: StructureKind) -> &mut StructureConfig {
        match kind {
            StructureKind::Tree => &mut self.tree,
            StructureKind::Graph => &mut self.graph,
            StructureKind::Hash => &mut self.hash,
            StructureKind::Heap => &mut self.heap,
        }
    }
}
