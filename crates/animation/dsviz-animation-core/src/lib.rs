//! dsviz-animation-core (engine-agnostic)
//!
//! Replays an operation's step records over time: a cooperative timer queue,
//! the per-operation step sequencer, and per-structure visual state trackers
//! that turn each record into status, focus and auxiliary display changes.

pub mod config;
pub mod scheduler;
pub mod sequencer;
pub mod tracker;

// Re-exports for consumers (orchestrator, wasm host)
pub use config::{Config, Pacing, StructureConfig};
pub use scheduler::{Scheduler, TimerHandle, TimerQueue};
pub use sequencer::{SequencerError, SequencerState, StepSequencer, Tick};
pub use tracker::hash::calculate_index;
pub use tracker::{
    AnyTracker, AuxDisplay, GraphTracker, HashTracker, HeapTracker, Narration, TreeTracker,
    VisualState, VisualStateTracker,
};
