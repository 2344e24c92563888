//! One structure's view: snapshot, visual state, sequencer and layout cache.

use log::debug;

use dsviz_animation_core::{
    AnyTracker, Narration, SequencerError, StepSequencer, StructureConfig, Tick, TimerQueue,
};
use dsviz_api_core::{
    EngineRequest, EngineResponse, GraphAlgorithm, Key, Outcome, Snapshot, StepRecord,
    StructureKind,
};
use dsviz_layout_core::{LayoutCache, LayoutConfig};

use crate::render::{render_frame, Frame};
use crate::status::{Severity, StatusLog};

/// What the running operation was, for its completion line.
#[derive(Debug, Clone)]
struct Running {
    action: String,
    value: Option<Key>,
    outcome: Option<Outcome>,
    algorithm: Option<GraphAlgorithm>,
    last_note: Option<String>,
}

#[derive(Debug)]
pub struct Workbench {
    kind: StructureKind,
    config: StructureConfig,
    tracker: AnyTracker,
    sequencer: StepSequencer<StepRecord, Snapshot>,
    snapshot: Snapshot,
    layouts: LayoutCache,
    initialized: bool,
    running: Option<Running>,
}

impl Workbench {
    pub fn new(kind: StructureKind, config: StructureConfig, layout: LayoutConfig) -> Self {
        Self {
            kind,
            sequencer: StepSequencer::new(config.delay(), config.pacing),
            config,
            tracker: AnyTracker::for_kind(kind),
            snapshot: Snapshot::empty(kind),
            layouts: LayoutCache::new(layout),
            initialized: false,
            running: None,
        }
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn tracker(&self) -> &AnyTracker {
        &self.tracker
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    /// (applied, total) steps of the current run.
    pub fn progress(&self) -> (usize, usize) {
        self.sequencer.progress()
    }

    pub fn layouts(&self) -> &LayoutCache {
        &self.layouts
    }

    /// Vertices of the shown graph; zero for other structures.
    pub fn vertex_count(&self) -> usize {
        match &self.snapshot {
            Snapshot::Graph(graph) => graph.vertex_count,
            _ => 0,
        }
    }

    /// A response that did not report its vertex count only proves the
    /// vertices its edges touch; vertices already shown are kept.
    fn keep_known_vertices(&self, response: &mut EngineResponse) {
        if !response.vertex_count_inferred {
            return;
        }
        let known = self.vertex_count();
        if let Snapshot::Graph(graph) = &mut response.snapshot {
            graph.vertex_count = graph.vertex_count.max(known);
        }
    }

    /// Start replaying `response`. Nothing changes when the sequencer refuses.
    pub(crate) fn begin(
        &mut self,
        request: &EngineRequest,
        mut response: EngineResponse,
        timers: &mut TimerQueue<StructureKind>,
    ) -> Result<(), SequencerError> {
        self.keep_known_vertices(&mut response);
        // Nothing after the first terminal record is replayed.
        let steps = match response.steps.iter().position(StepRecord::is_terminal) {
            Some(last) => response.steps[..=last].to_vec(),
            None => response.steps.clone(),
        };
        self.sequencer
            .start(steps, response.snapshot.clone(), timers, self.kind)?;
        self.tracker.begin_operation(request, &response);
        self.initialized = true;
        self.snapshot = response.snapshot.clone();
        self.running = Some(Running {
            action: response.action.clone(),
            value: response.value,
            outcome: response.outcome,
            algorithm: request.algorithm(),
            last_note: None,
        });
        debug!(
            "{}: started {} ({} steps)",
            self.kind,
            request.symbol(),
            response.steps.len()
        );
        Ok(())
    }

    /// Show a state query result without animating.
    pub(crate) fn show_state(&mut self, mut response: EngineResponse) {
        self.keep_known_vertices(&mut response);
        self.snapshot = response.snapshot;
        self.tracker.reset(&self.snapshot);
        self.initialized = true;
    }

    /// Fired timer for this workbench.
    pub(crate) fn on_timer(&mut self, timers: &mut TimerQueue<StructureKind>, status: &mut StatusLog) {
        if let Some(tick) = self.sequencer.on_timer(timers, self.kind) {
            self.apply_tick(tick, status);
        }
    }

    /// Advance one step by hand. Only meaningful under manual pacing.
    pub(crate) fn step_now(&mut self, status: &mut StatusLog) -> bool {
        match self.sequencer.step_now() {
            Some(tick) => {
                self.apply_tick(tick, status);
                true
            }
            None => false,
        }
    }

    fn apply_tick(&mut self, tick: Tick<StepRecord, Snapshot>, status: &mut StatusLog) {
        match tick {
            Tick::Applied { index, step } => {
                if let (Some(running), Some(text)) = (self.running.as_mut(), step.text()) {
                    running.last_note = Some(text.to_string());
                }
                if let Some(narration) = self.tracker.apply_step(&step) {
                    self.narrate(index, narration, status);
                }
            }
            Tick::Completed { resting } => {
                self.snapshot = resting;
                self.tracker.settle();
                if let Some(running) = self.running.take() {
                    let (severity, text) = self.completion(&running);
                    status.push(severity, text);
                }
                debug!("{}: settled", self.kind);
            }
        }
    }

    fn narrate(&self, index: usize, narration: Narration, status: &mut StatusLog) {
        if narration.conclusive {
            status.push(Severity::Success, narration.text);
        } else if self.kind == StructureKind::Tree {
            status.push(Severity::Detail, format!("[STEP {}] {}", index + 1, narration.text));
        } else {
            status.push(Severity::Detail, narration.text);
        }
    }

    fn completion(&self, running: &Running) -> (Severity, String) {
        let severity = match running.outcome {
            Some(outcome) if !outcome.is_positive() => Severity::Warn,
            _ => Severity::Success,
        };
        let text = match (self.kind, running.algorithm) {
            (StructureKind::Tree, _) => "AVL Operation complete. Final state reached.".to_string(),
            (StructureKind::Graph, Some(algorithm)) => {
                format!("{} Complete!", algorithm.label().to_uppercase())
            }
            (StructureKind::Hash, _) => match &running.last_note {
                Some(note) => format!("Hash Operation: {note}"),
                None => "Hash Operation complete.".to_string(),
            },
            _ => match running.value {
                Some(value) => format!("{} {value} complete.", running.action.to_uppercase()),
                None => format!("{} complete.", running.action.to_uppercase()),
            },
        };
        (severity, text)
    }

    pub fn frame(&mut self) -> Frame {
        render_frame(
            &self.snapshot,
            &self.tracker,
            &mut self.layouts,
            self.config.canvas,
        )
    }
}
