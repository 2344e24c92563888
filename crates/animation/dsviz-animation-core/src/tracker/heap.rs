//! Min-heap tracker. Entities are identified by value; the focus follows
//! the value being sifted.

use log::debug;

use dsviz_api_core::{
    EngineRequest, EngineResponse, FinalResult, Key, Snapshot, StepRecord, StructureKind,
    SwapDirection,
};

use super::{number_after, Narration, VisualState, VisualStateTracker};

#[derive(Debug, Clone, Default)]
pub struct HeapTracker {
    state: VisualState<Key>,
}

impl VisualStateTracker for HeapTracker {
    type Id = Key;

    fn kind(&self) -> StructureKind {
        StructureKind::Heap
    }

    fn state(&self) -> &VisualState<Key> {
        &self.state
    }

    fn begin_operation(&mut self, request: &EngineRequest, response: &EngineResponse) {
        // Extract has no operand; the engine reports the removed minimum.
        self.state.focus = request.operand().or(response.value);
        self.state.concluded = false;
    }

    fn apply_step(&mut self, step: &StepRecord) -> Option<Narration> {
        if !self.state.admit(step) {
            return None;
        }
        match step {
            StepRecord::Swap {
                value,
                with,
                toward,
                text,
            } => {
                self.state.focus = Some(*value);
                let text = if text.is_empty() {
                    let toward = match toward {
                        SwapDirection::Parent => "Parent",
                        SwapDirection::Child => "Child",
                    };
                    format!("Swapping {value} with {toward} {with}.")
                } else {
                    text.clone()
                };
                Some(Narration::detail(text))
            }
            StepRecord::Focus { value, .. } => {
                self.state.focus = Some(*value);
                step.text().map(Narration::detail)
            }
            StepRecord::Note { text } => {
                // Legacy free text; structured swaps arrive as `Swap`.
                if let Some(value) = number_after(text, "Swapping ") {
                    self.state.focus = Some(value);
                }
                Some(Narration::detail(text.clone()))
            }
            other => {
                debug!("heap tracker: ignoring '{}' step", other.action());
                None
            }
        }
    }

    fn apply_final(&mut self, _result: &FinalResult) -> Option<Narration> {
        None
    }

    fn settle(&mut self) {
        self.state.focus = None;
    }

    fn reset(&mut self, _snapshot: &Snapshot) {
        self.state.clear();
    }
}
