//! AVL tracker: the node being inserted or deleted and the rotation being
//! illustrated.

use log::debug;

use dsviz_api_core::{
    EngineRequest, EngineResponse, FinalResult, Key, RotationCase, Snapshot, StepRecord,
    StructureKind,
};

use super::{number_after, Narration, VisualState, VisualStateTracker};

#[derive(Debug, Clone, Default)]
pub struct TreeTracker {
    state: VisualState<Key>,
}

fn rotation_in(text: &str) -> Option<RotationCase> {
    [
        RotationCase::LeftLeft,
        RotationCase::RightRight,
        RotationCase::LeftRight,
        RotationCase::RightLeft,
    ]
    .into_iter()
    .find(|case| text.contains(&format!("{} Case", case.code())))
}

impl VisualStateTracker for TreeTracker {
    type Id = Key;

    fn kind(&self) -> StructureKind {
        StructureKind::Tree
    }

    fn state(&self) -> &VisualState<Key> {
        &self.state
    }

    fn begin_operation(&mut self, request: &EngineRequest, _response: &EngineResponse) {
        self.state.rotation = None;
        self.state.concluded = false;
        self.state.focus = request.operand();
    }

    fn apply_step(&mut self, step: &StepRecord) -> Option<Narration> {
        if !self.state.admit(step) {
            return None;
        }
        match step {
            StepRecord::Rebalance { at, case, text } => {
                self.state.focus = Some(*at);
                self.state.rotation = Some(*case);
                let text = if text.is_empty() {
                    format!("Unbalance at {at}. {case}.")
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
                // Legacy free text: the only place the node and case are named.
                if let Some(at) = number_after(text, "at ") {
                    self.state.focus = Some(at);
                }
                self.state.rotation = rotation_in(text);
                Some(Narration::detail(text.clone()))
            }
            other => {
                debug!("tree tracker: ignoring '{}' step", other.action());
                None
            }
        }
    }

    fn apply_final(&mut self, _result: &FinalResult) -> Option<Narration> {
        None
    }

    fn settle(&mut self) {
        self.state.focus = None;
        self.state.rotation = None;
    }

    fn reset(&mut self, _snapshot: &Snapshot) {
        self.state.clear();
    }
}
