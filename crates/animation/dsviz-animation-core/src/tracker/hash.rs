//! Chained hash table tracker. Entities are bucket labels and chain cells.

use log::debug;

use dsviz_api_core::{
    EngineRequest, EngineResponse, EntityStatus, FinalResult, HashRequest, HashSnapshot, Key,
    Outcome, Snapshot, StepRecord, StructureKind,
};
use dsviz_layout_core::HashCell;

use super::{Narration, VisualState, VisualStateTracker};

/// Bucket a value hashes to: `((v mod n) + n) mod n`. `None` for a table
/// without buckets.
pub fn calculate_index(value: Key, buckets: usize) -> Option<usize> {
    if buckets == 0 {
        return None;
    }
    Some(value.rem_euclid(buckets as Key) as usize)
}

#[derive(Debug, Clone, Default)]
pub struct HashTracker {
    state: VisualState<HashCell>,
    bucket_count: usize,
    // Cell to rest on once the steps are exhausted.
    highlight: Option<HashCell>,
}

impl HashTracker {
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Cell the finished operation highlights, if any.
    pub fn highlight(&self) -> Option<HashCell> {
        self.highlight
    }
}

/// Result cell of `request` in the post-operation `table`. Inserts land at
/// the end of the chain; a successful search shows the first match.
fn result_cell(
    request: &HashRequest,
    outcome: Option<Outcome>,
    table: &HashSnapshot,
) -> Option<HashCell> {
    let (value, pick_last) = match (request, outcome) {
        (HashRequest::Insert { value }, None | Some(Outcome::Inserted)) => (*value, true),
        (HashRequest::Search { value }, None | Some(Outcome::Found)) => (*value, false),
        _ => return None,
    };
    let bucket = calculate_index(value, table.bucket_count())?;
    let chain = &table.bucket(bucket)?.chain;
    let position = if pick_last {
        chain.iter().rposition(|v| *v == value)
    } else {
        chain.iter().position(|v| *v == value)
    }?;
    Some(HashCell::Item { bucket, position })
}

impl VisualStateTracker for HashTracker {
    type Id = HashCell;

    fn kind(&self) -> StructureKind {
        StructureKind::Hash
    }

    fn state(&self) -> &VisualState<HashCell> {
        &self.state
    }

    fn begin_operation(&mut self, request: &EngineRequest, response: &EngineResponse) {
        self.state.clear();
        self.highlight = None;
        let Snapshot::Hash(table) = &response.snapshot else {
            return;
        };
        self.bucket_count = table.bucket_count();
        let EngineRequest::Hash(request) = request else {
            return;
        };
        if let Some(bucket) = request_operand(request)
            .and_then(|value| calculate_index(value, self.bucket_count))
        {
            self.state
                .mark(HashCell::Label { bucket }, EntityStatus::Pending);
        }
        self.highlight = result_cell(request, response.outcome, table);
    }

    fn apply_step(&mut self, step: &StepRecord) -> Option<Narration> {
        if !self.state.admit(step) {
            return None;
        }
        match step {
            StepRecord::Bucket { bucket, .. } => {
                let label = HashCell::Label { bucket: *bucket };
                self.state.mark(label, EntityStatus::Pending);
                self.state.focus = Some(label);
                None
            }
            StepRecord::Probe {
                bucket,
                position,
                hit,
                ..
            } => {
                let cell = HashCell::Item {
                    bucket: *bucket,
                    position: *position,
                };
                let status = if *hit {
                    EntityStatus::Finalized
                } else {
                    EntityStatus::Pending
                };
                self.state.mark(cell, status);
                self.state.focus = Some(cell);
                None
            }
            StepRecord::Note { text } => Some(Narration::detail(text.clone())),
            other => {
                debug!("hash tracker: ignoring '{}' step", other.action());
                None
            }
        }
    }

    fn apply_final(&mut self, _result: &FinalResult) -> Option<Narration> {
        None
    }

    fn settle(&mut self) {
        self.state.status.clear();
        self.state.focus = self.highlight;
        if let Some(cell) = self.highlight {
            self.state.mark(cell, EntityStatus::Finalized);
        }
    }

    fn reset(&mut self, snapshot: &Snapshot) {
        self.state.clear();
        self.highlight = None;
        if let Snapshot::Hash(table) = snapshot {
            self.bucket_count = table.bucket_count();
        }
    }
}

fn request_operand(request: &HashRequest) -> Option<Key> {
    match request {
        HashRequest::Insert { value }
        | HashRequest::Search { value }
        | HashRequest::Delete { value } => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::Bucket;

    fn table() -> HashSnapshot {
        HashSnapshot::new(vec![
            Bucket {
                index: 0,
                chain: vec![],
            },
            Bucket {
                index: 1,
                chain: vec![7, 4, 7],
            },
            Bucket {
                index: 2,
                chain: vec![5],
            },
        ])
    }

    fn response(outcome: Option<Outcome>) -> EngineResponse {
        EngineResponse {
            kind: StructureKind::Hash,
            action: "search".into(),
            value: Some(7),
            outcome,
            snapshot: Snapshot::Hash(table()),
            steps: vec![],
            vertex_count_inferred: false,
        }
    }

    #[test]
    fn euclidean_index() {
        assert_eq!(calculate_index(7, 5), Some(2));
        assert_eq!(calculate_index(-3, 5), Some(2));
        assert_eq!(calculate_index(0, 5), Some(0));
        assert_eq!(calculate_index(4, 0), None);
    }

    #[test]
    fn search_highlights_first_match_only() {
        let mut t = HashTracker::default();
        t.begin_operation(
            &EngineRequest::Hash(HashRequest::Search { value: 10 }),
            &response(Some(Outcome::NotFound)),
        );
        assert_eq!(t.highlight(), None);
        assert_eq!(
            t.state().status_of(&HashCell::Label { bucket: 1 }),
            EntityStatus::Pending
        );

        t.begin_operation(
            &EngineRequest::Hash(HashRequest::Search { value: 7 }),
            &response(Some(Outcome::Found)),
        );
        assert_eq!(t.bucket_count(), 3);
        assert_eq!(
            t.highlight(),
            Some(HashCell::Item {
                bucket: 1,
                position: 0
            })
        );
    }

    #[test]
    fn insert_highlights_last_match() {
        let mut t = HashTracker::default();
        let table = HashSnapshot::new(vec![
            Bucket {
                index: 0,
                chain: vec![],
            },
            Bucket {
                index: 1,
                chain: vec![4, 4],
            },
            Bucket {
                index: 2,
                chain: vec![],
            },
        ]);
        let mut resp = response(None);
        resp.snapshot = Snapshot::Hash(table);
        t.begin_operation(&EngineRequest::Hash(HashRequest::Insert { value: 4 }), &resp);
        assert_eq!(
            t.highlight(),
            Some(HashCell::Item {
                bucket: 1,
                position: 1
            })
        );
        assert_eq!(
            t.state().status_of(&HashCell::Label { bucket: 1 }),
            EntityStatus::Pending
        );
        t.settle();
        assert_eq!(t.state().focus, t.highlight());
        assert_eq!(
            t.state().status_of(&HashCell::Label { bucket: 1 }),
            EntityStatus::Default
        );
    }

    #[test]
    fn probes_mark_cells() {
        let mut t = HashTracker::default();
        t.apply_step(&StepRecord::Probe {
            bucket: 2,
            position: 0,
            value: 7,
            hit: false,
        });
        t.apply_step(&StepRecord::Probe {
            bucket: 2,
            position: 1,
            value: 12,
            hit: true,
        });
        let s = t.state();
        assert_eq!(
            s.status_of(&HashCell::Item {
                bucket: 2,
                position: 0
            }),
            EntityStatus::Pending
        );
        assert_eq!(
            s.focus,
            Some(HashCell::Item {
                bucket: 2,
                position: 1
            })
        );
    }
}
