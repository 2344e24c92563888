//! Bounded binary min heap stored level-order in a vector.

use dsviz_api_core::{HeapSnapshot, Key, Outcome, StepRecord, SwapDirection};

use crate::{Applied, OpError};

fn swap_step(moving: Key, with: Key, toward: SwapDirection) -> StepRecord {
    let relation = match toward {
        SwapDirection::Parent => "Parent",
        SwapDirection::Child => "Child",
    };
    StepRecord::Swap {
        value: moving,
        with,
        toward,
        text: format!("Swapping {moving} with {relation} {with}."),
    }
}

#[derive(Debug, Clone)]
pub struct MinHeap {
    values: Vec<Key>,
    capacity: usize,
}

impl MinHeap {
    pub fn with_capacity(capacity: usize) -> Result<Self, OpError> {
        if capacity == 0 {
            return Err(OpError::InvalidSize("Heap"));
        }
        Ok(Self {
            values: Vec::with_capacity(capacity),
            capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    pub fn snapshot(&self) -> HeapSnapshot {
        HeapSnapshot::new(self.values.clone())
    }

    pub(crate) fn init_applied(&self) -> Applied {
        Applied::new(
            "init",
            None,
            None,
            vec![StepRecord::note(format!(
                "Min Heap initialized with capacity {}.",
                self.capacity
            ))],
        )
    }

    pub fn insert(&mut self, value: Key) -> Result<Applied, OpError> {
        if self.is_full() {
            return Err(OpError::HeapFull);
        }
        self.values.push(value);
        let mut steps = vec![StepRecord::note(format!("Inserted value {value}."))];
        self.sift_up(self.values.len() - 1, &mut steps);
        Ok(Applied::new(
            "insert",
            Some(value),
            Some(Outcome::Inserted),
            steps,
        ))
    }

    pub fn extract_min(&mut self) -> Result<Applied, OpError> {
        if self.values.is_empty() {
            return Err(OpError::HeapEmpty);
        }
        let min = self.values.swap_remove(0);
        let mut steps = vec![
            StepRecord::note(format!("Extracted minimum value {min}.")),
            StepRecord::note("Swapped root with last element."),
        ];
        self.sift_down(0, &mut steps);
        Ok(Applied::new(
            "extract",
            Some(min),
            Some(Outcome::Extracted),
            steps,
        ))
    }

    fn sift_up(&mut self, mut i: usize, steps: &mut Vec<StepRecord>) {
        while let Some(parent) = HeapSnapshot::parent(i) {
            if self.values[parent] <= self.values[i] {
                break;
            }
            steps.push(swap_step(
                self.values[i],
                self.values[parent],
                SwapDirection::Parent,
            ));
            self.values.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize, steps: &mut Vec<StepRecord>) {
        let len = self.values.len();
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            if left >= len {
                break;
            }
            let child = if right < len && self.values[right] < self.values[left] {
                right
            } else {
                left
            };
            if self.values[i] <= self.values[child] {
                break;
            }
            steps.push(swap_step(
                self.values[i],
                self.values[child],
                SwapDirection::Child,
            ));
            self.values.swap(i, child);
            i = child;
        }
    }
}
