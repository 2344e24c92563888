//! Binary min-heap of (vertex, priority) entries used by Dijkstra and Prim.
//!
//! Stale entries are never decreased in place; a better priority is pushed as
//! a new entry and the old one is skipped when extracted. Entries are shown in
//! array order, which is how the priority queue appears in step records.

use dsviz_api_core::PqEntry;

#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    entries: Vec<PqEntry>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, vertex: u32, priority: i64) {
        self.entries.push(PqEntry { vertex, priority });
        let mut i = self.entries.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].priority >= self.entries[parent].priority {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    pub fn pop(&mut self) -> Option<PqEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let top = self.entries.swap_remove(0);
        let len = self.entries.len();
        let mut i = 0;
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            if left >= len {
                break;
            }
            // Ties go to the left child.
            let smallest = if right < len && self.entries[right].priority < self.entries[left].priority {
                right
            } else {
                left
            };
            if self.entries[i].priority <= self.entries[smallest].priority {
                break;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
        Some(top)
    }

    /// Current contents in heap array order.
    pub fn contents(&self) -> Vec<PqEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_priority_order() {
        let mut pq = PriorityQueue::new();
        for (v, d) in [(0, 5), (1, 3), (2, 8), (3, 1), (4, 3)] {
            pq.push(v, d);
        }
        let order: Vec<i64> = std::iter::from_fn(|| pq.pop()).map(|e| e.priority).collect();
        assert_eq!(order, vec![1, 3, 3, 5, 8]);
        assert!(pq.is_empty());
    }

    #[test]
    fn contents_follow_array_layout() {
        let mut pq = PriorityQueue::new();
        pq.push(2, 1);
        pq.push(1, 4);
        pq.push(1, 3);
        let shown: Vec<(u32, i64)> = pq.contents().iter().map(|e| (e.vertex, e.priority)).collect();
        assert_eq!(shown, vec![(2, 1), (1, 4), (1, 3)]);
        pq.pop();
        let shown: Vec<(u32, i64)> = pq.contents().iter().map(|e| (e.vertex, e.priority)).collect();
        assert_eq!(shown, vec![(1, 3), (1, 4)]);
    }
}
