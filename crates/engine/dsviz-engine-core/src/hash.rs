//! Separate-chaining hash table keyed by `value mod buckets`.

use dsviz_api_core::{Bucket, HashSnapshot, Key, Outcome, StepRecord};

use crate::{Applied, OpError};

#[derive(Debug, Clone)]
pub struct ChainedHashTable {
    buckets: Vec<Vec<Key>>,
}

impl ChainedHashTable {
    pub fn new(bucket_count: usize) -> Result<Self, OpError> {
        if bucket_count == 0 {
            return Err(OpError::InvalidSize("Hash Table"));
        }
        Ok(Self {
            buckets: vec![Vec::new(); bucket_count],
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Never negative, also for negative values.
    pub fn index_of(&self, value: Key) -> usize {
        value.rem_euclid(self.buckets.len() as Key) as usize
    }

    pub fn snapshot(&self) -> HashSnapshot {
        HashSnapshot::new(
            self.buckets
                .iter()
                .enumerate()
                .map(|(index, chain)| Bucket {
                    index,
                    chain: chain.clone(),
                })
                .collect(),
        )
    }

    pub(crate) fn init_applied(&self) -> Applied {
        Applied::new(
            "init",
            Some(self.bucket_count() as Key),
            None,
            vec![StepRecord::note(format!(
                "Hash Table initialized with {} buckets.",
                self.bucket_count()
            ))],
        )
    }

    /// Append to the end of the value's chain. Duplicates are kept.
    pub fn insert(&mut self, value: Key) -> Applied {
        let bucket = self.index_of(value);
        let chain = &mut self.buckets[bucket];
        chain.push(value);
        let steps = vec![
            StepRecord::note(format!("Inserting {value}.")),
            StepRecord::Bucket { bucket, value },
            StepRecord::note(format!(
                "Inserted value {value} at bucket {bucket} (Chain length: {}).",
                chain.len()
            )),
        ];
        Applied::new("insert", Some(value), Some(Outcome::Inserted), steps)
    }

    /// Probe the chain front to back, stopping at the first match.
    fn probe(&self, value: Key, steps: &mut Vec<StepRecord>) -> (usize, Option<usize>) {
        let bucket = self.index_of(value);
        steps.push(StepRecord::Bucket { bucket, value });
        for (position, &held) in self.buckets[bucket].iter().enumerate() {
            let hit = held == value;
            steps.push(StepRecord::Probe {
                bucket,
                position,
                value: held,
                hit,
            });
            if hit {
                return (bucket, Some(position));
            }
        }
        (bucket, None)
    }

    pub fn search(&self, value: Key) -> Applied {
        let mut steps = vec![StepRecord::note(format!("Searching for {value}."))];
        let (bucket, found) = self.probe(value, &mut steps);
        let outcome = match found {
            Some(position) => {
                steps.push(StepRecord::note(format!(
                    "Found value {value} at bucket {bucket}, step {}.",
                    position + 1
                )));
                Outcome::Found
            }
            None => {
                steps.push(StepRecord::note(format!(
                    "Value {value} not found after checking {} steps in bucket {bucket}.",
                    self.buckets[bucket].len()
                )));
                Outcome::NotFound
            }
        };
        Applied::new("search", Some(value), Some(outcome), steps)
    }

    /// Remove the first occurrence.
    pub fn delete(&mut self, value: Key) -> Applied {
        let mut steps = vec![StepRecord::note(format!("Deleting {value}."))];
        let (bucket, found) = self.probe(value, &mut steps);
        let outcome = match found {
            Some(position) => {
                self.buckets[bucket].remove(position);
                steps.push(StepRecord::note(format!(
                    "Deleted value {value} from bucket {bucket}."
                )));
                Outcome::Deleted
            }
            None => {
                steps.push(StepRecord::note(format!(
                    "Value {value} not found for deletion."
                )));
                Outcome::NotFound
            }
        };
        Applied::new("delete", Some(value), Some(outcome), steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ChainedHashTable {
        let mut t = ChainedHashTable::new(5).unwrap();
        for v in [7, 12, -3, 5] {
            t.insert(v);
        }
        t
    }

    #[test]
    fn zero_buckets_are_rejected() {
        assert_eq!(
            ChainedHashTable::new(0).unwrap_err(),
            OpError::InvalidSize("Hash Table")
        );
    }

    #[test]
    fn negative_values_share_buckets_with_their_residue() {
        let t = table();
        let snap = t.snapshot();
        assert_eq!(snap.bucket(2).unwrap().chain, vec![7, 12, -3]);
        assert_eq!(snap.bucket(0).unwrap().chain, vec![5]);
        assert_eq!(t.index_of(-3), 2);
    }

    #[test]
    fn insert_reports_chain_length() {
        let mut t = table();
        let applied = t.insert(17);
        assert_eq!(
            applied.steps.last().and_then(StepRecord::text),
            Some("Inserted value 17 at bucket 2 (Chain length: 4).")
        );
    }

    #[test]
    fn search_stops_at_first_hit() {
        let t = table();
        let found = t.search(12);
        assert_eq!(found.outcome, Some(Outcome::Found));
        let probes = found
            .steps
            .iter()
            .filter(|s| matches!(s, StepRecord::Probe { .. }))
            .count();
        assert_eq!(probes, 2);
        assert_eq!(
            found.steps.last().and_then(StepRecord::text),
            Some("Found value 12 at bucket 2, step 2.")
        );

        let missing = t.search(22);
        assert_eq!(missing.outcome, Some(Outcome::NotFound));
        assert_eq!(
            missing.steps.last().and_then(StepRecord::text),
            Some("Value 22 not found after checking 3 steps in bucket 2.")
        );
    }

    #[test]
    fn delete_removes_first_occurrence() {
        let mut t = table();
        t.insert(7);
        assert_eq!(t.delete(7).outcome, Some(Outcome::Deleted));
        assert_eq!(t.snapshot().bucket(2).unwrap().chain, vec![12, -3, 7]);
        assert_eq!(t.delete(99).outcome, Some(Outcome::NotFound));
    }
}
