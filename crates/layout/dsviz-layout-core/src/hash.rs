//! Bucket-row hash table layout: one row per bucket, index label on the
//! left, chain cells flowing right in chain order.

use serde::{Deserialize, Serialize};

use dsviz_api_core::HashSnapshot;

use crate::config::LayoutConfig;
use crate::layout::{Layout, Placement};

/// Drawable entity of a hash table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HashCell {
    /// The `[i]` label of a bucket row.
    Label { bucket: usize },
    /// The `position`-th value of a bucket chain.
    Item { bucket: usize, position: usize },
}

pub fn layout_hash(table: &HashSnapshot, config: &LayoutConfig) -> Layout<HashCell> {
    let mut layout = Layout::with_capacity(table.bucket_count() + table.len());
    for (row, bucket) in table.buckets.iter().enumerate() {
        let y = config.hash_top + row as f64 * config.hash_row_height + config.hash_row_height / 2.0;
        layout.insert(
            HashCell::Label {
                bucket: bucket.index,
            },
            Placement::at(config.hash_label_width / 2.0, y),
        );
        for position in 0..bucket.chain.len() {
            let x = config.hash_label_width
                + position as f64 * config.hash_cell_width
                + config.hash_cell_width / 2.0;
            layout.insert(
                HashCell::Item {
                    bucket: bucket.index,
                    position,
                },
                Placement::at(x, y),
            );
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsviz_api_core::Bucket;

    #[test]
    fn rows_and_cells() {
        let table = HashSnapshot::new(vec![
            Bucket {
                index: 0,
                chain: vec![5, 10],
            },
            Bucket {
                index: 1,
                chain: vec![],
            },
        ]);
        let layout = layout_hash(&table, &LayoutConfig::default());
        assert_eq!(layout.len(), 4);
        let label1 = layout.point(&HashCell::Label { bucket: 1 }).unwrap();
        assert_eq!(label1.x, 30.0);
        assert_eq!(label1.y, 30.0 + 48.0 + 24.0);
        let second = layout
            .point(&HashCell::Item {
                bucket: 0,
                position: 1,
            })
            .unwrap();
        assert_eq!(second.x, 60.0 + 64.0 + 32.0);
        assert_eq!(second.y, 54.0);
    }
}
