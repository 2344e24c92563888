//! Self-balancing binary search tree with narrated insert and delete.

use std::cmp::Ordering;

use dsviz_api_core::{Key, Outcome, RotationCase, StepRecord, TreeNode, TreeSnapshot};

use crate::Applied;

type Link = Option<Box<TreeNode>>;

fn height(link: &Link) -> i32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn balance_of(link: &Link) -> i32 {
    link.as_ref().map_or(0, |n| n.balance)
}

fn refresh(node: &mut TreeNode) {
    let (l, r) = (height(&node.left), height(&node.right));
    node.height = 1 + l.max(r);
    node.balance = l - r;
}

fn rotate_right(mut z: Box<TreeNode>) -> Box<TreeNode> {
    match z.left.take() {
        Some(mut y) => {
            z.left = y.right.take();
            refresh(&mut z);
            y.right = Some(z);
            refresh(&mut y);
            y
        }
        None => z,
    }
}

fn rotate_left(mut z: Box<TreeNode>) -> Box<TreeNode> {
    match z.right.take() {
        Some(mut y) => {
            z.right = y.left.take();
            refresh(&mut z);
            y.left = Some(z);
            refresh(&mut y);
            y
        }
        None => z,
    }
}

fn apply_rotation(mut node: Box<TreeNode>, case: RotationCase) -> Box<TreeNode> {
    match case {
        RotationCase::LeftLeft => rotate_right(node),
        RotationCase::RightRight => rotate_left(node),
        RotationCase::LeftRight => {
            node.left = node.left.take().map(rotate_left);
            rotate_right(node)
        }
        RotationCase::RightLeft => {
            node.right = node.right.take().map(rotate_right);
            rotate_left(node)
        }
    }
}

fn rebalance(
    node: Box<TreeNode>,
    case: Option<RotationCase>,
    after_delete: bool,
    steps: &mut Vec<StepRecord>,
) -> Box<TreeNode> {
    let Some(case) = case else {
        return node;
    };
    let prefix = if after_delete {
        "Unbalance after deletion at"
    } else {
        "Unbalance at"
    };
    steps.push(StepRecord::Rebalance {
        at: node.key,
        case,
        text: format!("{prefix} {}. {case}.", node.key),
    });
    apply_rotation(node, case)
}

/// Case after inserting `key` below `node`, decided by where the key went.
fn insert_case(node: &TreeNode, key: Key) -> Option<RotationCase> {
    if node.balance > 1 {
        let child = node.left.as_ref()?.key;
        match key.cmp(&child) {
            Ordering::Less => Some(RotationCase::LeftLeft),
            Ordering::Greater => Some(RotationCase::LeftRight),
            Ordering::Equal => None,
        }
    } else if node.balance < -1 {
        let child = node.right.as_ref()?.key;
        match key.cmp(&child) {
            Ordering::Greater => Some(RotationCase::RightRight),
            Ordering::Less => Some(RotationCase::RightLeft),
            Ordering::Equal => None,
        }
    } else {
        None
    }
}

/// Case after a deletion, decided by the heavy child's balance.
fn delete_case(node: &TreeNode) -> Option<RotationCase> {
    if node.balance > 1 {
        if balance_of(&node.left) >= 0 {
            Some(RotationCase::LeftLeft)
        } else {
            Some(RotationCase::LeftRight)
        }
    } else if node.balance < -1 {
        if balance_of(&node.right) <= 0 {
            Some(RotationCase::RightRight)
        } else {
            Some(RotationCase::RightLeft)
        }
    } else {
        None
    }
}

fn insert_at(
    link: Link,
    key: Key,
    steps: &mut Vec<StepRecord>,
    inserted: &mut bool,
) -> Box<TreeNode> {
    let Some(mut node) = link else {
        steps.push(StepRecord::note(format!("Inserted node {key}.")));
        *inserted = true;
        return Box::new(TreeNode::leaf(key));
    };
    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_at(node.left.take(), key, steps, inserted)),
        Ordering::Greater => node.right = Some(insert_at(node.right.take(), key, steps, inserted)),
        Ordering::Equal => {
            steps.push(StepRecord::note(format!(
                "Double value {key} is not allowed."
            )));
            return node;
        }
    }
    refresh(&mut node);
    let case = insert_case(&node, key);
    rebalance(node, case, false, steps)
}

fn min_key(node: &TreeNode) -> Key {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    current.key
}

fn delete_at(link: Link, key: Key, steps: &mut Vec<StepRecord>, removed: &mut bool) -> Link {
    let Some(mut node) = link else {
        steps.push(StepRecord::note(format!(
            "Key {key} not found for deletion."
        )));
        return None;
    };
    match key.cmp(&node.key) {
        Ordering::Less => node.left = delete_at(node.left.take(), key, steps, removed),
        Ordering::Greater => node.right = delete_at(node.right.take(), key, steps, removed),
        Ordering::Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => {
                    steps.push(StepRecord::note(format!("Deleting leaf node {key}.")));
                    return None;
                }
                (Some(child), None) | (None, Some(child)) => {
                    steps.push(StepRecord::note(format!(
                        "Deleting node {key}, replacing with single child {}.",
                        child.key
                    )));
                    node = child;
                }
                (Some(left), Some(right)) => {
                    let successor = min_key(&right);
                    steps.push(StepRecord::note(format!(
                        "Deleting node {key}, replacing with successor {successor}."
                    )));
                    node.key = successor;
                    node.left = Some(left);
                    node.right = delete_at(Some(right), successor, steps, removed);
                }
            }
        }
    }
    refresh(&mut node);
    let case = delete_case(&node);
    Some(rebalance(node, case, true, steps))
}

#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    root: Link,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::new(self.root.clone())
    }

    pub fn insert(&mut self, key: Key) -> Applied {
        let mut steps = vec![StepRecord::note(format!("Insertion of {key} started."))];
        let mut inserted = false;
        self.root = Some(insert_at(self.root.take(), key, &mut steps, &mut inserted));
        let outcome = if inserted {
            Outcome::Inserted
        } else {
            Outcome::Duplicate
        };
        Applied::new("insert", Some(key), Some(outcome), steps)
    }

    pub fn delete(&mut self, key: Key) -> Applied {
        let mut steps = vec![StepRecord::note(format!("Deletion of {key} started."))];
        let mut removed = false;
        self.root = delete_at(self.root.take(), key, &mut steps, &mut removed);
        let outcome = if removed {
            Outcome::Deleted
        } else {
            Outcome::NotFound
        };
        Applied::new("delete", Some(key), Some(outcome), steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(link: &Link, lo: Option<Key>, hi: Option<Key>) -> i32 {
        let Some(node) = link else {
            return 0;
        };
        assert!(lo.map_or(true, |lo| node.key > lo), "order violated at {}", node.key);
        assert!(hi.map_or(true, |hi| node.key < hi), "order violated at {}", node.key);
        let l = check_invariants(&node.left, lo, Some(node.key));
        let r = check_invariants(&node.right, Some(node.key), hi);
        assert_eq!(node.height, 1 + l.max(r), "stale height at {}", node.key);
        assert_eq!(node.balance, l - r, "stale balance at {}", node.key);
        assert!(node.balance.abs() <= 1, "unbalanced at {}", node.key);
        node.height
    }

    fn rotations(applied: &Applied) -> Vec<(Key, RotationCase)> {
        applied
            .steps
            .iter()
            .filter_map(|s| match s {
                StepRecord::Rebalance { at, case, .. } => Some((*at, *case)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ascending_inserts_rotate_left_once() {
        let mut tree = AvlTree::new();
        tree.insert(10);
        tree.insert(20);
        let third = tree.insert(30);
        assert_eq!(rotations(&third), vec![(10, RotationCase::RightRight)]);
        assert_eq!(
            third.steps.last().and_then(StepRecord::text),
            Some("Unbalance at 10. RR Case: Left Rotation.")
        );
        let snap = tree.snapshot();
        assert_eq!(snap.root.as_ref().map(|n| n.key), Some(20));
        assert_eq!(snap.in_order_keys(), vec![10, 20, 30]);
    }

    #[test]
    fn double_rotation_cases() {
        let mut tree = AvlTree::new();
        tree.insert(30);
        tree.insert(10);
        assert_eq!(rotations(&tree.insert(20)), vec![(30, RotationCase::LeftRight)]);

        let mut tree = AvlTree::new();
        tree.insert(10);
        tree.insert(30);
        assert_eq!(rotations(&tree.insert(20)), vec![(10, RotationCase::RightLeft)]);
        assert_eq!(tree.snapshot().root.as_ref().map(|n| n.key), Some(20));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut tree = AvlTree::new();
        tree.insert(5);
        let dup = tree.insert(5);
        assert_eq!(dup.outcome, Some(Outcome::Duplicate));
        assert_eq!(
            dup.steps.last().and_then(StepRecord::text),
            Some("Double value 5 is not allowed.")
        );
        assert_eq!(tree.snapshot().len(), 1);
    }

    #[test]
    fn delete_cases_are_narrated() {
        let mut tree = AvlTree::new();
        for k in [20, 10, 30, 25] {
            tree.insert(k);
        }
        let texts = |a: &Applied| -> Vec<String> {
            a.steps.iter().filter_map(|s| s.text().map(str::to_owned)).collect()
        };

        let d = tree.delete(20);
        assert_eq!(
            texts(&d),
            vec![
                "Deletion of 20 started.",
                "Deleting node 20, replacing with successor 25.",
                "Deleting leaf node 25.",
            ]
        );
        let d = tree.delete(25);
        assert_eq!(
            texts(&d)[1],
            "Deleting node 25, replacing with successor 30."
        );
        let d = tree.delete(30);
        assert_eq!(
            texts(&d)[1],
            "Deleting node 30, replacing with single child 10."
        );
        assert_eq!(tree.snapshot().in_order_keys(), vec![10]);
        let missing = tree.delete(99);
        assert_eq!(missing.outcome, Some(Outcome::NotFound));
        assert_eq!(
            texts(&missing).last().map(String::as_str),
            Some("Key 99 not found for deletion.")
        );
    }

    #[test]
    fn deletion_rebalances() {
        let mut tree = AvlTree::new();
        for k in [20, 10, 30, 40] {
            tree.insert(k);
        }
        let d = tree.delete(10);
        assert_eq!(rotations(&d), vec![(20, RotationCase::RightRight)]);
        assert!(d.steps.iter().any(|s| s.text()
            == Some("Unbalance after deletion at 20. RR Case: Left Rotation.")));
        check_invariants(&tree.root, None, None);
    }

    #[test]
    fn invariants_hold_under_mixed_operations() {
        let mut tree = AvlTree::new();
        let mut x: i64 = 7;
        for _ in 0..300 {
            x = (x * 31 + 11) % 97;
            if x % 3 == 0 {
                tree.delete(x / 2);
            } else {
                tree.insert(x);
            }
            check_invariants(&tree.root, None, None);
        }
    }
}
