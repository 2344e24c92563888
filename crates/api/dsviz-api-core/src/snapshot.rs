//! Structural snapshots returned by the Computation Engine.
//!
//! Snapshots are plain data: they describe the shape of a structure after an
//! operation and carry no visualization state. Field names follow the engine's
//! compact wire names (`data`/`h`/`b`/`l`/`r` for tree nodes, `f`/`t`/`w` for
//! edges, `bucket`/`chain` for hash buckets).

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::kind::StructureKind;

/// Keys / values stored in trees, hash chains and heaps.
pub type Key = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "data")]
    pub key: Key,
    #[serde(rename = "h")]
    pub height: i32,
    #[serde(rename = "b")]
    pub balance: i32,
    #[serde(rename = "l", default, deserialize_with = "nullable_node")]
    pub left: Option<Box<TreeNode>>,
    #[serde(rename = "r", default, deserialize_with = "nullable_node")]
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(key: Key) -> Self {
        Self {
            key,
            height: 1,
            balance: 0,
            left: None,
            right: None,
        }
    }

    pub fn is_unbalanced(&self) -> bool {
        self.balance.abs() > 1
    }
}

/// Accepts `null`, the legacy `"null"` marker, or a node object.
pub(crate) fn nullable_node<'de, D>(deserializer: D) -> Result<Option<Box<TreeNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Node(Box<TreeNode>),
        Marker(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Node(node)) => Ok(Some(node)),
        Some(Repr::Marker(s)) if s == "null" => Ok(None),
        Some(Repr::Marker(s)) => Err(de::Error::custom(format!(
            "unexpected tree marker '{s}'"
        ))),
    }
}

/// Tree snapshot. `root == None` is the empty tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TreeSnapshot {
    pub root: Option<Box<TreeNode>>,
}

impl<'de> Deserialize<'de> for TreeSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<TreeSnapshot, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(TreeSnapshot {
            root: nullable_node(deserializer)?,
        })
    }
}

impl TreeSnapshot {
    pub fn new(root: Option<Box<TreeNode>>) -> Self {
        Self { root }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        let mut n = 0;
        self.walk_in_order(|_, _| n += 1);
        n
    }

    /// Visit every node in-order (left, self, right) together with its depth
    /// (root depth = 0).
    pub fn walk_in_order<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a TreeNode, usize),
    {
        fn go<'a, F: FnMut(&'a TreeNode, usize)>(node: &'a TreeNode, depth: usize, f: &mut F) {
            if let Some(l) = node.left.as_deref() {
                go(l, depth + 1, f);
            }
            f(node, depth);
            if let Some(r) = node.right.as_deref() {
                go(r, depth + 1, f);
            }
        }
        if let Some(root) = self.root.as_deref() {
            go(root, 0, &mut f);
        }
    }

    pub fn in_order_keys(&self) -> Vec<Key> {
        let mut keys = Vec::new();
        self.walk_in_order(|n, _| keys.push(n.key));
        keys
    }

    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// BST lookup.
    pub fn find(&self, key: Key) -> Option<&TreeNode> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal => return Some(node),
            };
        }
        None
    }

    pub fn depth_of(&self, key: Key) -> Option<usize> {
        let mut depth = 0;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left.as_deref(),
                std::cmp::Ordering::Greater => node.right.as_deref(),
                std::cmp::Ordering::Equal => return Some(depth),
            };
            depth += 1;
        }
        None
    }

    /// Parent → child key pairs, pre-order.
    pub fn links(&self) -> Vec<(Key, Key)> {
        fn go(node: &TreeNode, out: &mut Vec<(Key, Key)>) {
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                out.push((node.key, child.key));
                go(child, out);
            }
        }
        let mut out = Vec::new();
        if let Some(root) = self.root.as_deref() {
            go(root, &mut out);
        }
        out
    }
}

/// One directed weighted edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(rename = "f")]
    pub from: u32,
    #[serde(rename = "t")]
    pub to: u32,
    #[serde(rename = "w", default)]
    pub weight: i64,
}

impl GraphEdge {
    pub fn new(from: u32, to: u32, weight: i64) -> Self {
        Self { from, to, weight }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Graph snapshot: vertex count plus ordered edge list. Parallel edges and
/// self-loops are both legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(rename = "vertices")]
    pub vertex_count: usize,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
    pub fn new(vertex_count: usize, edges: Vec<GraphEdge>) -> Self {
        Self {
            vertex_count,
            edges,
        }
    }

    pub fn contains_vertex(&self, v: u32) -> bool {
        (v as usize) < self.vertex_count
    }

    pub fn outgoing(&self, v: u32) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.from == v)
    }

    /// Smallest vertex count that covers every edge endpoint.
    pub fn min_vertex_count(&self) -> usize {
        self.edges
            .iter()
            .map(|e| e.from.max(e.to) as usize + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(rename = "bucket")]
    pub index: usize,
    #[serde(default)]
    pub chain: Vec<Key>,
}

/// Chained hash table snapshot, one entry per bucket in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashSnapshot {
    pub buckets: Vec<Bucket>,
}

impl HashSnapshot {
    pub fn new(buckets: Vec<Bucket>) -> Self {
        Self { buckets }
    }

    /// Empty table with `count` buckets.
    pub fn with_buckets(count: usize) -> Self {
        Self {
            buckets: (0..count)
                .map(|index| Bucket {
                    index,
                    chain: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.chain.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket(&self, index: usize) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.index == index)
    }

    /// Every (bucket, position) holding `value`, in table order.
    pub fn positions_of(&self, value: Key) -> Vec<(usize, usize)> {
        self.buckets
            .iter()
            .flat_map(|b| {
                b.chain
                    .iter()
                    .enumerate()
                    .filter(move |(_, v)| **v == value)
                    .map(move |(pos, _)| (b.index, pos))
            })
            .collect()
    }
}

/// Binary heap snapshot stored by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeapSnapshot {
    pub values: Vec<Key>,
}

impl HeapSnapshot {
    pub fn new(values: Vec<Key>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn parent(index: usize) -> Option<usize> {
        if index == 0 {
            None
        } else {
            Some((index - 1) / 2)
        }
    }

    pub fn index_of(&self, value: Key) -> Option<usize> {
        self.values.iter().position(|v| *v == value)
    }
}

/// Any structure snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Snapshot {
    #[serde(rename = "avl")]
    Tree(TreeSnapshot),
    #[serde(rename = "graph")]
    Graph(GraphSnapshot),
    #[serde(rename = "hash")]
    Hash(HashSnapshot),
    #[serde(rename = "minheap")]
    Heap(HeapSnapshot),
}

impl Snapshot {
    pub fn empty(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Tree => Snapshot::Tree(TreeSnapshot::default()),
            StructureKind::Graph => Snapshot::Graph(GraphSnapshot::default()),
            StructureKind::Hash => Snapshot::Hash(HashSnapshot::default()),
            StructureKind::Heap => Snapshot::Heap(HeapSnapshot::default()),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Snapshot::Tree(_) => StructureKind::Tree,
            Snapshot::Graph(_) => StructureKind::Graph,
            Snapshot::Hash(_) => StructureKind::Hash,
            Snapshot::Heap(_) => StructureKind::Heap,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Snapshot::Tree(t) => t.is_empty(),
            Snapshot::Graph(g) => g.vertex_count == 0,
            Snapshot::Hash(h) => h.bucket_count() == 0,
            Snapshot::Heap(h) => h.is_empty(),
        }
    }
}
