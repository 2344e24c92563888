use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Per-node metrics drawn beside tree nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub height: i32,
    pub balance: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<NodeMetrics>,
}

impl Placement {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            metrics: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Entity id → placement, in the order the strategy visited entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout<K: Hash + Eq> {
    placements: IndexMap<K, Placement>,
}

impl<K: Hash + Eq> Default for Layout<K> {
    fn default() -> Self {
        Self {
            placements: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Layout<K> {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            placements: IndexMap::with_capacity(n),
        }
    }

    pub(crate) fn insert(&mut self, key: K, placement: Placement) {
        self.placements.insert(key, placement);
    }

    /// An empty layout means "nothing to draw"; renderers show a placeholder.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn get(&self, key: &K) -> Option<&Placement> {
        self.placements.get(key)
    }

    pub fn point(&self, key: &K) -> Option<Point> {
        self.get(key).map(Placement::point)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.placements.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Placement)> {
        self.placements.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.placements.keys()
    }

    pub(crate) fn placements_mut(&mut self) -> impl Iterator<Item = &mut Placement> {
        self.placements.values_mut()
    }
}
