//! The transition catalog: blend tiles for pairs of plain groups
//!
//! The circuit engine consumes this subsystem, it does not reimplement it.
//! [`TransitionSet`] answers the reachability queries the engine needs
//! (direct pairs, intermediate hop pairs, per-group center tiles) and
//! [`TransitionNormalizer`] is a data-driven [`TransitionResolver`] for
//! hosts that do not bring their own.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use uuid::Uuid;

use crate::{GroupSet, TileGrid};

/// Blend tiles between one unordered pair of plain groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionPair {
    pub a: String,
    pub b: String,
    /// Tile ids that render the blend between `a` and `b`.
    pub tiles: Vec<u32>,
}

impl TransitionPair {
    fn connects(&self, a: &str, b: &str) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }
}

/// The transition catalog as a configuration document.
///
/// Pairs form a small undirected graph over plain group names;
/// [`transitives_between`](TransitionSet::transitives_between) is a
/// shortest-path query over that graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSet {
    /// Stable identifier for this document.
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub pairs: Vec<TransitionPair>,
    /// Fully-enclosed representative tile per plain group.
    #[serde(default)]
    pub center_tiles: HashMap<String, u32>,
}

impl TransitionSet {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            pairs: Vec::new(),
            center_tiles: HashMap::new(),
        }
    }

    /// Register blend tiles for the unordered pair `(a, b)`.
    pub fn add_pair(&mut self, a: impl Into<String>, b: impl Into<String>, tiles: Vec<u32>) {
        self.pairs.push(TransitionPair {
            a: a.into(),
            b: b.into(),
            tiles,
        });
    }

    /// Register the fully-enclosed representative tile for a plain group.
    pub fn set_center_tile(&mut self, group: impl Into<String>, tile: u32) {
        self.center_tiles.insert(group.into(), tile);
    }

    /// Whether groups `a` and `b` blend directly.
    pub fn direct_pair_exists(&self, a: &str, b: &str) -> bool {
        a != b && self.pairs.iter().any(|p| p.connects(a, b))
    }

    /// The blend tiles for the unordered pair `(a, b)`, if direct.
    pub fn blend_tiles(&self, a: &str, b: &str) -> Option<&[u32]> {
        self.pairs
            .iter()
            .find(|p| p.connects(a, b))
            .map(|p| p.tiles.as_slice())
    }

    /// The fully-enclosed representative tile for `group`, if configured.
    pub fn center_tile_for(&self, group: &str) -> Option<u32> {
        self.center_tiles.get(group).copied()
    }

    /// The hop pairs connecting `a` to `b` through intermediate groups.
    ///
    /// Empty when the groups blend directly or are unrelated; otherwise the
    /// pairs `(a, g1), (g1, g2), .., (gk, b)` along a shortest path through
    /// the pair graph. Adjacency is walked in sorted group-name order, so
    /// the returned path is stable for a given catalog.
    pub fn transitives_between(&self, a: &str, b: &str) -> Vec<(String, String)> {
        if a == b || self.direct_pair_exists(a, b) {
            return Vec::new();
        }

        let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for pair in &self.pairs {
            adjacency.entry(&pair.a).or_default().insert(&pair.b);
            adjacency.entry(&pair.b).or_default().insert(&pair.a);
        }

        let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(a);
        parent.insert(a, a);

        while let Some(current) = queue.pop_front() {
            if current == b {
                break;
            }
            if let Some(nexts) = adjacency.get(current) {
                for &next in nexts {
                    if !parent.contains_key(next) {
                        parent.insert(next, current);
                        queue.push_back(next);
                    }
                }
            }
        }

        if !parent.contains_key(b) {
            return Vec::new();
        }

        // Walk parents back from b, then reverse into forward hop pairs.
        let mut path = vec![b];
        let mut current = b;
        while current != a {
            current = parent[current];
            path.push(current);
        }
        path.reverse();

        path.windows(2)
            .map(|w| (w[0].to_string(), w[1].to_string()))
            .collect()
    }

    /// Check internal consistency: non-empty names, no self-pairs, no
    /// duplicate pairs, no empty blend lists.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
        for pair in &self.pairs {
            if pair.a.is_empty() || pair.b.is_empty() {
                return Err("transition pair with empty group name".to_string());
            }
            if pair.a == pair.b {
                return Err(format!("transition pair '{}' blends with itself", pair.a));
            }
            if pair.tiles.is_empty() {
                return Err(format!(
                    "transition pair '{}'/'{}' has no blend tiles",
                    pair.a, pair.b
                ));
            }
            let key = if pair.a <= pair.b {
                (pair.a.clone(), pair.b.clone())
            } else {
                (pair.b.clone(), pair.a.clone())
            };
            if !seen.insert(key) {
                return Err(format!(
                    "duplicate transition pair '{}'/'{}'",
                    pair.a, pair.b
                ));
            }
        }
        Ok(())
    }
}

/// In-place normalization of a single cell against its neighborhood.
///
/// Hosts with their own transition subsystem implement this; the engine only
/// ever calls it through the trait.
pub trait TransitionResolver {
    fn resolve_transition(&self, grid: &mut TileGrid, x: i32, y: i32);
}

/// Data-driven [`TransitionResolver`] backed by a [`TransitionSet`].
///
/// Rewrites the cell to a blend tile when a direct pair exists between the
/// cell's group and the most common differing neighbor group. Anything it
/// cannot normalize is left unchanged.
#[derive(Debug, Clone, Copy)]
pub struct TransitionNormalizer<'a> {
    pub transitions: &'a TransitionSet,
    pub groups: &'a GroupSet,
}

impl TransitionResolver for TransitionNormalizer<'_> {
    fn resolve_transition(&self, grid: &mut TileGrid, x: i32, y: i32) {
        let Some(own) = grid.tile_at(x, y).and_then(|t| self.groups.group_of(t)) else {
            return;
        };

        // Count differing neighbor groups; BTreeMap keeps ties deterministic.
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        for tile in grid.neighbors(x, y).in_order().into_iter().flatten() {
            if let Some(group) = self.groups.group_of(tile) {
                if group != own {
                    *counts.entry(group).or_insert(0) += 1;
                }
            }
        }

        let Some(other) = counts
            .iter()
            .max_by(|(ga, ca), (gb, cb)| ca.cmp(cb).then(gb.cmp(ga)))
            .map(|(group, _)| *group)
        else {
            return;
        };

        if let Some(tiles) = self.transitions.blend_tiles(own, other) {
            if let Some(&tile) = tiles.iter().min() {
                grid.set_tile(x, y, Some(tile));
            }
        }
    }
}
