//! Circuit classification of a single grid cell
//!
//! Reads the four direct neighbors' groups and decides which adjacency
//! shape the cell renders, and against which pair of groups. Absent or
//! unclassifiable input is never an error here - it just means "no
//! classification" and the cell is left to other rules.

use std::collections::BTreeSet;

use circuit_map_core::{GroupSet, TileGrid};

use crate::key::CircuitKey;
use crate::pattern::{DirectionMask, Pattern};

/// A classification in the orientation it was observed: `inside` is the
/// group the pattern's set directions point at.
///
/// [`CircuitKey`] normalizes orientation away for catalog storage; the
/// repair pass still needs to know which side the classified tile was on,
/// so the oriented form is kept separate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub pattern: Pattern,
    pub inside: String,
    pub outside: String,
}

impl Classification {
    /// The canonical catalog key for this classification.
    pub fn key(&self) -> CircuitKey {
        CircuitKey::new(self.pattern, &self.inside, &self.outside)
    }
}

/// Classify the cell at `(x, y)`.
///
/// Returns `None` when the cell is empty, its tile has no group, or no
/// neighbor has a resolvable group. With one distinct neighbor group the
/// cell is either fully enclosed (neighbors match its own group) or an
/// isolated block inside a foreign group; with two or more, the cell's own
/// group is preferred as the inside group when present among the
/// neighbors, otherwise the two lexicographically smallest neighbor groups
/// are used. The choice is stable for a given grid.
pub fn classify(grid: &TileGrid, groups: &GroupSet, x: i32, y: i32) -> Option<Classification> {
    let own = groups.group_of(grid.tile_at(x, y)?)?;

    let neighbor_groups: [Option<&str>; 4] = grid
        .neighbors(x, y)
        .in_order()
        .map(|tile| tile.and_then(|t| groups.group_of(t)));

    let distinct: BTreeSet<&str> = neighbor_groups.iter().flatten().copied().collect();

    match distinct.len() {
        0 => None,
        1 => {
            let surrounding = distinct.iter().next().copied()?;
            if surrounding == own {
                // Fully enclosed by its own group.
                Some(Classification {
                    pattern: Pattern::Middle,
                    inside: own.to_string(),
                    outside: own.to_string(),
                })
            } else {
                // A single tile of `own` embedded in a uniform foreign group.
                Some(Classification {
                    pattern: Pattern::Block,
                    inside: own.to_string(),
                    outside: surrounding.to_string(),
                })
            }
        }
        _ => {
            let inside = if distinct.contains(own) {
                own
            } else {
                distinct.iter().next().copied()?
            };
            let outside = distinct.iter().copied().find(|&g| g != inside)?;

            let mask = DirectionMask::new(
                neighbor_groups[0] == Some(inside),
                neighbor_groups[1] == Some(inside),
                neighbor_groups[2] == Some(inside),
                neighbor_groups[3] == Some(inside),
            );

            Some(Classification {
                pattern: Pattern::from_mask(mask),
                inside: inside.to_string(),
                outside: outside.to_string(),
            })
        }
    }
}
