//! Core data structures for circuit_map
//!
//! This crate provides the plain data types the circuit engine and tooling
//! operate on:
//! - `TileGrid` - A rectangular tile grid with cardinal neighbor addressing
//! - `GroupSet` - The group classifier: tile id -> terrain group, with
//!   per-group capability flags
//! - `TransitionSet` - The transition catalog: blend tiles for pairs of
//!   plain groups, plus reachability queries over the pair graph
//!
//! No engine logic lives here. This crate has no I/O beyond serde derives;
//! the documents serialize as JSON (`.grid.json`, `.groups.json`,
//! `.transitions.json`).

mod grid;
mod groups;
mod transitions;

pub use grid::{NeighborTiles, TileGrid};
pub use groups::{Group, GroupKind, GroupSet};
pub use transitions::{TransitionNormalizer, TransitionPair, TransitionResolver, TransitionSet};
