//! Autotiling consistency engine for circuit_map.
//!
//! Lets a tile grid express that certain tiles form a circuit - a closed
//! shape, rail, junction or isolated block of one terrain group embedded in
//! a surrounding group - and keeps the artwork geometrically consistent:
//!
//! - [`Pattern`] / [`DirectionMask`] - the 16 canonical adjacency shapes.
//! - [`classify`] - which shape a cell renders, against which group pair.
//! - [`CircuitCatalog`] + [`extract_from_grids`] - learn, from curated
//!   example grids, which tile ids render each [`CircuitKey`]; serialize
//!   the result to a JSON document.
//! - [`resolve`] - repair a just-edited cell and its four neighbors using
//!   the catalog, consulting the transition subsystem for groups the
//!   catalog cannot represent directly.
//!
//! This crate has no I/O beyond catalog and grid documents, no rendering,
//! and no internal locking: classification is pure, extraction is an
//! offline batch pass, and resolution mutates one caller-owned grid to
//! completion. Hosts that edit a grid from several places must serialize
//! their [`resolve`] calls.

mod analyzer;
mod catalog;
mod extract;
mod key;
mod pattern;
mod resolve;

pub use analyzer::{classify, Classification};
pub use catalog::{CatalogError, CircuitCatalog, TileMeta};
pub use extract::{extract_from_grids, extract_from_sources, load_grid, ExtractError};
pub use key::CircuitKey;
pub use pattern::{DirectionMask, Pattern};
pub use resolve::resolve;

// Re-export circuit_map_core
pub use circuit_map_core;
