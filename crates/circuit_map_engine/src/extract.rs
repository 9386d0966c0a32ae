//! Offline catalog extraction from curated example grids
//!
//! Scans every circuit-capable tile of the input grids, classifies it and
//! records the tile id as a candidate for the resulting key. A tile also
//! registers under derived keys against every group exactly one transition
//! step away from its own, so that circuit artwork learned against one
//! group is reusable against close relatives.
//!
//! This is the design-time half of the engine; it fails fast on unreadable
//! or inconsistent inputs rather than producing a partial catalog.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use circuit_map_core::{GroupSet, TileGrid, TransitionSet};

use crate::analyzer::classify;
use crate::catalog::CircuitCatalog;
use crate::key::CircuitKey;

/// Error type for the offline build path.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read grid file '{path}': {source}")]
    GridRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse grid file '{path}': {source}")]
    GridParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid grid file '{path}': {reason}")]
    GridInvalid { path: PathBuf, reason: String },
    #[error("Invalid group configuration: {0}")]
    Groups(String),
    #[error("Invalid transition configuration: {0}")]
    Transitions(String),
}

/// Extract a catalog from in-memory grids.
///
/// Tiles whose group is not circuit-capable are skipped, as are tiles the
/// analyzer cannot classify. Candidate sets only ever grow, so no key ends
/// up empty.
pub fn extract_from_grids(
    grids: &[TileGrid],
    groups: &GroupSet,
    transitions: &TransitionSet,
) -> CircuitCatalog {
    let mut catalog = CircuitCatalog::new();
    let vocabulary = groups.group_names();

    for grid in grids {
        for (x, y) in grid.positions() {
            let Some(tile) = grid.tile_at(x, y) else {
                continue;
            };
            let Some(own) = groups.group_of(tile) else {
                continue;
            };
            if !groups.is_circuit_capable(own) {
                continue;
            }
            let Some(classification) = classify(grid, groups, x, y) else {
                continue;
            };

            catalog.insert(classification.key(), tile);

            // Derived keys: the same artwork stands in against any group
            // reachable from the tile's own group through exactly one
            // intermediate transition.
            for &other in &vocabulary {
                if other == own {
                    continue;
                }
                if transitions.transitives_between(own, other).len() == 2 {
                    catalog.insert(
                        CircuitKey::new(classification.pattern, own, other),
                        tile,
                    );
                }
            }
        }
    }

    catalog
}

/// Load one grid document, failing with the offending path on any problem.
pub fn load_grid(path: impl AsRef<Path>) -> Result<TileGrid, ExtractError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ExtractError::GridRead {
        path: path.to_path_buf(),
        source,
    })?;
    let grid: TileGrid = serde_json::from_str(&json).map_err(|source| ExtractError::GridParse {
        path: path.to_path_buf(),
        source,
    })?;
    grid.validate().map_err(|reason| ExtractError::GridInvalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(grid)
}

/// Extract a catalog from grid documents on disk.
///
/// Validates the group and transition configuration up front; any
/// unreadable or malformed input aborts the whole build.
pub fn extract_from_sources(
    sources: &[PathBuf],
    groups: &GroupSet,
    transitions: &TransitionSet,
) -> Result<CircuitCatalog, ExtractError> {
    groups.validate().map_err(ExtractError::Groups)?;
    transitions.validate().map_err(ExtractError::Transitions)?;

    let mut grids = Vec::with_capacity(sources.len());
    for source in sources {
        grids.push(load_grid(source)?);
    }
    Ok(extract_from_grids(&grids, groups, transitions))
}
