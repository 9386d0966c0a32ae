//! The learned circuit catalog and its file format
//!
//! A catalog maps [`CircuitKey`]s to the candidate tile ids that render
//! them. Both maps are BTree-backed so every iteration - lookups, export,
//! inspection - is in canonical order and reproducible.
//!
//! The document shape is a top-level `circuits` array; each entry carries a
//! pattern name, the two group names, and the candidate tiles. A candidate
//! is a tile id plus whatever extra fields the external tile-numbering
//! scheme stores - those are captured by a flattened map and passed through
//! unchanged.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::CircuitKey;
use crate::pattern::Pattern;

/// Opaque per-candidate metadata, passed through unchanged.
pub type TileMeta = serde_json::Map<String, serde_json::Value>;

/// Error type for catalog import/export failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Mapping from circuit keys to candidate tile ids.
///
/// Read-only configuration at resolution time; only the builder writes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitCatalog {
    entries: BTreeMap<CircuitKey, BTreeMap<u32, TileMeta>>,
}

impl CircuitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tile` as a rendering of `key`.
    pub fn insert(&mut self, key: CircuitKey, tile: u32) {
        self.entries.entry(key).or_default().entry(tile).or_default();
    }

    /// Record `tile` with pass-through metadata. Metadata for an already
    /// known candidate is replaced.
    pub fn insert_with_meta(&mut self, key: CircuitKey, tile: u32, meta: TileMeta) {
        self.entries.entry(key).or_default().insert(tile, meta);
    }

    /// Whether any candidate is recorded for `key`.
    pub fn contains(&self, key: &CircuitKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The candidate tile ids for `key`, ascending.
    pub fn candidates(&self, key: &CircuitKey) -> impl Iterator<Item = u32> + '_ {
        self.entries
            .get(key)
            .into_iter()
            .flat_map(|tiles| tiles.keys().copied())
    }

    /// All keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &CircuitKey> {
        self.entries.keys()
    }

    /// All entries in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (&CircuitKey, &BTreeMap<u32, TileMeta>)> {
        self.entries.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of candidates across all keys.
    pub fn candidate_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Every group name appearing on either side of a key, sorted.
    ///
    /// Both sides contribute: dual-aware normalization makes the stored
    /// orientation arbitrary, so "outside groups" of the catalog means the
    /// union of both sides.
    pub fn group_names(&self) -> BTreeSet<&str> {
        self.entries
            .keys()
            .flat_map(|key| [key.inside_group(), key.outside_group()])
            .collect()
    }

    /// Union candidate sets per key across all inputs.
    pub fn merge(catalogs: impl IntoIterator<Item = CircuitCatalog>) -> CircuitCatalog {
        let mut merged = CircuitCatalog::new();
        for catalog in catalogs {
            for (key, tiles) in catalog.entries {
                let slot = merged.entries.entry(key).or_default();
                for (tile, meta) in tiles {
                    slot.insert(tile, meta);
                }
            }
        }
        merged
    }

    /// Serialize to the catalog document format.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            circuits: self
                .entries
                .iter()
                .map(|(key, tiles)| CircuitEntry {
                    pattern: key.pattern(),
                    inside: key.inside_group().to_string(),
                    outside: key.outside_group().to_string(),
                    tiles: tiles
                        .iter()
                        .map(|(&id, meta)| CandidateTile {
                            id,
                            meta: meta.clone(),
                        })
                        .collect(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parse the catalog document format.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = CircuitCatalog::new();
        for entry in file.circuits {
            if entry.inside.is_empty() || entry.outside.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "{:?} entry with empty group name",
                    entry.pattern
                )));
            }
            if entry.tiles.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "{:?} entry for '{}'/'{}' has no candidate tiles",
                    entry.pattern, entry.inside, entry.outside
                )));
            }
            let key = CircuitKey::new(entry.pattern, entry.inside, entry.outside);
            for tile in entry.tiles {
                catalog.insert_with_meta(key.clone(), tile.id, tile.meta);
            }
        }
        Ok(catalog)
    }

    /// Write the catalog document to `path`.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Read a catalog document from `path`.
    pub fn import_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

// ─── Document model ──────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    circuits: Vec<CircuitEntry>,
}

#[derive(Serialize, Deserialize)]
struct CircuitEntry {
    pattern: Pattern,
    inside: String,
    outside: String,
    tiles: Vec<CandidateTile>,
}

#[derive(Serialize, Deserialize)]
struct CandidateTile {
    id: u32,
    /// Back-reference fields owned by the external tile-numbering scheme.
    #[serde(flatten)]
    meta: TileMeta,
}
