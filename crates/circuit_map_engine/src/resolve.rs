//! Runtime repair after a single-tile edit
//!
//! [`resolve`] is called by the host right after a cell is painted. It
//! re-reads the edited cell and its four direct neighbors and rewrites
//! their tile ids to catalog candidates consistent with the surrounding
//! groups. Every branch that cannot apply leaves the grid untouched;
//! resolution has no failure mode.
//!
//! Two pieces of indirection handle groups the catalog cannot represent
//! directly: a transitive-group search that finds the closest plain group
//! through the transition catalog's pair graph, and a speculative stand-in
//! maneuver that lets the transition subsystem normalize the neighborhood
//! of an unrepresentable tile without this engine duplicating its logic.

use std::collections::BTreeSet;

use circuit_map_core::{GroupSet, TileGrid, TransitionResolver, TransitionSet};

use crate::analyzer::{classify, Classification};
use crate::catalog::CircuitCatalog;

/// Repair the edited cell at `(x, y)` and its four direct neighbors.
///
/// Mutates `grid` in place. Deterministic: the same grid, catalog and
/// transition configuration always produce the same mutation, and once the
/// neighborhood is stable a second call changes nothing.
pub fn resolve(
    grid: &mut TileGrid,
    catalog: &CircuitCatalog,
    groups: &GroupSet,
    transitions: &TransitionSet,
    normalizer: &dyn TransitionResolver,
    x: i32,
    y: i32,
) {
    update_transitive_tile(grid, catalog, groups, transitions, normalizer, x, y);

    // Center first, then the neighbors in fixed order.
    for (cx, cy) in [(x, y), (x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
        update_tile(grid, catalog, groups, transitions, cx, cy);
    }
}

/// The group of the tile at `(x, y)`, if the cell holds a classified tile.
fn group_at<'a>(grid: &TileGrid, groups: &'a GroupSet, x: i32, y: i32) -> Option<&'a str> {
    grid.tile_at(x, y).and_then(|tile| groups.group_of(tile))
}

/// Let the transition subsystem settle the neighborhood of a tile the
/// catalog cannot represent.
///
/// If the edited tile classifies to a known key there is nothing to do.
/// Otherwise a substitute plain group is searched for; the cell is
/// temporarily replaced by that group's fully-enclosed representative, the
/// external normalizer runs against the stand-in, and the original tile id
/// is put back. Whatever the normalizer did to the surroundings is kept.
fn update_transitive_tile(
    grid: &mut TileGrid,
    catalog: &CircuitCatalog,
    groups: &GroupSet,
    transitions: &TransitionSet,
    normalizer: &dyn TransitionResolver,
    x: i32,
    y: i32,
) {
    let known = classify(grid, groups, x, y).is_some_and(|c| catalog.contains(&c.key()));
    if known {
        return;
    }
    let Some(substitute) = transitive_group(grid, catalog, groups, transitions, x, y) else {
        return;
    };
    let Some(stand_in) = transitions.center_tile_for(&substitute) else {
        return;
    };

    with_stand_in(grid, x, y, stand_in, |grid| {
        normalizer.resolve_transition(grid, x, y);
    });
}

/// Run `f` with the cell temporarily set to `stand_in`, restoring the
/// original tile id afterwards on every path out of `f`.
fn with_stand_in(
    grid: &mut TileGrid,
    x: i32,
    y: i32,
    stand_in: u32,
    f: impl FnOnce(&mut TileGrid),
) {
    let original = grid.tile_at(x, y);
    grid.set_tile(x, y, Some(stand_in));
    f(grid);
    grid.set_tile(x, y, original);
}

/// Rewrite the neighbors of the cell at `(x, y)` to catalog candidates
/// consistent with it.
fn update_tile(
    grid: &mut TileGrid,
    catalog: &CircuitCatalog,
    groups: &GroupSet,
    transitions: &TransitionSet,
    x: i32,
    y: i32,
) {
    let Some(center_group) = group_at(grid, groups, x, y) else {
        return;
    };

    for (nx, ny) in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
        let Some(neighbor_group) = group_at(grid, groups, nx, ny) else {
            continue;
        };
        let Some(circuit) = classify_with_fallback(grid, catalog, groups, transitions, nx, ny)
        else {
            continue;
        };

        // Rewrite only when the neighbor relates to the repaired cell:
        // either both share a group, or the neighbor sits on the inside of
        // its own classification.
        if neighbor_group == center_group || neighbor_group == circuit.inside {
            rewrite_to_candidate(grid, catalog, groups, &circuit, nx, ny, neighbor_group);
        }
    }
}

/// Replace the tile at `(x, y)` with the first catalog candidate for
/// `circuit` that belongs to `target_group`. No candidate, no change.
fn rewrite_to_candidate(
    grid: &mut TileGrid,
    catalog: &CircuitCatalog,
    groups: &GroupSet,
    circuit: &Classification,
    x: i32,
    y: i32,
    target_group: &str,
) {
    let key = circuit.key();
    for candidate in catalog.candidates(&key) {
        if groups.group_of(candidate) == Some(target_group) {
            grid.set_tile(x, y, Some(candidate));
            return;
        }
    }
}

/// Classify a cell, substituting transition marker groups with the plain
/// group the transitive search finds.
fn classify_with_fallback(
    grid: &TileGrid,
    catalog: &CircuitCatalog,
    groups: &GroupSet,
    transitions: &TransitionSet,
    x: i32,
    y: i32,
) -> Option<Classification> {
    let mut classification = classify(grid, groups, x, y)?;

    if groups.is_transition(&classification.inside) || groups.is_transition(&classification.outside)
    {
        let substitute = transitive_group(grid, catalog, groups, transitions, x, y)?;
        if groups.is_transition(&classification.inside) {
            classification.inside = substitute.clone();
        }
        if groups.is_transition(&classification.outside) {
            classification.outside = substitute;
        }
    }

    Some(classification)
}

/// Find a substitute plain group for a tile the catalog cannot represent.
///
/// Direct evidence wins: a group that appears both in the catalog and among
/// the tile's real neighbors is taken immediately. Failing that, the
/// catalog group reachable from the tile's own group through the fewest
/// transition hops is chosen; a directly paired group wins outright and
/// ties fall to sorted group-name order. Returns `None` when nothing
/// qualifies, in which case the caller skips its repair step.
fn transitive_group(
    grid: &TileGrid,
    catalog: &CircuitCatalog,
    groups: &GroupSet,
    transitions: &TransitionSet,
    x: i32,
    y: i32,
) -> Option<String> {
    let own = group_at(grid, groups, x, y)?;

    let neighbor_groups: BTreeSet<&str> = grid
        .neighbors(x, y)
        .in_order()
        .into_iter()
        .flatten()
        .filter_map(|tile| groups.group_of(tile))
        .collect();

    let candidates = catalog.group_names();

    for &candidate in &candidates {
        if candidate != own && neighbor_groups.contains(candidate) {
            return Some(candidate.to_string());
        }
    }

    let mut best: Option<(usize, &str)> = None;
    for &candidate in &candidates {
        if candidate == own || groups.is_transition(candidate) {
            continue;
        }
        if transitions.direct_pair_exists(own, candidate) {
            return Some(candidate.to_string());
        }
        let hops = transitions.transitives_between(own, candidate).len();
        if hops == 0 {
            // Unrelated to the tile's own group.
            continue;
        }
        if best.map_or(true, |(best_hops, _)| hops < best_hops) {
            best = Some((hops, candidate));
        }
    }

    best.map(|(_, candidate)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_from_grids;
    use crate::key::CircuitKey;
    use crate::pattern::Pattern;
    use circuit_map_core::{GroupKind, TransitionNormalizer};
    use std::cell::RefCell;

    // Tile ids: 1 grass, 2 water, 90 grass center representative,
    // 95 grass/water blend, 30..=34 path shapes, 39 freshly painted path.
    fn test_groups() -> GroupSet {
        let mut groups = GroupSet::new("test".to_string());
        groups.add_group("grass", GroupKind::Plain);
        groups.add_group("water", GroupKind::Plain);
        groups.add_group("path", GroupKind::Circuit);
        groups.add_group("grass-water", GroupKind::Transition);
        groups.assign_tile(1, "grass");
        groups.assign_tile(2, "water");
        groups.assign_tile(90, "grass");
        groups.assign_tile(95, "grass-water");
        for tile in 30..=39 {
            groups.assign_tile(tile, "path");
        }
        groups
    }

    fn test_transitions() -> TransitionSet {
        let mut transitions = TransitionSet::new("test".to_string());
        transitions.add_pair("path", "grass", vec![96]);
        transitions.add_pair("grass", "water", vec![95]);
        transitions.set_center_tile("grass", 90);
        transitions
    }

    /// Catalog with block and stub shapes for path against grass.
    fn test_catalog() -> CircuitCatalog {
        let mut catalog = CircuitCatalog::new();
        catalog.insert(CircuitKey::new(Pattern::Block, "path", "grass"), 30);
        catalog.insert(CircuitKey::new(Pattern::Block, "path", "grass"), 31);
        catalog.insert(CircuitKey::new(Pattern::StubNorth, "path", "grass"), 32);
        catalog.insert(CircuitKey::new(Pattern::StraightVertical, "path", "grass"), 33);
        catalog
    }

    fn grass_grid() -> TileGrid {
        let mut grid = TileGrid::new(3, 3);
        for (x, y) in grid.positions().collect::<Vec<_>>() {
            grid.set_tile(x, y, Some(1));
        }
        grid
    }

    /// A resolver that records every call and optionally pokes a neighbor,
    /// standing in for the external transition subsystem.
    struct RecordingResolver {
        calls: RefCell<Vec<(i32, i32)>>,
        poke_north_with: Option<u32>,
    }

    impl RecordingResolver {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                poke_north_with: None,
            }
        }
    }

    impl TransitionResolver for RecordingResolver {
        fn resolve_transition(&self, grid: &mut TileGrid, x: i32, y: i32) {
            self.calls.borrow_mut().push((x, y));
            if let Some(tile) = self.poke_north_with {
                grid.set_tile(x, y - 1, Some(tile));
            }
        }
    }

    #[test]
    fn painting_into_grass_repairs_center_to_block_candidate() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();
        let mut grid = grass_grid();
        grid.set_tile(1, 1, Some(39));

        let normalizer = RecordingResolver::new();
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);

        assert_eq!(
            grid.tile_at(1, 1),
            Some(30),
            "center rewritten to the first block candidate"
        );
        // No grass-side entries exist, so the surroundings keep their tiles.
        for (x, y) in [(1, 0), (2, 1), (1, 2), (0, 1)] {
            assert_eq!(grid.tile_at(x, y), Some(1));
        }
        // The classification was known, so no stand-in maneuver ran.
        assert!(normalizer.calls.borrow().is_empty());
    }

    #[test]
    fn resolve_is_idempotent_once_stable() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();
        let mut grid = grass_grid();
        grid.set_tile(1, 1, Some(39));

        let normalizer = RecordingResolver::new();
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);
        let after_first = grid.clone();
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);
        assert_eq!(grid, after_first, "second pass must change nothing");
    }

    #[test]
    fn vertical_path_segment_is_repaired_to_straight() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();
        let mut grid = grass_grid();
        grid.set_tile(1, 0, Some(39));
        grid.set_tile(1, 2, Some(39));
        grid.set_tile(1, 1, Some(39));

        let normalizer = RecordingResolver::new();
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);

        assert_eq!(
            grid.tile_at(1, 1),
            Some(33),
            "path above and below selects the straight vertical candidate"
        );
    }

    #[test]
    fn unrepresented_classification_triggers_stand_in_and_restores() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();

        // Path tile surrounded by water: (block, path, water) is unknown.
        let mut grid = TileGrid::new(3, 3);
        for (x, y) in grid.positions().collect::<Vec<_>>() {
            grid.set_tile(x, y, Some(2));
        }
        grid.set_tile(1, 1, Some(39));

        let normalizer = RecordingResolver {
            calls: RefCell::new(Vec::new()),
            poke_north_with: Some(95),
        };
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);

        assert_eq!(
            normalizer.calls.borrow().as_slice(),
            &[(1, 1)],
            "the stand-in maneuver runs the external normalizer once"
        );
        assert_eq!(
            grid.tile_at(1, 1),
            Some(39),
            "the original identifier is restored after normalization"
        );
        assert_eq!(
            grid.tile_at(1, 0),
            Some(95),
            "state the normalizer caused elsewhere is kept"
        );
    }

    #[test]
    fn works_with_the_data_driven_normalizer() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();

        let mut grid = TileGrid::new(3, 3);
        for (x, y) in grid.positions().collect::<Vec<_>>() {
            grid.set_tile(x, y, Some(2));
        }
        grid.set_tile(1, 1, Some(39));

        let normalizer = TransitionNormalizer {
            transitions: &transitions,
            groups: &groups,
        };
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);

        // The basic normalizer only rewrites the stand-in cell itself, which
        // is restored afterwards; the repair must simply not corrupt anything.
        assert_eq!(grid.tile_at(1, 1), Some(39));
    }

    // ── transitive_group ─────────────────────────────────────────────────

    #[test]
    fn transitive_search_prefers_direct_neighbor_evidence() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();

        // Center path, north neighbor grass (a catalog group), rest water.
        let mut grid = TileGrid::new(3, 3);
        for (x, y) in grid.positions().collect::<Vec<_>>() {
            grid.set_tile(x, y, Some(2));
        }
        grid.set_tile(1, 1, Some(39));
        grid.set_tile(1, 0, Some(1));

        let found = transitive_group(&grid, &catalog, &groups, &transitions, 1, 1);
        assert_eq!(found.as_deref(), Some("grass"));
    }

    #[test]
    fn transitive_search_falls_back_to_direct_pair() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();

        // No neighbor carries a catalog group, but path/grass pair directly.
        let mut grid = TileGrid::new(3, 3);
        for (x, y) in grid.positions().collect::<Vec<_>>() {
            grid.set_tile(x, y, Some(2));
        }
        grid.set_tile(1, 1, Some(39));

        let found = transitive_group(&grid, &catalog, &groups, &transitions, 1, 1);
        assert_eq!(found.as_deref(), Some("grass"));
    }

    #[test]
    fn transitive_search_fails_cleanly_without_candidates() {
        let groups = test_groups();
        let transitions = TransitionSet::new("empty".to_string());
        let catalog = CircuitCatalog::new();

        let mut grid = TileGrid::new(3, 3);
        grid.set_tile(1, 1, Some(39));

        assert!(transitive_group(&grid, &catalog, &groups, &transitions, 1, 1).is_none());
    }

    #[test]
    fn transitive_search_ties_break_on_sorted_name() {
        let mut groups = test_groups();
        groups.add_group("azure", GroupKind::Plain);
        groups.assign_tile(70, "azure");

        // azure and grass both two hops from path; "azure" sorts first.
        let mut transitions = TransitionSet::new("t".to_string());
        transitions.add_pair("path", "water", vec![80]);
        transitions.add_pair("water", "azure", vec![81]);
        transitions.add_pair("water", "grass", vec![82]);

        let mut catalog = CircuitCatalog::new();
        catalog.insert(CircuitKey::new(Pattern::Block, "azure", "grass"), 70);

        let mut grid = TileGrid::new(3, 3);
        grid.set_tile(1, 1, Some(39));

        let found = transitive_group(&grid, &catalog, &groups, &transitions, 1, 1);
        assert_eq!(found.as_deref(), Some("azure"));
    }

    // ── classify_with_fallback ───────────────────────────────────────────

    #[test]
    fn fallback_substitutes_transition_marker_side() {
        let groups = test_groups();
        let transitions = test_transitions();
        let catalog = test_catalog();

        // Path tile surrounded by blend tiles (grass-water marker): the
        // marker lands on the outside of the key and must be substituted.
        let mut grid = TileGrid::new(3, 3);
        for (x, y) in grid.positions().collect::<Vec<_>>() {
            grid.set_tile(x, y, Some(95));
        }
        grid.set_tile(1, 1, Some(39));

        let circuit =
            classify_with_fallback(&grid, &catalog, &groups, &transitions, 1, 1).unwrap();
        assert_eq!(circuit.inside, "path");
        assert_eq!(circuit.outside, "grass", "marker replaced by the plain group");
    }

    #[test]
    fn extracted_catalog_round_trips_through_resolution() {
        let groups = test_groups();
        let transitions = test_transitions();

        // Learn from an example map: a lone path block on grass.
        let mut example = grass_grid();
        example.set_tile(1, 1, Some(30));
        let catalog = extract_from_grids(&[example], &groups, &transitions);

        // Paint the same situation with a different variant and resolve.
        let mut grid = grass_grid();
        grid.set_tile(1, 1, Some(39));
        let normalizer = RecordingResolver::new();
        resolve(&mut grid, &catalog, &groups, &transitions, &normalizer, 1, 1);

        assert_eq!(grid.tile_at(1, 1), Some(30), "learned candidate is applied");
    }
}
