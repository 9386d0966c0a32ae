//! Rectangular tile grid with cardinal neighbor addressing

use serde::{Deserialize, Serialize};

/// The tile ids of a cell's four direct neighbors.
///
/// A direction is `None` when the neighbor is outside the grid or its cell
/// is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborTiles {
    pub north: Option<u32>,
    pub east: Option<u32>,
    pub south: Option<u32>,
    pub west: Option<u32>,
}

impl NeighborTiles {
    /// The neighbors in fixed north/east/south/west order.
    pub fn in_order(&self) -> [Option<u32>; 4] {
        [self.north, self.east, self.south, self.west]
    }
}

/// A rectangular tile grid with row-major storage.
///
/// Row 0 is the top row, so north is `y - 1` and south is `y + 1`.
/// Coordinates are `i32` so callers can probe outside the grid without
/// pre-checking bounds; every accessor treats out-of-bounds as empty and
/// `set_tile` outside the grid is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    /// Row-major tile data - `None` means empty, `Some(id)` is a tile id.
    pub tiles: Vec<Option<u32>>,
}

impl TileGrid {
    /// Create an empty grid of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![None; size],
        }
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// The tile id at `(x, y)`, or `None` if the cell is empty or outside
    /// the grid.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y)
            .and_then(|idx| self.tiles.get(idx).copied().flatten())
    }

    /// Write `tile` at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Option<u32>) {
        if let Some(idx) = self.index(x, y) {
            self.tiles[idx] = tile;
        }
    }

    /// The four direct neighbors of `(x, y)`.
    pub fn neighbors(&self, x: i32, y: i32) -> NeighborTiles {
        NeighborTiles {
            north: self.tile_at(x, y - 1),
            east: self.tile_at(x + 1, y),
            south: self.tile_at(x, y + 1),
            west: self.tile_at(x - 1, y),
        }
    }

    /// Iterate every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Check that the tile vector length matches the grid dimensions.
    pub fn validate(&self) -> Result<(), String> {
        let expected = (self.width * self.height) as usize;
        if self.tiles.len() != expected {
            return Err(format!(
                "grid is {}x{} but holds {} cells (expected {})",
                self.width,
                self.height,
                self.tiles.len(),
                expected
            ));
        }
        Ok(())
    }
}
