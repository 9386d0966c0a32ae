//! The 16 canonical neighbor-adjacency shapes
//!
//! A [`DirectionMask`] says, per cardinal direction, whether the neighbor
//! belongs to the same inside group as the classified tile. Exactly 16
//! masks exist and [`Pattern`] is a total bijection over them, backed by
//! const lookup tables so classification is a single indexed load.

use serde::{Deserialize, Serialize};

/// Per-direction "neighbor is in the inside group" flags.
///
/// Bit packing: north = bit 0, east = bit 1, south = bit 2, west = bit 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionMask {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl DirectionMask {
    pub const fn new(north: bool, east: bool, south: bool, west: bool) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    /// Pack into 0..16.
    pub const fn bits(self) -> u8 {
        (self.north as u8)
            | ((self.east as u8) << 1)
            | ((self.south as u8) << 2)
            | ((self.west as u8) << 3)
    }

    /// Unpack from the low four bits; higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            north: bits & 0b0001 != 0,
            east: bits & 0b0010 != 0,
            south: bits & 0b0100 != 0,
            west: bits & 0b1000 != 0,
        }
    }

    /// The mask with every direction flipped.
    pub const fn complement(self) -> Self {
        Self {
            north: !self.north,
            east: !self.east,
            south: !self.south,
            west: !self.west,
        }
    }
}

/// One of the 16 canonical adjacency shapes.
///
/// Naming follows the shape a circuit tile renders: a `Stub` connects in
/// one direction, a `Corner` in two adjacent ones, a `Straight` in two
/// opposite ones, an `Edge` borders the outside group on exactly the named
/// side, `Block` is fully surrounded by the outside group and `Middle`
/// fully enclosed by its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Block,
    StubNorth,
    StubEast,
    StubSouth,
    StubWest,
    CornerNorthEast,
    CornerSouthEast,
    CornerSouthWest,
    CornerNorthWest,
    StraightVertical,
    StraightHorizontal,
    EdgeNorth,
    EdgeEast,
    EdgeSouth,
    EdgeWest,
    Middle,
}

/// Pattern per packed mask value, indexed by [`DirectionMask::bits`].
const BY_MASK: [Pattern; 16] = [
    Pattern::Block,              // 0b0000
    Pattern::StubNorth,          // 0b0001 N
    Pattern::StubEast,           // 0b0010 E
    Pattern::CornerNorthEast,    // 0b0011 N+E
    Pattern::StubSouth,          // 0b0100 S
    Pattern::StraightVertical,   // 0b0101 N+S
    Pattern::CornerSouthEast,    // 0b0110 E+S
    Pattern::EdgeWest,           // 0b0111 N+E+S
    Pattern::StubWest,           // 0b1000 W
    Pattern::CornerNorthWest,    // 0b1001 N+W
    Pattern::StraightHorizontal, // 0b1010 E+W
    Pattern::EdgeSouth,          // 0b1011 N+E+W
    Pattern::CornerSouthWest,    // 0b1100 S+W
    Pattern::EdgeEast,           // 0b1101 N+S+W
    Pattern::EdgeNorth,          // 0b1110 E+S+W
    Pattern::Middle,             // 0b1111
];

impl Pattern {
    /// Every pattern, in mask order.
    pub const ALL: [Pattern; 16] = BY_MASK;

    /// Classify a direction mask. Total; every mask maps to one pattern.
    pub const fn from_mask(mask: DirectionMask) -> Self {
        BY_MASK[mask.bits() as usize]
    }

    /// The mask this pattern encodes. Inverse of [`Pattern::from_mask`].
    pub const fn mask(self) -> DirectionMask {
        match self {
            Pattern::Block => DirectionMask::from_bits(0b0000),
            Pattern::StubNorth => DirectionMask::from_bits(0b0001),
            Pattern::StubEast => DirectionMask::from_bits(0b0010),
            Pattern::CornerNorthEast => DirectionMask::from_bits(0b0011),
            Pattern::StubSouth => DirectionMask::from_bits(0b0100),
            Pattern::StraightVertical => DirectionMask::from_bits(0b0101),
            Pattern::CornerSouthEast => DirectionMask::from_bits(0b0110),
            Pattern::EdgeWest => DirectionMask::from_bits(0b0111),
            Pattern::StubWest => DirectionMask::from_bits(0b1000),
            Pattern::CornerNorthWest => DirectionMask::from_bits(0b1001),
            Pattern::StraightHorizontal => DirectionMask::from_bits(0b1010),
            Pattern::EdgeSouth => DirectionMask::from_bits(0b1011),
            Pattern::CornerSouthWest => DirectionMask::from_bits(0b1100),
            Pattern::EdgeEast => DirectionMask::from_bits(0b1101),
            Pattern::EdgeNorth => DirectionMask::from_bits(0b1110),
            Pattern::Middle => DirectionMask::from_bits(0b1111),
        }
    }

    /// The pattern with inside and outside swapped: the complement mask.
    ///
    /// An involution: `p.symmetric().symmetric() == p`.
    pub const fn symmetric(self) -> Self {
        Self::from_mask(self.mask().complement())
    }

    /// Whether this pattern encodes exactly the given direction flags.
    pub const fn matches(self, north: bool, east: bool, south: bool, west: bool) -> bool {
        self.mask().bits() == DirectionMask::new(north, east, south, west).bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_and_from_mask_are_a_bijection() {
        for bits in 0..16u8 {
            let mask = DirectionMask::from_bits(bits);
            let pattern = Pattern::from_mask(mask);
            assert_eq!(pattern.mask(), mask, "{pattern:?} must round-trip its mask");
        }
        // 16 patterns, 16 distinct masks.
        let mut seen = [false; 16];
        for pattern in Pattern::ALL {
            let bits = pattern.mask().bits() as usize;
            assert!(!seen[bits], "duplicate mask for {pattern:?}");
            seen[bits] = true;
        }
    }

    #[test]
    fn symmetric_is_an_involution() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.symmetric().symmetric(), pattern);
            assert_eq!(
                pattern.symmetric().mask(),
                pattern.mask().complement(),
                "symmetric of {pattern:?} must encode the complement mask"
            );
        }
    }

    #[test]
    fn known_symmetric_pairs() {
        assert_eq!(Pattern::Block.symmetric(), Pattern::Middle);
        assert_eq!(Pattern::StubNorth.symmetric(), Pattern::EdgeNorth);
        assert_eq!(Pattern::CornerNorthEast.symmetric(), Pattern::CornerSouthWest);
        assert_eq!(
            Pattern::StraightVertical.symmetric(),
            Pattern::StraightHorizontal
        );
    }

    #[test]
    fn matches_checks_the_exact_flags() {
        assert!(Pattern::StraightVertical.matches(true, false, true, false));
        assert!(!Pattern::StraightVertical.matches(true, true, true, false));
        assert!(Pattern::Block.matches(false, false, false, false));
        assert!(Pattern::Middle.matches(true, true, true, true));
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&Pattern::CornerNorthEast).unwrap();
        assert_eq!(json, "\"corner_north_east\"");
        let back: Pattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Pattern::CornerNorthEast);
        assert!(serde_json::from_str::<Pattern>("\"no_such_shape\"").is_err());
    }
}
