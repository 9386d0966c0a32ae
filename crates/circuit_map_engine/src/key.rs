//! Dual-aware circuit keys
//!
//! The same physical tile can be described from either group's point of
//! view: `(pattern, in, out)` and `(pattern.symmetric, out, in)` are the
//! same key. Rather than special-casing equality, a key is normalized to a
//! canonical orientation at construction, so derived `Eq`/`Hash`/`Ord` do
//! the right thing and the catalog stores one entry per physical design.

use std::fmt;

use crate::pattern::Pattern;

/// The identity of one physical circuit tile design.
///
/// Canonical orientation: `inside <= outside` lexicographically, flipping
/// the pattern to its symmetric when the groups swap. When both groups are
/// equal the smaller of the two pattern orientations is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CircuitKey {
    pattern: Pattern,
    inside: String,
    outside: String,
}

impl CircuitKey {
    /// Build a key from an oriented classification.
    ///
    /// # Panics
    ///
    /// Panics if either group name is empty; keys only ever come from
    /// classified tiles or validated catalog files, both of which guarantee
    /// named groups.
    pub fn new(pattern: Pattern, inside: impl Into<String>, outside: impl Into<String>) -> Self {
        let inside = inside.into();
        let outside = outside.into();
        assert!(
            !inside.is_empty() && !outside.is_empty(),
            "circuit key group names must be non-empty"
        );

        if outside < inside {
            Self {
                pattern: pattern.symmetric(),
                inside: outside,
                outside: inside,
            }
        } else if inside == outside {
            Self {
                pattern: pattern.min(pattern.symmetric()),
                inside,
                outside,
            }
        } else {
            Self {
                pattern,
                inside,
                outside,
            }
        }
    }

    /// The pattern in canonical orientation.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// The inside group in canonical orientation.
    pub fn inside_group(&self) -> &str {
        &self.inside
    }

    /// The outside group in canonical orientation.
    pub fn outside_group(&self) -> &str {
        &self.outside
    }

    /// The two group names in canonical order.
    pub fn group_names(&self) -> (&str, &str) {
        (&self.inside, &self.outside)
    }
}

impl fmt::Display for CircuitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}/{})", self.pattern, self.inside, self.outside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_keys_are_equal_and_hash_identically() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        for pattern in Pattern::ALL {
            let a = CircuitKey::new(pattern, "grass", "water");
            let b = CircuitKey::new(pattern.symmetric(), "water", "grass");
            assert_eq!(a, b, "{pattern:?} dual must compare equal");

            let mut ha = DefaultHasher::new();
            let mut hb = DefaultHasher::new();
            a.hash(&mut ha);
            b.hash(&mut hb);
            assert_eq!(ha.finish(), hb.finish());
        }
    }

    #[test]
    fn distinct_keys_stay_distinct() {
        let a = CircuitKey::new(Pattern::Block, "path", "grass");
        let b = CircuitKey::new(Pattern::Block, "path", "water");
        let c = CircuitKey::new(Pattern::StubNorth, "path", "grass");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn canonical_orientation_sorts_groups() {
        let key = CircuitKey::new(Pattern::StubNorth, "water", "grass");
        assert_eq!(key.inside_group(), "grass");
        assert_eq!(key.outside_group(), "water");
        assert_eq!(key.pattern(), Pattern::StubNorth.symmetric());
    }

    #[test]
    fn same_group_both_sides_normalizes_pattern() {
        let a = CircuitKey::new(Pattern::Middle, "water", "water");
        let b = CircuitKey::new(Pattern::Block, "water", "water");
        assert_eq!(a, b, "the dual rule makes these the same key");
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_group_name_is_rejected() {
        let _ = CircuitKey::new(Pattern::Block, "", "grass");
    }
}
