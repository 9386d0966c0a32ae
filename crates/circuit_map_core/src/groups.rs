//! The group classifier: tile ids -> named terrain groups

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// What a group is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GroupKind {
    /// Ordinary terrain (e.g. "grass", "water").
    #[default]
    Plain,
    /// Eligible to form circuit shapes (loops, rails, junctions) against a
    /// surrounding group.
    Circuit,
    /// Marker group for blend tiles owned by the transition subsystem.
    Transition,
}

/// A named terrain group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub kind: GroupKind,
}

/// The group classifier as a configuration document.
///
/// Maps tile ids to group names and records each group's kind. Queries
/// return `None` rather than failing for unknown tiles or groups; the
/// offline build path calls [`GroupSet::validate`] up front instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSet {
    /// Stable identifier for this document.
    pub id: Uuid,
    pub name: String,
    pub groups: Vec<Group>,
    /// Tile id -> group name.
    #[serde(default)]
    pub tile_groups: HashMap<u32, String>,
}

impl GroupSet {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            groups: Vec::new(),
            tile_groups: HashMap::new(),
        }
    }

    /// Add a group. Returns its index in `groups`.
    pub fn add_group(&mut self, name: impl Into<String>, kind: GroupKind) -> usize {
        self.groups.push(Group {
            name: name.into(),
            kind,
        });
        self.groups.len() - 1
    }

    /// Assign a tile id to a group by name.
    pub fn assign_tile(&mut self, tile: u32, group: impl Into<String>) {
        self.tile_groups.insert(tile, group.into());
    }

    /// The group name a tile id belongs to, if any.
    pub fn group_of(&self, tile: u32) -> Option<&str> {
        self.tile_groups.get(&tile).map(String::as_str)
    }

    /// The kind of a group, if the group exists.
    pub fn kind_of(&self, group: &str) -> Option<GroupKind> {
        self.groups.iter().find(|g| g.name == group).map(|g| g.kind)
    }

    /// Whether `group` may form circuit shapes.
    pub fn is_circuit_capable(&self, group: &str) -> bool {
        self.kind_of(group) == Some(GroupKind::Circuit)
    }

    /// Whether `group` is a transition marker group.
    pub fn is_transition(&self, group: &str) -> bool {
        self.kind_of(group) == Some(GroupKind::Transition)
    }

    /// All group names, sorted. Sorted so that every caller iterating the
    /// vocabulary sees the same order.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check internal consistency: non-empty unique group names and no tile
    /// assigned to an unknown group.
    pub fn validate(&self) -> Result<(), String> {
        for group in &self.groups {
            if group.name.is_empty() {
                return Err("group with empty name".to_string());
            }
        }
        let names = self.group_names();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err("duplicate group name".to_string());
        }
        for (tile, group) in &self.tile_groups {
            if self.kind_of(group).is_none() {
                return Err(format!("tile {tile} assigned to unknown group '{group}'"));
            }
        }
        Ok(())
    }
}
