//! Relationship paths from an item holding a value to a contact.
//!
//! Hop 0 always goes from the value to the item–contact junction. Every
//! further hop crosses the item–item junction, which stores each link once
//! with the ids ordered, so a hop has to say which side it enters from.

use std::fmt;
use std::num::NonZeroU32;

/// Which way an item–item hop walks the canonical `(lower, higher)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Enter on `custom_item_id_lower`, leave on `custom_item_id_higher`.
    LowerToHigher,
    /// Enter on `custom_item_id_higher`, leave on `custom_item_id_lower`.
    HigherToLower,
}

impl Direction {
    /// Junction column the hop enters on.
    pub fn from_column(&self) -> &'static str {
        match self {
            Direction::LowerToHigher => "custom_item_id_lower",
            Direction::HigherToLower => "custom_item_id_higher",
        }
    }

    /// Junction column the hop leaves on.
    pub fn to_column(&self) -> &'static str {
        match self {
            Direction::LowerToHigher => "custom_item_id_higher",
            Direction::HigherToLower => "custom_item_id_lower",
        }
    }
}

/// One item–item traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    pub direction: Direction,
}

/// The ordered item–item hops between the value's item and the contact's item.
///
/// An empty path is the direct link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RelationshipPath {
    hops: Vec<Hop>,
}

impl RelationshipPath {
    pub fn direct() -> Self {
        Self::default()
    }

    pub fn new(directions: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            hops: directions.into_iter().map(|direction| Hop { direction }).collect(),
        }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Number of relationships walked, counting the contact link.
    pub fn depth(&self) -> u32 {
        self.hops.len() as u32 + 1
    }

    pub fn is_direct(&self) -> bool {
        self.hops.is_empty()
    }
}

impl fmt::Display for RelationshipPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value")?;
        for hop in &self.hops {
            match hop.direction {
                Direction::LowerToHigher => f.write_str(" -> item(lower->higher)")?,
                Direction::HigherToLower => f.write_str(" -> item(higher->lower)")?,
            }
        }
        f.write_str(" -> contact")
    }
}

/// Deepest relationship chain the compiler follows, within `1..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepthLimit(NonZeroU32);

impl DepthLimit {
    pub const DIRECT: DepthLimit = DepthLimit(NonZeroU32::MIN);

    /// Depth 8 already means 255 fragments.
    pub const MAX: u32 = 8;

    /// Returns `None` for zero or anything above [`DepthLimit::MAX`].
    pub fn new(depth: u32) -> Option<Self> {
        if depth > Self::MAX {
            return None;
        }
        NonZeroU32::new(depth).map(DepthLimit)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit(NonZeroU32::MIN.saturating_add(2))
    }
}

impl fmt::Display for DepthLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every path up to `max_depth`, shorter paths first.
///
/// Depth 1 is the direct path. Depth `d >= 2` contributes `2^(d-1)` paths
/// of `d - 1` hops: the directions read as a binary counter from zero,
/// first hop in the most significant bit, `0` meaning `LowerToHigher`.
pub fn enumerate(max_depth: DepthLimit) -> Vec<RelationshipPath> {
    let mut paths = vec![RelationshipPath::direct()];

    for depth in 2..=max_depth.get() {
        let hops = depth - 1;
        for counter in 0..(1u64 << hops) {
            let directions = (0..hops).map(|i| {
                if counter >> (hops - 1 - i) & 1 == 0 {
                    Direction::LowerToHigher
                } else {
                    Direction::HigherToLower
                }
            });
            paths.push(RelationshipPath::new(directions));
        }
    }

    paths
}

/// Number of paths [`enumerate`] yields for `max_depth`.
pub fn path_count(max_depth: DepthLimit) -> u64 {
    (1u64 << max_depth.get()) - 1
}
