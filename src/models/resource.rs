//! Resource model.
//!
//! Resources are the places where events happen: game tables, judging
//! rooms, and the shared ceremony and lunch areas. A resource is identified
//! by its kind plus a zero-based index within that kind.
//!
//! Tables and judging rooms are exclusive: two events on the same one must
//! not overlap, and must be separated by the kind's buffer. Ceremony and
//! break areas hold every team at once and are never conflict-checked.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource kind classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Game table where robot runs take place.
    Table,
    /// Judging room (project or robot-design judging).
    JudgingRoom,
    /// Shared area for the opening and closing ceremonies.
    CeremonyArea,
    /// Shared area for lunch.
    BreakArea,
}

impl ResourceKind {
    /// Whether events on this kind of resource must not overlap.
    #[inline]
    pub fn is_exclusive(self) -> bool {
        matches!(self, Self::Table | Self::JudgingRoom)
    }
}

/// Identity of a single resource: kind + index within that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Zero-based index within the kind.
    pub index: u32,
}

impl ResourceId {
    /// Creates a resource id.
    pub fn new(kind: ResourceKind, index: u32) -> Self {
        Self { kind, index }
    }

    /// Game table `index`.
    pub fn table(index: u32) -> Self {
        Self::new(ResourceKind::Table, index)
    }

    /// Judging room `index`.
    pub fn judging_room(index: u32) -> Self {
        Self::new(ResourceKind::JudgingRoom, index)
    }

    /// The (single) ceremony area.
    pub fn ceremony_area() -> Self {
        Self::new(ResourceKind::CeremonyArea, 0)
    }

    /// The (single) lunch area.
    pub fn break_area() -> Self {
        Self::new(ResourceKind::BreakArea, 0)
    }

    /// Whether events on this resource must not overlap.
    #[inline]
    pub fn is_exclusive(&self) -> bool {
        self.kind.is_exclusive()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            ResourceKind::Table => "table",
            ResourceKind::JudgingRoom => "judging-room",
            ResourceKind::CeremonyArea => "ceremony-area",
            ResourceKind::BreakArea => "break-area",
        };
        write!(f, "{name}#{}", self.index)
    }
}
