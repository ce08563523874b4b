//! Next-available times for a pool of interchangeable resources.

use crate::models::{Minutes, ResourceId};

/// Tracks when each resource of a pool is free again.
///
/// Resources keep their insertion order; ties on availability go to the
/// resource inserted first.
#[derive(Debug, Clone)]
pub(crate) struct ResourceClock {
    slots: Vec<(ResourceId, Minutes)>,
}

impl ResourceClock {
    /// Every resource becomes available at `available_from`.
    pub(crate) fn new(resources: impl IntoIterator<Item = ResourceId>, available_from: Minutes) -> Self {
        Self {
            slots: resources.into_iter().map(|r| (r, available_from)).collect(),
        }
    }

    /// Resource with the earliest availability, and that time.
    pub(crate) fn earliest(&self) -> Option<(ResourceId, Minutes)> {
        self.slots.iter().min_by_key(|(_, t)| *t).copied()
    }

    /// Marks `resource` busy until `until`.
    pub(crate) fn advance(&mut self, resource: ResourceId, until: Minutes) {
        if let Some(slot) = self.slots.iter_mut().find(|(r, _)| *r == resource) {
            slot.1 = until;
        }
    }

    /// No resource becomes available before `floor`.
    pub(crate) fn raise_floor(&mut self, floor: Minutes) {
        for slot in &mut self.slots {
            slot.1 = slot.1.max(floor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_prefers_first_on_tie() {
        let clock = ResourceClock::new((0..3).map(ResourceId::table), 40);
        assert_eq!(clock.earliest(), Some((ResourceId::table(0), 40)));
    }

    #[test]
    fn test_advance_and_floor() {
        let mut clock = ResourceClock::new((0..2).map(ResourceId::table), 40);
        clock.advance(ResourceId::table(0), 95);
        assert_eq!(clock.earliest(), Some((ResourceId::table(1), 40)));

        clock.raise_floor(100);
        assert_eq!(clock.earliest(), Some((ResourceId::table(0), 100)));
    }

    #[test]
    fn test_empty_pool() {
        let clock = ResourceClock::new(std::iter::empty(), 0);
        assert_eq!(clock.earliest(), None);
    }
}
