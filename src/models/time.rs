//! Minute-resolution time model.
//!
//! All times are whole minutes relative to the start of the tournament
//! day (t=0). The consumer defines what t=0 means (e.g., 08:00 local time).

use serde::{Deserialize, Serialize};

/// A point in time or a duration, in minutes from the day epoch.
pub type Minutes = i64;

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (minutes, inclusive).
    pub start: Minutes,
    /// Interval end (minutes, exclusive).
    pub end: Minutes,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }

    /// Creates a window from a start and a duration.
    pub fn starting_at(start: Minutes, duration: Minutes) -> Self {
        Self::new(start, start + duration)
    }

    /// Duration of this window (minutes).
    #[inline]
    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    /// Midpoint of this window (rounded down).
    #[inline]
    pub fn midpoint(&self) -> Minutes {
        self.start + self.duration() / 2
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time: Minutes) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether `other` lies entirely inside this window.
    #[inline]
    pub fn encloses(&self, other: &Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether two windows come closer than `buffer` minutes to each other.
    ///
    /// `false` iff one window ends at least `buffer` minutes before the
    /// other starts. With a zero buffer this is [`overlaps`](Self::overlaps).
    pub fn overlaps_with_buffer(&self, other: &Self, buffer: Minutes) -> bool {
        self.start < other.end + buffer && other.start < self.end + buffer
    }

    /// Overlap length with another window (0 if disjoint).
    pub fn overlap_duration(&self, other: &Self) -> Minutes {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).max(0)
    }
}
