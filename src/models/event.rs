//! Event model.
//!
//! An event is one scheduled occurrence: a team doing one kind of activity
//! on one resource for a fixed time window. Events are plain values;
//! equality is structural across every field.

use serde::{Deserialize, Serialize};

use super::{Minutes, ResourceId, TimeWindow};
use crate::error::ScheduleError;

/// Team identifier (1-based).
pub type TeamId = u32;

/// Kind of activity an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// One robot run at a game table.
    TableRun,
    /// Project (research) judging session.
    ProjectJudging,
    /// Robot design judging session.
    RobotJudging,
    /// Lunch break.
    Lunch,
    /// Opening ceremony (all teams at once).
    OpeningCeremony,
    /// Closing ceremony (all teams at once).
    ClosingCeremony,
}

impl EventKind {
    /// All kinds, in the order a team normally experiences them.
    pub const ALL: [EventKind; 6] = [
        EventKind::OpeningCeremony,
        EventKind::ProjectJudging,
        EventKind::RobotJudging,
        EventKind::TableRun,
        EventKind::Lunch,
        EventKind::ClosingCeremony,
    ];

    /// Ceremonies.
    #[inline]
    pub fn is_ceremony(self) -> bool {
        matches!(self, Self::OpeningCeremony | Self::ClosingCeremony)
    }

    /// Judging sessions.
    #[inline]
    pub fn is_judging(self) -> bool {
        matches!(self, Self::ProjectJudging | Self::RobotJudging)
    }

    /// Table runs and judging sessions, i.e. everything that occupies an
    /// exclusive resource.
    #[inline]
    pub fn is_competitive(self) -> bool {
        !self.is_ceremony() && self != Self::Lunch
    }
}

/// A scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Team taking part (1-based).
    pub team_id: TeamId,
    /// Activity kind.
    pub kind: EventKind,
    /// Start time (minutes from day start).
    pub start: Minutes,
    /// Duration (minutes, > 0).
    pub duration: Minutes,
    /// Resource the event occupies.
    pub resource: ResourceId,
}

impl Event {
    /// Creates an event without checking its fields.
    ///
    /// Internal construction paths always pass configured positive
    /// durations; use [`Event::try_new`] for external input.
    pub fn new(
        team_id: TeamId,
        kind: EventKind,
        start: Minutes,
        duration: Minutes,
        resource: ResourceId,
    ) -> Self {
        Self {
            team_id,
            kind,
            start,
            duration,
            resource,
        }
    }

    /// Creates an event, rejecting a zero team id, a negative start or a
    /// non-positive duration.
    pub fn try_new(
        team_id: TeamId,
        kind: EventKind,
        start: Minutes,
        duration: Minutes,
        resource: ResourceId,
    ) -> Result<Self, ScheduleError> {
        if team_id == 0 {
            return Err(ScheduleError::InvalidEvent {
                reason: "team ids start at 1".into(),
            });
        }
        if start < 0 {
            return Err(ScheduleError::InvalidEvent {
                reason: format!("start {start} is negative"),
            });
        }
        if duration <= 0 {
            return Err(ScheduleError::InvalidEvent {
                reason: format!("duration {duration} is not positive"),
            });
        }
        Ok(Self::new(team_id, kind, start, duration, resource))
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(&self) -> Minutes {
        self.start + self.duration
    }

    /// Occupied time window.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end())
    }
}
