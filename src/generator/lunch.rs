//! Lunch phase: one break per team in the shared break area.

use tracing::{debug, warn};

use super::{team_conflict, ScheduleGenerator};
use crate::models::{Event, EventKind, Minutes, ResourceId, Schedule, TeamId, TimeWindow};

impl ScheduleGenerator<'_> {
    pub(super) fn place_lunches(&self, schedule: &mut Schedule, team_order: &[TeamId]) {
        let duration = self.config.lunch_duration;
        for &team_id in team_order {
            match self.lunch_start(schedule, team_id) {
                Some(start) => schedule.push(Event::new(
                    team_id,
                    EventKind::Lunch,
                    start,
                    duration,
                    ResourceId::break_area(),
                )),
                None => warn!(team_id, "no room for lunch; skipped"),
            }
        }
    }

    /// Start of the team's lunch, in order of preference:
    /// 1. the configured anchor, if the team is free around it;
    /// 2. the idle gap after the anchor whose centre is closest to
    ///    mid-day, as close to mid-day as the gap allows;
    /// 3. straight after the team's last event.
    ///
    /// Lunch must end a transition buffer before the closing ceremony.
    fn lunch_start(&self, schedule: &Schedule, team_id: TeamId) -> Option<Minutes> {
        let c = self.config;
        let buffer = c.transition_buffer;
        let duration = c.lunch_duration;
        let anchor = c.lunch_window();
        let latest_end = c.closing_window().start - buffer;

        if team_conflict(schedule, team_id, anchor, buffer).is_none() {
            return Some(anchor.start);
        }

        let events = schedule.events_for_team(team_id);
        let midpoint = c.day_midpoint();
        let best_gap = events
            .windows(2)
            .map(|pair| {
                TimeWindow::new(
                    (pair[0].end() + buffer).max(anchor.start),
                    (pair[1].start - buffer).min(latest_end),
                )
            })
            .filter(|gap| gap.duration() >= duration)
            .min_by_key(|gap| (gap.midpoint() - midpoint).abs());

        if let Some(gap) = best_gap {
            let start = (midpoint - duration / 2).clamp(gap.start, gap.end - duration);
            debug!(team_id, start, "lunch moved into idle gap");
            return Some(start);
        }

        let start = events.last().map_or(anchor.start, |e| e.end() + buffer);
        if start + duration <= latest_end {
            debug!(team_id, start, "lunch appended after last event");
            Some(start)
        } else {
            None
        }
    }
}
