//! Judging phase: one project and one robot session per team.

use tracing::warn;

use super::clock::ResourceClock;
use super::{team_conflict, ScheduleGenerator};
use crate::models::{Event, EventKind, ResourceId, Schedule, TeamId, TimeWindow};

impl ScheduleGenerator<'_> {
    /// Places all project sessions, then all robot sessions.
    ///
    /// Project rooms are `0..project_rooms`, robot rooms the rest.
    pub(super) fn place_judging(&self, schedule: &mut Schedule, team_order: &[TeamId]) {
        let c = self.config;
        let from = c.opening_window().end + c.transition_buffer;
        let split = c.project_rooms();

        let mut project = ResourceClock::new((0..split).map(ResourceId::judging_room), from);
        let mut robot =
            ResourceClock::new((split..c.judging_rooms).map(ResourceId::judging_room), from);

        for &team_id in team_order {
            self.place_session(schedule, &mut project, team_id, EventKind::ProjectJudging);
        }
        for &team_id in team_order {
            self.place_session(schedule, &mut robot, team_id, EventKind::RobotJudging);
        }
    }

    fn place_session(
        &self,
        schedule: &mut Schedule,
        rooms: &mut ResourceClock,
        team_id: TeamId,
        kind: EventKind,
    ) {
        let c = self.config;
        let Some((room, available)) = rooms.earliest() else {
            warn!(team_id, ?kind, "no judging room of this type");
            return;
        };

        let duration = c.judging_duration;
        let mut start = self.clear_of_lunch(available, duration);
        let mut retries = 0;
        loop {
            let window = TimeWindow::starting_at(start, duration);
            let Some(conflict) = team_conflict(schedule, team_id, window, c.transition_buffer)
            else {
                break;
            };
            if retries >= c.judging_retry_cap {
                warn!(team_id, ?kind, retries, "judging session skipped after retry cap");
                return;
            }
            retries += 1;
            start = self.clear_of_lunch(conflict.end() + c.transition_buffer, duration);
        }

        let event = Event::new(team_id, kind, start, duration, room);
        if event.end() + c.transition_buffer > c.closing_window().start {
            warn!(team_id, ?kind, start, "judging session runs into the closing ceremony");
        }
        schedule.push(event);
        rooms.advance(room, event.end() + c.judging_break.max(c.judging_buffer));
    }
}
