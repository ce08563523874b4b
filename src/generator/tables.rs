//! Table phase: `rounds_per_team` runs per team, split around lunch.

use tracing::warn;

use super::clock::ResourceClock;
use super::{team_conflict, ScheduleGenerator};
use crate::models::{Event, EventKind, ResourceId, Schedule, TeamId, TimeWindow};

impl ScheduleGenerator<'_> {
    /// Places table runs round by round.
    ///
    /// The first `ceil(rounds / 2)` rounds target the morning block
    /// between opening and lunch; the rest target the afternoon block
    /// between lunch and closing. Both blocks exclude the transition
    /// buffer at their edges.
    pub(super) fn place_table_runs(&self, schedule: &mut Schedule, team_order: &[TeamId]) {
        let c = self.config;
        let buffer = c.transition_buffer;
        let morning = TimeWindow::new(c.opening_window().end + buffer, c.lunch_start - buffer);
        let afternoon =
            TimeWindow::new(c.lunch_window().end + buffer, c.closing_window().start - buffer);

        let mut tables = ResourceClock::new((0..c.tables).map(ResourceId::table), morning.start);
        let before_lunch = c.rounds_before_lunch();

        for round in 0..c.rounds_per_team {
            let block = if round < before_lunch {
                morning
            } else {
                afternoon
            };
            if round == before_lunch {
                tables.raise_floor(afternoon.start);
            }
            for &team_id in team_order {
                self.place_run(schedule, &mut tables, team_id, round, block);
            }
        }
    }

    fn place_run(
        &self,
        schedule: &mut Schedule,
        tables: &mut ResourceClock,
        team_id: TeamId,
        round: u32,
        block: TimeWindow,
    ) {
        let c = self.config;
        let Some((table, available)) = tables.earliest() else {
            warn!(team_id, round, "no tables configured");
            return;
        };

        let duration = c.table_run_duration;
        let latest_start = c.day_end - duration;
        let mut start = self.clear_of_lunch(available.max(block.start), duration);
        while team_conflict(
            schedule,
            team_id,
            TimeWindow::starting_at(start, duration),
            c.transition_buffer,
        )
        .is_some()
        {
            if start > latest_start {
                warn!(team_id, round, "no conflict-free table slot before day end");
                break;
            }
            start = self.clear_of_lunch(start + c.table_step, duration);
        }

        let event = Event::new(team_id, EventKind::TableRun, start, duration, table);
        if !block.encloses(&event.window()) {
            warn!(
                team_id,
                round,
                start,
                block_start = block.start,
                block_end = block.end,
                "table run placed outside its block"
            );
        }
        schedule.push(event);
        tables.advance(table, event.end() + c.table_buffer);
    }
}
