//! Constructive schedule generator.
//!
//! # Algorithm
//!
//! Builds a schedule phase by phase; later phases never move earlier
//! placements:
//!
//! 1. Opening ceremony for every team at day start (shared area).
//! 2. Judging: project sessions, then robot sessions, each in the room of
//!    its type that frees up first, kept clear of lunch and of the team's
//!    own events.
//! 3. Table runs: `ceil(rounds / 2)` rounds before lunch, the rest after,
//!    each on the table that frees up first, pushed forward in fixed steps
//!    past the team's own events.
//! 4. Lunch at the anchor, or in the idle gap closest to mid-day.
//! 5. Closing ceremony for every team at day end (shared area).
//!
//! Phases never fail. An event that cannot be placed cleanly is placed
//! best-effort or skipped with a warning, and the fitness evaluator
//! rejects the result. [`ScheduleGenerator::generate`] then retries with a
//! shuffled team order, up to `max_attempts` times.
//!
//! # Complexity
//! O(n · e) per phase where n = teams and e = events per team.

mod clock;
mod judging;
mod lunch;
mod tables;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::config::TournamentConfig;
use crate::error::ScheduleError;
use crate::fitness::FitnessEvaluator;
use crate::models::{Event, EventKind, Minutes, ResourceId, Schedule, TeamId, TimeWindow};

/// Greedy earliest-available-resource schedule builder.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_tournament::TournamentConfig;
/// use u_tournament::generator::ScheduleGenerator;
///
/// let config = TournamentConfig::default();
/// let generator = ScheduleGenerator::new(&config);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let schedule = generator.generate(&mut rng).unwrap();
/// assert_eq!(schedule.len(), 72);
/// assert!(schedule.fitness().unwrap() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleGenerator<'a> {
    config: &'a TournamentConfig,
    evaluator: FitnessEvaluator,
}

impl<'a> ScheduleGenerator<'a> {
    /// Creates a generator for a configuration.
    ///
    /// The configuration is assumed valid; see [`TournamentConfig::validate`].
    pub fn new(config: &'a TournamentConfig) -> Self {
        Self {
            config,
            evaluator: FitnessEvaluator::new(config),
        }
    }

    /// Builds and evaluates schedules until one is feasible.
    ///
    /// The first attempt uses team order 1..=N; later attempts shuffle it.
    /// The returned schedule carries its fitness.
    #[instrument(skip_all, fields(teams = self.config.teams, max_attempts = self.config.max_attempts))]
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Schedule, ScheduleError> {
        let mut order: Vec<TeamId> = (1..=self.config.teams).collect();

        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                order.shuffle(rng);
            }
            let mut schedule = self.build(&order);
            let fitness = self.evaluator.evaluate_in_place(&mut schedule);
            if fitness > 0.0 {
                info!(attempt, fitness, events = schedule.len(), "generated feasible schedule");
                return Ok(schedule);
            }
            if let Err(violation) = self.evaluator.check_hard(&schedule) {
                debug!(attempt, %violation, "construction attempt infeasible");
            }
        }

        Err(ScheduleError::GenerationFailed {
            attempts: self.config.max_attempts,
        })
    }

    /// Runs every phase once for the given team order.
    ///
    /// The result is not evaluated and may be infeasible.
    pub fn build(&self, team_order: &[TeamId]) -> Schedule {
        let mut schedule = Schedule::new();
        self.place_ceremony(&mut schedule, team_order, EventKind::OpeningCeremony);
        self.place_judging(&mut schedule, team_order);
        self.place_table_runs(&mut schedule, team_order);
        self.place_lunches(&mut schedule, team_order);
        self.place_ceremony(&mut schedule, team_order, EventKind::ClosingCeremony);
        schedule
    }

    fn place_ceremony(&self, schedule: &mut Schedule, team_order: &[TeamId], kind: EventKind) {
        let window = match kind {
            EventKind::OpeningCeremony => self.config.opening_window(),
            _ => self.config.closing_window(),
        };
        for &team_id in team_order {
            schedule.push(Event::new(
                team_id,
                kind,
                window.start,
                window.duration(),
                ResourceId::ceremony_area(),
            ));
        }
    }

    /// Moves `start` past the lunch anchor if `[start, start + duration)`
    /// comes within the transition buffer of it.
    fn clear_of_lunch(&self, start: Minutes, duration: Minutes) -> Minutes {
        let lunch = self.config.lunch_window();
        let buffer = self.config.transition_buffer;
        if TimeWindow::starting_at(start, duration).overlaps_with_buffer(&lunch, buffer) {
            lunch.end + buffer
        } else {
            start
        }
    }
}

/// First event of the team that comes within `buffer` of `window`.
fn team_conflict(
    schedule: &Schedule,
    team_id: TeamId,
    window: TimeWindow,
    buffer: Minutes,
) -> Option<Event> {
    schedule
        .events_for_team(team_id)
        .iter()
        .find(|e| e.window().overlaps_with_buffer(&window, buffer))
        .copied()
}
