//! Schedule fitness evaluation.
//!
//! Fitness is a number in [0, 1]. A schedule that breaks any hard
//! constraint scores exactly 0.0. A feasible schedule scores a weighted
//! mean of three soft terms:
//!
//! | Term | Measures |
//! |------|----------|
//! | Utilization | Competitive resource-minutes used / available |
//! | Efficiency | How little idle time teams have inside each half-day |
//! | Flow | Opening first, lunch mid-sequence, closing last |
//!
//! Hard constraints, checked in this order:
//! 1. Every event lies inside the day.
//! 2. Consecutive events on a table or judging room respect its buffer.
//! 3. Consecutive events of a team respect the transition buffer.
//! 4. Every team holds exactly the configured number of each event kind.

mod kpi;

pub use kpi::ScheduleKpi;

use std::fmt;

use tracing::trace;

use crate::config::TournamentConfig;
use crate::models::{Event, EventKind, ResourceId, Schedule, TeamId};

/// First hard-constraint violation found in a schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum HardViolation {
    /// An event starts before the day or ends after it.
    OutsideDay { event: Event },
    /// Two events on an exclusive resource are closer than its buffer.
    ResourceOverlap {
        resource: ResourceId,
        first: Event,
        second: Event,
    },
    /// Two events of a team are closer than the transition buffer.
    TeamOverlap {
        team_id: TeamId,
        first: Event,
        second: Event,
    },
    /// An event belongs to a team outside 1..=teams.
    UnknownTeam { team_id: TeamId },
    /// A team holds the wrong number of events of some kind.
    WrongCount {
        team_id: TeamId,
        kind: EventKind,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for HardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideDay { event } => write!(
                f,
                "team {} {:?} at [{}, {}) lies outside the day",
                event.team_id,
                event.kind,
                event.start,
                event.end()
            ),
            Self::ResourceOverlap {
                resource,
                first,
                second,
            } => write!(
                f,
                "{resource}: event ending at {} is too close to event starting at {}",
                first.end(),
                second.start
            ),
            Self::TeamOverlap {
                team_id,
                first,
                second,
            } => write!(
                f,
                "team {team_id}: {:?} ending at {} is too close to {:?} starting at {}",
                first.kind,
                first.end(),
                second.kind,
                second.start
            ),
            Self::UnknownTeam { team_id } => write!(f, "unknown team {team_id}"),
            Self::WrongCount {
                team_id,
                kind,
                expected,
                actual,
            } => write!(
                f,
                "team {team_id}: expected {expected} {kind:?}, found {actual}"
            ),
        }
    }
}

/// Soft-score terms of a feasible schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessBreakdown {
    /// Utilization term (0..1).
    pub utilization: f64,
    /// Efficiency term (0.5..1).
    pub efficiency: f64,
    /// Flow term (0..1).
    pub flow: f64,
    /// Weighted total (0..1).
    pub total: f64,
}

/// Scores schedules against a tournament configuration.
///
/// Evaluation is pure: the same schedule always gets the same score.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    config: TournamentConfig,
}

impl FitnessEvaluator {
    /// Creates an evaluator for a configuration.
    pub fn new(config: &TournamentConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// The configuration schedules are scored against.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Fitness in [0, 1]; 0.0 if any hard constraint is violated.
    pub fn evaluate(&self, schedule: &Schedule) -> f64 {
        self.breakdown(schedule).map_or(0.0, |b| b.total)
    }

    /// Evaluates and caches the fitness on the schedule.
    pub fn evaluate_in_place(&self, schedule: &mut Schedule) -> f64 {
        let fitness = self.evaluate(schedule);
        schedule.set_fitness(fitness);
        fitness
    }

    /// Soft-score terms, or `None` if the schedule is infeasible.
    pub fn breakdown(&self, schedule: &Schedule) -> Option<FitnessBreakdown> {
        if let Err(violation) = self.check_hard(schedule) {
            trace!(%violation, "hard constraint violated");
            return None;
        }

        let w = &self.config.weights;
        let utilization = self.utilization(schedule);
        let efficiency = self.efficiency(schedule);
        let flow = self.flow(schedule);
        let total = (w.utilization * utilization + w.efficiency * efficiency + w.flow * flow)
            / w.total();

        Some(FitnessBreakdown {
            utilization,
            efficiency,
            flow,
            total: total.clamp(0.0, 1.0),
        })
    }

    /// Returns the first hard-constraint violation, if any.
    pub fn check_hard(&self, schedule: &Schedule) -> Result<(), HardViolation> {
        let day = self.config.day_window();
        if let Some(event) = schedule
            .events()
            .iter()
            .find(|e| e.start < day.start || e.end() > day.end)
        {
            return Err(HardViolation::OutsideDay { event: *event });
        }

        for (resource, events) in schedule.resource_buckets() {
            if !resource.is_exclusive() {
                continue;
            }
            let buffer = self.config.resource_buffer(resource.kind);
            if let Some(pair) = events.windows(2).find(|p| p[0].end() + buffer > p[1].start) {
                return Err(HardViolation::ResourceOverlap {
                    resource,
                    first: pair[0],
                    second: pair[1],
                });
            }
        }

        let buffer = self.config.transition_buffer;
        for (team_id, events) in schedule.team_buckets() {
            if let Some(pair) = events.windows(2).find(|p| p[0].end() + buffer > p[1].start) {
                return Err(HardViolation::TeamOverlap {
                    team_id,
                    first: pair[0],
                    second: pair[1],
                });
            }
        }

        if let Some(team_id) = schedule
            .teams()
            .find(|&t| t == 0 || t > self.config.teams)
        {
            return Err(HardViolation::UnknownTeam { team_id });
        }

        for team_id in 1..=self.config.teams {
            for kind in EventKind::ALL {
                let expected = self.config.required_count(kind);
                let actual = schedule.count_for_team(team_id, kind);
                if actual != expected {
                    return Err(HardViolation::WrongCount {
                        team_id,
                        kind,
                        expected,
                        actual,
                    });
                }
            }
        }

        Ok(())
    }

    /// Competitive event-minutes over available resource-minutes, capped at 1.
    pub fn utilization(&self, schedule: &Schedule) -> f64 {
        let capacity = self.config.competitive_capacity();
        if capacity <= 0 {
            return 0.0;
        }
        let busy: i64 = schedule
            .events()
            .iter()
            .filter(|e| e.kind.is_competitive())
            .map(|e| e.duration)
            .sum();
        (busy as f64 / capacity as f64).min(1.0)
    }

    /// Idle-time efficiency, rescaled into [0.5, 1].
    ///
    /// Each team's competitive events are split at its lunch into two
    /// blocks. A block's idle time is its span minus event durations
    /// minus the transitions it cannot avoid. Zero idle scores 1.0.
    pub fn efficiency(&self, schedule: &Schedule) -> f64 {
        let buffer = self.config.transition_buffer;
        let mut total_idle: i64 = 0;
        let mut total_span: i64 = 0;

        for (_, events) in schedule.team_buckets() {
            let lunch_start = events
                .iter()
                .find(|e| e.kind == EventKind::Lunch)
                .map(|e| e.start);
            let (before, after): (Vec<&Event>, Vec<&Event>) = events
                .iter()
                .filter(|e| e.kind.is_competitive())
                .partition(|e| lunch_start.is_some_and(|l| e.start < l));

            for block in [before, after] {
                let Some(first) = block.first() else {
                    continue;
                };
                let end = block.iter().map(|e| e.end()).max().unwrap_or(first.end());
                let span = end - first.start;
                let busy: i64 = block.iter().map(|e| e.duration).sum();
                let transitions = (block.len() as i64 - 1) * buffer;
                total_idle += (span - busy - transitions).max(0);
                total_span += span;
            }
        }

        if total_span == 0 {
            return 1.0;
        }
        let idle_ratio = (total_idle as f64 / total_span as f64).clamp(0.0, 1.0);
        1.0 - 0.5 * idle_ratio
    }

    /// Ordering quality averaged over teams with at least five events.
    pub fn flow(&self, schedule: &Schedule) -> f64 {
        let mut total = 0.0;
        let mut counted = 0usize;

        for (_, events) in schedule.team_buckets() {
            let n = events.len();
            if n < 5 {
                continue;
            }
            counted += 1;

            let mut credit = 0.0;
            if events[0].kind == EventKind::OpeningCeremony {
                credit += 0.2;
            }
            if let Some(pos) = events.iter().position(|e| e.kind == EventKind::Lunch) {
                let mid = (n - 1) as f64 / 2.0;
                let closeness = 1.0 - (pos as f64 - mid).abs() / mid;
                credit += 0.4 * closeness.clamp(0.0, 1.0);
            }
            if events[n - 1].kind == EventKind::ClosingCeremony {
                credit += 0.4;
            }
            total += credit;
        }

        if counted == 0 {
            0.0
        } else {
            total / counted as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceId;

    /// One team, one round: a hand-built feasible day.
    fn single_team_config() -> TournamentConfig {
        TournamentConfig::default()
            .with_teams(1)
            .with_rounds_per_team(1)
    }

    fn single_team_schedule() -> Schedule {
        Schedule::from_events([
            Event::new(1, EventKind::OpeningCeremony, 0, 30, ResourceId::ceremony_area()),
            Event::new(1, EventKind::ProjectJudging, 40, 10, ResourceId::judging_room(0)),
            Event::new(1, EventKind::RobotJudging, 60, 10, ResourceId::judging_room(2)),
            Event::new(1, EventKind::Lunch, 180, 45, ResourceId::break_area()),
            Event::new(1, EventKind::TableRun, 240, 10, ResourceId::table(0)),
            Event::new(1, EventKind::ClosingCeremony, 510, 30, ResourceId::ceremony_area()),
        ])
    }

    #[test]
    fn test_feasible_schedule_scores_positive() {
        let evaluator = FitnessEvaluator::new(&single_team_config());
        let s = single_team_schedule();
        assert!(evaluator.check_hard(&s).is_ok());
        let f = evaluator.evaluate(&s);
        assert!(f > 0.0 && f <= 1.0);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let evaluator = FitnessEvaluator::new(&single_team_config());
        let mut s = single_team_schedule();
        let first = evaluator.evaluate_in_place(&mut s);
        let second = evaluator.evaluate_in_place(&mut s);
        assert_eq!(first, second);
        assert_eq!(s.fitness(), Some(first));
    }

    #[test]
    fn test_team_events_five_minutes_apart_with_ten_minute_buffer() {
        let evaluator = FitnessEvaluator::new(&single_team_config().with_transition_buffer(10));
        let mut s = single_team_schedule();
        // Robot judging moves to start 5 minutes after project judging ends.
        s.replace(
            2,
            Event::new(1, EventKind::RobotJudging, 55, 10, ResourceId::judging_room(2)),
        );
        assert!(matches!(
            evaluator.check_hard(&s),
            Err(HardViolation::TeamOverlap { team_id: 1, .. })
        ));
        assert_eq!(evaluator.evaluate(&s), 0.0);
    }

    #[test]
    fn test_resource_overlap() {
        let config = single_team_config().with_teams(2);
        let evaluator = FitnessEvaluator::new(&config);
        let s = Schedule::from_events([
            Event::new(1, EventKind::TableRun, 100, 10, ResourceId::table(0)),
            Event::new(2, EventKind::TableRun, 112, 10, ResourceId::table(0)),
        ]);
        assert!(matches!(
            evaluator.check_hard(&s),
            Err(HardViolation::ResourceOverlap { .. })
        ));
    }

    #[test]
    fn test_shared_areas_are_exempt() {
        let config = single_team_config().with_teams(2);
        let evaluator = FitnessEvaluator::new(&config);
        let s = Schedule::from_events([
            Event::new(1, EventKind::OpeningCeremony, 0, 30, ResourceId::ceremony_area()),
            Event::new(2, EventKind::OpeningCeremony, 0, 30, ResourceId::ceremony_area()),
        ]);
        // Fails only on counts, not on the shared ceremony area.
        assert!(matches!(
            evaluator.check_hard(&s),
            Err(HardViolation::WrongCount { .. })
        ));
    }

    #[test]
    fn test_outside_day() {
        let evaluator = FitnessEvaluator::new(&single_team_config());
        let mut s = single_team_schedule();
        s.replace(
            5,
            Event::new(1, EventKind::ClosingCeremony, 520, 30, ResourceId::ceremony_area()),
        );
        assert!(matches!(
            evaluator.check_hard(&s),
            Err(HardViolation::OutsideDay { .. })
        ));
    }

    #[test]
    fn test_wrong_count_and_unknown_team() {
        let evaluator = FitnessEvaluator::new(&single_team_config());
        let mut s = single_team_schedule();
        s.push(Event::new(1, EventKind::TableRun, 400, 10, ResourceId::table(1)));
        assert!(matches!(
            evaluator.check_hard(&s),
            Err(HardViolation::WrongCount {
                kind: EventKind::TableRun,
                expected: 1,
                actual: 2,
                ..
            })
        ));

        let mut s = single_team_schedule();
        s.push(Event::new(5, EventKind::TableRun, 400, 10, ResourceId::table(1)));
        assert_eq!(
            evaluator.check_hard(&s),
            Err(HardViolation::UnknownTeam { team_id: 5 })
        );
    }

    #[test]
    fn test_soft_terms() {
        let config = single_team_config();
        let evaluator = FitnessEvaluator::new(&config);
        let s = single_team_schedule();

        // 30 competitive minutes over 2610 resource-minutes.
        assert!((evaluator.utilization(&s) - 30.0 / 2610.0).abs() < 1e-10);

        // Morning block: 40..70, busy 20, one transition of 10 → no idle.
        // Afternoon block: single run → no idle.
        assert!((evaluator.efficiency(&s) - 1.0).abs() < 1e-10);

        // 6 events: opening first, lunch at index 3 (mid 2.5), closing last.
        let expected_flow = 0.2 + 0.4 * (1.0 - 0.5 / 2.5) + 0.4;
        assert!((evaluator.flow(&s) - expected_flow).abs() < 1e-10);
    }

    #[test]
    fn test_efficiency_penalizes_idle() {
        let config = single_team_config();
        let evaluator = FitnessEvaluator::new(&config);
        let mut s = single_team_schedule();
        // Robot judging moves from 60 to 140: morning span 110, busy 20,
        // transitions 10 → 80 idle. Afternoon span 10, no idle.
        s.replace(
            2,
            Event::new(1, EventKind::RobotJudging, 140, 10, ResourceId::judging_room(2)),
        );
        let expected = 1.0 - 0.5 * (80.0 / 120.0);
        assert!((evaluator.efficiency(&s) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_breakdown_weighting() {
        let config = single_team_config();
        let evaluator = FitnessEvaluator::new(&config);
        let s = single_team_schedule();
        let b = evaluator.breakdown(&s).unwrap();
        let expected = 0.4 * b.utilization + 0.4 * b.efficiency + 0.2 * b.flow;
        assert!((b.total - expected).abs() < 1e-10);
        assert!((evaluator.evaluate(&s) - b.total).abs() < 1e-10);
    }

    #[test]
    fn test_violation_display() {
        let v = HardViolation::WrongCount {
            team_id: 3,
            kind: EventKind::Lunch,
            expected: 1,
            actual: 0,
        };
        assert_eq!(v.to_string(), "team 3: expected 1 Lunch, found 0");
    }
}
