//! Schedule quality metrics (KPIs).
//!
//! Reporting metrics for a finished schedule. Unlike the fitness score,
//! KPIs are computed for any schedule, feasible or not, and are meant
//! for display and comparison.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest end of a table run or judging session |
//! | Utilization | Busy minutes / competitive minutes, per table and room |
//! | Avg Idle | Mean per-team waiting time between competitive events |
//! | Ideal Gap Rate | Fraction of waits inside the configured ideal range |

use std::collections::BTreeMap;

use crate::config::TournamentConfig;
use crate::models::{Minutes, ResourceId, Schedule};

/// Schedule performance indicators.
///
/// All time values are in minutes.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Number of events.
    pub event_count: usize,
    /// Latest end of a competitive event.
    pub makespan: Minutes,
    /// Utilization per table and judging room (0.0..1.0).
    pub utilization_by_resource: BTreeMap<ResourceId, f64>,
    /// Mean of `utilization_by_resource`.
    pub avg_utilization: f64,
    /// Mean per-team total wait between consecutive competitive events.
    pub avg_idle_minutes: f64,
    /// Fraction of waits within `[ideal_gap_min, ideal_gap_max]`.
    pub ideal_gap_rate: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its configuration.
    pub fn calculate(schedule: &Schedule, config: &TournamentConfig) -> Self {
        let makespan = schedule
            .events()
            .iter()
            .filter(|e| e.kind.is_competitive())
            .map(|e| e.end())
            .max()
            .unwrap_or(0);

        // Every configured table and room is listed, idle ones at 0.
        let horizon = config.competitive_capacity()
            / Minutes::from((config.tables + config.judging_rooms).max(1));
        let resources = (0..config.tables)
            .map(ResourceId::table)
            .chain((0..config.judging_rooms).map(ResourceId::judging_room));
        let utilization_by_resource: BTreeMap<ResourceId, f64> = resources
            .map(|r| {
                let busy: Minutes = schedule
                    .events_for_resource(r)
                    .iter()
                    .map(|e| e.duration)
                    .sum();
                let util = if horizon > 0 {
                    busy as f64 / horizon as f64
                } else {
                    0.0
                };
                (r, util)
            })
            .collect();
        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            utilization_by_resource.values().sum::<f64>() / utilization_by_resource.len() as f64
        };

        let mut total_idle: Minutes = 0;
        let mut teams_with_events = 0usize;
        let mut gaps = 0usize;
        let mut ideal_gaps = 0usize;
        let ideal = config.weights.ideal_gap_min..=config.weights.ideal_gap_max;

        for (_, events) in schedule.team_buckets() {
            let competitive: Vec<_> = events.iter().filter(|e| e.kind.is_competitive()).collect();
            if competitive.is_empty() {
                continue;
            }
            teams_with_events += 1;
            for pair in competitive.windows(2) {
                let gap = (pair[1].start - pair[0].end()).max(0);
                total_idle += gap;
                gaps += 1;
                if ideal.contains(&gap) {
                    ideal_gaps += 1;
                }
            }
        }

        let avg_idle_minutes = if teams_with_events == 0 {
            0.0
        } else {
            total_idle as f64 / teams_with_events as f64
        };
        let ideal_gap_rate = if gaps == 0 {
            1.0
        } else {
            ideal_gaps as f64 / gaps as f64
        };

        Self {
            event_count: schedule.len(),
            makespan,
            utilization_by_resource,
            avg_utilization,
            avg_idle_minutes,
            ideal_gap_rate,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_utilization: f64, min_ideal_gap_rate: f64) -> bool {
        self.avg_utilization >= min_utilization && self.ideal_gap_rate >= min_ideal_gap_rate
    }
}
