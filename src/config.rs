//! Tournament configuration.
//!
//! Everything a run needs is supplied up front and read-only for the
//! duration of the run: the size of the event, the shape of the day,
//! activity durations and buffers, soft-score weights and GA parameters.
//! All fields have defaults (see [`TournamentConfig::default`]) so a
//! partial JSON document deserializes.
//!
//! # Example
//!
//! ```
//! use u_tournament::TournamentConfig;
//!
//! let config = TournamentConfig::default()
//!     .with_teams(12)
//!     .with_tables(4)
//!     .with_seed(7);
//! assert_eq!(config.project_rooms(), 2);
//! assert_eq!(config.robot_rooms(), 2);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{EventKind, Minutes, ResourceKind, TimeWindow};
use crate::validation::validate_config;

/// Weights of the soft-score terms.
///
/// The score is normalized by the weight sum, so only ratios matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Resource utilization weight (default: 0.4).
    pub utilization: f64,
    /// Idle-time efficiency weight (default: 0.4).
    pub efficiency: f64,
    /// Event ordering ("flow") weight (default: 0.2).
    pub flow: f64,
    /// Shortest gap between two competitive events considered ideal (default: 30).
    pub ideal_gap_min: Minutes,
    /// Longest gap between two competitive events considered ideal (default: 60).
    pub ideal_gap_max: Minutes,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            utilization: 0.4,
            efficiency: 0.4,
            flow: 0.2,
            ideal_gap_min: 30,
            ideal_gap_max: 60,
        }
    }
}

impl FitnessWeights {
    /// Sum of the three term weights.
    pub fn total(&self) -> f64 {
        self.utilization + self.efficiency + self.flow
    }
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Individuals per generation (default: 20).
    pub population_size: usize,
    /// Generations to run (default: 50).
    pub generations: usize,
    /// Probability that one mutation trial swaps (default: 0.3).
    pub mutation_probability: f64,
    /// Mutation trials per individual (default: 3).
    pub mutations_per_individual: usize,
    /// Fraction of the population carried over unchanged (default: 0.1).
    pub elite_fraction: f64,
    /// Produce crossover pairs on the rayon pool (default: true).
    pub parallel: bool,
    /// Wall-clock budget; the run stops after the generation that crosses it.
    pub time_limit_ms: Option<u64>,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 50,
            mutation_probability: 0.3,
            mutations_per_individual: 3,
            elite_fraction: 0.1,
            parallel: true,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation count.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the per-trial mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Sets the number of mutation trials per individual.
    pub fn with_mutations_per_individual(mut self, trials: usize) -> Self {
        self.mutations_per_individual = trials;
        self
    }

    /// Sets the elite fraction.
    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction;
        self
    }

    /// Enables or disables parallel offspring production.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets a wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, limit_ms: u64) -> Self {
        self.time_limit_ms = Some(limit_ms);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Elite count for a population of `population_size`.
    ///
    /// `floor(P * elite_fraction)`, but at least one so the best
    /// fitness never regresses.
    pub fn elite_count(&self) -> usize {
        let n = (self.population_size as f64 * self.elite_fraction).floor() as usize;
        n.clamp(1, self.population_size.max(1))
    }

    /// Crossover pairs per generation: `floor((P - elite) / 2)`.
    pub fn crossover_pairs(&self) -> usize {
        self.population_size.saturating_sub(self.elite_count()) / 2
    }
}

/// Complete configuration of a tournament day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of teams (ids 1..=teams).
    pub teams: u32,
    /// Number of game tables.
    pub tables: u32,
    /// Number of judging rooms, split ceil/floor into project/robot rooms.
    pub judging_rooms: u32,
    /// Table runs per team.
    pub rounds_per_team: u32,

    /// Day start (minutes).
    pub day_start: Minutes,
    /// Day end (minutes).
    pub day_end: Minutes,
    /// Lunch anchor (minutes).
    pub lunch_start: Minutes,
    /// Lunch length.
    pub lunch_duration: Minutes,
    /// Opening ceremony length.
    pub opening_duration: Minutes,
    /// Closing ceremony length.
    pub closing_duration: Minutes,
    /// One table run.
    pub table_run_duration: Minutes,
    /// One judging session.
    pub judging_duration: Minutes,
    /// Break between two sessions in the same judging room.
    pub judging_break: Minutes,

    /// Minimum gap between two consecutive events of one team.
    pub transition_buffer: Minutes,
    /// Minimum gap between two consecutive runs on one table.
    pub table_buffer: Minutes,
    /// Minimum gap between two consecutive sessions in one judging room.
    pub judging_buffer: Minutes,

    /// Increment used to push a table run past a team conflict.
    pub table_step: Minutes,
    /// Conflict retries per judging session before it is skipped.
    pub judging_retry_cap: u32,
    /// Construction attempts made by `generate`.
    pub max_attempts: usize,
    /// Generator RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Soft-score weights.
    pub weights: FitnessWeights,
    /// Genetic algorithm parameters.
    pub optimizer: OptimizerConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            teams: 8,
            tables: 2,
            judging_rooms: 4,
            rounds_per_team: 3,
            day_start: 0,
            day_end: 540,
            lunch_start: 180,
            lunch_duration: 45,
            opening_duration: 30,
            closing_duration: 30,
            table_run_duration: 10,
            judging_duration: 10,
            judging_break: 5,
            transition_buffer: 10,
            table_buffer: 5,
            judging_buffer: 5,
            table_step: 5,
            judging_retry_cap: 5,
            max_attempts: 10,
            seed: None,
            weights: FitnessWeights::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl TournamentConfig {
    /// Sets the team count.
    pub fn with_teams(mut self, teams: u32) -> Self {
        self.teams = teams;
        self
    }

    /// Sets the table count.
    pub fn with_tables(mut self, tables: u32) -> Self {
        self.tables = tables;
        self
    }

    /// Sets the judging room count.
    pub fn with_judging_rooms(mut self, rooms: u32) -> Self {
        self.judging_rooms = rooms;
        self
    }

    /// Sets the table runs per team.
    pub fn with_rounds_per_team(mut self, rounds: u32) -> Self {
        self.rounds_per_team = rounds;
        self
    }

    /// Sets the day bounds.
    pub fn with_day(mut self, start: Minutes, end: Minutes) -> Self {
        self.day_start = start;
        self.day_end = end;
        self
    }

    /// Sets the lunch anchor and length.
    pub fn with_lunch(mut self, start: Minutes, duration: Minutes) -> Self {
        self.lunch_start = start;
        self.lunch_duration = duration;
        self
    }

    /// Sets the team transition buffer.
    pub fn with_transition_buffer(mut self, buffer: Minutes) -> Self {
        self.transition_buffer = buffer;
        self
    }

    /// Sets the construction attempt budget.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Seeds both the generator and the optimizer.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.optimizer.seed = Some(seed);
        self
    }

    /// Sets the soft-score weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the GA parameters.
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Checks the configuration for contradictions.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        validate_config(self).map_err(ScheduleError::InvalidConfig)
    }

    /// Project judging rooms: `ceil(judging_rooms / 2)`.
    pub fn project_rooms(&self) -> u32 {
        self.judging_rooms.div_ceil(2)
    }

    /// Robot design judging rooms: the remainder.
    pub fn robot_rooms(&self) -> u32 {
        self.judging_rooms - self.project_rooms()
    }

    /// Table rounds placed before lunch: `ceil(rounds / 2)`.
    pub fn rounds_before_lunch(&self) -> u32 {
        self.rounds_per_team.div_ceil(2)
    }

    /// The whole day.
    pub fn day_window(&self) -> TimeWindow {
        TimeWindow::new(self.day_start, self.day_end)
    }

    /// Midpoint of the day.
    pub fn day_midpoint(&self) -> Minutes {
        self.day_window().midpoint()
    }

    /// Lunch at its anchor.
    pub fn lunch_window(&self) -> TimeWindow {
        TimeWindow::starting_at(self.lunch_start, self.lunch_duration)
    }

    /// Opening ceremony slot.
    pub fn opening_window(&self) -> TimeWindow {
        TimeWindow::starting_at(self.day_start, self.opening_duration)
    }

    /// Closing ceremony slot.
    pub fn closing_window(&self) -> TimeWindow {
        TimeWindow::new(self.day_end - self.closing_duration, self.day_end)
    }

    /// Required gap between consecutive events on a resource of `kind`.
    ///
    /// Shared areas are never conflict-checked and report 0.
    pub fn resource_buffer(&self, kind: ResourceKind) -> Minutes {
        match kind {
            ResourceKind::Table => self.table_buffer,
            ResourceKind::JudgingRoom => self.judging_buffer,
            ResourceKind::CeremonyArea | ResourceKind::BreakArea => 0,
        }
    }

    /// Events of `kind` every team must have.
    pub fn required_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::TableRun => self.rounds_per_team as usize,
            _ => 1,
        }
    }

    /// Events every team must have in total.
    pub fn events_per_team(&self) -> usize {
        EventKind::ALL.iter().map(|&k| self.required_count(k)).sum()
    }

    /// Resource-minutes available to competitive events: the day minus
    /// ceremonies and lunch, times the number of exclusive resources.
    pub fn competitive_capacity(&self) -> Minutes {
        let span = self.day_end
            - self.day_start
            - self.opening_duration
            - self.closing_duration
            - self.lunch_duration;
        span.max(0) * Minutes::from(self.tables + self.judging_rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TournamentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.events_per_team(), 9);
    }

    #[test]
    fn test_room_split_rounds_up_to_project() {
        let config = TournamentConfig::default().with_judging_rooms(5);
        assert_eq!(config.project_rooms(), 3);
        assert_eq!(config.robot_rooms(), 2);
    }

    #[test]
    fn test_rounds_split() {
        let config = TournamentConfig::default().with_rounds_per_team(3);
        assert_eq!(config.rounds_before_lunch(), 2);
        let config = config.with_rounds_per_team(4);
        assert_eq!(config.rounds_before_lunch(), 2);
    }

    #[test]
    fn test_windows() {
        let config = TournamentConfig::default();
        assert_eq!(config.opening_window(), TimeWindow::new(0, 30));
        assert_eq!(config.closing_window(), TimeWindow::new(510, 540));
        assert_eq!(config.lunch_window(), TimeWindow::new(180, 225));
        assert_eq!(config.day_midpoint(), 270);
        // (540 - 30 - 30 - 45) * 6
        assert_eq!(config.competitive_capacity(), 2610);
    }

    #[test]
    fn test_resource_buffers() {
        let config = TournamentConfig::default();
        assert_eq!(config.resource_buffer(ResourceKind::Table), 5);
        assert_eq!(config.resource_buffer(ResourceKind::JudgingRoom), 5);
        assert_eq!(config.resource_buffer(ResourceKind::CeremonyArea), 0);
    }

    #[test]
    fn test_elite_count_at_least_one() {
        let opt = OptimizerConfig::default().with_population_size(20);
        assert_eq!(opt.elite_count(), 2);
        assert_eq!(opt.crossover_pairs(), 9);

        let opt = opt.with_population_size(5);
        assert_eq!(opt.elite_count(), 1);
        assert_eq!(opt.crossover_pairs(), 2);
    }

    #[test]
    fn test_with_seed_sets_both() {
        let config = TournamentConfig::default().with_seed(11);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.optimizer.seed, Some(11));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TournamentConfig =
            serde_json::from_str(r#"{"teams": 16, "optimizer": {"generations": 5}}"#).unwrap();
        assert_eq!(config.teams, 16);
        assert_eq!(config.tables, 2);
        assert_eq!(config.optimizer.generations, 5);
        assert_eq!(config.optimizer.population_size, 20);
    }
}
