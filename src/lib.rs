//! Tournament day scheduling.
//!
//! Assigns every team of a robotics-style tournament to game tables,
//! judging rooms, lunch and ceremonies within one day, then improves the
//! result with a genetic algorithm.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Event`, `EventKind`, `ResourceId`, `Schedule`, `TimeWindow`
//! - **`config`**: `TournamentConfig`, `OptimizerConfig`, `FitnessWeights`
//! - **`validation`**: Configuration consistency checks
//! - **`generator`**: Phase-by-phase constructive builder
//! - **`fitness`**: Hard-constraint check, soft score, KPIs
//! - **`ga`**: Crossover, mutation, population and the generational loop
//!
//! # Example
//!
//! ```
//! use u_tournament::{generate, optimize, TournamentConfig};
//!
//! let config = TournamentConfig::default().with_seed(7);
//! let seed = generate(&config).unwrap();
//! assert_eq!(seed.len(), 72);
//!
//! let improved = optimize(seed.clone(), &config).unwrap();
//! assert!(improved.fitness() >= seed.fitness());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

pub mod config;
pub mod error;
pub mod fitness;
pub mod ga;
pub mod generator;
pub mod models;
pub mod validation;

pub use config::{FitnessWeights, OptimizerConfig, TournamentConfig};
pub use error::ScheduleError;
pub use fitness::{FitnessEvaluator, ScheduleKpi};
pub use models::{Event, EventKind, Minutes, ResourceId, ResourceKind, Schedule, TeamId};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use ga::{GaRunner, TournamentGaProblem};
use generator::ScheduleGenerator;

/// Builds a feasible schedule for `config`.
///
/// Construction is retried with shuffled team orders up to
/// `config.max_attempts` times. The result carries its fitness.
///
/// # Errors
/// - [`ScheduleError::InvalidConfig`] if the configuration is contradictory
/// - [`ScheduleError::GenerationFailed`] if no attempt was feasible
pub fn generate(config: &TournamentConfig) -> Result<Schedule, ScheduleError> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    ScheduleGenerator::new(config).generate(&mut rng)
}

/// Improves `schedule` with the genetic algorithm.
///
/// The result's fitness is never below the input's fitness under
/// `config`. With zero generations the input is returned as-is, freshly
/// evaluated.
///
/// # Errors
/// - [`ScheduleError::InvalidConfig`] if the configuration is contradictory
/// - [`ScheduleError::GenomeMismatch`] or [`ScheduleError::RepairMismatch`]
///   if crossover breaks its contract
pub fn optimize(schedule: Schedule, config: &TournamentConfig) -> Result<Schedule, ScheduleError> {
    config.validate()?;
    let problem = TournamentGaProblem::new(config);
    let result = GaRunner::run(&problem, schedule, &config.optimizer)?;
    Ok(result.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    fn scenario() -> TournamentConfig {
        TournamentConfig::default()
            .with_teams(8)
            .with_tables(2)
            .with_judging_rooms(4)
            .with_rounds_per_team(3)
            .with_day(0, 540)
            .with_lunch(180, 45)
            .with_optimizer(
                OptimizerConfig::default()
                    .with_population_size(16)
                    .with_generations(10),
            )
            .with_seed(42)
    }

    #[test]
    fn test_generate_scenario() {
        let config = scenario();
        let schedule = generate(&config).unwrap();
        assert_eq!(schedule.len(), 8 * (3 + 2 + 2 + 1 + 1));
        assert!(schedule.fitness().unwrap() > 0.0);
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let config = scenario().with_teams(0);
        match generate(&config) {
            Err(ScheduleError::InvalidConfig(errors)) => {
                assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::ZeroCount));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_optimize_zero_generations_returns_seed() {
        let config = scenario();
        let seed = generate(&config).unwrap();
        let config = config.with_optimizer(OptimizerConfig::default().with_generations(0));

        let result = optimize(seed.clone(), &config).unwrap();
        assert_eq!(result, seed);
    }

    #[test]
    fn test_optimize_never_regresses() {
        let config = scenario();
        let seed = generate(&config).unwrap();
        let seed_fitness = seed.fitness().unwrap();

        let result = optimize(seed, &config).unwrap();
        let evaluator = FitnessEvaluator::new(&config);
        assert!(result.fitness().unwrap() >= seed_fitness);
        assert!((evaluator.evaluate(&result) - result.fitness().unwrap()).abs() < 1e-10);
    }

    #[test]
    fn test_optimized_schedule_keeps_invariants() {
        let config = scenario();
        let result = optimize(generate(&config).unwrap(), &config).unwrap();

        for team in 1..=config.teams {
            for kind in EventKind::ALL {
                assert_eq!(result.count_for_team(team, kind), config.required_count(kind));
            }
        }
        let kpi = ScheduleKpi::calculate(&result, &config);
        assert_eq!(kpi.event_count, 72);
        assert!(kpi.avg_utilization > 0.0);
    }

    #[test]
    fn test_optimize_rejects_invalid_config() {
        let config = scenario();
        let seed = generate(&config).unwrap();
        let bad = config.with_optimizer(OptimizerConfig::default().with_elite_fraction(2.0));
        assert!(matches!(
            optimize(seed, &bad),
            Err(ScheduleError::InvalidConfig(_))
        ));
    }
}
