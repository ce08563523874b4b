//! Tournament GA problem definition.
//!
//! Bridges the fitness evaluator and the genome operators to
//! [`GaRunner`](super::GaRunner).

use rand::Rng;

use super::chromosome::{swap_mutation, two_point_crossover};
use super::GaProblem;
use crate::config::TournamentConfig;
use crate::error::ScheduleError;
use crate::fitness::FitnessEvaluator;
use crate::models::Schedule;

/// GA problem for tournament schedules.
///
/// # Example
/// ```
/// use u_tournament::TournamentConfig;
/// use u_tournament::ga::{GaRunner, TournamentGaProblem};
///
/// let config = TournamentConfig::default().with_seed(42);
/// let seed = u_tournament::generate(&config).unwrap();
/// let problem = TournamentGaProblem::new(&config);
/// let result = GaRunner::run(&problem, seed.clone(), &config.optimizer).unwrap();
/// assert!(result.best_fitness >= seed.fitness().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TournamentGaProblem {
    evaluator: FitnessEvaluator,
    mutation_probability: f64,
    mutations_per_individual: usize,
}

impl TournamentGaProblem {
    /// Creates a problem from a tournament configuration.
    ///
    /// The configuration is not validated here. An out-of-range mutation
    /// probability is clamped to `[0, 1]` by [`swap_mutation`].
    pub fn new(config: &TournamentConfig) -> Self {
        Self {
            evaluator: FitnessEvaluator::new(config),
            mutation_probability: config.optimizer.mutation_probability,
            mutations_per_individual: config.optimizer.mutations_per_individual,
        }
    }

    /// The evaluator used for fitness.
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }
}

impl GaProblem for TournamentGaProblem {
    fn evaluate(&self, individual: &Schedule) -> f64 {
        self.evaluator.evaluate(individual)
    }

    /// Two-point crossover at random cuts `x1 < x2`, both directions.
    fn crossover<R: Rng>(
        &self,
        parent_a: &Schedule,
        parent_b: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule), ScheduleError> {
        let len = parent_a.len();
        if len < 2 {
            return Ok((parent_a.clone(), parent_b.clone()));
        }
        let x1 = rng.random_range(0..len);
        let x2 = rng.random_range(x1 + 1..=len);
        let first = two_point_crossover(parent_a, parent_b, x1, x2)?;
        let second = two_point_crossover(parent_b, parent_a, x1, x2)?;
        Ok((first, second))
    }

    fn mutate<R: Rng>(&self, individual: &mut Schedule, rng: &mut R) {
        swap_mutation(
            individual,
            self.mutation_probability,
            self.mutations_per_individual,
            rng,
        );
        self.evaluator.evaluate_in_place(individual);
    }
}
