//! Fitness-ordered population of schedules.

use rand::Rng;

use super::GaProblem;
use crate::models::Schedule;

/// A population sorted best-first.
///
/// Never empty: every constructor keeps at least one individual.
/// Unevaluated individuals sort last.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Schedule>,
}

impl Population {
    /// Seed plus `size - 1` mutated copies of it.
    ///
    /// The seed keeps its place (and fitness) unchanged; each copy is
    /// mutated and re-evaluated once by the problem.
    pub fn initialize<P: GaProblem, R: Rng>(
        problem: &P,
        mut seed: Schedule,
        size: usize,
        rng: &mut R,
    ) -> Self {
        if seed.fitness().is_none() {
            let fitness = problem.evaluate(&seed);
            seed.set_fitness(fitness);
        }
        let mut individuals = Vec::with_capacity(size.max(1));
        individuals.push(seed);
        for _ in 1..size {
            let mut copy = individuals[0].clone();
            problem.mutate(&mut copy, rng);
            individuals.push(copy);
        }
        Self::from_individuals(individuals)
    }

    /// Sorts `individuals` best-first. Ties keep their order.
    ///
    /// `individuals` must not be empty.
    pub(crate) fn from_individuals(mut individuals: Vec<Schedule>) -> Self {
        debug_assert!(!individuals.is_empty(), "population must not be empty");
        individuals.sort_by(|a, b| rank(b).total_cmp(&rank(a)));
        Self { individuals }
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population has no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All individuals, best first.
    pub fn individuals(&self) -> &[Schedule] {
        &self.individuals
    }

    /// Best individual.
    pub fn best(&self) -> &Schedule {
        &self.individuals[0]
    }

    /// Fitness of the best individual.
    pub fn best_fitness(&self) -> f64 {
        self.best().fitness().unwrap_or(0.0)
    }

    /// The top `n` individuals (fewer if the population is smaller).
    pub fn elites(&self, n: usize) -> &[Schedule] {
        &self.individuals[..n.min(self.individuals.len())]
    }

    /// Uniform draw from the top half, with replacement.
    pub fn select_parent<R: Rng>(&self, rng: &mut R) -> &Schedule {
        let top = (self.individuals.len() / 2).max(1);
        &self.individuals[rng.random_range(0..top)]
    }

    /// Consumes the population, returning its best individual.
    pub fn into_best(self) -> Schedule {
        self.individuals.into_iter().next().unwrap_or_default()
    }
}

fn rank(schedule: &Schedule) -> f64 {
    schedule.fitness().unwrap_or(f64::NEG_INFINITY)
}
