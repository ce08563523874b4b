//! Generational GA loop with elitism.
//!
//! # Algorithm
//!
//! 1. Population = seed + `P - 1` mutated copies, sorted best-first.
//! 2. Each generation:
//!    - keep the top `max(1, floor(P * elite_fraction))` unchanged;
//!    - breed `floor((P - elite) / 2)` pairs of parents drawn from the top
//!      half, two children per pair, each child mutated once;
//!    - fill an odd leftover slot with the best non-elite individual;
//!    - sort.
//! 3. Stop after the generation count or the time limit.
//!
//! Breeding is parallel when enabled. Each pair draws from its own RNG,
//! seeded from the master RNG in pair order, so results do not depend on
//! thread scheduling.
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - De Jong (1975), elitist generational replacement

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use super::population::Population;
use crate::config::OptimizerConfig;
use crate::error::ScheduleError;
use crate::models::Schedule;

/// Problem-specific operators for [`GaRunner`].
///
/// Fitness is maximized. Implementations must be shareable across
/// threads; operators take `&self`.
pub trait GaProblem: Sync {
    /// Fitness of a schedule (higher is better).
    fn evaluate(&self, individual: &Schedule) -> f64;

    /// Two children from two parents. Children need not be evaluated.
    fn crossover<R: Rng>(
        &self,
        parent_a: &Schedule,
        parent_b: &Schedule,
        rng: &mut R,
    ) -> Result<(Schedule, Schedule), ScheduleError>;

    /// Mutates in place and stores the new fitness on the schedule.
    fn mutate<R: Rng>(&self, individual: &mut Schedule, rng: &mut R);
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best schedule found, with its fitness set.
    pub best: Schedule,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Generations completed.
    pub generations: usize,
    /// Best fitness after initialization and after each generation.
    pub history: Vec<f64>,
}

/// Runs the generational loop.
pub struct GaRunner;

impl GaRunner {
    /// Evolves `seed` under `config`.
    ///
    /// The best fitness never decreases from one generation to the next,
    /// and the result is never worse than the seed. With zero generations
    /// the seed comes back unchanged apart from its evaluated fitness.
    ///
    /// # Errors
    /// Propagates crossover contract violations.
    #[instrument(skip_all, fields(population = config.population_size, generations = config.generations))]
    pub fn run<P: GaProblem>(
        problem: &P,
        mut seed: Schedule,
        config: &OptimizerConfig,
    ) -> Result<GaResult, ScheduleError> {
        let seed_fitness = problem.evaluate(&seed);
        seed.set_fitness(seed_fitness);

        if config.generations == 0 {
            return Ok(GaResult {
                best: seed,
                best_fitness: seed_fitness,
                generations: 0,
                history: vec![seed_fitness],
            });
        }

        let mut rng = match config.seed {
            Some(value) => SmallRng::seed_from_u64(value),
            None => SmallRng::from_os_rng(),
        };
        let started = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);

        let mut population =
            Population::initialize(problem, seed, config.population_size.max(1), &mut rng);
        let mut history = Vec::with_capacity(config.generations + 1);
        history.push(population.best_fitness());
        let mut generations = 0;

        for generation in 0..config.generations {
            if time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                info!(generation, "time limit reached");
                break;
            }
            population = Self::next_generation(problem, &population, config, &mut rng)?;
            generations += 1;
            history.push(population.best_fitness());
            debug!(generation, best_fitness = population.best_fitness(), "generation complete");
        }

        let best_fitness = population.best_fitness();
        info!(
            generations,
            seed_fitness,
            best_fitness,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "optimization finished"
        );
        Ok(GaResult {
            best: population.into_best(),
            best_fitness,
            generations,
            history,
        })
    }

    fn next_generation<P: GaProblem>(
        problem: &P,
        population: &Population,
        config: &OptimizerConfig,
        rng: &mut SmallRng,
    ) -> Result<Population, ScheduleError> {
        let size = population.len();
        let elite = config.elite_count().min(size);
        let pairs = (size - elite) / 2;
        let pair_seeds: Vec<u64> = (0..pairs).map(|_| rng.random()).collect();

        let breed = |pair_seed: u64| -> Result<[Schedule; 2], ScheduleError> {
            let mut rng = SmallRng::seed_from_u64(pair_seed);
            let a = population.select_parent(&mut rng);
            let b = population.select_parent(&mut rng);
            let (mut first, mut second) = problem.crossover(a, b, &mut rng)?;
            problem.mutate(&mut first, &mut rng);
            problem.mutate(&mut second, &mut rng);
            Ok([first, second])
        };

        let children: Vec<[Schedule; 2]> = if config.parallel {
            pair_seeds.into_par_iter().map(breed).collect::<Result<_, _>>()?
        } else {
            pair_seeds.into_iter().map(breed).collect::<Result<_, _>>()?
        };

        let mut next = Vec::with_capacity(size);
        next.extend_from_slice(population.elites(elite));
        next.extend(children.into_iter().flatten());
        let mut leftovers = population.individuals()[elite..].iter();
        while next.len() < size {
            match leftovers.next() {
                Some(individual) => next.push(individual.clone()),
                None => break,
            }
        }

        Ok(Population::from_individuals(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, EventKind, ResourceId};

    /// Rewards team 1 for running early; crossover swaps parents.
    struct EarlyTeamOne;

    impl GaProblem for EarlyTeamOne {
        fn evaluate(&self, individual: &Schedule) -> f64 {
            let start = individual.events_for_team(1).first().map_or(100, |e| e.start);
            1.0 - start as f64 / 100.0
        }

        fn crossover<R: Rng>(
            &self,
            parent_a: &Schedule,
            parent_b: &Schedule,
            _rng: &mut R,
        ) -> Result<(Schedule, Schedule), ScheduleError> {
            Ok((parent_b.clone(), parent_a.clone()))
        }

        fn mutate<R: Rng>(&self, individual: &mut Schedule, rng: &mut R) {
            let pos = rng.random_range(0..individual.len());
            let other = rng.random_range(0..individual.len());
            individual.swap_teams(pos, other);
            let fitness = self.evaluate(individual);
            individual.set_fitness(fitness);
        }
    }

    fn seed() -> Schedule {
        Schedule::from_events((0..5).map(|i| {
            Event::new(5 - i, EventKind::TableRun, i64::from(i) * 20, 10, ResourceId::table(0))
        }))
    }

    fn config() -> OptimizerConfig {
        OptimizerConfig::default()
            .with_population_size(10)
            .with_generations(20)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_zero_generations_returns_seed() {
        let result = GaRunner::run(&EarlyTeamOne, seed(), &config().with_generations(0)).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.best.events(), seed().events());
        assert!((result.best_fitness - 0.2).abs() < 1e-10);
        assert_eq!(result.best.fitness(), Some(result.best_fitness));
    }

    #[test]
    fn test_elitism_monotonic() {
        let result = GaRunner::run(&EarlyTeamOne, seed(), &config()).unwrap();
        assert_eq!(result.generations, 20);
        assert_eq!(result.history.len(), 21);
        for pair in result.history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(result.best_fitness >= 0.2);
        assert!(result.best_fitness > 0.2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = GaRunner::run(&EarlyTeamOne, seed(), &config()).unwrap();
        let parallel = GaRunner::run(&EarlyTeamOne, seed(), &config().with_parallel(true)).unwrap();
        assert_eq!(sequential.history, parallel.history);
        assert_eq!(sequential.best.events(), parallel.best.events());
    }

    #[test]
    fn test_population_size_kept_with_odd_remainder() {
        // P = 6, elite = 1: two pairs plus one leftover slot.
        let config = config().with_population_size(6).with_elite_fraction(0.1);
        let mut rng = SmallRng::seed_from_u64(42);
        let population = Population::initialize(&EarlyTeamOne, seed(), 6, &mut rng);
        let next = GaRunner::next_generation(&EarlyTeamOne, &population, &config, &mut rng).unwrap();
        assert_eq!(next.len(), 6);
        assert!(next.best_fitness() >= population.best_fitness());
    }

    #[test]
    fn test_time_limit_stops_early() {
        let config = config().with_generations(1_000_000).with_time_limit_ms(0);
        let result = GaRunner::run(&EarlyTeamOne, seed(), &config).unwrap();
        assert_eq!(result.generations, 0);
        assert!(result.best_fitness >= 0.2);
    }
}
