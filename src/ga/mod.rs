//! GA-based schedule optimization.
//!
//! Improves a feasible schedule by evolving a population of variants of
//! it. The genome is the schedule's event list; see [`two_point_crossover`]
//! for the recombination and repair rules and [`swap_mutation`] for the
//! mutation.
//!
//! # Submodules
//!
//! - `chromosome`: gene keys, crossover with repair, team-swap mutation
//! - `population`: best-first population with elitism helpers
//! - `runner`: generational loop and the [`GaProblem`] seam
//! - `problem`: [`TournamentGaProblem`], the tournament bridge
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

mod chromosome;
mod population;
mod problem;
mod runner;

pub use chromosome::{gene_keys, swap_mutation, two_point_crossover, GeneKey};
pub use population::Population;
pub use problem::TournamentGaProblem;
pub use runner::{GaProblem, GaResult, GaRunner};
