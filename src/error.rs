//! Error types.
//!
//! Hard-constraint violations are not errors: they score 0.0 and the
//! caller retries or discards. Errors are reserved for configuration
//! problems, an exhausted generation budget, and broken genome invariants.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by generation and optimization.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The configuration is contradictory; nothing was scheduled.
    #[error("invalid configuration: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// No construction attempt produced a feasible schedule.
    #[error("no feasible schedule found after {attempts} attempts")]
    GenerationFailed { attempts: usize },

    /// Crossover parents do not carry the same set of genes.
    #[error("parent genomes are incompatible: {reason}")]
    GenomeMismatch { reason: String },

    /// Repair found a different number of duplicates than missing genes.
    #[error("genome repair failed: {duplicates} duplicate genes but {missing} missing genes")]
    RepairMismatch { duplicates: usize, missing: usize },

    /// Crossover cut points do not satisfy `x1 < x2 <= len`.
    #[error("invalid crossover cut points ({x1}, {x2}) for genome of length {len}")]
    InvalidCut { x1: usize, x2: usize, len: usize },

    /// An event was built from invalid fields.
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
