//! Configuration validation.
//!
//! Checks a [`TournamentConfig`] for contradictions before anything is
//! scheduled. Detects:
//! - Zero counts (teams, tables, rounds, population, attempts)
//! - Too few judging rooms to split into project and robot rooms
//! - Day, lunch and ceremony windows that do not fit together
//! - Non-positive durations and negative buffers
//! - Probabilities and fractions outside [0, 1]
//! - Unusable soft-score weights
//!
//! All problems are collected, not just the first one.

use std::fmt;

use crate::config::TournamentConfig;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A count that must be positive is zero.
    ZeroCount,
    /// Fewer than two judging rooms.
    InsufficientRooms,
    /// Day or ceremony windows are empty or overlap.
    InvalidWindow,
    /// Lunch does not lie between the ceremonies.
    LunchOutsideDay,
    /// A duration is zero or negative.
    NonPositiveDuration,
    /// A buffer or step is negative.
    NegativeBuffer,
    /// A probability or fraction is outside [0, 1].
    InvalidProbability,
    /// Soft-score weights are negative, all zero, or the ideal gap is inverted.
    InvalidWeights,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a tournament configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &TournamentConfig) -> ValidationResult {
    let mut errors = Vec::new();

    check_counts(config, &mut errors);
    check_durations(config, &mut errors);
    check_windows(config, &mut errors);
    check_optimizer(config, &mut errors);
    check_weights(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_counts(config: &TournamentConfig, errors: &mut Vec<ValidationError>) {
    let counts = [
        ("team count", config.teams as usize),
        ("table count", config.tables as usize),
        ("rounds per team", config.rounds_per_team as usize),
        ("max attempts", config.max_attempts),
    ];
    for (name, value) in counts {
        if value == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCount,
                format!("{name} must be positive"),
            ));
        }
    }
    if config.judging_rooms < 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InsufficientRooms,
            format!(
                "need at least 2 judging rooms (one project, one robot), got {}",
                config.judging_rooms
            ),
        ));
    }
}

fn check_durations(config: &TournamentConfig, errors: &mut Vec<ValidationError>) {
    let durations = [
        ("lunch duration", config.lunch_duration),
        ("opening duration", config.opening_duration),
        ("closing duration", config.closing_duration),
        ("table run duration", config.table_run_duration),
        ("judging duration", config.judging_duration),
        ("table step", config.table_step),
    ];
    for (name, value) in durations {
        if value <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!("{name} must be positive, got {value}"),
            ));
        }
    }

    let buffers = [
        ("judging break", config.judging_break),
        ("transition buffer", config.transition_buffer),
        ("table buffer", config.table_buffer),
        ("judging buffer", config.judging_buffer),
    ];
    for (name, value) in buffers {
        if value < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeBuffer,
                format!("{name} must not be negative, got {value}"),
            ));
        }
    }
}

fn check_windows(config: &TournamentConfig, errors: &mut Vec<ValidationError>) {
    if config.day_start < 0 || config.day_end <= config.day_start {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWindow,
            format!(
                "day window [{}, {}) is empty or starts before 0",
                config.day_start, config.day_end
            ),
        ));
        return;
    }

    let opening = config.opening_window();
    let closing = config.closing_window();
    if opening.end > closing.start {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWindow,
            "opening and closing ceremonies overlap",
        ));
    }

    let lunch = config.lunch_window();
    if !config.day_window().encloses(&lunch) {
        errors.push(ValidationError::new(
            ValidationErrorKind::LunchOutsideDay,
            format!(
                "lunch [{}, {}) lies outside the day [{}, {})",
                lunch.start, lunch.end, config.day_start, config.day_end
            ),
        ));
    } else if lunch.start < opening.end || lunch.end > closing.start {
        errors.push(ValidationError::new(
            ValidationErrorKind::LunchOutsideDay,
            "lunch overlaps a ceremony",
        ));
    }
}

fn check_optimizer(config: &TournamentConfig, errors: &mut Vec<ValidationError>) {
    let opt = &config.optimizer;
    if opt.population_size == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroCount,
            "population size must be positive",
        ));
    }
    let fractions = [
        ("mutation probability", opt.mutation_probability),
        ("elite fraction", opt.elite_fraction),
    ];
    for (name, value) in fractions {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidProbability,
                format!("{name} must lie in [0, 1], got {value}"),
            ));
        }
    }
}

fn check_weights(config: &TournamentConfig, errors: &mut Vec<ValidationError>) {
    let w = &config.weights;
    let terms = [w.utilization, w.efficiency, w.flow];
    if terms.iter().any(|t| !t.is_finite() || *t < 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeights,
            "soft-score weights must be finite and non-negative",
        ));
    } else if w.total() <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeights,
            "at least one soft-score weight must be positive",
        ));
    }
    if w.ideal_gap_min > w.ideal_gap_max {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeights,
            format!(
                "ideal gap range [{}, {}] is inverted",
                w.ideal_gap_min, w.ideal_gap_max
            ),
        ));
    }
}
