//! Error types for batch computation and configuration.
//!
//! Two families exist. A [`ConfigurationError`] means the engine cannot be
//! built and no output may be produced. A [`ComputationError`] is scoped to
//! one sample group; it is collected next to the results of the other groups.

use std::fmt;

use crate::classify::Category;

/// The metric (or input value) a computation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Ppm,
    MeanPpm,
    Rpd,
    PercentRecovery,
    UmolPerL,
}

impl MetricKind {
    /// Column-style label used in reports and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Ppm => "PPM",
            MetricKind::MeanPpm => "Mean ppm",
            MetricKind::Rpd => "%RPD",
            MetricKind::PercentRecovery => "%R",
            MetricKind::UmolPerL => "umol/L",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why a metric could not be computed for a group.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputationFailure {
    /// A measurement cell was missing or not a number.
    NonNumeric { row_index: usize },
    /// The group has no usable measurement at all.
    NoNumericValues,
    /// The denominator of the metric was zero.
    ZeroDenominator,
    /// The arithmetic produced an infinite or NaN value.
    NonFinite,
}

impl fmt::Display for ComputationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationFailure::NonNumeric { row_index } => {
                write!(f, "row {} has a missing or non-numeric value", row_index + 1)
            }
            ComputationFailure::NoNumericValues => write!(f, "no numeric measurements"),
            ComputationFailure::ZeroDenominator => write!(f, "division by zero"),
            ComputationFailure::NonFinite => write!(f, "result is not a finite number"),
        }
    }
}

/// A failure confined to a single sample group.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationError {
    pub sample_id: String,
    pub metric: MetricKind,
    pub failure: ComputationFailure,
}

impl ComputationError {
    pub fn new(sample_id: impl Into<String>, metric: MetricKind, failure: ComputationFailure) -> Self {
        Self {
            sample_id: sample_id.into(),
            metric,
            failure,
        }
    }
}

impl fmt::Display for ComputationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot compute {} for sample {}: {}",
            self.metric, self.sample_id, self.failure
        )
    }
}

impl std::error::Error for ComputationError {}

/// A broken configuration. Fatal for the whole batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    NonPositiveTarget { category: Category, value: f64 },
    NonPositiveMolecularWeight(f64),
    InvalidBound { name: String, lower: f64, upper: f64 },
    InvalidPattern { pattern: String, message: String },
    NoRules,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::NonPositiveTarget { category, value } => write!(
                f,
                "Target concentration for {} must be a positive number, got {}",
                category, value
            ),
            ConfigurationError::NonPositiveMolecularWeight(value) => write!(
                f,
                "molecular_weight must be a positive number, got {}",
                value
            ),
            ConfigurationError::InvalidBound { name, lower, upper } => write!(
                f,
                "Bound '{}' is invalid: lower {} must be finite and not above upper {}",
                name, lower, upper
            ),
            ConfigurationError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid category pattern '{}': {}", pattern, message)
            }
            ConfigurationError::NoRules => write!(f, "At least one category rule is required"),
        }
    }
}

impl std::error::Error for ConfigurationError {}
