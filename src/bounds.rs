//! Acceptance bounds for computed metrics.
//!
//! The validator only classifies values as inside or outside their range.
//! How a flagged value is highlighted is left to the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classify::Category;
use crate::config::QcConfig;
use crate::error::{ConfigurationError, MetricKind};
use crate::metrics::MetricResult;

/// Inclusive percent range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundRange {
    pub lower: f64,
    pub upper: f64,
}

impl BoundRange {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Both ends count as inside.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigurationError> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(ConfigurationError::InvalidBound {
                name: name.to_string(),
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }
}

impl fmt::Display for BoundRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}%", self.lower, self.upper)
    }
}

/// Result of checking one metric against its bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundCheck {
    pub metric: MetricKind,
    pub value: f64,
    pub within_bounds: bool,
}

/// All checks that applied to one group, keyed by metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundFlags {
    pub checks: Vec<BoundCheck>,
}

impl BoundFlags {
    /// `Some(within)` when the metric was checked, `None` when it was not.
    pub fn flag(&self, metric: MetricKind) -> Option<bool> {
        self.checks
            .iter()
            .find(|c| c.metric == metric)
            .map(|c| c.within_bounds)
    }

    pub fn all_within(&self) -> bool {
        self.checks.iter().all(|c| c.within_bounds)
    }
}

#[derive(Debug, Clone)]
pub struct BoundsValidator {
    rpd_max: f64,
    mdl_recovery: BoundRange,
    icv_recovery: BoundRange,
    ccv_recovery: BoundRange,
}

impl BoundsValidator {
    pub fn new(config: &QcConfig) -> Self {
        Self {
            rpd_max: config.rpd_max,
            mdl_recovery: config.standards.mdl.recovery,
            icv_recovery: config.standards.icv.recovery,
            ccv_recovery: config.standards.ccv.recovery,
        }
    }

    pub fn recovery_range(&self, category: Category) -> Option<BoundRange> {
        match category {
            Category::Mdl => Some(self.mdl_recovery),
            Category::Icv => Some(self.icv_recovery),
            Category::Ccv => Some(self.ccv_recovery),
            Category::Regular | Category::Blank | Category::Rinse => None,
        }
    }

    pub fn rpd_max(&self) -> f64 {
        self.rpd_max
    }

    /// Evaluate the checks that apply to the result's category.
    ///
    /// Regular samples are checked for RPD only, QC standards for recovery
    /// only, blanks and rinses not at all. A metric that was not computed is
    /// not checked.
    pub fn validate(&self, result: &MetricResult) -> BoundFlags {
        let mut checks = Vec::new();

        match result.category {
            Category::Regular => {
                if let Some(rpd) = result.rpd {
                    checks.push(BoundCheck {
                        metric: MetricKind::Rpd,
                        value: rpd,
                        within_bounds: rpd <= self.rpd_max,
                    });
                }
            }
            category if category.is_qc_standard() => {
                if let (Some(recovery), Some(range)) = (
                    result.percent_recovery,
                    self.recovery_range(result.category),
                ) {
                    checks.push(BoundCheck {
                        metric: MetricKind::PercentRecovery,
                        value: recovery,
                        within_bounds: range.contains(recovery),
                    });
                }
            }
            _ => {}
        }

        for check in checks.iter().filter(|c| !c.within_bounds) {
            tracing::debug!(
                sample = %result.sample_id,
                metric = %check.metric,
                value = check.value,
                "value out of bounds"
            );
        }

        BoundFlags { checks }
    }
}
