//! Metric computation: mean, relative percent difference, percent recovery,
//! and ppm to µmol/L conversion.
//!
//! The free functions are the formulas; [`MetricsCalculator`] applies them
//! to a [`SampleGroup`] using the configured targets and molecular weight.

use crate::classify::Category;
use crate::config::QcConfig;
use crate::error::{ComputationError, ComputationFailure, MetricKind};
use crate::group::{mean, SampleGroup};

/// Derived values for one sample group.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub sample_id: String,
    pub category: Category,
    /// Numeric replicate values in encounter order
    pub ppm_values: Vec<f64>,
    pub mean_ppm: f64,
    /// `None` when the group has fewer than two measurements
    pub rpd: Option<f64>,
    /// `None` when the category has no target concentration
    pub percent_recovery: Option<f64>,
    pub umol_per_l: Option<f64>,
}

/// Relative percent difference of the last two values, relative to the mean
/// of all values.
///
/// Returns `Ok(None)` for fewer than two values.
pub fn rpd(values: &[f64]) -> Result<Option<f64>, ComputationFailure> {
    let [.., second_last, last] = values else {
        return Ok(None);
    };
    let mean = mean(values).ok_or(ComputationFailure::NoNumericValues)?;
    if mean == 0.0 {
        return Err(ComputationFailure::ZeroDenominator);
    }
    finite((last - second_last).abs() / mean.abs() * 100.0).map(Some)
}

/// Measured mean as a percentage of the target concentration.
pub fn percent_recovery(mean_ppm: f64, target_ppm: f64) -> Result<f64, ComputationFailure> {
    if target_ppm == 0.0 {
        return Err(ComputationFailure::ZeroDenominator);
    }
    finite(mean_ppm / target_ppm * 100.0)
}

/// Convert a mass concentration in ppm (mg/L) to µmol/L.
pub fn umol_per_l(ppm: f64, molecular_weight: f64) -> Result<f64, ComputationFailure> {
    if molecular_weight == 0.0 {
        return Err(ComputationFailure::ZeroDenominator);
    }
    finite(ppm * 1000.0 / molecular_weight)
}

fn finite(value: f64) -> Result<f64, ComputationFailure> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationFailure::NonFinite)
    }
}

/// Outcome of computing one group: a result when the mean exists, plus any
/// group-scoped errors.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMetrics {
    pub result: Option<MetricResult>,
    pub errors: Vec<ComputationError>,
}

/// Applies the metric formulas using static configuration.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    molecular_weight: f64,
    mdl_target: f64,
    icv_target: f64,
    ccv_target: f64,
}

impl MetricsCalculator {
    pub fn new(config: &QcConfig) -> Self {
        Self {
            molecular_weight: config.molecular_weight,
            mdl_target: config.standards.mdl.target_ppm,
            icv_target: config.standards.icv.target_ppm,
            ccv_target: config.standards.ccv.target_ppm,
        }
    }

    /// Target concentration for a category, if it has one.
    pub fn target_for(&self, category: Category) -> Option<f64> {
        match category {
            Category::Mdl => Some(self.mdl_target),
            Category::Icv => Some(self.icv_target),
            Category::Ccv => Some(self.ccv_target),
            Category::Regular | Category::Blank | Category::Rinse => None,
        }
    }

    pub fn compute(&self, group: &SampleGroup) -> GroupMetrics {
        let id = group.sample_id.as_str();
        let err = |metric, failure| ComputationError::new(id, metric, failure);

        let mut errors: Vec<ComputationError> = group
            .invalid_rows()
            .into_iter()
            .map(|row_index| err(MetricKind::Ppm, ComputationFailure::NonNumeric { row_index }))
            .collect();

        let values = group.ppm_values();
        let Some(mean_ppm) = mean(&values) else {
            errors.push(err(MetricKind::MeanPpm, ComputationFailure::NoNumericValues));
            return GroupMetrics {
                result: None,
                errors,
            };
        };

        let rpd = if group.category.computes_rpd() {
            rpd(&values).unwrap_or_else(|failure| {
                errors.push(err(MetricKind::Rpd, failure));
                None
            })
        } else {
            None
        };

        let percent_recovery = self.target_for(group.category).and_then(|target| {
            percent_recovery(mean_ppm, target)
                .map_err(|failure| errors.push(err(MetricKind::PercentRecovery, failure)))
                .ok()
        });

        let umol_per_l = umol_per_l(mean_ppm, self.molecular_weight)
            .map_err(|failure| errors.push(err(MetricKind::UmolPerL, failure)))
            .ok();

        GroupMetrics {
            result: Some(MetricResult {
                sample_id: group.sample_id.clone(),
                category: group.category,
                ppm_values: values,
                mean_ppm,
                rpd,
                percent_recovery,
                umol_per_l,
            }),
            errors,
        }
    }
}
