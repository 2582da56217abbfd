//! Partitioning of validated results into the QC, Samples, and Reported
//! Results sets.
//!
//! Nothing is computed here beyond the blank average; rows are projections
//! of [`MetricResult`] and [`BoundFlags`].

use serde::Serialize;

use crate::bounds::{BoundFlags, BoundsValidator};
use crate::classify::Category;
use crate::error::MetricKind;
use crate::group::mean;
use crate::metrics::MetricResult;

/// A group's metrics together with its bound checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedGroup {
    pub metrics: MetricResult,
    pub flags: BoundFlags,
}

impl ValidatedGroup {
    fn out_of_bounds(&self, metric: MetricKind) -> bool {
        self.flags.flag(metric) == Some(false)
    }
}

/// MDL, ICV, and CCV standards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcRow {
    pub sample_id: String,
    pub category: Category,
    pub ppm_values: Vec<f64>,
    pub mean_ppm: f64,
    pub percent_recovery: Option<f64>,
    pub recovery_out_of_bounds: bool,
    /// Informational, not bound-checked
    pub rpd: Option<f64>,
}

/// Regular analytical samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub sample_id: String,
    pub ppm_values: Vec<f64>,
    pub mean_ppm: f64,
    pub rpd: Option<f64>,
    pub umol_per_l: Option<f64>,
    pub rpd_out_of_bounds: bool,
}

/// One blank measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlankRow {
    pub sample_id: String,
    pub ppm: f64,
}

/// Final values of a regular sample for external reporting. QC standards
/// stay in the QC set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedRow {
    pub sample_id: String,
    pub mean_ppm: f64,
    pub umol_per_l: Option<f64>,
    /// Any bound check on the group failed
    pub out_of_bounds: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub analyte: String,
    pub qc: Vec<QcRow>,
    pub samples: Vec<SampleRow>,
    pub reported: Vec<ReportedRow>,
    pub blanks: Vec<BlankRow>,
    /// Mean of every blank measurement in the batch
    pub blank_average: Option<f64>,
    pub rinse_count: usize,
    pub qc_legend: String,
    pub samples_legend: String,
}

impl Report {
    /// Number of QC and sample rows with a failed bound check.
    pub fn flagged_count(&self) -> usize {
        let qc = self.qc.iter().filter(|r| r.recovery_out_of_bounds).count();
        let samples = self.samples.iter().filter(|r| r.rpd_out_of_bounds).count();
        qc + samples
    }
}

pub struct ReportAssembler<'a> {
    validator: &'a BoundsValidator,
    analyte: &'a str,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(validator: &'a BoundsValidator, analyte: &'a str) -> Self {
        Self { validator, analyte }
    }

    /// Partition groups, already in first-seen order, into result sets.
    pub fn assemble(&self, groups: &[ValidatedGroup]) -> Report {
        let mut report = Report {
            analyte: self.analyte.to_string(),
            qc_legend: self.qc_legend(),
            samples_legend: self.samples_legend(),
            ..Report::default()
        };

        for group in groups {
            let m = &group.metrics;
            match m.category {
                Category::Mdl | Category::Icv | Category::Ccv => {
                    report.qc.push(QcRow {
                        sample_id: m.sample_id.clone(),
                        category: m.category,
                        ppm_values: m.ppm_values.clone(),
                        mean_ppm: m.mean_ppm,
                        percent_recovery: m.percent_recovery,
                        recovery_out_of_bounds: group.out_of_bounds(MetricKind::PercentRecovery),
                        rpd: m.rpd,
                    });
                }
                Category::Regular => {
                    report.samples.push(SampleRow {
                        sample_id: m.sample_id.clone(),
                        ppm_values: m.ppm_values.clone(),
                        mean_ppm: m.mean_ppm,
                        rpd: m.rpd,
                        umol_per_l: m.umol_per_l,
                        rpd_out_of_bounds: group.out_of_bounds(MetricKind::Rpd),
                    });
                    report.reported.push(reported_row(group));
                }
                Category::Blank => {
                    report
                        .blanks
                        .extend(m.ppm_values.iter().map(|&ppm| BlankRow {
                            sample_id: m.sample_id.clone(),
                            ppm,
                        }));
                }
                Category::Rinse => report.rinse_count += 1,
            }
        }

        let blank_values: Vec<f64> = report.blanks.iter().map(|b| b.ppm).collect();
        report.blank_average = mean(&blank_values);
        report
    }

    fn qc_legend(&self) -> String {
        let range = |c: Category| {
            self.validator
                .recovery_range(c)
                .map(|r| r.to_string())
                .unwrap_or_default()
        };
        let (mdl, icv, ccv) = (range(Category::Mdl), range(Category::Icv), range(Category::Ccv));
        if icv == ccv {
            format!("MDL %R: {}, ICV/CCV %R: {}", mdl, icv)
        } else {
            format!("MDL %R: {}, ICV %R: {}, CCV %R: {}", mdl, icv, ccv)
        }
    }

    fn samples_legend(&self) -> String {
        format!("RPD: ≤{}%", self.validator.rpd_max())
    }
}

fn reported_row(group: &ValidatedGroup) -> ReportedRow {
    ReportedRow {
        sample_id: group.metrics.sample_id.clone(),
        mean_ppm: group.metrics.mean_ppm,
        umol_per_l: group.metrics.umol_per_l,
        out_of_bounds: !group.flags.all_within(),
    }
}
