//! Batch engine: classify, group, compute, validate, and assemble.
//!
//! An [`Engine`] is built once from a validated [`QcConfig`]; building it is
//! the only place a configuration error can occur. [`Engine::run`] is a pure
//! function of its input records.

use crate::bounds::BoundsValidator;
use crate::classify::Classifier;
use crate::config::QcConfig;
use crate::error::{ComputationError, ConfigurationError};
use crate::group::group_records;
use crate::metrics::MetricsCalculator;
use crate::record::RawRecord;
use crate::report::{Report, ReportAssembler, ValidatedGroup};

/// Results of one batch plus the group-scoped failures collected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub report: Report,
    pub errors: Vec<ComputationError>,
    /// Rows dropped by the sample type filter
    pub filtered_rows: usize,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: QcConfig,
    classifier: Classifier,
    calculator: MetricsCalculator,
    validator: BoundsValidator,
}

impl Engine {
    pub fn new(config: QcConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            classifier: Classifier::new(&config.rules)?,
            calculator: MetricsCalculator::new(&config),
            validator: BoundsValidator::new(&config),
            config,
        })
    }

    pub fn run(&self, records: &[RawRecord]) -> BatchOutcome {
        let selected: Vec<RawRecord> = match &self.config.sample_type {
            Some(wanted) => records
                .iter()
                .filter(|r| r.sample_type.trim().eq_ignore_ascii_case(wanted.trim()))
                .cloned()
                .collect(),
            None => records.to_vec(),
        };
        let filtered_rows = records.len() - selected.len();
        if filtered_rows > 0 {
            tracing::info!(filtered_rows, "dropped rows by sample type filter");
        }

        let groups = group_records(&selected, &self.classifier);

        let mut errors = Vec::new();
        let mut validated = Vec::with_capacity(groups.len());
        for group in &groups {
            let computed = self.calculator.compute(group);
            for err in &computed.errors {
                tracing::debug!("{}", err);
            }
            errors.extend(computed.errors);

            if let Some(metrics) = computed.result {
                let flags = self.validator.validate(&metrics);
                validated.push(ValidatedGroup { metrics, flags });
            }
        }

        let report = ReportAssembler::new(&self.validator, &self.config.analyte).assemble(&validated);
        tracing::info!(
            groups = groups.len(),
            qc = report.qc.len(),
            samples = report.samples.len(),
            flagged = report.flagged_count(),
            errors = errors.len(),
            "batch complete"
        );

        BatchOutcome {
            report,
            errors,
            filtered_rows,
        }
    }
}
