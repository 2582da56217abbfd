//! Grouping of replicate measurements by sample identifier.

use indexmap::IndexMap;

use crate::classify::{Category, Classifier};
use crate::record::RawRecord;

/// All records that share a normalized sample id.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    /// Trimmed, upper-cased id used as the grouping key
    pub key: String,
    /// Trimmed id as first encountered, used for display
    pub sample_id: String,
    pub category: Category,
    /// Records in canonical (row index) order
    pub records: Vec<RawRecord>,
}

impl SampleGroup {
    /// Numeric ppm values in encounter order; missing cells are skipped.
    pub fn ppm_values(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.ppm).collect()
    }

    /// Row indexes of records whose ppm is missing or non-numeric.
    pub fn invalid_rows(&self) -> Vec<usize> {
        self.records
            .iter()
            .filter(|r| r.ppm.is_none())
            .map(|r| r.row_index)
            .collect()
    }

    /// Arithmetic mean of the numeric ppm values, `None` when there are none.
    pub fn mean_ppm(&self) -> Option<f64> {
        mean(&self.ppm_values())
    }
}

/// Normalize a sample id into its grouping key.
pub fn normalize_id(sample_id: &str) -> String {
    sample_id.trim().to_uppercase()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Group records by normalized sample id.
///
/// Groups come out in the order their id was first seen and each group keeps
/// its records in row order. The category is decided once, from the first
/// occurrence of the id.
pub fn group_records(records: &[RawRecord], classifier: &Classifier) -> Vec<SampleGroup> {
    let mut ordered: Vec<&RawRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.row_index);

    let mut groups: IndexMap<String, SampleGroup> = IndexMap::new();
    for record in ordered {
        let key = normalize_id(&record.sample_id);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                let sample_id = record.sample_id.trim().to_string();
                SampleGroup {
                    category: classifier.classify(&sample_id),
                    key,
                    sample_id,
                    records: Vec::new(),
                }
            })
            .records
            .push(record.clone());
    }

    tracing::debug!(groups = groups.len(), rows = records.len(), "grouped records");
    groups.into_values().collect()
}
