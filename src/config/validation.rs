//! Validation of a loaded configuration.

use super::QcConfig;
use crate::classify::{Category, Classifier};
use crate::error::ConfigurationError;

impl QcConfig {
    /// Check that every value the engine divides by or compares against is
    /// usable, and that all category patterns compile.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.molecular_weight.is_finite() && self.molecular_weight > 0.0) {
            return Err(ConfigurationError::NonPositiveMolecularWeight(
                self.molecular_weight,
            ));
        }

        if !(self.rpd_max.is_finite() && self.rpd_max >= 0.0) {
            return Err(ConfigurationError::InvalidBound {
                name: "rpd_max".to_string(),
                lower: 0.0,
                upper: self.rpd_max,
            });
        }

        for (category, standard) in [
            (Category::Mdl, &self.standards.mdl),
            (Category::Icv, &self.standards.icv),
            (Category::Ccv, &self.standards.ccv),
        ] {
            if !(standard.target_ppm.is_finite() && standard.target_ppm > 0.0) {
                return Err(ConfigurationError::NonPositiveTarget {
                    category,
                    value: standard.target_ppm,
                });
            }
            standard
                .recovery
                .validate(&format!("{} recovery", category))?;
        }

        if self.rules.is_empty() {
            return Err(ConfigurationError::NoRules);
        }
        Classifier::new(&self.rules)?;

        Ok(())
    }
}
