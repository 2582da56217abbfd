//! Default values and configuration structs with default implementations.
//!
//! Defaults describe the single-chemistry carbon deployment.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundRange;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_analyte, String, "C".to_string());
default_fn!(default_molecular_weight, f64, 12.01057); // carbon, g/mol
default_fn!(default_rpd_max, f64, 10.0);
default_fn!(default_mdl, StandardConfig, StandardConfig::new(0.2, 45.0, 145.0));
default_fn!(default_icv, StandardConfig, StandardConfig::new(18.0, 90.0, 110.0));
default_fn!(default_ccv, StandardConfig, StandardConfig::new(10.0, 90.0, 110.0));

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Target concentration and recovery window of one QC standard
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StandardConfig {
    /// Expected concentration in ppm
    pub target_ppm: f64,
    /// Inclusive %R acceptance range
    pub recovery: BoundRange,
}

impl StandardConfig {
    pub const fn new(target_ppm: f64, lower: f64, upper: f64) -> Self {
        Self {
            target_ppm,
            recovery: BoundRange::new(lower, upper),
        }
    }
}

/// Per-category QC standards
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StandardsConfig {
    /// Method detection limit standard (default: 0.2 ppm, 45-145%)
    #[serde(default = "default_mdl")]
    pub mdl: StandardConfig,
    /// Initial calibration verification (default: 18.0 ppm, 90-110%)
    #[serde(default = "default_icv")]
    pub icv: StandardConfig,
    /// Continuing calibration verification (default: 10.0 ppm, 90-110%)
    #[serde(default = "default_ccv")]
    pub ccv: StandardConfig,
}

impl Default for StandardsConfig {
    fn default() -> Self {
        Self {
            mdl: default_mdl(),
            icv: default_icv(),
            ccv: default_ccv(),
        }
    }
}
