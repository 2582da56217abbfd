//! Configuration for QC batches: category patterns, standard targets,
//! acceptance bounds, and the molecular weight of the analyte.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{default_rules, PatternRule};

pub mod defaults;
pub mod validation;

pub use defaults::*;

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "labqc.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QcConfig {
    /// Analyte label used in column headers (default: "C")
    #[serde(default = "default_analyte")]
    pub analyte: String,
    /// Molecular weight in g/mol for the µmol/L conversion
    #[serde(default = "default_molecular_weight")]
    pub molecular_weight: f64,
    /// Maximum acceptable %RPD for regular samples, inclusive
    #[serde(default = "default_rpd_max")]
    pub rpd_max: f64,
    /// Classification rules, first match wins
    #[serde(default = "default_rules")]
    pub rules: Vec<PatternRule>,
    #[serde(default)]
    pub standards: StandardsConfig,
    /// When set, only rows with this Sample Type are processed
    #[serde(default)]
    pub sample_type: Option<String>,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            analyte: default_analyte(),
            molecular_weight: default_molecular_weight(),
            rpd_max: default_rpd_max(),
            rules: default_rules(),
            standards: StandardsConfig::default(),
            sample_type: None,
        }
    }
}

impl QcConfig {
    /// Load configuration with full merge semantics.
    /// Merge order (later overrides earlier):
    /// 1. Global config (~/.config/labqc/config.yaml)
    /// 2. Project config (./labqc.yaml)
    /// 3. Explicit config passed on the command line
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_merged_from(
            global_config_path().as_deref(),
            Path::new(PROJECT_CONFIG_FILE),
            explicit,
        )
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config")
    }

    /// Load merged configuration from the given layers. Missing global and
    /// project files are skipped; a missing explicit file is an error.
    pub fn load_merged_from(
        global_path: Option<&Path>,
        project_path: &Path,
        explicit_path: Option<&Path>,
    ) -> Result<Self> {
        let global_config = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project_config = Some(project_path)
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let explicit_config = explicit_path
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let config = global_config
            .overlay(project_config)
            .overlay(explicit_config)
            .into_config();

        tracing::debug!(
            molecular_weight = config.molecular_weight,
            rules = config.rules.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Returns the path to the global config file at ~/.config/labqc/config.yaml
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/labqc/config.yaml"))
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub analyte: Option<String>,
    pub molecular_weight: Option<f64>,
    pub rpd_max: Option<f64>,
    pub rules: Option<Vec<PatternRule>>,
    pub standards: Option<PartialStandardsConfig>,
    pub sample_type: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialStandardsConfig {
    pub mdl: Option<StandardConfig>,
    pub icv: Option<StandardConfig>,
    pub ccv: Option<StandardConfig>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config")
    }

    /// Values present in `over` take precedence over values in `self`.
    fn overlay(self, over: PartialConfig) -> PartialConfig {
        let base_standards = self.standards.unwrap_or_default();
        let over_standards = over.standards.unwrap_or_default();

        PartialConfig {
            analyte: over.analyte.or(self.analyte),
            molecular_weight: over.molecular_weight.or(self.molecular_weight),
            rpd_max: over.rpd_max.or(self.rpd_max),
            // Rules replace as a whole list; priority order is not mergeable
            rules: over.rules.or(self.rules),
            standards: Some(PartialStandardsConfig {
                mdl: over_standards.mdl.or(base_standards.mdl),
                icv: over_standards.icv.or(base_standards.icv),
                ccv: over_standards.ccv.or(base_standards.ccv),
            }),
            sample_type: over.sample_type.or(self.sample_type),
        }
    }

    fn into_config(self) -> QcConfig {
        let standards = self.standards.unwrap_or_default();

        QcConfig {
            analyte: self.analyte.unwrap_or_else(defaults::default_analyte),
            molecular_weight: self
                .molecular_weight
                .unwrap_or_else(defaults::default_molecular_weight),
            rpd_max: self.rpd_max.unwrap_or_else(defaults::default_rpd_max),
            rules: self.rules.unwrap_or_else(default_rules),
            standards: StandardsConfig {
                mdl: standards.mdl.unwrap_or_else(defaults::default_mdl),
                icv: standards.icv.unwrap_or_else(defaults::default_icv),
                ccv: standards.ccv.unwrap_or_else(defaults::default_ccv),
            },
            sample_type: self.sample_type,
        }
    }
}
