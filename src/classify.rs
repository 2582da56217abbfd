//! Sample identifier classification.
//!
//! Identifiers are matched against an ordered list of pattern rules. The first
//! rule that matches decides the category; identifiers matching no rule are
//! regular analytical samples.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigurationError;

/// The closed set of sample categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Regular,
    Mdl,
    Icv,
    Ccv,
    /// Initial and continuing calibration blanks (ICB/CCB)
    Blank,
    Rinse,
}

impl Category {
    /// Standards with a target concentration and a recovery check.
    pub fn is_qc_standard(&self) -> bool {
        matches!(self, Category::Mdl | Category::Icv | Category::Ccv)
    }

    /// Categories that get an RPD computation.
    pub fn computes_rpd(&self) -> bool {
        !matches!(self, Category::Blank | Category::Rinse)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Regular => write!(f, "Regular"),
            Category::Mdl => write!(f, "MDL"),
            Category::Icv => write!(f, "ICV"),
            Category::Ccv => write!(f, "CCV"),
            Category::Blank => write!(f, "Blank"),
            Category::Rinse => write!(f, "Rinse"),
        }
    }
}

/// One entry in the ordered classification table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatternRule {
    pub category: Category,
    /// Anchored regex, matched case-insensitively against the trimmed id
    pub pattern: String,
}

impl PatternRule {
    pub fn new(category: Category, pattern: &str) -> Self {
        Self {
            category,
            pattern: pattern.to_string(),
        }
    }
}

/// Built-in rules, in priority order.
pub fn default_rules() -> Vec<PatternRule> {
    vec![
        PatternRule::new(Category::Mdl, r"^MDL$"),
        PatternRule::new(Category::Icv, r"^ICV\d*$"),
        PatternRule::new(Category::Ccv, r"^CCV\d+$"),
        PatternRule::new(Category::Blank, r"^(ICB|CCB)\d*$"),
        PatternRule::new(Category::Rinse, r"^Rinse$"),
    ]
}

/// Compiled classification table.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Category, Regex)>,
}

impl Classifier {
    /// Compile the rules. Fails on the first pattern that is not a valid regex.
    pub fn new(rules: &[PatternRule]) -> Result<Self, ConfigurationError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (rule.category, re))
                    .map_err(|e| ConfigurationError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules: compiled })
    }

    /// Classify a raw sample identifier. Never fails: unmatched ids are `Regular`.
    pub fn classify(&self, sample_id: &str) -> Category {
        let id = sample_id.trim();
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(id))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Regular)
    }
}
