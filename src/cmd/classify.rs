//! Classify command: show which category rule an id falls under.

use anyhow::{Context, Result};
use std::path::Path;

use labqc::classify::Classifier;
use labqc::config::QcConfig;
use labqc::ui;

pub fn cmd_classify(ids: &[String], config_path: Option<&Path>) -> Result<()> {
    let config = QcConfig::load(config_path)?;
    let classifier = Classifier::new(&config.rules).context("Invalid category rules")?;

    let width = ids.iter().map(|id| id.trim().chars().count()).max().unwrap_or(0);
    for id in ids {
        let category = classifier.classify(id);
        println!(
            "{:<width$}  {}",
            id.trim(),
            ui::category_label(category),
            width = width
        );
    }

    Ok(())
}
