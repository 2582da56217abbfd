//! Run command: process one batch and render the result sets.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use labqc::config::QcConfig;
use labqc::engine::{BatchOutcome, Engine};
use labqc::export::{self, OutputFormat};
use labqc::record::load_records;
use labqc::ui;

pub fn cmd_run(
    input: &Path,
    config_path: Option<&Path>,
    format: &str,
    output: Option<&Path>,
    molecular_weight: Option<f64>,
    strict: bool,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;

    let mut config = QcConfig::load(config_path)?;
    if let Some(mw) = molecular_weight {
        config.molecular_weight = mw;
    }
    let engine = Engine::new(config).context("Invalid configuration")?;

    let records = load_records(input)?;
    if records.is_empty() {
        anyhow::bail!("No data rows found in {}", input.display());
    }
    ui::status(format!(
        "Loaded {} rows from {}",
        records.len(),
        ui::colors::identifier(&input.display().to_string())
    ));

    let outcome = engine.run(&records);

    match output {
        Some(path) => write_output(&outcome, format, path)?,
        None => println!("{}", export::render(&outcome.report, &outcome.errors, format)?),
    }

    print_summary(&outcome);

    if strict && !outcome.is_clean() {
        anyhow::bail!(
            "{} sample group error(s) in strict mode",
            outcome.errors.len()
        );
    }

    Ok(())
}

fn write_output(outcome: &BatchOutcome, format: OutputFormat, path: &Path) -> Result<()> {
    // Escape codes never belong in files
    colored::control::set_override(false);

    if format == OutputFormat::Csv && (path.is_dir() || path.extension().is_none()) {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create output directory {}", path.display()))?;

        for table in export::build_tables(&outcome.report) {
            let file = path.join(format!("{}.csv", table.file_stem));
            fs::write(&file, export::export_csv(&table))
                .with_context(|| format!("Failed to write {}", file.display()))?;
            ui::status(format!("Wrote {}", file.display()));
        }
    } else {
        let rendered = export::render(&outcome.report, &outcome.errors, format)?;
        fs::write(path, rendered)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        ui::status(format!("Report written to: {}", path.display()));
    }

    colored::control::unset_override();
    Ok(())
}

fn print_summary(outcome: &BatchOutcome) {
    let report = &outcome.report;
    let flagged = report.flagged_count();

    let icon = if flagged == 0 && outcome.is_clean() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    ui::status(format!(
        "{} {} QC standard(s), {} sample(s), {} blank measurement(s), {} flagged",
        icon,
        report.qc.len(),
        report.samples.len(),
        report.blanks.len(),
        if flagged > 0 {
            ui::colors::error(&flagged.to_string())
        } else {
            ui::colors::success("0")
        }
    ));

    if outcome.filtered_rows > 0 {
        ui::status(
            format!("{} row(s) skipped by sample type filter", outcome.filtered_rows).dimmed(),
        );
    }
    if !outcome.is_clean() {
        ui::status(ui::colors::warning(&format!(
            "{} sample group error(s); affected values were left out",
            outcome.errors.len()
        )));
    }
}
