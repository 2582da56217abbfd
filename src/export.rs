//! Rendering of a batch report for people and for downstream tools.
//!
//! The three result sets are laid out as tables the way the lab sheets lay
//! them out: one row per replicate, summary values on the last replicate of
//! each group, and the bounds legend in the first row. Out-of-bounds cells are
//! marked on the cell; each renderer decides how to show the mark.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ComputationError;
use crate::report::Report;
use crate::ui;

/// Output formats supported by `labqc run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => anyhow::bail!(
                "Unknown format: {}. Supported formats: text, json, csv, markdown",
                s
            ),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// One rendered cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    /// Value failed its bound check
    pub flagged: bool,
}

impl Cell {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flagged: false,
        }
    }

    fn number(value: Option<f64>, decimals: usize) -> Self {
        Self::text(
            value
                .map(|v| format!("{:.*}", decimals, v))
                .unwrap_or_default(),
        )
    }

    fn flag(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }
}

/// A named result set ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    /// File stem used when each table is written to its own file
    pub file_stem: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

const PPM_DECIMALS: usize = 4;
const PERCENT_DECIMALS: usize = 2;

/// Build the QC, Samples, and Reported Results tables.
pub fn build_tables(report: &Report) -> Vec<Table> {
    vec![qc_table(report), samples_table(report), reported_table(report)]
}

fn qc_table(report: &Report) -> Table {
    let a = &report.analyte;
    let headers = vec![
        "Sample ID".to_string(),
        format!("PPM {}", a),
        format!("Mean ppm {}", a),
        "%R".to_string(),
        "%RPD".to_string(),
        "Bounds".to_string(),
    ];

    let mut rows = Vec::new();
    for qc in &report.qc {
        let last = qc.ppm_values.len().saturating_sub(1);
        for (i, ppm) in qc.ppm_values.iter().enumerate() {
            let summary = i == last;
            rows.push(vec![
                Cell::text(&qc.sample_id),
                Cell::number(Some(*ppm), PPM_DECIMALS),
                Cell::number(Some(qc.mean_ppm).filter(|_| summary), PPM_DECIMALS),
                Cell::number(qc.percent_recovery.filter(|_| summary), PERCENT_DECIMALS)
                    .flag(summary && qc.recovery_out_of_bounds),
                Cell::number(qc.rpd.filter(|_| summary), PERCENT_DECIMALS),
                Cell::default(),
            ]);
        }
    }
    set_legend(&mut rows, &report.qc_legend);

    if !report.blanks.is_empty() {
        rows.push(vec![Cell::default(); headers.len()]);
        for blank in &report.blanks {
            rows.push(padded(
                vec![
                    Cell::text(&blank.sample_id),
                    Cell::number(Some(blank.ppm), PPM_DECIMALS),
                ],
                headers.len(),
            ));
        }
        rows.push(padded(
            vec![
                Cell::text("Average"),
                Cell::number(report.blank_average, PPM_DECIMALS),
            ],
            headers.len(),
        ));
    }

    Table {
        title: "QC".to_string(),
        file_stem: "qc".to_string(),
        headers,
        rows,
    }
}

fn samples_table(report: &Report) -> Table {
    let a = &report.analyte;
    let headers = vec![
        "Sample ID".to_string(),
        format!("PPM {}", a),
        format!("Mean ppm {}", a),
        "%RPD".to_string(),
        format!("umol/L {}", a),
        "Bounds".to_string(),
    ];

    let mut rows = Vec::new();
    for sample in &report.samples {
        let last = sample.ppm_values.len().saturating_sub(1);
        for (i, ppm) in sample.ppm_values.iter().enumerate() {
            let summary = i == last;
            rows.push(vec![
                Cell::text(&sample.sample_id),
                Cell::number(Some(*ppm), PPM_DECIMALS),
                Cell::number(Some(sample.mean_ppm).filter(|_| summary), PPM_DECIMALS),
                Cell::number(sample.rpd.filter(|_| summary), PERCENT_DECIMALS)
                    .flag(summary && sample.rpd_out_of_bounds),
                Cell::number(sample.umol_per_l.filter(|_| summary), PPM_DECIMALS),
                Cell::default(),
            ]);
        }
    }
    set_legend(&mut rows, &report.samples_legend);

    Table {
        title: "Samples".to_string(),
        file_stem: "samples".to_string(),
        headers,
        rows,
    }
}

fn reported_table(report: &Report) -> Table {
    let a = &report.analyte;
    let rows = report
        .reported
        .iter()
        .map(|r| {
            vec![
                Cell::text(&r.sample_id),
                Cell::number(Some(r.mean_ppm), PPM_DECIMALS),
                Cell::number(r.umol_per_l, PPM_DECIMALS),
                Cell::text(if r.out_of_bounds { "out of bounds" } else { "" })
                    .flag(r.out_of_bounds),
            ]
        })
        .collect();

    Table {
        title: "Reported Results".to_string(),
        file_stem: "reported_results".to_string(),
        headers: vec![
            "Sample ID".to_string(),
            format!("Mean ppm {}", a),
            format!("umol/L {}", a),
            "Flag".to_string(),
        ],
        rows,
    }
}

/// The legend goes into the last column of the first data row.
fn set_legend(rows: &mut [Vec<Cell>], legend: &str) {
    if let Some(cell) = rows.first_mut().and_then(|row| row.last_mut()) {
        *cell = Cell::text(legend);
    }
}

fn padded(mut row: Vec<Cell>, width: usize) -> Vec<Cell> {
    row.resize(width, Cell::default());
    row
}

/// Render the whole batch in the requested format.
pub fn render(report: &Report, errors: &[ComputationError], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => export_json(report, errors),
        OutputFormat::Csv => Ok(build_tables(report)
            .iter()
            .map(|t| format!("{}\n{}", t.title, export_csv(t)))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Markdown => Ok(export_markdown(report, errors)),
        OutputFormat::Text => Ok(export_text(report, errors)),
    }
}

#[derive(Serialize)]
struct JsonBatch<'a> {
    #[serde(flatten)]
    report: &'a Report,
    errors: Vec<String>,
    generated_at: String,
}

/// Export the report as JSON
pub fn export_json(report: &Report, errors: &[ComputationError]) -> Result<String> {
    let batch = JsonBatch {
        report,
        errors: errors.iter().map(|e| e.to_string()).collect(),
        generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    };
    serde_json::to_string_pretty(&batch).context("Failed to serialize report")
}

/// Export one table as CSV. Flags are not representable and are dropped;
/// the Reported Results table carries a textual flag column.
pub fn export_csv(table: &Table) -> String {
    let mut output = String::new();

    output.push_str(
        &table
            .headers
            .iter()
            .map(|h| csv_escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    output.push('\n');

    for row in &table.rows {
        let values: Vec<String> = row.iter().map(|c| csv_escape(&c.text)).collect();
        output.push_str(&values.join(","));
        output.push('\n');
    }

    output
}

/// Escape a value for CSV output
fn csv_escape(value: &str) -> String {
    // If value contains comma, quote, or newline, wrap in quotes and escape quotes
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn markdown_table(table: &Table) -> String {
    let mut output = String::new();

    output.push('|');
    for header in &table.headers {
        output.push(' ');
        output.push_str(header);
        output.push_str(" |");
    }
    output.push('\n');

    output.push('|');
    for _ in &table.headers {
        output.push_str(" --- |");
    }
    output.push('\n');

    for row in &table.rows {
        output.push('|');
        for cell in row {
            output.push(' ');
            let text = cell.text.replace('|', "\\|");
            if cell.flagged {
                output.push_str(&format!("**{}**", text));
            } else {
                output.push_str(&text);
            }
            output.push_str(" |");
        }
        output.push('\n');
    }

    output
}

/// Export the report as Markdown, out-of-bounds values in bold
pub fn export_markdown(report: &Report, errors: &[ComputationError]) -> String {
    let mut sections: Vec<String> = build_tables(report)
        .iter()
        .map(|t| format!("## {}\n\n{}", t.title, markdown_table(t)))
        .collect();

    if !errors.is_empty() {
        let list: Vec<String> = errors.iter().map(|e| format!("- {}", e)).collect();
        sections.push(format!("## Errors\n\n{}\n", list.join("\n")));
    }

    sections.join("\n")
}

/// Export the report as aligned terminal text, out-of-bounds values in red
pub fn export_text(report: &Report, errors: &[ComputationError]) -> String {
    let mut output = Vec::new();

    for table in build_tables(report) {
        output.push(ui::colors::heading(&table.title).to_string());
        output.push("─".repeat(table.title.chars().count()));
        if table.rows.is_empty() {
            output.push("  (no rows)".dimmed().to_string());
            output.push(String::new());
            continue;
        }

        let widths: Vec<usize> = (0..table.headers.len())
            .map(|i| {
                table
                    .rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.text.chars().count())
                    .chain(std::iter::once(table.headers[i].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = table
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = w))
            .collect();
        output.push(format!("  {}", header.join("  ")).dimmed().to_string());

        for row in &table.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(c, w)| {
                    let padded = format!("{:<w$}", c.text, w = w);
                    if c.flagged {
                        padded.red().to_string()
                    } else {
                        padded
                    }
                })
                .collect();
            output.push(format!("  {}", cells.join("  ").trim_end()));
        }
        output.push(String::new());
    }

    if report.rinse_count > 0 {
        output.push(
            format!("{} rinse group(s) excluded", report.rinse_count)
                .dimmed()
                .to_string(),
        );
    }

    for err in errors {
        output.push(format!("{} {}", "warning:".yellow(), err));
    }

    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::error::{ComputationFailure, MetricKind};
    use crate::report::{BlankRow, QcRow, ReportedRow, SampleRow};

    fn sample_report() -> Report {
        Report {
            analyte: "C".to_string(),
            qc: vec![QcRow {
                sample_id: "CCV3".to_string(),
                category: Category::Ccv,
                ppm_values: vec![11.9, 12.1],
                mean_ppm: 12.0,
                percent_recovery: Some(120.0),
                recovery_out_of_bounds: true,
                rpd: Some(1.6667),
            }],
            samples: vec![SampleRow {
                sample_id: "S1".to_string(),
                ppm_values: vec![5.0, 5.2],
                mean_ppm: 5.1,
                rpd: Some(3.9216),
                umol_per_l: Some(424.6221),
                rpd_out_of_bounds: false,
            }],
            reported: vec![
                ReportedRow {
                    sample_id: "S1".to_string(),
                    mean_ppm: 5.1,
                    umol_per_l: Some(424.6221),
                    out_of_bounds: false,
                },
                ReportedRow {
                    sample_id: "S2".to_string(),
                    mean_ppm: 2.3,
                    umol_per_l: Some(191.4981),
                    out_of_bounds: true,
                },
            ],
            blanks: vec![BlankRow {
                sample_id: "ICB".to_string(),
                ppm: 0.01,
            }],
            blank_average: Some(0.01),
            rinse_count: 0,
            qc_legend: "MDL %R: 45-145%, ICV/CCV %R: 90-110%".to_string(),
            samples_legend: "RPD: ≤10%".to_string(),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(csv_escape("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_qc_table_summary_on_last_replicate() {
        let table = qc_table(&sample_report());
        assert_eq!(table.headers[1], "PPM C");
        // first replicate carries the legend, not the summary
        assert_eq!(table.rows[0][2].text, "");
        assert_eq!(table.rows[0][5].text, "MDL %R: 45-145%, ICV/CCV %R: 90-110%");
        assert_eq!(table.rows[1][2].text, "12.0000");
        assert_eq!(table.rows[1][3].text, "120.00");
        assert!(table.rows[1][3].flagged);
        assert!(!table.rows[0][3].flagged);
    }

    #[test]
    fn test_qc_table_blank_section() {
        let table = qc_table(&sample_report());
        let last = table.rows.last().unwrap();
        assert_eq!(last[0].text, "Average");
        assert_eq!(last[1].text, "0.0100");
        assert_eq!(last.len(), table.headers.len());
        // separator row between standards and blanks
        assert!(table.rows[2].iter().all(|c| c.text.is_empty()));
    }

    #[test]
    fn test_samples_table() {
        let table = samples_table(&sample_report());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][5].text, "RPD: ≤10%");
        assert_eq!(table.rows[1][3].text, "3.92");
        assert!(!table.rows[1][3].flagged);
        assert_eq!(table.rows[1][4].text, "424.6221");
    }

    #[test]
    fn test_export_csv() {
        let csv = export_csv(&reported_table(&sample_report()));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Sample ID,Mean ppm C,umol/L C,Flag");
        assert_eq!(lines[1], "S1,5.1000,424.6221,");
        assert_eq!(lines[2], "S2,2.3000,191.4981,out of bounds");
    }

    #[test]
    fn test_export_markdown_bolds_flagged() {
        let md = export_markdown(&sample_report(), &[]);
        assert!(md.contains("## QC"));
        assert!(md.contains("## Reported Results"));
        assert!(md.contains("**120.00**"));
        assert!(!md.contains("## Errors"));
    }

    #[test]
    fn test_export_json_includes_errors() {
        let errors = vec![ComputationError::new(
            "S9",
            MetricKind::MeanPpm,
            ComputationFailure::NoNumericValues,
        )];
        let json = export_json(&sample_report(), &errors).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["qc"][0]["sample_id"], "CCV3");
        assert_eq!(value["qc"][0]["recovery_out_of_bounds"], true);
        assert_eq!(value["qc"][0]["category"], "ccv");
        assert!(value["errors"][0].as_str().unwrap().contains("S9"));
    }

    #[test]
    fn test_export_text_lists_warnings() {
        colored::control::set_override(false);
        let errors = vec![ComputationError::new(
            "S9",
            MetricKind::Ppm,
            ComputationFailure::NonNumeric { row_index: 4 },
        )];
        let text = export_text(&sample_report(), &errors);
        assert!(text.contains("Reported Results"));
        assert!(text.contains("warning: Cannot compute PPM for sample S9"));
    }
}
