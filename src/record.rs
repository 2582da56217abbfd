//! Raw input rows and ingestion from CSV, JSON, or YAML exports.
//!
//! Every row is stamped with its position in the input at ingestion. That
//! `row_index` is the canonical ordering used for grouping and for choosing
//! the replicate pair in RPD, so results never depend on how a caller later
//! shuffles the records.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Column headers of the instrument export.
pub mod columns {
    pub const SAMPLE_ID: &str = "Sample ID";
    pub const SAMPLE_TYPE: &str = "Sample Type";
    pub const PPM: &str = "PPM";
    pub const ADJUSTED_ABS: &str = "Adjusted ABS";
}

/// One measurement row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Zero-based position of the row in the input data
    pub row_index: usize,
    pub sample_id: String,
    /// Informational only
    pub sample_type: String,
    /// `None` when the cell was empty or not a finite number
    pub ppm: Option<f64>,
    /// Passed through untouched
    pub adjusted_abs: Option<f64>,
}

impl RawRecord {
    pub fn new(row_index: usize, sample_id: &str, ppm: Option<f64>) -> Self {
        Self {
            row_index,
            sample_id: sample_id.to_string(),
            sample_type: String::new(),
            ppm,
            adjusted_abs: None,
        }
    }

    pub fn with_sample_type(mut self, sample_type: &str) -> Self {
        self.sample_type = sample_type.to_string();
        self
    }
}

/// Parse a numeric cell. Empty, non-numeric, and non-finite cells are `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Input file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    Yaml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            "yaml" | "yml" => Ok(InputFormat::Yaml),
            _ => anyhow::bail!(
                "Unsupported input file '{}'. Supported extensions: .csv, .json, .yaml",
                path.display()
            ),
        }
    }
}

/// Read all records from an input file.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    let format = InputFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input from {}", path.display()))?;

    let records = parse_records(&content, format)
        .with_context(|| format!("Failed to parse input from {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = records.len(), "loaded input rows");
    Ok(records)
}

/// Parse records from in-memory content.
pub fn parse_records(content: &str, format: InputFormat) -> Result<Vec<RawRecord>> {
    match format {
        InputFormat::Csv => parse_csv(content),
        InputFormat::Json => {
            let rows: Vec<SerdeRow> =
                serde_json::from_str(content).context("Input is not a JSON array of rows")?;
            Ok(rows_to_records(rows))
        }
        InputFormat::Yaml => {
            let rows: Vec<SerdeRow> =
                serde_yaml::from_str(content).context("Input is not a YAML list of rows")?;
            Ok(rows_to_records(rows))
        }
    }
}

/// A JSON/YAML cell may hold a number or a string.
///
/// Unquoted numeric ids reach us already parsed, so their source spelling is
/// gone: `007` reads as `7` and `1.50` as `1.5`. Quote such ids in the input
/// to keep them verbatim.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Cell {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Cell {
    fn as_text(&self) -> String {
        match self {
            Cell::Integer(n) => n.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(n) => Some(*n as f64),
            Cell::Number(n) => Some(*n).filter(|v| v.is_finite()),
            Cell::Text(s) => parse_number(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SerdeRow {
    #[serde(rename = "Sample ID", default)]
    sample_id: Option<Cell>,
    #[serde(rename = "Sample Type", default)]
    sample_type: Option<Cell>,
    #[serde(rename = "PPM", default)]
    ppm: Option<Cell>,
    #[serde(rename = "Adjusted ABS", default)]
    adjusted_abs: Option<Cell>,
}

fn rows_to_records(rows: Vec<SerdeRow>) -> Vec<RawRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let sample_id = row.sample_id.as_ref().map(Cell::as_text);
            build_record(
                row_index,
                sample_id,
                row.sample_type.as_ref().map(Cell::as_text),
                row.ppm.as_ref().and_then(Cell::as_number),
                row.adjusted_abs.as_ref().and_then(Cell::as_number),
            )
        })
        .collect()
}

fn build_record(
    row_index: usize,
    sample_id: Option<String>,
    sample_type: Option<String>,
    ppm: Option<f64>,
    adjusted_abs: Option<f64>,
) -> Option<RawRecord> {
    let sample_id = sample_id.map(|s| s.trim().to_string()).unwrap_or_default();
    if sample_id.is_empty() {
        tracing::warn!(row = row_index + 1, "skipping row without a Sample ID");
        return None;
    }

    Some(RawRecord {
        row_index,
        sample_id,
        sample_type: sample_type.map(|s| s.trim().to_string()).unwrap_or_default(),
        ppm,
        adjusted_abs,
    })
}

/// Parse a header-driven CSV export. Unknown columns are ignored.
pub fn parse_csv(content: &str) -> Result<Vec<RawRecord>> {
    let mut rows = split_csv_records(content)
        .into_iter()
        .filter(|cells| !is_blank_record(cells));

    let header = rows.next().context("CSV input is empty")?;
    let find = |name: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let id_col = find(columns::SAMPLE_ID)
        .with_context(|| format!("CSV header is missing the '{}' column", columns::SAMPLE_ID))?;
    let ppm_col = find(columns::PPM)
        .with_context(|| format!("CSV header is missing the '{}' column", columns::PPM))?;
    let type_col = find(columns::SAMPLE_TYPE);
    let abs_col = find(columns::ADJUSTED_ABS);

    let records = rows
        .enumerate()
        .filter_map(|(row_index, cells)| {
            let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).cloned();
            build_record(
                row_index,
                cell(Some(id_col)),
                cell(type_col),
                cell(Some(ppm_col)).as_deref().and_then(parse_number),
                cell(abs_col).as_deref().and_then(parse_number),
            )
        })
        .collect();

    Ok(records)
}

/// Split CSV content into records of cells.
///
/// Double-quoted cells may contain commas, `""` escapes, and line breaks.
/// Records end at `\n` or `\r\n` outside quotes. A leading byte order mark,
/// as written by Excel's UTF-8 export, is dropped.
fn split_csv_records(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut cells));
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || !cells.is_empty() {
        cells.push(current);
        records.push(cells);
    }
    records
}

fn is_blank_record(cells: &[String]) -> bool {
    matches!(cells, [only] if only.trim().is_empty())
}
