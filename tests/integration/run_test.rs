//! Run command

use crate::support::fixtures::{fixture_path, run_labqc, stderr, stdout};

use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn run_json(dir: &std::path::Path, fixture: &str, extra: &[&str]) -> Value {
    let input = fixture_path(fixture);
    let mut args = vec!["run", input.to_str().unwrap(), "--format", "json"];
    args.extend_from_slice(extra);

    let output = run_labqc(dir, &args);
    assert!(
        output.status.success(),
        "labqc run failed: {}",
        stderr(&output)
    );
    serde_json::from_str(&stdout(&output)).expect("stdout is not JSON")
}

fn ids(value: &Value, set: &str) -> Vec<String> {
    value[set]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["sample_id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_run_partitions_in_first_seen_order() {
    let tmp = TempDir::new().unwrap();
    let report = run_json(tmp.path(), "batch.csv", &[]);

    assert_eq!(ids(&report, "qc"), vec!["ICV", "MDL", "CCV3"]);
    assert_eq!(ids(&report, "samples"), vec!["B-12", "A-03"]);
    assert_eq!(ids(&report, "reported"), vec!["B-12", "A-03"]);
    assert_eq!(ids(&report, "blanks"), vec!["ICB", "icb2"]);
    assert_eq!(report["rinse_count"], 1);
    assert!(report["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_run_flags_out_of_bounds_values() {
    let tmp = TempDir::new().unwrap();
    let report = run_json(tmp.path(), "batch.csv", &[]);

    let qc = report["qc"].as_array().unwrap();
    let icv_recovery = qc[0]["percent_recovery"].as_f64().unwrap();
    assert!((icv_recovery - 97.2222).abs() < 1e-3);
    assert_eq!(qc[0]["recovery_out_of_bounds"], false);
    assert!((qc[1]["percent_recovery"].as_f64().unwrap() - 50.0).abs() < 1e-9);
    assert_eq!(qc[1]["recovery_out_of_bounds"], false);
    assert!((qc[2]["percent_recovery"].as_f64().unwrap() - 120.0).abs() < 1e-9);
    assert_eq!(qc[2]["recovery_out_of_bounds"], true);

    let samples = report["samples"].as_array().unwrap();
    assert!((samples[0]["rpd"].as_f64().unwrap() - 3.9216).abs() < 1e-3);
    assert_eq!(samples[0]["rpd_out_of_bounds"], false);
    assert!((samples[1]["rpd"].as_f64().unwrap() - 26.087).abs() < 1e-3);
    assert_eq!(samples[1]["rpd_out_of_bounds"], true);

    let blank_average = report["blank_average"].as_f64().unwrap();
    assert!((blank_average - 0.02).abs() < 1e-9);
}

#[test]
fn test_run_reads_json_input() {
    let tmp = TempDir::new().unwrap();
    let report = run_json(tmp.path(), "batch.json", &[]);
    assert_eq!(ids(&report, "qc"), vec!["CCV1"]);
    assert_eq!(ids(&report, "samples"), vec!["S1"]);
}

#[test]
fn test_run_collects_group_errors() {
    let tmp = TempDir::new().unwrap();
    let report = run_json(tmp.path(), "bad_rows.csv", &[]);

    assert_eq!(ids(&report, "samples"), vec!["S1", "S3"]);
    assert!(report["samples"][0]["rpd"].is_null());

    let errors: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.contains("sample S1") && e.contains("row 2")));
    assert!(errors
        .iter()
        .any(|e| e.contains("Mean ppm") && e.contains("sample S2")));
}

#[test]
fn test_run_strict_fails_on_group_errors() {
    let tmp = TempDir::new().unwrap();
    let input = fixture_path("bad_rows.csv");
    let output = run_labqc(
        tmp.path(),
        &["run", input.to_str().unwrap(), "--format", "json", "--strict"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("strict mode"));
}

#[test]
fn test_run_rejects_zero_molecular_weight() {
    let tmp = TempDir::new().unwrap();
    let input = fixture_path("batch.csv");
    let output = run_labqc(
        tmp.path(),
        &["run", input.to_str().unwrap(), "--molecular-weight", "0"],
    );
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("molecular_weight must be a positive number"));
}

#[test]
fn test_run_rejects_broken_config_file() {
    let tmp = TempDir::new().unwrap();
    let input = fixture_path("batch.csv");
    let config = fixture_path("broken.yaml");
    let output = run_labqc(
        tmp.path(),
        &[
            "run",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Target concentration for CCV"));
}

#[test]
fn test_run_uses_project_config() {
    let tmp = TempDir::new().unwrap();
    fs::copy(fixture_path("nitrogen.yaml"), tmp.path().join("labqc.yaml")).unwrap();

    let report = run_json(tmp.path(), "batch.csv", &[]);
    assert_eq!(report["analyte"], "N");
    // B-12 has an RPD of ~3.9%, above the 2% limit of this config
    assert_eq!(report["samples"][0]["rpd_out_of_bounds"], true);
    assert_eq!(report["samples_legend"], "RPD: ≤2%");

    let umol = report["samples"][0]["umol_per_l"].as_f64().unwrap();
    assert!((umol - 5.1 * 1000.0 / 14.0067).abs() < 1e-6);
}

#[test]
fn test_run_writes_csv_directory() {
    let tmp = TempDir::new().unwrap();
    let input = fixture_path("batch.csv");
    let out_dir = tmp.path().join("results");

    let output = run_labqc(
        tmp.path(),
        &[
            "run",
            input.to_str().unwrap(),
            "--format",
            "csv",
            "--output",
            out_dir.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let qc = fs::read_to_string(out_dir.join("qc.csv")).unwrap();
    let samples = fs::read_to_string(out_dir.join("samples.csv")).unwrap();
    let reported = fs::read_to_string(out_dir.join("reported_results.csv")).unwrap();

    assert!(qc.starts_with("Sample ID,PPM C,Mean ppm C,%R,%RPD,Bounds\n"));
    assert!(qc.contains("\"MDL %R: 45-145%, ICV/CCV %R: 90-110%\""));
    assert!(qc.contains("Average,0.0200"));
    assert!(samples.contains("RPD: ≤10%"));
    assert!(reported.starts_with("Sample ID,Mean ppm C,umol/L C,Flag\n"));
    assert!(reported.contains("A-03,2.3000,191.4980,out of bounds"));
    assert!(!reported.contains("CCV3"));
}

#[test]
fn test_run_markdown_to_file() {
    let tmp = TempDir::new().unwrap();
    let input = fixture_path("batch.csv");
    let out_file = tmp.path().join("report.md");

    let output = run_labqc(
        tmp.path(),
        &[
            "run",
            input.to_str().unwrap(),
            "--format",
            "markdown",
            "--output",
            out_file.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let md = fs::read_to_string(out_file).unwrap();
    assert!(md.contains("## Samples"));
    assert!(md.contains("**120.00**"));
    assert!(!md.contains('\u{1b}'));
}

#[test]
fn test_run_unknown_format() {
    let tmp = TempDir::new().unwrap();
    let input = fixture_path("batch.csv");
    let output = run_labqc(
        tmp.path(),
        &["run", input.to_str().unwrap(), "--format", "xlsx"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown format"));
}

#[test]
fn test_classify_command() {
    let tmp = TempDir::new().unwrap();
    let output = run_labqc(tmp.path(), &["classify", "ccv23", "  icb2 ", "S1", "mdl"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ccv23") && lines[0].contains("CCV"));
    assert!(lines[1].starts_with("icb2") && lines[1].contains("Blank"));
    assert!(lines[2].contains("Regular"));
    assert!(lines[3].contains("MDL"));
}
