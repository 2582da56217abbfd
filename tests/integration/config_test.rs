//! Config commands

use crate::support::fixtures::{fixture_path, run_labqc, stdout};

use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_show_defaults() {
    let tmp = TempDir::new().unwrap();
    let output = run_labqc(tmp.path(), &["config", "show"]);
    assert!(output.status.success());

    let yaml = stdout(&output);
    let config: labqc::config::QcConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config, labqc::config::QcConfig::default());
}

#[test]
fn test_config_show_merges_global_and_project() {
    let tmp = TempDir::new().unwrap();
    let global_dir = tmp.path().join(".config").join("labqc");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(global_dir.join("config.yaml"), "analyte: N\nrpd_max: 15\n").unwrap();
    fs::write(tmp.path().join("labqc.yaml"), "rpd_max: 12\n").unwrap();

    let output = run_labqc(tmp.path(), &["config", "show"]);
    assert!(output.status.success());

    let yaml = stdout(&output);
    assert!(yaml.contains("analyte: N"));
    assert!(yaml.contains("rpd_max: 12"));
}

#[test]
fn test_config_validate_ok() {
    let tmp = TempDir::new().unwrap();
    let output = run_labqc(tmp.path(), &["config", "validate"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Configuration is valid"));
}

#[test]
fn test_config_validate_broken() {
    let tmp = TempDir::new().unwrap();
    let broken = fixture_path("broken.yaml");
    let output = run_labqc(
        tmp.path(),
        &["config", "validate", "--config", broken.to_str().unwrap()],
    );
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Target concentration for CCV"));
    assert!(text.contains("Configuration is invalid"));
}

#[test]
fn test_classify_uses_custom_rules() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("labqc.yaml"),
        "rules:\n  - category: ccv\n    pattern: \"^CV\\\\d+$\"\n",
    )
    .unwrap();

    let output = run_labqc(tmp.path(), &["classify", "CV7", "CCV7"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("CCV"));
    assert!(lines[1].contains("Regular"));
}
