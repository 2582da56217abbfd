//! Config commands for inspecting and validating labqc configuration

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use labqc::config::{global_config_path, QcConfig, PROJECT_CONFIG_FILE};

/// Print the merged configuration
pub fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = QcConfig::load(config_path)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}

/// Validate config semantically and report issues
pub fn cmd_config_validate(config_path: Option<&Path>) -> Result<()> {
    println!("{}", "Validating labqc configuration...".bold());
    println!();

    show_sources(config_path);
    let config = QcConfig::load(config_path)?;

    println!();
    match config.validate() {
        Ok(()) => {
            println!(
                "  molecular weight {} g/mol, RPD ≤{}%, {} category rule(s)",
                config.molecular_weight,
                config.rpd_max,
                config.rules.len()
            );
            println!();
            println!("{} Configuration is valid", "✓".green());
            Ok(())
        }
        Err(err) => {
            println!("  {} {}", "✗".red(), err);
            println!();
            println!("{} Configuration is invalid", "✗".red());
            std::process::exit(1);
        }
    }
}

/// List the config layers and whether each one exists
fn show_sources(config_path: Option<&Path>) {
    println!("{}", "Configuration sources (later overrides earlier):".dimmed());

    let mut layers = Vec::new();
    if let Some(global) = global_config_path() {
        layers.push(("global", global));
    }
    layers.push(("project", Path::new(PROJECT_CONFIG_FILE).to_path_buf()));
    if let Some(explicit) = config_path {
        layers.push(("explicit", explicit.to_path_buf()));
    }

    for (label, path) in layers {
        let marker = if path.exists() {
            "✓".green()
        } else {
            "-".dimmed()
        };
        println!("  {} {:<8} {}", marker, label, path.display());
    }
}
