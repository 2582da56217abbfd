//! CLI entry point and command handlers for labqc.

mod cli;
mod cmd;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, ConfigCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.quiet {
        std::env::set_var("LABQC_QUIET", "1");
    }

    match cli.command {
        Commands::Run {
            input,
            config,
            format,
            output,
            molecular_weight,
            strict,
        } => cmd::run::cmd_run(
            &input,
            config.as_deref(),
            &format,
            output.as_deref(),
            molecular_weight,
            strict,
        ),
        Commands::Classify { ids, config } => cmd::classify::cmd_classify(&ids, config.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Show { config } => cmd::config::cmd_config_show(config.as_deref()),
            ConfigCommands::Validate { config } => {
                cmd::config::cmd_config_validate(config.as_deref())
            }
        },
        Commands::Version { build } => cmd::util::cmd_version(build),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "labqc=warn",
        1 => "labqc=info",
        _ => "labqc=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
