// ABOUTME: Entry point for the hephaestus CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use hephaestus::config::{self, Config};
use hephaestus::error::Result;
use hephaestus::output::{Output, OutputMode};
use hephaestus::registry::Registry;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, Output::new(mode)).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Targets => {
            let registry = load_registry(cli.config.as_deref(), &cwd)?;
            commands::list_targets(&registry, &output);
            Ok(())
        }
        Commands::Services { target } => {
            let registry = load_registry(cli.config.as_deref(), &cwd)?;
            commands::list_services(&registry, &target, &output)
        }
        Commands::Deploy {
            target,
            services,
            all,
            clone,
            load_balancers,
            node_ports,
            yes,
        } => {
            let registry = load_registry(cli.config.as_deref(), &cwd)?;
            let request = commands::DeployRequest {
                target,
                services,
                all,
                clone,
                load_balancers,
                node_ports,
                confirm: !yes,
            };
            commands::deploy(&registry, request, output).await
        }
    }
}

fn load_registry(path: Option<&std::path::Path>, cwd: &std::path::Path) -> Result<Registry> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::discover(cwd)?,
    };
    Ok(Registry::new(config))
}
