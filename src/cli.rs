// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hephaestus")]
#[command(about = "Build, push and roll out container services to Kubernetes")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings, errors and the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of progress messages
    #[arg(long, global = true)]
    pub json: bool,

    /// Registry file to use instead of discovering hephaestus.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new hephaestus.yml registry file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List deployment targets
    Targets,

    /// List the services registered for a target
    Services {
        /// Deployment target (key or title)
        #[arg(short, long)]
        target: String,
    },

    /// Build, push and roll out the selected services
    Deploy {
        /// Deployment target (key or title)
        #[arg(short, long)]
        target: String,

        /// Service title to deploy; repeat to select several, in order
        #[arg(short, long = "service", required_unless_present = "all")]
        services: Vec<String>,

        /// Deploy every service registered for the target
        #[arg(long, conflicts_with = "services")]
        all: bool,

        /// Clone fresh copies of service repositories first
        #[arg(long)]
        clone: bool,

        /// Apply load balancer manifests after the rollout
        #[arg(long)]
        load_balancers: bool,

        /// Apply node port manifests after the rollout
        #[arg(long)]
        node_ports: bool,

        /// Do not pause for confirmation after cloning
        #[arg(short, long)]
        yes: bool,
    },
}
