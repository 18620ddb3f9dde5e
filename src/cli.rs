//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use backstage_insights::output::OutputConfig;

/// Backstage Insights - Generate a Backstage catalog from an Nx workspace
#[derive(Parser, Debug)]
#[command(name = "backstage-insights")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate ownership.yaml and catalog-info.yaml from the project graph
    Generate(commands::generate::GenerateArgs),

    /// Create the configuration files in .backstage-insights/
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logger(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, output),
            Commands::Init(args) => commands::init::execute(args, output),
        }
    }
}

/// Initialize `env_logger`, letting `RUST_LOG` override `--log-level`.
fn init_logger(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when embedded; keep the existing one.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
