//! `abacus`: terminal host for the counting-machine bridge and tutorial.

mod console;
mod host;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "abacus", version, about = "Counting-machine bridge and tutorial host")]
struct Cli {
    /// Log routine traffic (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed runtime messages and host actions, line by line
    Run(run::RunArgs),

    /// Parse one runtime message and print the result
    Route {
        /// Raw message, e.g. `ValueChanged:0042`
        message: String,
    },

    /// Print the effective configuration
    Config {
        /// YAML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Route { message } => {
            let parsed = abacus_core::parse_message(&message);
            let label = if parsed.is_aliased() {
                "aliased".yellow()
            } else {
                "as-is".dimmed()
            };
            println!("{} {}", label, serde_json::to_string(&parsed)?);
            Ok(())
        }
        Commands::Config { config } => {
            let config = run::load_config(config.as_deref())?;
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}
