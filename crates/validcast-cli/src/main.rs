//! # validcast CLI Entry Point
//!
//! Parses arguments, initializes tracing, and dispatches to handlers.

use clap::Parser;
use validcast_cli::check::{self, CheckArgs};
use validcast_schema::{config, registry};

/// Validate and cast JSON/YAML documents against schema documents.
#[derive(Parser, Debug)]
#[command(name = "validcast", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Cast an input document against a schema document.
    Check(CheckArgs),
    /// List registered chain operators.
    Operators,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => {
            let report = check::run(&args, config::global())?;
            if !report.output.is_empty() {
                println!("{}", report.output);
            }
            if report.exit_code != 0 {
                std::process::exit(report.exit_code);
            }
        }
        Commands::Operators => {
            for name in registry::operator_names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
