//! Weft command-line tool
//!
//! Runs script files, evaluates inline expressions, and hosts the
//! interactive REPL.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "weft")]
#[command(about = "Weft expression language", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file line by line
    Run {
        /// Input file
        file: String,
    },

    /// Evaluate an inline expression
    Eval {
        /// Expression to evaluate
        expr: String,
    },

    /// Start interactive REPL
    Repl,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file } => commands::run::execute(&file),
        Commands::Eval { expr } => commands::eval::execute(&expr),
        Commands::Repl => commands::repl::execute(),
    }
}
