//! sigflow CLI - run FIR/IIR/summator processing graphs from the command line.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sigflow")]
#[command(author, version, about = "sigflow signal-processing graph CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a WAV file through a graph block
    Process(commands::process::ProcessArgs),

    /// Evaluate graph blocks for a single input value
    Eval(commands::eval::EvalArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),

    /// Describe a graph file
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `eval --json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Eval(args) => commands::eval::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
