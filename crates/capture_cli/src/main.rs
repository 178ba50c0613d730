mod error;
mod normalize;
mod parse_stack;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::Error;

#[derive(Debug, Parser)]
#[command(name = "capture")]
#[command(about = "Normalize captured errors and stack text into canonical reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify a captured JSON value and print the finished report.
    Normalize(normalize::Args),
    /// Parse raw stack text and print the recovered frames.
    ParseStack(parse_stack::Args),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Error> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Normalize(args) => normalize::run(args),
        Command::ParseStack(args) => parse_stack::run(args),
    }
}
