mod commands;
mod config;
mod error;
mod logger;
mod runner;
mod stack_file;
mod stacks;
mod writer;
use crate::commands::Commands;
use crate::error::Error;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print JSON instead of human-readable text
    #[arg(long, global = true)]
    structured: bool,
}

/// Derive a runner from the command and run it
fn run(command: &impl Runnable, writer: &Writer) -> Result<(), Error> {
    command.runner(writer).run()
}

fn main() {
    Logger::init();
    let cli = Cli::parse();
    let writer = Writer::new(cli.structured);

    // Match all commands here, in one place
    let result = match &cli.command {
        Commands::Synth(cmd) => run(cmd, &writer),
        Commands::Validate(cmd) => run(cmd, &writer),
        Commands::Stacks(cmd) => run(cmd, &writer),
        Commands::Types(cmd) => run(cmd, &writer),
    };

    let Err(error) = result else {
        return;
    };

    if writer.is_structured() {
        let _ = writer.json(serde_json::json!({
            "success": false,
            "error": error.message(),
        }));
    } else {
        let _ = writer.error(&format!(
            "\n{}\n{error}\n",
            console::style("Error").red().bold()
        ));
    }

    std::process::exit(1);
}
