use clap::{Parser, Subcommand};

mod element;
mod error;
mod output;
mod utils;

use error::Result;

use crate::element::ElementCommands;

#[derive(Parser)]
#[command(name = "kumiki")]
#[command(about = "Element tree toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Element tree operations
    Element {
        #[command(subcommand)]
        command: ElementCommands,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Element { command } => match command {
            ElementCommands::Fmt { config } => {
                crate::element::fmt::execute(config)?;
            }
            ElementCommands::Dump { config } => {
                crate::element::dump::execute(config)?;
            }
        },
    }

    Ok(())
}
