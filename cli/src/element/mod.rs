pub(crate) mod dump;
pub(crate) mod fmt;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ElementCommands {
    /// Parse a document and print it in canonical form
    Fmt {
        #[command(flatten)]
        config: fmt::Config,
    },
    /// Print the structure of a document
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
}
