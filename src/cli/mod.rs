use anyhow::Result;
use clap::{Parser, Subcommand};

mod config;
mod extract;
mod targets;

pub use extract::ExtractArgs;
pub use targets::TargetsArgs;

/// exfilms - Extract spectra and chromatograms from mzML files into JSON
#[derive(Parser, Debug)]
#[command(name = "exfilms")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract every data file of a directory into JSON
    Extract(ExtractArgs),

    /// Parse a target file and print the resulting target list
    Targets(TargetsArgs),
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract(args) => extract::run(args),
        Commands::Targets(args) => targets::run(args),
    }
}
