// Tooling crate: unwrap/expect/panic acceptable outside the device runtime.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod deploy;
mod doc;
mod step;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Pen-Deck development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the host build, the Pi build and the no_std platform crate
    Check,
    /// Run unit, integration and doc tests
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Cross-build the launcher for the Pi and copy it over with scp
    Deploy {
        /// ssh destination, e.g. `pi@pendeck.local`
        #[arg(long)]
        host: Option<String>,
        /// Rust target triple of the device
        #[arg(long, default_value = deploy::DEFAULT_TARGET)]
        target: String,
        /// Build in debug mode
        #[arg(long)]
        debug: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Doc { open } => doc::run(open),
        Commands::Deploy {
            host,
            target,
            debug,
        } => deploy::run(host.as_deref(), &target, !debug),
    }
}
