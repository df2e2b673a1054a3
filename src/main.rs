//! litref CLI
//!
//! Literature-review bibliography toolkit: citation verification,
//! deduplication, and BibTeX generation driven by a YAML config.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod bibtex;
mod config;
mod dedup;
mod generate;
mod init;
mod provenance;
mod record;
mod review;
mod status;
mod store;
mod verify;

use dedup::{run_dedup, DedupArgs};
use generate::{run_generate, GenerateArgs};
use init::{run_init, InitArgs};
use status::{run_status, StatusArgs};
use verify::{run_verify, VerifyArgs};

#[derive(Parser)]
#[command(name = "litref")]
#[command(version)]
#[command(about = "Literature review bibliography toolkit")]
#[command(
    long_about = "Maintains a citation ledger, verifies ADS/DOI identifiers, removes duplicates, and generates the BibTeX bibliography and review documents.\n\nCommands:\n  init      Create a starter configuration\n  verify    Check citation URLs and stamp verification state\n  dedup     Collapse duplicate citations\n  generate  Write bibliography, review documents, and provenance report\n  status    Show project status"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter litref.yaml and provenance log
    Init(InitArgs),
    /// Verify citation URLs and update the ledger
    Verify(VerifyArgs),
    /// Remove duplicate citations from the ledger
    Dedup(DedupArgs),
    /// Generate bibliography, review documents, and provenance report
    Generate(GenerateArgs),
    /// Show project status as JSON
    Status(StatusArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => run_init(args).await,
        Commands::Verify(args) => run_verify(args).await,
        Commands::Dedup(args) => run_dedup(args).await,
        Commands::Generate(args) => run_generate(args).await,
        Commands::Status(args) => run_status(args).await,
    }
}
