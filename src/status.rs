//! status command: Project summary as compact JSON

use crate::config::Config;
use crate::provenance::ProvenanceLog;
use crate::store::RecordStore;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct StatusArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "litref.yaml")]
    pub config: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub title: String,
    pub citations: usize,
    pub verified: usize,
    pub queries: usize,
    pub decisions: usize,
    pub files: Vec<FileStatus>,
}

pub async fn run_status(args: StatusArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    let mut store = RecordStore::new();
    store.load_ledger(&config.outputs.citation_ledger)?;
    let coverage = store.coverage_report();

    let log = ProvenanceLog::load_json(&config.outputs.provenance_log)?;

    let files = [
        &config.outputs.bibliography,
        &config.outputs.citation_ledger,
        &config.outputs.main_tex,
        &config.outputs.main_md,
        &config.outputs.queries_log,
        &config.outputs.provenance_log,
    ]
    .into_iter()
    .map(|path| FileStatus {
        path: path.clone(),
        exists: Path::new(path).exists(),
    })
    .collect();

    let output = StatusOutput {
        title: config.review.title.clone(),
        citations: coverage.total_citations,
        verified: coverage.verified_count,
        queries: log.queries.len(),
        decisions: log.decisions.len(),
        files,
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
