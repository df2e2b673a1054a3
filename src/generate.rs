//! generate command: Emit the bibliography, review documents, and provenance
//! report

use crate::config::Config;
use crate::provenance::ProvenanceLog;
use crate::review::Document;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "litref.yaml")]
    pub config: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub citations: usize,
    pub parsed_from_bibliography: usize,
    pub bibliography: String,
    pub main_tex: String,
    pub main_md: String,
    pub queries_log: String,
    pub timestamp: String,
}

pub async fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    let mut store = RecordStore::new();
    store.load_ledger(&config.outputs.citation_ledger)?;

    // Fold in entries from a hand-edited bibliography file, if present.
    // Malformed blocks are skipped, not fatal.
    let mut parsed = 0;
    let bib_path = Path::new(&config.outputs.bibliography);
    if bib_path.exists() {
        let content = tokio::fs::read_to_string(bib_path)
            .await
            .with_context(|| format!("Failed to read {}", bib_path.display()))?;
        parsed = store.load_bibtex(&content);
        eprintln!("Parsed {} entries from {}", parsed, bib_path.display());
    }

    eprintln!("Writing bibliography ({} citations)...", store.len());
    store.write_bibliography(&config.outputs.bibliography)?;

    let doc = Document::from_config(&config);
    tokio::fs::write(&config.outputs.main_tex, doc.to_latex()).await?;
    tokio::fs::write(&config.outputs.main_md, doc.to_markdown()).await?;

    let log = ProvenanceLog::load_json(&config.outputs.provenance_log)?;
    tokio::fs::write(
        &config.outputs.queries_log,
        log.markdown_report(&config.literature_search),
    )
    .await?;

    let output = GenerateOutput {
        citations: store.len(),
        parsed_from_bibliography: parsed,
        bibliography: config.outputs.bibliography.clone(),
        main_tex: config.outputs.main_tex.clone(),
        main_md: config.outputs.main_md.clone(),
        queries_log: config.outputs.queries_log.clone(),
        timestamp: Utc::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
