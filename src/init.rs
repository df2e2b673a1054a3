//! init command: Create a starter litref.yaml and seed the provenance log

use crate::config::Config;
use crate::provenance::{default_queries, ProvenanceLog};
use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Configuration file to create
    #[arg(short, long, default_value = "litref.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub created: String,
    pub config: String,
    pub provenance_log: String,
    pub seeded_queries: usize,
}

pub async fn run_init(args: InitArgs) -> Result<()> {
    if args.config.exists() && !args.force {
        let error = serde_json::json!({
            "error": "file_exists",
            "message": format!("{} already exists. Use --force to overwrite.", args.config.display()),
            "file": args.config.display().to_string()
        });
        println!("{}", serde_json::to_string(&error)?);
        bail!("File exists");
    }

    let config = Config::starter();
    let yaml = serde_yaml::to_string(&config)?;
    tokio::fs::write(&args.config, yaml).await?;

    let mut log = ProvenanceLog::new();
    for query in default_queries(&config.literature_search) {
        log.add_query(query);
    }
    log.save_json(&config.outputs.provenance_log)?;

    eprintln!(
        "Initialized {} with {} default quer{}",
        args.config.display(),
        log.queries.len(),
        if log.queries.len() == 1 { "y" } else { "ies" }
    );

    let output = InitOutput {
        created: Utc::now().to_rfc3339(),
        config: args.config.display().to_string(),
        provenance_log: config.outputs.provenance_log.clone(),
        seeded_queries: log.queries.len(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
