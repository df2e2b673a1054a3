//! verify command: Check that citation identifiers resolve to live resources
//!
//! Each record's ADS URL and DOI resolver URL get a HEAD existence check with
//! bounded retry. The engine returns an immutable report plus a field patch;
//! the store applies the patch, so the engine never mutates shared state.

use crate::config::Config;
use crate::record::Record;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Canonical DOI resolver base
pub const DOI_RESOLVER: &str = "https://doi.org";

#[derive(Args)]
pub struct VerifyArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "litref.yaml")]
    pub config: PathBuf,

    /// Verify a single citation by citekey
    #[arg(long)]
    pub citekey: Option<String>,

    /// Dry run - don't write the ledger back
    #[arg(long)]
    pub dry_run: bool,
}

/// Tuning knobs for the verification engine
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Total attempts per URL; transport faults consume one attempt each
    pub max_retries: u32,
    /// Sleep between failed attempts
    pub retry_backoff: Duration,
    /// Sleep between records during a batch pass (informal ADS rate limit)
    pub rate_limit: Duration,
    /// DOI resolver base URL
    pub doi_resolver: String,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            rate_limit: Duration::from_millis(500),
            doi_resolver: DOI_RESOLVER.to_string(),
        }
    }
}

/// Outcome of one URL existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    pub live: bool,
    /// HTTP status; 0 means no response (transport failure or timeout)
    pub status: u16,
}

/// Per-record verification report
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub ads_url_valid: bool,
    pub doi_url_valid: bool,
    pub metadata_complete: bool,
}

/// Field updates produced by a verification pass; applied by the store
#[derive(Debug, Clone, Default)]
pub struct VerifyPatch {
    pub http_status_ads: Option<u16>,
    pub http_status_doi: Option<u16>,
    pub publisher_url: Option<String>,
    pub last_verified: String,
}

/// Result of verifying one citekey
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum VerifyOutcome {
    NotFound,
    Checked(VerifyReport),
}

/// HEAD-request verifier with bounded retry
pub struct Verifier {
    client: reqwest::Client,
    pub config: VerifyConfig,
}

impl Verifier {
    pub fn new(config: VerifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("litref/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Check that a URL resolves, retrying transport failures up to
    /// `max_retries` attempts with a fixed backoff. Any HTTP response ends the
    /// loop; only transport faults are retried.
    pub async fn verify_url(&self, url: &str) -> UrlCheck {
        if Url::parse(url).is_err() {
            return UrlCheck { live: false, status: 0 };
        }

        for attempt in 1..=self.config.max_retries {
            match self.client.head(url).timeout(self.config.timeout).send().await {
                Ok(response) => {
                    let status = response.status();
                    return UrlCheck {
                        live: status.is_success(),
                        status: status.as_u16(),
                    };
                }
                Err(_) if attempt == self.config.max_retries => break,
                Err(_) => tokio::time::sleep(self.config.retry_backoff).await,
            }
        }

        UrlCheck { live: false, status: 0 }
    }

    /// Verify one record's identifiers without touching it.
    ///
    /// The returned patch carries observed HTTP statuses, the synthesized DOI
    /// resolver URL (which supersedes any stored publisher URL), and the
    /// verification timestamp. The timestamp is stamped even when the record
    /// has no URLs to check.
    pub async fn verify_record(&self, record: &Record) -> (VerifyReport, VerifyPatch) {
        let mut report = VerifyReport::default();
        let mut patch = VerifyPatch::default();

        if let Some(ads_url) = &record.ads_url {
            let check = self.verify_url(ads_url).await;
            report.ads_url_valid = check.live;
            patch.http_status_ads = Some(check.status);
        }

        if let Some(doi) = &record.doi {
            let doi_url = format!("{}/{}", self.config.doi_resolver, doi);
            let check = self.verify_url(&doi_url).await;
            report.doi_url_valid = check.live;
            patch.http_status_doi = Some(check.status);
            patch.publisher_url = Some(doi_url);
        }

        report.metadata_complete = record.is_metadata_complete();
        patch.last_verified = Utc::now().to_rfc3339();

        (report, patch)
    }
}

/// Output for JSON
#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub results: Vec<(String, VerifyOutcome)>,
    pub coverage: crate::store::CoverageReport,
    pub ledger: String,
    pub timestamp: String,
}

pub async fn run_verify(args: VerifyArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let mut store = RecordStore::new();
    store.load_ledger(&config.outputs.citation_ledger)?;

    if store.is_empty() {
        eprintln!("No citations to verify.");
    }

    let verifier = Verifier::new(config.verify_config())?;

    let results = match &args.citekey {
        Some(citekey) => {
            eprintln!("Verifying {}...", citekey);
            let outcome = store.verify_citation(&verifier, citekey).await;
            vec![(citekey.clone(), outcome)]
        }
        None => {
            eprintln!("Verifying {} citations...", store.len());
            store.verify_all(&verifier).await
        }
    };

    let coverage = store.coverage_report();

    if !args.dry_run {
        store
            .save_ledger(&config.outputs.citation_ledger)
            .with_context(|| format!("Failed to write {}", config.outputs.citation_ledger))?;
        eprintln!("Updated {}", config.outputs.citation_ledger);
    } else {
        eprintln!("Dry run - ledger not modified");
    }

    let output = VerifyOutput {
        results,
        coverage,
        ledger: config.outputs.citation_ledger.clone(),
        timestamp: Utc::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}
