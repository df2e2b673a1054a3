//! In-memory record store with persisted JSON ledger
//!
//! Keyed by citekey, insertion-ordered. The store owns all records and is the
//! only place verification patches get applied.

use crate::bibtex;
use crate::record::Record;
use crate::verify::{Verifier, VerifyOutcome, VerifyPatch};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Insertion-ordered collection of records, keyed by citekey
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

/// Verification coverage counts across the store
#[derive(Debug, Serialize)]
pub struct CoverageReport {
    pub total_citations: usize,
    pub verified_count: usize,
    pub ads_urls_valid: usize,
    pub doi_urls_valid: usize,
    pub verification_percentage: f64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, citekey: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.citekey == citekey)
    }

    /// Insert a record; a record with the same citekey is replaced in place
    /// (last write wins, position preserved).
    pub fn insert(&mut self, record: Record) {
        match self.records.iter().position(|r| r.citekey == record.citekey) {
            Some(idx) => self.records[idx] = record,
            None => self.records.push(record),
        }
    }

    pub fn remove(&mut self, citekey: &str) -> Option<Record> {
        self.records
            .iter()
            .position(|r| r.citekey == citekey)
            .map(|idx| self.records.remove(idx))
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn citekeys(&self) -> Vec<String> {
        self.records.iter().map(|r| r.citekey.clone()).collect()
    }

    /// Load records from a JSON ledger, overwriting on citekey collision.
    /// A missing ledger is not an error: logs and leaves the store as-is.
    pub fn load_ledger(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!("Ledger {} not found, starting fresh", path.display());
            return Ok(0);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let records: Vec<Record> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ledger {}", path.display()))?;

        let count = records.len();
        for record in records {
            self.insert(record);
        }
        Ok(count)
    }

    /// Write every record's full field set as pretty-printed JSON
    pub fn save_ledger(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Parse BibTeX content into records, skipping malformed blocks.
    /// Returns how many entries were inserted.
    pub fn load_bibtex(&mut self, content: &str) -> usize {
        let mut count = 0;
        for block in bibtex::split_entries(content) {
            if let Some(record) = bibtex::parse(&block) {
                self.insert(record);
                count += 1;
            }
        }
        count
    }

    /// Render the full bibliography, one entry block per record sorted by
    /// (year, citekey), blocks separated by a blank line. Synthesized blocks
    /// are not written back into the records.
    pub fn bibliography(&self) -> String {
        let mut sorted: Vec<&Record> = self.records.iter().collect();
        sorted.sort_by(|a, b| (a.year, &a.citekey).cmp(&(b.year, &b.citekey)));

        let mut out = String::new();
        for record in sorted {
            out.push_str(&bibtex::generate(record));
            out.push_str("\n\n");
        }
        out
    }

    pub fn write_bibliography(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.bibliography())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Verify one citation and apply the resulting patch to its record
    pub async fn verify_citation(&mut self, verifier: &Verifier, citekey: &str) -> VerifyOutcome {
        let Some(record) = self.records.iter().find(|r| r.citekey == citekey) else {
            return VerifyOutcome::NotFound;
        };

        let (report, patch) = verifier.verify_record(record).await;
        self.apply_patch(citekey, patch);
        VerifyOutcome::Checked(report)
    }

    /// Verify every record sequentially in store order, sleeping the
    /// configured rate-limit delay between records.
    pub async fn verify_all(&mut self, verifier: &Verifier) -> Vec<(String, VerifyOutcome)> {
        let mut results = Vec::with_capacity(self.records.len());
        for citekey in self.citekeys() {
            eprintln!("  -> {}", citekey);
            let outcome = self.verify_citation(verifier, &citekey).await;
            results.push((citekey, outcome));
            tokio::time::sleep(verifier.config.rate_limit).await;
        }
        results
    }

    fn apply_patch(&mut self, citekey: &str, patch: VerifyPatch) {
        if let Some(record) = self.records.iter_mut().find(|r| r.citekey == citekey) {
            if patch.http_status_ads.is_some() {
                record.http_status_ads = patch.http_status_ads;
            }
            if patch.http_status_doi.is_some() {
                record.http_status_doi = patch.http_status_doi;
            }
            if patch.publisher_url.is_some() {
                record.publisher_url = patch.publisher_url;
            }
            record.last_verified = Some(patch.last_verified);
        }
    }

    /// Verification coverage counts
    pub fn coverage_report(&self) -> CoverageReport {
        let total = self.records.len();
        let verified = self.records.iter().filter(|r| r.last_verified.is_some()).count();
        let ads_valid = self
            .records
            .iter()
            .filter(|r| matches!(r.http_status_ads, Some(s) if (200..300).contains(&s)))
            .count();
        let doi_valid = self
            .records
            .iter()
            .filter(|r| matches!(r.http_status_doi, Some(s) if (200..300).contains(&s)))
            .count();

        CoverageReport {
            total_citations: total,
            verified_count: verified,
            ads_urls_valid: ads_valid,
            doi_urls_valid: doi_valid,
            verification_percentage: if total > 0 {
                verified as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}
