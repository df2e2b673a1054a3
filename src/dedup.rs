//! dedup command: Collapse records that denote the same work
//!
//! Equality is exact (lowercased, trimmed title, year) - no fuzzy matching.
//! Within a group the record with the highest completeness score survives;
//! ties keep the earliest-inserted record.

use crate::config::Config;
use crate::record::Record;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Args)]
pub struct DedupArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "litref.yaml")]
    pub config: PathBuf,

    /// Dry run - report duplicates without writing the ledger back
    #[arg(long)]
    pub dry_run: bool,
}

/// Weighted count of populated high-value identifier fields
pub fn completeness(record: &Record) -> u32 {
    let mut score = 0;
    if record.ads_bibcode.is_some() {
        score += 3;
    }
    if record.doi.is_some() {
        score += 2;
    }
    if record.arxiv_id.is_some() {
        score += 1;
    }
    if record.journal.is_some() {
        score += 1;
    }
    if !record.bibtex_entry.is_empty() {
        score += 2;
    }
    score
}

fn equality_key(record: &Record) -> (String, i32) {
    (record.title.trim().to_lowercase(), record.year)
}

/// Remove duplicate records from the store, returning the removed citekeys in
/// store order. Groups records by equality key, then keeps the group maximum
/// by completeness score; on equal scores the earliest-inserted record wins.
pub fn deduplicate(store: &mut RecordStore) -> Vec<String> {
    let mut winners: HashMap<(String, i32), (String, u32)> = HashMap::new();

    for record in store.iter() {
        let key = equality_key(record);
        let score = completeness(record);
        match winners.get(&key) {
            // Earlier record wins ties
            Some((_, best)) if *best >= score => {}
            _ => {
                winners.insert(key, (record.citekey.clone(), score));
            }
        }
    }

    let removed: Vec<String> = store
        .iter()
        .filter(|r| winners[&equality_key(r)].0 != r.citekey)
        .map(|r| r.citekey.clone())
        .collect();

    for citekey in &removed {
        store.remove(citekey);
    }
    removed
}

/// Output for JSON
#[derive(Debug, Serialize)]
pub struct DedupOutput {
    pub removed: Vec<String>,
    pub remaining: usize,
    pub ledger: String,
    pub timestamp: String,
}

pub async fn run_dedup(args: DedupArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let mut store = RecordStore::new();
    store.load_ledger(&config.outputs.citation_ledger)?;

    eprintln!("Scanning {} citations for duplicates...", store.len());
    let removed = deduplicate(&mut store);
    eprintln!("Removed {} duplicate(s)", removed.len());

    if !args.dry_run {
        store
            .save_ledger(&config.outputs.citation_ledger)
            .with_context(|| format!("Failed to write {}", config.outputs.citation_ledger))?;
    } else {
        eprintln!("Dry run - ledger not modified");
    }

    let output = DedupOutput {
        removed,
        remaining: store.len(),
        ledger: config.outputs.citation_ledger.clone(),
        timestamp: Utc::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(citekey: &str, title: &str, year: i32) -> Record {
        Record::new(citekey, title, vec!["A. Author".to_string()], year)
    }

    #[test]
    fn test_completeness_weights() {
        let mut rec = record("k", "T", 2020);
        assert_eq!(completeness(&rec), 0);
        rec.ads_bibcode = Some("bibcode".to_string());
        rec.doi = Some("10.1/x".to_string());
        rec.arxiv_id = Some("2101.00001".to_string());
        rec.journal = Some("J".to_string());
        rec.bibtex_entry = "@article{k,...}".to_string();
        assert_eq!(completeness(&rec), 9);
    }

    #[test]
    fn test_higher_score_survives() {
        let mut store = RecordStore::new();
        let mut rich = record("rich", "Same Title", 2020);
        rich.ads_bibcode = Some("b".to_string());
        rich.doi = Some("d".to_string());
        let mut poor = record("poor", "Same Title", 2020);
        poor.arxiv_id = Some("a".to_string());

        store.insert(rich);
        store.insert(poor);
        let removed = deduplicate(&mut store);
        assert_eq!(removed, vec!["poor"]);
        assert_eq!(store.len(), 1);
        assert!(store.get("rich").is_some());
    }

    #[test]
    fn test_later_richer_record_replaces_earlier() {
        let mut store = RecordStore::new();
        let poor = record("poor", "Same Title", 2020);
        let mut rich = record("rich", "Same Title", 2020);
        rich.ads_bibcode = Some("b".to_string());

        store.insert(poor);
        store.insert(rich);
        let removed = deduplicate(&mut store);
        assert_eq!(removed, vec!["poor"]);
        assert!(store.get("rich").is_some());
    }

    #[test]
    fn test_tie_keeps_earliest() {
        let mut store = RecordStore::new();
        store.insert(record("first", "Same Title", 2020));
        store.insert(record("second", "Same Title", 2020));
        let removed = deduplicate(&mut store);
        assert_eq!(removed, vec!["second"]);
        assert!(store.get("first").is_some());
    }

    #[test]
    fn test_title_folding() {
        let mut store = RecordStore::new();
        store.insert(record("a", "A New Method", 1977));
        store.insert(record("b", "  a new method  ", 1977));
        let removed = deduplicate(&mut store);
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn test_different_years_are_not_duplicates() {
        let mut store = RecordStore::new();
        store.insert(record("a", "Same Title", 1977));
        store.insert(record("b", "Same Title", 1978));
        let removed = deduplicate(&mut store);
        assert!(removed.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let mut store = RecordStore::new();
        store.insert(record("a", "Same Title", 2020));
        store.insert(record("b", "Same Title", 2020));
        store.insert(record("c", "Other Title", 2020));

        let first = deduplicate(&mut store);
        assert_eq!(first.len(), 1);
        let second = deduplicate(&mut store);
        assert!(second.is_empty());
    }

    #[test]
    fn test_three_way_group_keeps_single_maximum() {
        let mut store = RecordStore::new();
        store.insert(record("low", "Same Title", 2020));
        let mut mid = record("mid", "Same Title", 2020);
        mid.journal = Some("J".to_string());
        store.insert(mid);
        let mut high = record("high", "Same Title", 2020);
        high.ads_bibcode = Some("b".to_string());
        store.insert(high);

        let removed = deduplicate(&mut store);
        assert_eq!(removed, vec!["low", "mid"]);
        assert_eq!(store.citekeys(), vec!["high"]);
    }
}
