//! Search-query and inclusion-decision provenance log
//!
//! Independent of the record store: its own JSON persistence keyed by
//! citekey, plus a Markdown audit report.

use crate::config::SearchConfig;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A single literature search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query_string: String,
    pub database: String,
    pub timestamp: String,
    #[serde(default)]
    pub num_results: usize,
    #[serde(default)]
    pub included_count: usize,
    #[serde(default)]
    pub excluded_count: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Screening outcome for one paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Included,
    Excluded,
    Pending,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Included => write!(f, "included"),
            Decision::Excluded => write!(f, "excluded"),
            Decision::Pending => write!(f, "pending"),
        }
    }
}

/// An inclusion/exclusion decision for a paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionDecision {
    pub citekey: String,
    pub title: String,
    pub decision: Decision,
    pub rationale: String,
    #[serde(default)]
    pub criteria_met: Vec<String>,
    #[serde(default)]
    pub criteria_failed: Vec<String>,
    pub timestamp: String,
    #[serde(default = "default_reviewer")]
    pub reviewed_by: String,
}

fn default_reviewer() -> String {
    "automated".to_string()
}

/// Queries and decisions, persisted separately from the record ledger
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProvenanceLog {
    #[serde(default)]
    pub queries: Vec<SearchQuery>,
    #[serde(default)]
    pub decisions: BTreeMap<String, InclusionDecision>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_query(&mut self, query: SearchQuery) {
        self.queries.push(query);
    }

    pub fn add_decision(&mut self, decision: InclusionDecision) {
        self.decisions.insert(decision.citekey.clone(), decision);
    }

    /// Load from JSON; a missing file logs and starts empty
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!("Provenance log {} not found, starting fresh", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Render the Markdown audit report: criteria, queries, decision summary
    pub fn markdown_report(&self, search: &SearchConfig) -> String {
        let mut lines = vec![
            "# Literature Search Queries and Provenance".to_string(),
            String::new(),
            format!("*Generated: {}*", Utc::now().to_rfc3339()),
            String::new(),
            "## Inclusion/Exclusion Criteria".to_string(),
            String::new(),
            "### Inclusion Criteria".to_string(),
        ];
        for criterion in &search.inclusion_criteria {
            lines.push(format!("- {}", criterion));
        }
        lines.push(String::new());
        lines.push("### Exclusion Criteria".to_string());
        for criterion in &search.exclusion_criteria {
            lines.push(format!("- {}", criterion));
        }
        lines.push(String::new());

        lines.push("## Search Queries".to_string());
        lines.push(String::new());
        for (i, query) in self.queries.iter().enumerate() {
            lines.push(format!("### Query {}: {}", i + 1, query.database));
            lines.push(String::new());
            lines.push(format!("**Query String:** `{}`", query.query_string));
            lines.push(String::new());
            lines.push(format!("**Timestamp:** {}", query.timestamp));
            lines.push(String::new());
            lines.push(format!(
                "**Results:** {} total, {} included, {} excluded",
                query.num_results, query.included_count, query.excluded_count
            ));
            if !query.notes.is_empty() {
                lines.push(String::new());
                lines.push(format!("**Notes:** {}", query.notes));
            }
            lines.push(String::new());
        }

        lines.push("## Inclusion Decisions Summary".to_string());
        lines.push(String::new());
        let count = |d: Decision| self.decisions.values().filter(|x| x.decision == d).count();
        lines.push(format!("- **Total Papers Reviewed:** {}", self.decisions.len()));
        lines.push(format!("- **Included:** {}", count(Decision::Included)));
        lines.push(format!("- **Excluded:** {}", count(Decision::Excluded)));
        lines.push(format!("- **Pending Review:** {}", count(Decision::Pending)));
        lines.push(String::new());

        let excluded: Vec<&InclusionDecision> = self
            .decisions
            .values()
            .filter(|d| d.decision == Decision::Excluded)
            .collect();
        if !excluded.is_empty() {
            lines.push("### Common Exclusion Reasons".to_string());
            lines.push(String::new());
            let mut reason_counts: BTreeMap<&str, usize> = BTreeMap::new();
            for decision in &excluded {
                *reason_counts.entry(decision.rationale.as_str()).or_default() += 1;
            }
            let mut reasons: Vec<(&str, usize)> = reason_counts.into_iter().collect();
            reasons.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
            for (reason, count) in reasons {
                lines.push(format!("- {}: {} papers", reason, count));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// Seed one query per configured ADS search string
pub fn default_queries(search: &SearchConfig) -> Vec<SearchQuery> {
    let timestamp = Utc::now().to_rfc3339();
    search
        .ads_queries
        .iter()
        .map(|query_string| SearchQuery {
            query_string: query_string.clone(),
            database: "NASA/ADS".to_string(),
            timestamp: timestamp.clone(),
            num_results: 0,
            included_count: 0,
            excluded_count: 0,
            notes: "Default query from configuration".to_string(),
        })
        .collect()
}
