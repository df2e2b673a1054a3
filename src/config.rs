//! Project configuration loaded from litref.yaml
//!
//! Every section carries defaults so a partial file still loads.

use crate::verify::{VerifyConfig, DOI_RESOLVER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub citations: CitationConfig,
    #[serde(default)]
    pub outputs: OutputConfig,
    #[serde(default)]
    pub literature_search: SearchConfig,
    #[serde(default)]
    pub latex: LatexConfig,
}

/// Review document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub title: String,
    #[serde(default)]
    pub short_title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            title: "Untitled Literature Review".to_string(),
            short_title: String::new(),
            authors: Vec::new(),
            abstract_text: String::new(),
        }
    }
}

/// Verification engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationConfig {
    #[serde(default = "default_timeout_seconds")]
    pub verification_timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_verification_retries: u32,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            verification_timeout_seconds: default_timeout_seconds(),
            max_verification_retries: default_max_retries(),
        }
    }
}

/// Output file paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub bibliography: String,
    pub citation_ledger: String,
    pub main_tex: String,
    pub main_md: String,
    pub queries_log: String,
    pub provenance_log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bibliography: "references.bib".to_string(),
            citation_ledger: "citation_ledger.json".to_string(),
            main_tex: "review.tex".to_string(),
            main_md: "review.md".to_string(),
            queries_log: "queries.md".to_string(),
            provenance_log: "provenance.json".to_string(),
        }
    }
}

/// Search queries and screening criteria for the provenance report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub ads_queries: Vec<String>,
    #[serde(default)]
    pub inclusion_criteria: Vec<String>,
    #[serde(default)]
    pub exclusion_criteria: Vec<String>,
}

/// LaTeX output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexConfig {
    pub document_class: String,
    pub class_options: String,
    pub bibliography_style: String,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            class_options: "11pt".to_string(),
            bibliography_style: "plainnat".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Map the citations section onto engine settings
    pub fn verify_config(&self) -> VerifyConfig {
        VerifyConfig {
            timeout: Duration::from_secs(self.citations.verification_timeout_seconds),
            max_retries: self.citations.max_verification_retries,
            doi_resolver: DOI_RESOLVER.to_string(),
            ..VerifyConfig::default()
        }
    }

    /// Starter configuration written by `litref init`
    pub fn starter() -> Self {
        Self {
            review: ReviewConfig {
                title: "My Literature Review".to_string(),
                short_title: "Review".to_string(),
                authors: vec!["First Author".to_string()],
                abstract_text: "One-paragraph abstract of the review.".to_string(),
            },
            literature_search: SearchConfig {
                ads_queries: vec!["title:\"example topic\" year:2000-2026".to_string()],
                inclusion_criteria: vec!["Peer-reviewed or arXiv-posted".to_string()],
                exclusion_criteria: vec!["Off-topic or superseded".to_string()],
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_loads_with_defaults() {
        let yaml = "review:\n  title: Test Review\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.review.title, "Test Review");
        assert_eq!(config.citations.verification_timeout_seconds, 10);
        assert_eq!(config.citations.max_verification_retries, 3);
        assert_eq!(config.outputs.bibliography, "references.bib");
    }

    #[test]
    fn test_citations_section_overrides() {
        let yaml = "citations:\n  verification_timeout_seconds: 5\n  max_verification_retries: 1\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let vc = config.verify_config();
        assert_eq!(vc.timeout, Duration::from_secs(5));
        assert_eq!(vc.max_retries, 1);
        assert_eq!(vc.doi_resolver, DOI_RESOLVER);
    }

    #[test]
    fn test_starter_round_trip() {
        let yaml = serde_yaml::to_string(&Config::starter()).unwrap();
        assert!(yaml.contains("abstract:"));
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.review.title, "My Literature Review");
        assert_eq!(parsed.literature_search.ads_queries.len(), 1);
    }
}
