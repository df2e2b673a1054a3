//! Bibliographic record schema
//!
//! One Record per citable work: descriptive metadata, external identifiers,
//! and the verification state written back by the verify engine.

use serde::{Deserialize, Serialize};

/// A single bibliographic entry with verification state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique short identifier; primary key of the store
    pub citekey: String,
    /// Work title
    pub title: String,
    /// Ordered author list
    pub authors: Vec<String>,
    /// Four-digit year, 0 when unknown
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    /// ADS bibcode (e.g. "1977A&A....54..661T")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ads_bibcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
    /// ADS abstract page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ads_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_url: Option<String>,
    /// ISO datetime of last verification pass (null if never)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<String>,
    /// Last observed HTTP status for the ADS URL; 0 means checked, no response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_ads: Option<u16>,
    /// Last observed HTTP status for the DOI resolver; 0 means checked, no response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_doi: Option<u16>,
    /// Reserved for future Crossref cross-checking; never set by verification
    #[serde(default)]
    pub crossref_match: bool,
    /// Reserved for future ADS cross-checking; never set by verification
    #[serde(default)]
    pub ads_match: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Cached BibTeX rendering; when non-empty it is emitted verbatim
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bibtex_entry: String,
}

impl Record {
    /// Create a record with the required descriptive fields
    pub fn new(
        citekey: impl Into<String>,
        title: impl Into<String>,
        authors: Vec<String>,
        year: i32,
    ) -> Self {
        Self {
            citekey: citekey.into(),
            title: title.into(),
            authors,
            year,
            journal: None,
            ads_bibcode: None,
            doi: None,
            arxiv_id: None,
            ads_url: None,
            publisher_url: None,
            last_verified: None,
            http_status_ads: None,
            http_status_doi: None,
            crossref_match: false,
            ads_match: false,
            notes: String::new(),
            bibtex_entry: String::new(),
        }
    }

    /// True when citekey, title, authors, and year are all populated
    pub fn is_metadata_complete(&self) -> bool {
        !self.citekey.is_empty() && !self.title.is_empty() && !self.authors.is_empty() && self.year != 0
    }
}
