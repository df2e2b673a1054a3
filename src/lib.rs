//! litref: literature-review bibliography toolkit
//!
//! Maintains a citekey-indexed record store, verifies that external
//! identifiers (ADS URLs, DOIs) resolve to live resources, collapses
//! duplicate records, and emits the BibTeX bibliography plus the review
//! documents around it.

pub mod bibtex;
pub mod config;
pub mod dedup;
pub mod generate;
pub mod init;
pub mod provenance;
pub mod record;
pub mod review;
pub mod status;
pub mod store;
pub mod verify;

pub use config::Config;
pub use dedup::{completeness, deduplicate};
pub use provenance::{Decision, InclusionDecision, ProvenanceLog, SearchQuery};
pub use record::Record;
pub use review::{Document, Section};
pub use store::{CoverageReport, RecordStore};
pub use verify::{UrlCheck, Verifier, VerifyConfig, VerifyOutcome, VerifyPatch, VerifyReport};
