//! BibTeX codec: generate entry text from records and parse entry blocks back
//!
//! Pure and stateless. Parsing is best-effort for the flat `key={value}` entry
//! shape only; a parsed record caches the original block verbatim so that
//! regeneration reproduces the input byte-for-byte.

use crate::record::Record;
use regex::Regex;

/// Generate the BibTeX entry for a record.
///
/// A non-empty cached `bibtex_entry` is returned verbatim; otherwise the entry
/// is synthesized field by field. Absent fields are omitted, never emitted
/// empty.
pub fn generate(record: &Record) -> String {
    if !record.bibtex_entry.is_empty() {
        return record.bibtex_entry.clone();
    }

    let entry_type = if record.journal.is_some() { "article" } else { "misc" };

    let mut lines = vec![format!("@{}{{{},", entry_type, record.citekey)];
    lines.push(format!("  title={{{}}},", record.title));
    lines.push(format!("  author={{{}}},", record.authors.join(" and ")));
    lines.push(format!("  year={{{}}},", record.year));

    if let Some(journal) = &record.journal {
        lines.push(format!("  journal={{{}}},", journal));
    }
    if let Some(doi) = &record.doi {
        lines.push(format!("  doi={{{}}},", doi));
    }
    if let Some(arxiv_id) = &record.arxiv_id {
        lines.push(format!("  eprint={{{}}},", arxiv_id));
        lines.push("  archivePrefix={arXiv},".to_string());
    }
    if record.ads_url.is_some() || record.ads_bibcode.is_some() {
        let adsurl = record.ads_url.clone().unwrap_or_else(|| {
            // ads_bibcode must be present on this branch
            format!(
                "https://ui.adsabs.harvard.edu/abs/{}",
                record.ads_bibcode.as_deref().unwrap_or_default()
            )
        });
        lines.push(format!("  adsurl={{{}}},", adsurl));
    }
    if let Some(publisher_url) = &record.publisher_url {
        lines.push(format!("  url={{{}}},", publisher_url));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// Parse one BibTeX entry block into a record.
///
/// Returns `None` when the head line does not match `@<kind>{<citekey>,` or
/// when citekey, title, authors, or year are missing after field extraction.
/// Unrecognized keys are ignored. On success the original block is cached in
/// `bibtex_entry`.
pub fn parse(block: &str) -> Option<Record> {
    let mut lines = block.trim().lines();
    let head = lines.next()?;

    let head_re = Regex::new(r"^@\w+\{([^,]+),").unwrap();
    let citekey = head_re.captures(head.trim())?.get(1)?.as_str().to_string();

    let mut title = String::new();
    let mut authors: Vec<String> = Vec::new();
    let mut year = 0;
    let mut journal = None;
    let mut doi = None;
    let mut arxiv_id = None;

    for line in lines {
        let line = line.trim().trim_end_matches(',');
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value
            .trim()
            .trim_matches(|c| c == '{' || c == '}')
            .trim_matches('"');

        match key {
            "title" => title = value.to_string(),
            "author" => {
                authors = value
                    .split(" and ")
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect();
            }
            // Unparseable years leave the 0 sentinel rather than aborting
            "year" => year = value.parse().unwrap_or(0),
            "journal" => journal = Some(value.to_string()),
            "doi" => doi = Some(value.to_string()),
            "eprint" => arxiv_id = Some(value.to_string()),
            _ => {}
        }
    }

    if citekey.is_empty() || title.is_empty() || authors.is_empty() || year == 0 {
        return None;
    }

    let mut record = Record::new(citekey, title, authors, year);
    record.journal = journal;
    record.doi = doi;
    record.arxiv_id = arxiv_id;
    record.bibtex_entry = block.to_string();
    Some(record)
}

/// Split a bibliography file into individual entry blocks.
///
/// An entry starts at a line beginning with `@` and ends at the first line
/// that is exactly `}`. Text between entries is discarded.
pub fn split_entries(content: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_entry = false;

    for line in content.lines() {
        if line.trim_start().starts_with('@') {
            if !current.is_empty() {
                entries.push(current.join("\n"));
            }
            current = vec![line];
            in_entry = true;
        } else if in_entry {
            current.push(line);
            if line.trim() == "}" {
                in_entry = false;
            }
        }
    }

    if !current.is_empty() {
        entries.push(current.join("\n"));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tully() -> Record {
        let mut rec = Record::new(
            "tully1977new",
            "A New Method of Determining Distances to Galaxies",
            vec!["R. Brent Tully".to_string(), "J. Richard Fisher".to_string()],
            1977,
        );
        rec.journal = Some("Astronomy and Astrophysics".to_string());
        rec.ads_bibcode = Some("1977A&A....54..661T".to_string());
        rec
    }

    #[test]
    fn test_generate_article() {
        let entry = generate(&tully());
        assert!(entry.starts_with("@article{tully1977new,"));
        assert!(entry.contains("title={A New Method of Determining Distances to Galaxies},"));
        assert!(entry.contains("author={R. Brent Tully and J. Richard Fisher},"));
        assert!(entry.contains("year={1977},"));
        assert!(entry.contains("journal={Astronomy and Astrophysics},"));
        // adsurl falls back to the canonical URL built from the bibcode
        assert!(entry.contains("adsurl={https://ui.adsabs.harvard.edu/abs/1977A&A....54..661T},"));
        assert!(entry.ends_with('}'));
    }

    #[test]
    fn test_generate_misc_without_journal() {
        let rec = Record::new("note2020", "Some Note", vec!["A. Author".to_string()], 2020);
        let entry = generate(&rec);
        assert!(entry.starts_with("@misc{note2020,"));
        assert!(!entry.contains("journal"));
        assert!(!entry.contains("adsurl"));
        assert!(!entry.contains("url="));
    }

    #[test]
    fn test_generate_eprint_fields() {
        let mut rec = Record::new("smith2021", "Paper", vec!["S. Smith".to_string()], 2021);
        rec.arxiv_id = Some("2101.01234".to_string());
        let entry = generate(&rec);
        assert!(entry.contains("eprint={2101.01234},"));
        assert!(entry.contains("archivePrefix={arXiv},"));
    }

    #[test]
    fn test_generate_prefers_stored_ads_url() {
        let mut rec = tully();
        rec.ads_url = Some("https://ui.adsabs.harvard.edu/abs/custom".to_string());
        let entry = generate(&rec);
        assert!(entry.contains("adsurl={https://ui.adsabs.harvard.edu/abs/custom},"));
    }

    #[test]
    fn test_generate_cached_entry_verbatim() {
        let mut rec = tully();
        rec.bibtex_entry = "@article{tully1977new,\n  title={Cached},\n}".to_string();
        assert_eq!(generate(&rec), rec.bibtex_entry);
    }

    #[test]
    fn test_parse_round_trip_fields() {
        let entry = generate(&tully());
        let parsed = parse(&entry).unwrap();
        assert_eq!(parsed.citekey, "tully1977new");
        assert_eq!(parsed.title, "A New Method of Determining Distances to Galaxies");
        assert_eq!(parsed.authors.len(), 2);
        assert_eq!(parsed.authors[1], "J. Richard Fisher");
        assert_eq!(parsed.year, 1977);
        assert_eq!(parsed.journal.as_deref(), Some("Astronomy and Astrophysics"));
    }

    #[test]
    fn test_parse_caches_input_verbatim() {
        let entry = generate(&tully());
        let parsed = parse(&entry).unwrap();
        assert_eq!(parsed.bibtex_entry, entry);
        // Regeneration must reproduce the input exactly
        assert_eq!(generate(&parsed), entry);
    }

    #[test]
    fn test_parse_quoted_values() {
        let entry = "@article{q2020,\n  title=\"Quoted Title\",\n  author=\"One Author\",\n  year=\"2020\",\n}";
        let parsed = parse(entry).unwrap();
        assert_eq!(parsed.title, "Quoted Title");
        assert_eq!(parsed.year, 2020);
    }

    #[test]
    fn test_parse_maps_eprint_to_arxiv() {
        let entry = "@misc{e2021,\n  title={T},\n  author={A},\n  year={2021},\n  eprint={2101.01234},\n  archivePrefix={arXiv},\n}";
        let parsed = parse(entry).unwrap();
        assert_eq!(parsed.arxiv_id.as_deref(), Some("2101.01234"));
    }

    #[test]
    fn test_parse_rejects_bad_head() {
        assert!(parse("not an entry at all").is_none());
        assert!(parse("@article missing brace").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_required_fields() {
        // No author
        assert!(parse("@article{k,\n  title={T},\n  year={2020},\n}").is_none());
        // Year not a number leaves the 0 sentinel, which fails validation
        assert!(parse("@article{k,\n  title={T},\n  author={A},\n  year={next year},\n}").is_none());
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let entry = "@article{k,\n  title={T},\n  author={A},\n  year={2020},\n  volume={54},\n}";
        let parsed = parse(entry).unwrap();
        assert_eq!(parsed.title, "T");
    }

    #[test]
    fn test_split_entries() {
        let content = "@article{a,\n  title={A},\n}\n\n@misc{b,\n  title={B},\n}\n";
        let entries = split_entries(content);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("@article{a,"));
        assert!(entries[0].ends_with('}'));
        assert!(entries[1].starts_with("@misc{b,"));
    }

    #[test]
    fn test_split_entries_skips_leading_text() {
        let content = "% comment line\n\n@misc{only,\n  title={X},\n}";
        let entries = split_entries(content);
        assert_eq!(entries.len(), 1);
    }
}
