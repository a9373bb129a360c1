use std::path::Path;

use once_cell::sync::Lazy;
use paperdex_core::InferenceConfig;
use regex::Regex;
use tracing::debug;

use crate::identifiers::doi::Doi;
use crate::pdf;

static DOI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)10\.\d{4,9}/[-._;()/:A-Z0-9]+[A-Z0-9]").expect("valid regex"));

static ARXIV_REGEX_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)arxiv:\s?(\d{4}\.\d{4,5})(?:v\d+)?").expect("valid regex"));

static ARXIV_REGEX_OLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)arxiv:([a-z\-]+(?:\.[A-Z]{2})?/\d{7})").expect("valid regex"));

/// Heuristic identifier inference over a PDF.
///
/// Probes, in order: the document-information strings, then the text of the
/// first `max_pages` pages for a DOI, then the same text for an arXiv id
/// (returned bare, without the `10.48550/arXiv.` registrant — the caller
/// rewrites it via [`Doi::from_inferred`]). Entirely best-effort: every
/// failure collapses to `None`.
pub fn infer_identifier(path: &Path, config: &InferenceConfig) -> Option<String> {
    for value in pdf::document_info_strings(path) {
        if let Some(doi) = first_doi(&value) {
            if config.verbose {
                debug!("found DOI {doi} in document info of {}", path.display());
            }
            return Some(doi);
        }
    }

    let texts = match pdf::leading_page_texts(path, config.max_pages) {
        Ok(texts) => texts,
        Err(err) => {
            if config.verbose {
                debug!("text probe failed for {}: {err}", path.display());
            }
            return None;
        }
    };

    for text in &texts {
        if let Some(doi) = first_doi(text) {
            if config.verbose {
                debug!("found DOI {doi} in page text of {}", path.display());
            }
            return Some(doi);
        }
    }

    for text in &texts {
        if let Some(id) = first_arxiv_id(text) {
            if config.verbose {
                debug!("found arXiv id {id} in page text of {}", path.display());
            }
            return Some(id);
        }
    }

    if config.verbose {
        debug!("no identifier inferred for {}", path.display());
    }
    None
}

fn first_doi(text: &str) -> Option<String> {
    DOI_REGEX
        .find_iter(text)
        .find_map(|m| Doi::parse(m.as_str()).ok())
        .map(|doi| doi.value)
}

fn first_arxiv_id(text: &str) -> Option<String> {
    if let Some(captures) = ARXIV_REGEX_NEW.captures(text) {
        return captures.get(1).map(|m| m.as_str().to_string());
    }
    ARXIV_REGEX_OLD
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_found_in_text() {
        let text = "Published as 10.1038/s41586-021-03819-2 in Nature.";
        assert_eq!(
            first_doi(text),
            Some("10.1038/s41586-021-03819-2".to_string())
        );
    }

    #[test]
    fn no_doi_in_plain_text() {
        assert_eq!(first_doi("An ordinary sentence, version 10.2."), None);
    }

    #[test]
    fn arxiv_new_format_is_bare() {
        let text = "Preprint arXiv:1706.03762v5 [cs.CL]";
        assert_eq!(first_arxiv_id(text), Some("1706.03762".to_string()));
    }

    #[test]
    fn arxiv_old_format_keeps_category() {
        let text = "See arXiv:cs.AI/0601001 for details.";
        assert_eq!(first_arxiv_id(text), Some("cs.AI/0601001".to_string()));
    }

    #[test]
    fn unreadable_pdf_infers_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("junk.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        assert_eq!(infer_identifier(&path, &InferenceConfig::default()), None);
    }
}
