use std::path::Path;

use paperdex_core::{AppConfig, InferenceConfig, Record};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::bibtex;
use crate::error::ResolveError;
use crate::identifiers::{Doi, Isbn, infer_identifier};
use crate::pdf;
use crate::sources::{DoiOrgSource, OpenLibrarySource};

/// Per-file identification and metadata resolution.
///
/// Exactly one resolution path runs per record and the ISBN path takes
/// precedence: when it succeeds, the DOI path is skipped entirely.
/// `resolve` never fails — every error is folded into a log line and a
/// record with fewer fields.
pub struct Resolver {
    openlibrary: OpenLibrarySource,
    doi_org: DoiOrgSource,
    inference: InferenceConfig,
}

impl Resolver {
    pub fn new(config: &AppConfig) -> Self {
        let email = config.resolver.polite_email.as_deref();
        Self {
            openlibrary: OpenLibrarySource::with_base_url(&config.resolver.isbn_base_url, email),
            doi_org: DoiOrgSource::with_base_url(&config.resolver.doi_base_url, email),
            inference: config.inference.clone(),
        }
    }

    pub async fn resolve(&self, pdf_path: &Path, rel_path: &str) -> Record {
        let title = Path::new(rel_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| rel_path.to_string());
        let mut record = Record::new(rel_path, title);

        if let Some(isbn) = self.find_isbn(pdf_path) {
            record.isbn = Some(isbn.isbn13.clone());
            match self.openlibrary.fetch_by_isbn(&isbn).await {
                Ok(meta) => apply_isbn_meta(&mut record, meta),
                Err(ResolveError::NotFound(_)) => {
                    warn!("no metadata for ISBN {} ({rel_path})", isbn.isbn13);
                }
                Err(err) => {
                    warn!("ISBN lookup failed for {rel_path}: {err}");
                }
            }
            return record;
        }

        let Some(identifier) = infer_identifier(pdf_path, &self.inference) else {
            info!("no identifier found in {rel_path}");
            return record;
        };

        let doi = Doi::from_inferred(&identifier);
        record.doi = Some(doi.value.clone());

        match self.doi_org.fetch_bibtex(&doi).await {
            Ok(raw) => match bibtex::parse_entry(&raw) {
                Ok(entry) => {
                    for (key, value) in entry.fields {
                        record.merge_field(&key, Value::String(value));
                    }
                    record
                        .extra
                        .insert("raw_bibtex".to_string(), Value::String(raw));
                }
                Err(err) => warn!("unparseable BibTeX for DOI {doi}: {err}"),
            },
            Err(ResolveError::NotFound(_)) => {
                warn!("DOI {doi} not found on the resolver");
            }
            Err(err) => {
                warn!("metadata service unavailable for DOI {doi}: {err}");
            }
        }

        record
    }

    /// Scan every page's text for the first valid ISBN.
    fn find_isbn(&self, pdf_path: &Path) -> Option<Isbn> {
        let pages = match pdf::page_texts(pdf_path) {
            Ok(pages) => pages,
            Err(err) => {
                debug!("ISBN scan skipped: {err}");
                return None;
            }
        };
        pages.iter().find_map(|text| Isbn::find_in_text(text))
    }
}

/// Fold an ISBN lookup result into the record: `Title` becomes the title,
/// `Authors` joins with `", "` into `author`, `Year` becomes `year`, and
/// every other key is merged in unchanged.
fn apply_isbn_meta(record: &mut Record, meta: Map<String, Value>) {
    for (key, value) in meta {
        match key.as_str() {
            "Title" => {
                if let Value::String(title) = value {
                    record.title = title;
                }
            }
            "Authors" => {
                let joined = value
                    .as_array()
                    .map(|authors| {
                        authors
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                if !joined.is_empty() {
                    record
                        .extra
                        .insert("author".to_string(), Value::String(joined));
                }
            }
            "Year" => {
                record.extra.insert("year".to_string(), value);
            }
            _ => {
                record.extra.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta_of(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn isbn_meta_maps_well_known_keys() {
        let mut record = Record::new("a.pdf", "a.pdf");
        apply_isbn_meta(
            &mut record,
            meta_of(&[
                ("Title", json!("Deep Learning")),
                ("Authors", json!(["Ian Goodfellow", "Yoshua Bengio"])),
                ("Year", json!("2016")),
                ("Publisher", json!("MIT Press")),
            ]),
        );

        assert_eq!(record.title, "Deep Learning");
        assert_eq!(record.extra["author"], json!("Ian Goodfellow, Yoshua Bengio"));
        assert_eq!(record.extra["year"], json!("2016"));
        assert_eq!(record.extra["Publisher"], json!("MIT Press"));
    }

    #[test]
    fn missing_meta_keys_leave_record_untouched() {
        let mut record = Record::new("a.pdf", "a.pdf");
        apply_isbn_meta(&mut record, Map::new());
        assert_eq!(record.title, "a.pdf");
        assert!(record.extra.is_empty());
    }

    #[tokio::test]
    async fn unreadable_pdf_yields_bare_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let pdf_path = dir.path().join("junk.pdf");
        std::fs::write(&pdf_path, b"not a pdf").unwrap();

        // Point both services at closed ports; the resolver must not need them.
        let mut config = AppConfig::default();
        config.resolver.isbn_base_url = "http://127.0.0.1:1".to_string();
        config.resolver.doi_base_url = "http://127.0.0.1:1".to_string();

        let resolver = Resolver::new(&config);
        let record = resolver.resolve(&pdf_path, "junk.pdf").await;

        assert_eq!(record.path, "junk.pdf");
        assert_eq!(record.title, "junk.pdf");
        assert_eq!(record.isbn, None);
        assert_eq!(record.doi, None);
        assert!(record.extra.is_empty());
    }

    #[tokio::test]
    async fn nested_path_title_is_the_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let pdf_path = dir.path().join("b.pdf");
        std::fs::write(&pdf_path, b"junk").unwrap();

        let mut config = AppConfig::default();
        config.resolver.isbn_base_url = "http://127.0.0.1:1".to_string();
        config.resolver.doi_base_url = "http://127.0.0.1:1".to_string();

        let resolver = Resolver::new(&config);
        let record = resolver.resolve(&pdf_path, "b/b.pdf").await;
        assert_eq!(record.path, "b/b.pdf");
        assert_eq!(record.title, "b.pdf");
    }
}
