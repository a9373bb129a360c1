use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::{ResolveError, Result};

/// Extract the text of every page, in page order.
///
/// A whole-file load failure is an error; a single page that fails to
/// extract is skipped, so one damaged page never hides the rest of the
/// document.
pub fn page_texts(path: &Path) -> Result<Vec<String>> {
    extract_texts(path, usize::MAX)
}

/// Extract the text of the first `max_pages` pages, in page order.
pub fn leading_page_texts(path: &Path, max_pages: usize) -> Result<Vec<String>> {
    extract_texts(path, max_pages)
}

fn extract_texts(path: &Path, max_pages: usize) -> Result<Vec<String>> {
    if max_pages == 0 {
        return Ok(Vec::new());
    }

    let document = Document::load(path).map_err(|err| {
        ResolveError::PdfExtraction(format!("failed to open {}: {err}", path.display()))
    })?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().take(max_pages).collect();
    let mut texts = Vec::with_capacity(page_numbers.len());
    for number in page_numbers {
        match document.extract_text(&[number]) {
            Ok(text) => texts.push(text),
            Err(err) => debug!("skipping page {number} of {}: {err}", path.display()),
        }
    }

    Ok(texts)
}

/// Document-information strings worth scanning for identifiers.
///
/// Best-effort: an unreadable file yields an empty list.
pub fn document_info_strings(path: &Path) -> Vec<String> {
    let Ok(metadata) = Document::load_metadata(path) else {
        return Vec::new();
    };

    [
        metadata.title,
        metadata.author,
        metadata.creation_date,
        metadata.modification_date,
    ]
    .into_iter()
    .flatten()
    .filter(|value| !value.trim().is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = page_texts(&path).unwrap_err();
        assert!(matches!(err, ResolveError::PdfExtraction(_)));
    }

    #[test]
    fn unreadable_file_has_no_info_strings() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"junk").unwrap();

        assert!(document_info_strings(&path).is_empty());
    }

    #[test]
    fn zero_pages_requested_is_empty() {
        // No file access happens when the caller asks for nothing.
        let texts = leading_page_texts(Path::new("/nonexistent.pdf"), 0).unwrap();
        assert!(texts.is_empty());
    }
}
