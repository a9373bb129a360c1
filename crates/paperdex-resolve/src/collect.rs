use std::fs;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use paperdex_core::Record;
use tracing::info;

use crate::error::Result;
use crate::resolver::Resolver;

/// One PDF discovered under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub abs_path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub rel_path: String,
}

/// Default worker-pool size: available CPUs x 4, matching the mostly
/// network-bound shape of the per-file work.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        * 4
}

/// Recursively enumerate `*.pdf` files under `root`, sorted by relative
/// path so the database order is deterministic.
pub fn enumerate_pdfs(root: &Path) -> Result<Vec<PdfFile>> {
    let mut pdfs = Vec::new();
    walk(root, root, &mut pdfs)?;
    pdfs.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(pdfs)
}

fn walk(root: &Path, dir: &Path, pdfs: &mut Vec<PdfFile>) -> Result<()> {
    if !dir.exists() || !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            walk(root, &path, pdfs)?;
        } else if path.is_file() && is_pdf(&path) {
            let rel_path = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            pdfs.push(PdfFile {
                abs_path: path,
                rel_path,
            });
        }
    }

    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Resolve every PDF under `root` through a bounded parallel fan-out.
///
/// Each file is an independent task; up to `concurrency` run at once and
/// the rest queue. Tasks are paired with their input index so the output
/// preserves the sorted enumeration order no matter which resolutions
/// finish first. There is no early exit and no timeout: a slow lookup
/// stalls only its own slot.
pub async fn collect(resolver: &Resolver, root: &Path, concurrency: usize) -> Result<Vec<Record>> {
    let pdfs = enumerate_pdfs(root)?;

    let mut indexed: Vec<(usize, Record)> = futures::stream::iter(pdfs.into_iter().enumerate())
        .map(|(index, pdf)| async move {
            info!("processing {}", pdf.rel_path);
            let record = resolver.resolve(&pdf.abs_path, &pdf.rel_path).await;
            (index, record)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, record)| record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperdex_core::AppConfig;
    use std::fs::File;

    #[test]
    fn enumerates_sorted_relative_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        File::create(dir.path().join("z.pdf")).unwrap();
        File::create(dir.path().join("a.pdf")).unwrap();
        File::create(dir.path().join("b").join("b.pdf")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let pdfs = enumerate_pdfs(dir.path()).unwrap();
        let rels: Vec<&str> = pdfs.iter().map(|p| p.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["a.pdf", "b/b.pdf", "z.pdf"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::TempDir::new().unwrap();
        File::create(dir.path().join("UPPER.PDF")).unwrap();

        let pdfs = enumerate_pdfs(dir.path()).unwrap();
        assert_eq!(pdfs.len(), 1);
    }

    #[test]
    fn missing_root_enumerates_nothing() {
        let pdfs = enumerate_pdfs(Path::new("/nonexistent/papers")).unwrap();
        assert!(pdfs.is_empty());
    }

    #[tokio::test]
    async fn collect_preserves_input_order() {
        let dir = tempfile::TempDir::new().unwrap();
        // Unresolvable stand-ins: each yields a bare record without touching
        // the network, so only ordering is under test here.
        for name in ["c.pdf", "a.pdf", "b.pdf"] {
            std::fs::write(dir.path().join(name), b"junk").unwrap();
        }

        let mut config = AppConfig::default();
        config.resolver.isbn_base_url = "http://127.0.0.1:1".to_string();
        config.resolver.doi_base_url = "http://127.0.0.1:1".to_string();
        let resolver = Resolver::new(&config);

        let records = collect(&resolver, dir.path(), 8).await.unwrap();
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn collect_on_empty_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolver = Resolver::new(&AppConfig::default());
        let records = collect(&resolver, dir.path(), 4).await.unwrap();
        assert!(records.is_empty());
    }
}
