use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("service unavailable: {url} returned HTTP {status}")]
    ServiceUnavailable { url: String, status: u16 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
