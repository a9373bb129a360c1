use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// A DOI of the form `10.<registrant>/<suffix>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doi {
    pub value: String,
}

impl Doi {
    /// Parse a DOI, stripping resolver-URL and `doi:` prefixes.
    ///
    /// Case is preserved: DOI suffixes like `arXiv.1706.03762` are
    /// case-significant to downstream consumers of the record.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let stripped = if let Some(s) = input.strip_prefix("https://doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("http://doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("https://dx.doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("http://dx.doi.org/") {
            s
        } else if let Some(s) = input.strip_prefix("doi:") {
            s.trim_start()
        } else if let Some(s) = input.strip_prefix("DOI:") {
            s.trim_start()
        } else {
            input
        };

        // Must start with "10.", contain "/", and have a non-empty suffix
        if !stripped.starts_with("10.") {
            return Err(ResolveError::InvalidDoi(input.to_string()));
        }
        let slash_pos = stripped
            .find('/')
            .ok_or_else(|| ResolveError::InvalidDoi(input.to_string()))?;
        if stripped[slash_pos + 1..].is_empty() {
            return Err(ResolveError::InvalidDoi(input.to_string()));
        }

        Ok(Self {
            value: stripped.to_string(),
        })
    }

    /// Accept an identifier produced by the DOI-inference heuristics.
    ///
    /// An identifier with no `/` is a bare arXiv id and is rewritten to its
    /// DataCite DOI form. Anything else is passed through as-is: a junk
    /// identifier simply fails to resolve downstream.
    pub fn from_inferred(identifier: &str) -> Self {
        let identifier = identifier.trim();
        if identifier.contains('/') {
            Self {
                value: identifier.to_string(),
            }
        } else {
            Self {
                value: format!("10.48550/arXiv.{identifier}"),
            }
        }
    }
}

impl std::fmt::Display for Doi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
