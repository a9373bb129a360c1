use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root application configuration, loaded from `~/.config/paperdex/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub resolver: ResolverConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Base URL of the DOI resolver queried with `Accept: application/x-bibtex`.
    pub doi_base_url: String,
    /// Base URL of the ISBN metadata service (Open Library Books API).
    pub isbn_base_url: String,
    /// Contact address folded into the outgoing User-Agent, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polite_email: Option<String>,
    /// Worker-pool size override; defaults to available CPUs x 4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

/// Settings for the DOI-inference heuristics, passed explicitly into the
/// resolver rather than toggled process-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Emit a debug log line for every probe the inference engine runs.
    pub verbose: bool,
    /// How many leading pages to text-scan for a DOI or arXiv id.
    pub max_pages: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            doi_base_url: "http://dx.doi.org".to_string(),
            isbn_base_url: "https://openlibrary.org".to_string(),
            polite_email: None,
            concurrency: None,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            max_pages: 10,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/paperdex/config.toml`
    pub fn config_path() -> PathBuf {
        // Allow override via env var
        if let Ok(path) = std::env::var("PAPERDEX_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("paperdex")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
