use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use paperdex_core::{AppConfig, Database};
use paperdex_resolve::{Resolver, collect, default_concurrency};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "paperdex",
    about = "JSON-based personal reference database",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a JSON database from a directory of PDFs.
    Generate {
        papers_dir: PathBuf,

        /// Write the database here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing output file.
        #[arg(short, long)]
        force_update: bool,
    },

    /// Render a JSON database into a searchable HTML page.
    Render {
        database_json: PathBuf,

        /// Write the HTML here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Generate {
            papers_dir,
            output,
            force_update,
        } => {
            // Refuse to clobber an existing database before doing any work.
            if let Some(message) = overwrite_refusal(output.as_deref(), force_update) {
                eprintln!("{message}");
                std::process::exit(1);
            }

            let resolver = Resolver::new(&config);
            let concurrency = config
                .resolver
                .concurrency
                .unwrap_or_else(default_concurrency);
            let records = collect(&resolver, &papers_dir, concurrency).await?;

            let json = Database::new(records).to_json_pretty()?;
            write_output(output.as_deref(), &json)?;
        }

        Commands::Render {
            database_json,
            output,
        } => {
            let db = Database::load(&database_json)?;
            let html = paperdex_render::render(&db);
            write_output(output.as_deref(), &html)?;
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Diagnostic for the overwrite guard, or `None` when writing may proceed.
fn overwrite_refusal(output: Option<&Path>, force_update: bool) -> Option<String> {
    let path = output?;
    if path.exists() && !force_update {
        Some(format!(
            "{} already exists; pass --force-update to overwrite it.",
            path.display()
        ))
    } else {
        None
    }
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)?,
        None => println!("{contents}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn existing_output_without_force_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "[]").unwrap();

        let refusal = overwrite_refusal(Some(&path), false);
        assert!(refusal.is_some());
        assert!(refusal.unwrap().contains("--force-update"));

        // The guard never touches the file.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn force_flag_allows_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(overwrite_refusal(Some(&path), true).is_none());
    }

    #[test]
    fn fresh_output_path_is_allowed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.json");
        assert!(overwrite_refusal(Some(&path), false).is_none());
    }

    #[test]
    fn stdout_mode_never_refuses() {
        assert!(overwrite_refusal(None, false).is_none());
    }

    #[test]
    fn write_output_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");
        write_output(Some(&path), "<html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>");
    }
}
