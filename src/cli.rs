//! CLI interface for the resume relevance checker

use crate::config::OutputFormat;
use crate::storage::database::DEFAULT_AUDIT_LIMIT;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-relevance")]
#[command(about = "Score resumes against a job description")]
#[command(long_about = "Rank resumes by keyword coverage and text similarity to a job description, with feedback, highlighted gaps and a stored audit trail")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one or more resumes against a job description
    Analyze {
        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files (PDF, DOCX, TXT, MD); repeat for a batch
        #[arg(short, long = "resume", required = true, num_args = 1..)]
        resumes: Vec<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show score breakdown and highlighted gaps for every resume
        #[arg(short, long)]
        detailed: bool,

        /// Resume file names to compare side by side
        #[arg(long = "compare")]
        compare: Vec<String>,

        /// Do not write results to the history database
        #[arg(long)]
        no_store: bool,
    },

    /// List the known skills found in a document
    Skills {
        /// Document to scan
        file: PathBuf,
    },

    /// Show stored results, newest first
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show the audit trail, newest first
    Audit {
        #[arg(short, long, default_value_t = DEFAULT_AUDIT_LIMIT)]
        limit: usize,
    },

    /// Delete all stored results and audit events
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.hard_weight")
        key: String,

        /// Configuration value; lists are comma-separated
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

/// Name used for a document in reports and history: its file name
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
