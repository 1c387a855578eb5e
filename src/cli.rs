//! CLI interface for the candidate matcher

use crate::config::{OutputFormat, SimilarityBackendKind};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "candidate-matcher")]
#[command(about = "Rank job candidates against a job description")]
#[command(
    long_about = "Score candidates with lexical, TF-IDF or embedding similarity, extract and match categorized skills, and summarize each fit"
)]
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

/// Where the job description comes from. A candidates JSON file may embed one instead.
#[derive(Args, Debug, Clone)]
#[group(required = false, multiple = false)]
pub struct JobSource {
    /// Path to job description file (TXT, MD, PDF)
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_text: Option<String>,
}

impl JobSource {
    pub fn is_given(&self) -> bool {
        self.job.is_some() || self.job_text.is_some()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank candidates against a job description
    Rank {
        #[command(flatten)]
        job: JobSource,

        /// Candidate documents (PDF, TXT, MD)
        #[arg(long, num_args = 1..)]
        candidates: Vec<PathBuf>,

        /// JSON file of manually entered candidates: [{"name": ..., "resume": ...}]
        #[arg(long)]
        candidates_json: Option<PathBuf>,

        /// Similarity backend: jaccard, tfidf, embedding
        #[arg(short, long)]
        backend: Option<String>,

        /// Number of top skills listed per candidate
        #[arg(long)]
        top: Option<usize>,

        /// Maximum number of candidates returned
        #[arg(long)]
        max_results: Option<usize>,

        /// Skip LLM summaries (template summaries only)
        #[arg(long)]
        no_llm: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show full summaries and per-category matches
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print the skills found in a document
    Skills {
        /// Document to scan
        file: Option<PathBuf>,

        /// Text to scan instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Compare one candidate with a job description
    Compare {
        /// Job description file
        #[arg(short, long)]
        job: PathBuf,

        /// Candidate document
        #[arg(short = 'a', long)]
        candidate: PathBuf,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, display name or HuggingFace repo ID
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_backend(backend: &str) -> Result<SimilarityBackendKind, String> {
    backend.parse()
}

/// Reject a ranking request with no possible job description before any document is read
pub fn check_job_source(job: &JobSource, candidates_json: Option<&Path>) -> Result<(), String> {
    if let Some(text) = &job.job_text {
        if text.trim().is_empty() {
            return Err("Job description is required".to_string());
        }
    }
    if !job.is_given() && candidates_json.is_none() {
        return Err(
            "Job description is required: pass --job, --job-text or a candidates JSON with a job_description"
                .to_string(),
        );
    }
    Ok(())
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if allowed_extensions.contains(&ext.to_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            allowed_extensions.join(", ")
        )),
        None => Err("File has no extension".to_string()),
    }
}
