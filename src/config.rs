//! Configuration management for the candidate matcher

use crate::error::{MatcherError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Only accept vocabulary hits that sit on word boundaries. Hyphenated words
    /// stay whole; a trailing version number (`python3`) does not block a hit.
    pub word_boundary: bool,
    pub top_skills: usize,
    pub max_results: usize,
    pub max_concurrency: usize,
    /// Additional canonical skills per category key, e.g. `frameworks = ["axum"]`
    pub extra_skills: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub backend: SimilarityBackendKind,
    pub tfidf_max_features: usize,
    pub embedding_model: String,
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub api_base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityBackendKind {
    Jaccard,
    Tfidf,
    Embedding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            word_boundary: true,
            top_skills: 5,
            max_results: 10,
            max_concurrency: 4,
            extra_skills: BTreeMap::new(),
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".candidate-matcher")
            .join("models");

        Self {
            backend: SimilarityBackendKind::Tfidf,
            tfidf_max_features: 1000,
            embedding_model: "potion-base-8M".to_string(),
            models_dir,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 200,
            temperature: 0.7,
            timeout_secs: 30,
            max_attempts: 2,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-matcher")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.similarity.models_dir
    }

    /// Reads the LLM API key from the configured environment variable
    pub fn llm_api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.max_concurrency == 0 {
            return Err(MatcherError::Configuration(
                "matching.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.llm.max_attempts == 0 {
            return Err(MatcherError::Configuration(
                "llm.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.similarity.tfidf_max_features == 0 {
            return Err(MatcherError::Configuration(
                "similarity.tfidf_max_features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SimilarityBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimilarityBackendKind::Jaccard => "jaccard",
            SimilarityBackendKind::Tfidf => "tfidf",
            SimilarityBackendKind::Embedding => "embedding",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SimilarityBackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jaccard" | "lexical" => Ok(SimilarityBackendKind::Jaccard),
            "tfidf" | "tf-idf" => Ok(SimilarityBackendKind::Tfidf),
            "embedding" | "embeddings" | "dense" => Ok(SimilarityBackendKind::Embedding),
            _ => Err(format!(
                "Invalid similarity backend: {}. Supported: jaccard, tfidf, embedding",
                s
            )),
        }
    }
}
