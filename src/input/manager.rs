//! Input manager for job descriptions and candidate documents

use crate::error::{MatcherError, Result};
use crate::input::candidate::{parse_manual_candidates, Candidate, ManualBatch};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    decode_upload, markdown_to_text, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract text, failing on missing, unsupported or unreadable files
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let key = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&key) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(MatcherError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(key, text.clone());
        }

        Ok(text)
    }

    /// Load a candidate from a file. Unreadable documents become empty candidates.
    pub async fn load_candidate(&mut self, path: &Path) -> Candidate {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let filename = path
            .file_name()
            .map(|file| file.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());

        let content = match self.candidate_text(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read candidate {}: {}", path.display(), e);
                String::new()
            }
        };

        Candidate::new(name, filename, content)
    }

    /// Text and Markdown candidates are decoded leniently: bytes that are not
    /// UTF-8 give an empty document instead of an error.
    async fn candidate_text(&mut self, path: &Path) -> Result<String> {
        let file_type = FileType::from_path(path);
        if !matches!(file_type, FileType::Text | FileType::Markdown) {
            return self.extract_text(path).await;
        }

        let bytes = tokio::fs::read(path).await?;
        let text = decode_upload(&bytes);
        if text.is_empty() && !bytes.is_empty() {
            warn!("{} is not valid UTF-8, treating it as empty", path.display());
        }

        Ok(match file_type {
            FileType::Markdown => markdown_to_text(&text),
            _ => text,
        })
    }

    pub async fn load_candidates<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(paths.len());
        for path in paths {
            candidates.push(self.load_candidate(path.as_ref()).await);
        }
        debug!("{} documents cached", self.cache_size());
        candidates
    }

    /// Read a manual candidates JSON file
    pub async fn load_manual_candidates(&self, path: &Path) -> Result<ManualBatch> {
        let json = tokio::fs::read_to_string(path).await?;
        parse_manual_candidates(&json)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
