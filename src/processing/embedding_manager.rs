//! Download and discovery of Model2Vec embedding models

use crate::error::{MatcherError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub id: String,
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

/// Files fetched for a model; only the tokenizer and weights are required
const MODEL_FILES: &[(&str, bool)] = &[
    ("model.safetensors", true),
    ("tokenizer.json", true),
    ("config.json", false),
];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    catalog: BTreeMap<String, EmbeddingModelInfo>,
    downloaded: BTreeSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            MatcherError::Embedding(format!("Failed to create models directory: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            catalog: Self::default_catalog(),
            downloaded: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn default_catalog() -> BTreeMap<String, EmbeddingModelInfo> {
        let entries = [
            (
                "potion-base-8M",
                "Potion Base 8M",
                "minishlab/potion-base-8M",
                33,
                256,
                "Compact general purpose static embeddings (default)",
            ),
            (
                "potion-base-32M",
                "Potion Base 32M",
                "minishlab/potion-base-32M",
                130,
                512,
                "Larger static embeddings with better recall",
            ),
            (
                "m2v-base",
                "Model2Vec Base",
                "minishlab/M2V_base_output",
                90,
                256,
                "Original Model2Vec distillation of bge-base",
            ),
        ];

        entries
            .into_iter()
            .map(|(id, name, repo_id, size_mb, dimensions, description)| {
                (
                    id.to_string(),
                    EmbeddingModelInfo {
                        id: id.to_string(),
                        name: name.to_string(),
                        repo_id: repo_id.to_string(),
                        size_mb,
                        dimensions,
                        description: description.to_string(),
                    },
                )
            })
            .collect()
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_model_directory(&entry.path()).await {
                self.downloaded
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_model_directory(path: &Path) -> bool {
        for (file, required) in MODEL_FILES {
            if *required && fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let info = self
            .catalog
            .get(model_id)
            .cloned()
            .ok_or_else(|| MatcherError::Embedding(format!("Unknown embedding model: {}", model_id)))?;

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded.contains(model_id) {
            return Ok(model_dir);
        }

        info!("Downloading embedding model {} ({} MB) from {}", info.name, info.size_mb, info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| MatcherError::Embedding(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(info.repo_id.clone());

        for (file, required) in MODEL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                    info!("Downloaded {}", file);
                }
                Err(e) if *required => {
                    return Err(MatcherError::Embedding(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
                Err(e) => warn!("Optional file {} not available: {}", file, e),
            }
        }

        self.downloaded.insert(model_id.to_string());
        Ok(model_dir)
    }

    /// Path of a local model, downloading it first when needed.
    /// Unknown ids are treated as directory names under the models directory.
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        let resolved = self.resolve_model_id(model_id);

        match resolved {
            Some(id) if self.downloaded.contains(&id) => Ok(self.models_dir.join(id)),
            Some(id) => self.download_model(&id).await,
            None => {
                let local = self.models_dir.join(model_id);
                if Self::is_model_directory(&local).await {
                    Ok(local)
                } else {
                    Err(MatcherError::Embedding(format!(
                        "Embedding model '{}' is neither known nor present in {}",
                        model_id,
                        self.models_dir.display()
                    )))
                }
            }
        }
    }

    pub fn list_available_models(&self) -> Vec<&EmbeddingModelInfo> {
        self.catalog.values().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded.contains(model_id)
    }

    /// Accepts a catalog id, a repo id or a display name (case-insensitive)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.catalog.contains_key(input) {
            return Some(input.to_string());
        }

        let lowered = input.to_lowercase();
        self.catalog
            .values()
            .find(|info| info.repo_id == input || info.name.to_lowercase() == lowered)
            .map(|info| info.id.clone())
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }
}
