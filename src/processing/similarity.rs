//! Interchangeable text similarity backends

use crate::config::{Config, SimilarityBackendKind};
use crate::error::Result;
use crate::processing::embedding_manager::EmbeddingModelManager;
use crate::processing::embeddings::{EmbeddingBackend, Model2VecProvider};
use crate::processing::text_processor::TextProcessor;
use crate::processing::tfidf::TfidfBackend;
use log::{info, warn};
use std::sync::Arc;

/// A document similarity score in `[0, 1]`
pub trait SimilarityBackend: Send + Sync {
    fn kind(&self) -> SimilarityBackendKind;

    fn similarity(&self, job: &str, candidate: &str) -> Result<f32>;

    /// Score every candidate against the job. Backends that fit on the
    /// whole corpus override this.
    fn score_candidates(&self, job: &str, candidates: &[&str]) -> Result<Vec<f32>> {
        candidates
            .iter()
            .map(|candidate| self.similarity(job, candidate))
            .collect()
    }
}

/// Word-set overlap; never fails
pub struct JaccardBackend {
    processor: TextProcessor,
}

impl Default for JaccardBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl JaccardBackend {
    pub fn new() -> Self {
        Self {
            processor: TextProcessor::new(),
        }
    }
}

impl SimilarityBackend for JaccardBackend {
    fn kind(&self) -> SimilarityBackendKind {
        SimilarityBackendKind::Jaccard
    }

    fn similarity(&self, job: &str, candidate: &str) -> Result<f32> {
        Ok(self.processor.text_similarity(job, candidate))
    }
}

pub fn jaccard_similarity(job: &str, candidate: &str) -> f32 {
    TextProcessor::new().text_similarity(job, candidate)
}

/// Similarity through `backend`, falling back to Jaccard when it errors
pub fn similarity(job: &str, candidate: &str, backend: &dyn SimilarityBackend) -> f32 {
    match backend.similarity(job, candidate) {
        Ok(score) => score,
        Err(e) => {
            warn!("{} similarity failed, using jaccard: {}", backend.kind(), e);
            jaccard_similarity(job, candidate)
        }
    }
}

/// Batch scores through `backend`, falling back to per-candidate Jaccard
pub fn score_all(job: &str, candidates: &[&str], backend: &dyn SimilarityBackend) -> Vec<f32> {
    match backend.score_candidates(job, candidates) {
        Ok(scores) if scores.len() == candidates.len() => scores,
        Ok(scores) => {
            warn!(
                "{} backend returned {} scores for {} candidates, using jaccard",
                backend.kind(),
                scores.len(),
                candidates.len()
            );
            jaccard_scores(job, candidates)
        }
        Err(e) => {
            warn!("{} scoring failed, using jaccard: {}", backend.kind(), e);
            jaccard_scores(job, candidates)
        }
    }
}

fn jaccard_scores(job: &str, candidates: &[&str]) -> Vec<f32> {
    let processor = TextProcessor::new();
    candidates
        .iter()
        .map(|candidate| processor.text_similarity(job, candidate))
        .collect()
}

/// Build the requested backend. Loading the embedding model may download it.
pub async fn try_load_backend(
    kind: SimilarityBackendKind,
    config: &Config,
) -> Result<Arc<dyn SimilarityBackend>> {
    match kind {
        SimilarityBackendKind::Jaccard => Ok(Arc::new(JaccardBackend::new())),
        SimilarityBackendKind::Tfidf => Ok(Arc::new(TfidfBackend::new(
            config.similarity.tfidf_max_features,
        ))),
        SimilarityBackendKind::Embedding => {
            let model_id = &config.similarity.embedding_model;
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
            let model_path = manager.ensure_model_available(model_id).await?;
            let provider = Model2VecProvider::load(&model_path, model_id)?;
            Ok(Arc::new(EmbeddingBackend::new(Arc::new(provider))))
        }
    }
}

/// Like `try_load_backend`, but an unavailable embedding model degrades to TF-IDF
pub async fn load_backend(kind: SimilarityBackendKind, config: &Config) -> Arc<dyn SimilarityBackend> {
    match try_load_backend(kind, config).await {
        Ok(backend) => {
            info!("Using {} similarity backend", backend.kind());
            backend
        }
        Err(e) => {
            warn!("Could not load {} backend ({}), falling back to tfidf", kind, e);
            Arc::new(TfidfBackend::new(config.similarity.tfidf_max_features))
        }
    }
}
