//! Dense embedding similarity using Model2Vec

use crate::config::SimilarityBackendKind;
use crate::error::{MatcherError, Result};
use crate::processing::similarity::SimilarityBackend;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Anything that turns texts into fixed-size vectors
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

pub struct Model2VecProvider {
    model: StaticModel,
    model_name: String,
}

impl Model2VecProvider {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();

        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| MatcherError::Embedding(format!("Failed to load model: {}", e)))?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl EmbeddingProvider for Model2VecProvider {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatcherError::ProviderUnavailable(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

pub struct EmbeddingBackend {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingBackend {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

impl SimilarityBackend for EmbeddingBackend {
    fn kind(&self) -> SimilarityBackendKind {
        SimilarityBackendKind::Embedding
    }

    fn similarity(&self, job: &str, candidate: &str) -> Result<f32> {
        let scores = self.score_candidates(job, &[candidate])?;
        Ok(scores.first().copied().unwrap_or(0.0))
    }

    /// Encodes job and candidates in one call; scores are clamped to [0, 1]
    fn score_candidates(&self, job: &str, candidates: &[&str]) -> Result<Vec<f32>> {
        let mut texts = Vec::with_capacity(candidates.len() + 1);
        texts.push(job.to_string());
        texts.extend(candidates.iter().map(|c| c.to_string()));

        let start_time = Instant::now();
        let vectors = self.provider.encode(&texts)?;

        if vectors.len() != texts.len() {
            return Err(MatcherError::ProviderUnavailable(format!(
                "Embedding provider returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }

        debug!(
            "Encoded {} texts with {} in {:.2?}",
            texts.len(),
            self.provider.name(),
            start_time.elapsed()
        );

        let job_vector = &vectors[0];
        vectors[1..]
            .iter()
            .map(|vector| cosine_similarity(job_vector, vector).map(|score| score.clamp(0.0, 1.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bag-of-letters vectors, enough to exercise the backend without a model
    struct LetterProvider;

    impl EmbeddingProvider for LetterProvider {
        fn name(&self) -> &str {
            "letters"
        }

        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut vector = vec![0.0; 26];
                    for c in text.to_lowercase().chars().filter(char::is_ascii_lowercase) {
                        vector[(c as u8 - b'a') as usize] += 1.0;
                    }
                    vector
                })
                .collect())
        }
    }

    struct ShortProvider;

    impl EmbeddingProvider for ShortProvider {
        fn name(&self) -> &str {
            "short"
        }

        fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let c = vec![1.0, 0.0, 0.0];

        assert!((cosine_similarity(&a, &b).unwrap() - 0.0).abs() < 1e-6);
        assert!((cosine_similarity(&a, &c).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_provider_failure() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0]).unwrap_err();
        assert!(matches!(err, MatcherError::ProviderUnavailable(_)));
    }

    #[test]
    fn test_backend_scores_in_range() {
        let backend = EmbeddingBackend::new(Arc::new(LetterProvider));
        let scores = backend
            .score_candidates("rust engineer", &["rust engineer", "xyz"])
            .unwrap();

        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_wrong_vector_count() {
        let backend = EmbeddingBackend::new(Arc::new(ShortProvider));
        let result = backend.score_candidates("job", &["one", "two"]);
        assert!(matches!(result, Err(MatcherError::ProviderUnavailable(_))));
    }
}
