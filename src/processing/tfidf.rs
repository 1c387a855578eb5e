//! TF-IDF vectorization with unigram and bigram features

use crate::config::SimilarityBackendKind;
use crate::error::{MatcherError, Result};
use crate::processing::similarity::SimilarityBackend;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Sparse row: feature index -> weight
pub type SparseVector = HashMap<usize, f32>;

#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f32>,
    pub rows: Vec<SparseVector>,
}

pub struct TfidfVectorizer {
    max_features: usize,
    token_regex: Regex,
    processor: TextProcessor,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        let token_regex = Regex::new(r"\b\w\w+\b").expect("Invalid token regex");

        Self {
            max_features: max_features.max(1),
            token_regex,
            processor: TextProcessor::new(),
        }
    }

    /// Lower-cased word tokens minus stop words, followed by their bigrams
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let words: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| !self.processor.is_stop_word(word))
            .collect();

        let mut terms: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        terms.extend(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
        terms
    }

    pub fn fit_transform(&self, documents: &[&str]) -> Result<TfidfMatrix> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|doc| self.analyze(doc)).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            for term in terms {
                *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if corpus_counts.is_empty() {
            return Err(MatcherError::Processing(
                "Empty vocabulary: documents contain only stop words".to_string(),
            ));
        }

        // Most frequent terms first, ties alphabetical
        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();
        let vocabulary: BTreeMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let term_counts: Vec<HashMap<usize, usize>> = analyzed
            .iter()
            .map(|terms| {
                let mut counts = HashMap::new();
                for term in terms {
                    if let Some(&index) = vocabulary.get(term) {
                        *counts.entry(index).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();

        let n_docs = documents.len() as f32;
        let mut document_frequency = vec![0usize; vocabulary.len()];
        for counts in &term_counts {
            for index in counts.keys() {
                document_frequency[*index] += 1;
            }
        }

        let idf: Vec<f32> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let rows = term_counts
            .into_iter()
            .map(|counts| {
                let mut row: SparseVector = counts
                    .into_iter()
                    .map(|(index, count)| (index, count as f32 * idf[index]))
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        debug!("TF-IDF fit: {} documents, {} features", documents.len(), vocabulary.len());

        Ok(TfidfMatrix { vocabulary, idf, rows })
    }
}

fn l2_normalize(row: &mut SparseVector) {
    let norm = row.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in row.values_mut() {
            *weight /= norm;
        }
    }
}

/// Cosine of two L2-normalized sparse rows
pub fn sparse_cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f32 = small
        .iter()
        .filter_map(|(index, weight)| large.get(index).map(|other| weight * other))
        .sum();

    dot.clamp(0.0, 1.0)
}

pub struct TfidfBackend {
    vectorizer: TfidfVectorizer,
}

impl TfidfBackend {
    pub fn new(max_features: usize) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(max_features),
        }
    }
}

impl SimilarityBackend for TfidfBackend {
    fn kind(&self) -> SimilarityBackendKind {
        SimilarityBackendKind::Tfidf
    }

    fn similarity(&self, job: &str, candidate: &str) -> Result<f32> {
        let scores = self.score_candidates(job, &[candidate])?;
        Ok(scores.first().copied().unwrap_or(0.0))
    }

    /// Fits on the job plus every candidate, then scores each candidate row
    fn score_candidates(&self, job: &str, candidates: &[&str]) -> Result<Vec<f32>> {
        let mut corpus = Vec::with_capacity(candidates.len() + 1);
        corpus.push(job);
        corpus.extend_from_slice(candidates);

        let matrix = self.vectorizer.fit_transform(&corpus)?;
        let job_row = &matrix.rows[0];

        Ok(matrix.rows[1..]
            .iter()
            .map(|row| sparse_cosine(job_row, row))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_unigrams_and_bigrams() {
        let vectorizer = TfidfVectorizer::new(1000);
        let terms = vectorizer.analyze("The Rust developer, a systems expert");

        assert_eq!(
            terms,
            vec![
                "rust",
                "developer",
                "systems",
                "expert",
                "rust developer",
                "developer systems",
                "systems expert"
            ]
        );
    }

    #[test]
    fn test_idf_weights() {
        let vectorizer = TfidfVectorizer::new(1000);
        let matrix = vectorizer.fit_transform(&["rust python", "rust"]).unwrap();

        let rust = matrix.vocabulary["rust"];
        let python = matrix.vocabulary["python"];
        assert!((matrix.idf[rust] - 1.0).abs() < 1e-6);
        assert!((matrix.idf[python] - ((3.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);

        for row in &matrix.rows {
            let norm: f32 = row.values().map(|w| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let vectorizer = TfidfVectorizer::new(2);
        let matrix = vectorizer
            .fit_transform(&["rust rust rust go", "rust python python"])
            .unwrap();

        assert_eq!(matrix.vocabulary.len(), 2);
        assert!(matrix.vocabulary.contains_key("rust"));
        assert!(matrix.vocabulary.contains_key("python"));
    }

    #[test]
    fn test_backend_scores() {
        let backend = TfidfBackend::new(1000);
        let job = "Senior Rust engineer building distributed storage systems";

        let scores = backend
            .score_candidates(
                job,
                &[
                    "Rust engineer who built distributed storage systems",
                    "Pastry chef with a passion for croissants",
                ],
            )
            .unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
        assert_eq!(scores[1], 0.0);

        let identical = backend.similarity(job, job).unwrap();
        assert!((identical - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stop_word_only_corpus_is_an_error() {
        let backend = TfidfBackend::new(1000);
        assert!(backend.similarity("the and of", "is it").is_err());
    }
}
