//! Candidate ranking pipeline

use crate::config::{Config, SimilarityBackendKind};
use crate::error::{MatcherError, Result};
use crate::input::Candidate;
use crate::llm::summarizer::{unavailable_summary, CandidateSummarizer};
use crate::processing::similarity::{score_all, SimilarityBackend};
use crate::processing::skill_extractor::{ExtractedSkills, SkillExtractor};
use crate::processing::skill_matcher::{match_skills, SkillMatches};
use crate::processing::summary::{summarize, NO_MATCHES_SUMMARY};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: Uuid,
    pub name: String,
    pub filename: String,
    pub similarity_score: f32,
    pub ai_summary: String,
    pub skill_matches: SkillMatches,
    pub skill_summary: String,
    pub top_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub recommendations: Vec<CandidateResult>,
    pub total_candidates: usize,
    pub backend: SimilarityBackendKind,
    pub job_skills: ExtractedSkills,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub top_skills: usize,
    pub max_results: usize,
    pub max_concurrency: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            top_skills: 5,
            max_results: 10,
            max_concurrency: 4,
        }
    }
}

impl From<&Config> for MatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_skills: config.matching.top_skills,
            max_results: config.matching.max_results,
            max_concurrency: config.matching.max_concurrency.max(1),
        }
    }
}

/// Everything needed to evaluate one candidate once its score is known
struct CandidateContext {
    extractor: Arc<SkillExtractor>,
    summarizer: Arc<CandidateSummarizer>,
    job: Arc<str>,
    job_skills: Arc<ExtractedSkills>,
    top_skills: usize,
}

pub struct CandidateMatcher {
    extractor: Arc<SkillExtractor>,
    backend: Arc<dyn SimilarityBackend>,
    summarizer: Arc<CandidateSummarizer>,
    settings: MatchSettings,
}

impl CandidateMatcher {
    pub fn new(
        extractor: Arc<SkillExtractor>,
        backend: Arc<dyn SimilarityBackend>,
        summarizer: Arc<CandidateSummarizer>,
        settings: MatchSettings,
    ) -> Self {
        Self {
            extractor,
            backend,
            summarizer,
            settings,
        }
    }

    pub fn backend_kind(&self) -> SimilarityBackendKind {
        self.backend.kind()
    }

    /// Rank candidates against a job description, best first.
    ///
    /// Only request validation can fail; scoring, extraction and rationale
    /// problems degrade individual results instead.
    pub async fn rank(&self, job_description: &str, candidates: Vec<Candidate>) -> Result<MatchOutcome> {
        if job_description.trim().is_empty() {
            return Err(MatcherError::InvalidInput("Job description is required".to_string()));
        }
        if candidates.is_empty() {
            return Err(MatcherError::InvalidInput(
                "At least one candidate is required".to_string(),
            ));
        }

        let start_time = Instant::now();
        let total_candidates = candidates.len();
        info!(
            "Ranking {} candidates with the {} backend",
            total_candidates,
            self.backend.kind()
        );

        let job_skills = self.extractor.extract(job_description);

        let texts: Vec<&str> = candidates.iter().map(|c| c.content.as_str()).collect();
        let scores = score_all(job_description, &texts, self.backend.as_ref());

        let context = Arc::new(CandidateContext {
            extractor: Arc::clone(&self.extractor),
            summarizer: Arc::clone(&self.summarizer),
            job: Arc::from(job_description),
            job_skills: Arc::new(job_skills.clone()),
            top_skills: self.settings.top_skills,
        });
        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrency.max(1)));

        let mut slots: Vec<Option<CandidateResult>> = vec![None; total_candidates];
        let mut fallbacks = Vec::with_capacity(total_candidates);
        let mut tasks = JoinSet::new();

        for (index, (candidate, score)) in candidates.into_iter().zip(scores).enumerate() {
            fallbacks.push(degraded_result(&candidate, score));

            let context = Arc::clone(&context);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = evaluate_candidate(&context, candidate, score).await;
                (index, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Candidate task failed: {}", e),
            }
        }

        let mut ranked: Vec<(usize, CandidateResult)> = slots
            .into_iter()
            .zip(fallbacks)
            .enumerate()
            .map(|(index, (slot, fallback))| {
                let result = slot.unwrap_or_else(|| {
                    warn!("Using degraded result for {}", fallback.name);
                    fallback
                });
                (index, result)
            })
            .collect();

        ranked.sort_by(|(a_index, a), (b_index, b)| {
            b.similarity_score
                .total_cmp(&a.similarity_score)
                .then(a_index.cmp(b_index))
        });

        let recommendations: Vec<CandidateResult> = ranked
            .into_iter()
            .take(self.settings.max_results)
            .map(|(_, result)| result)
            .collect();

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Returning {} of {} candidates in {}ms",
            recommendations.len(),
            total_candidates,
            processing_time_ms
        );

        Ok(MatchOutcome {
            recommendations,
            total_candidates,
            backend: self.backend.kind(),
            job_skills,
            processing_time_ms,
        })
    }
}

async fn evaluate_candidate(context: &CandidateContext, candidate: Candidate, score: f32) -> CandidateResult {
    let candidate_skills = context.extractor.extract(&candidate.content);
    let skill_matches = match_skills(&context.job_skills, &candidate_skills);
    let summary = summarize(&skill_matches, context.top_skills);

    debug!(
        "{}: score {:.3}, {}",
        candidate.name, score, summary.text
    );

    let ai_summary = context
        .summarizer
        .summarize(&context.job, &candidate.content, &skill_matches, score)
        .await;

    CandidateResult {
        id: candidate.id,
        name: candidate.name,
        filename: candidate.filename,
        similarity_score: score,
        ai_summary,
        skill_matches,
        skill_summary: summary.text,
        top_skills: summary.top_skills,
    }
}

fn degraded_result(candidate: &Candidate, score: f32) -> CandidateResult {
    CandidateResult {
        id: candidate.id,
        name: candidate.name.clone(),
        filename: candidate.filename.clone(),
        similarity_score: score,
        ai_summary: unavailable_summary(score),
        skill_matches: SkillMatches::new(),
        skill_summary: NO_MATCHES_SUMMARY.to_string(),
        top_skills: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::CompletionProvider;
    use crate::processing::similarity::JaccardBackend;
    use crate::processing::vocabulary::SkillCategory;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Err(MatcherError::ProviderUnavailable("timeout".to_string()))
        }
    }

    struct PanickingProvider;

    #[async_trait]
    impl CompletionProvider for PanickingProvider {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn complete(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
            if user_prompt.contains("corrupted") {
                panic!("provider crashed");
            }
            Ok("Fine.".to_string())
        }
    }

    fn matcher(summarizer: CandidateSummarizer, settings: MatchSettings) -> CandidateMatcher {
        CandidateMatcher::new(
            Arc::new(SkillExtractor::with_defaults().unwrap()),
            Arc::new(JaccardBackend::new()),
            Arc::new(summarizer),
            settings,
        )
    }

    const JOB: &str = "Looking for a Python developer with Docker and AWS experience";

    #[tokio::test]
    async fn test_validation_errors() {
        let matcher = matcher(CandidateSummarizer::offline(), MatchSettings::default());

        let err = matcher
            .rank("   ", vec![Candidate::new("a", "a.txt", "Python")])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Job description is required");

        let err = matcher.rank(JOB, Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: At least one candidate is required");
    }

    #[tokio::test]
    async fn test_ranking_sorted_and_capped() {
        let settings = MatchSettings {
            max_results: 2,
            ..MatchSettings::default()
        };
        let matcher = matcher(CandidateSummarizer::offline(), settings);

        let candidates = vec![
            Candidate::new("baker", "baker.txt", "Pastry chef and bread baker"),
            Candidate::new("match", "match.txt", "Python developer with Docker and AWS experience"),
            Candidate::new("partial", "partial.txt", "5 years Python, Docker, Kubernetes"),
        ];

        let outcome = matcher.rank(JOB, candidates).await.unwrap();

        assert_eq!(outcome.total_candidates, 3);
        assert_eq!(outcome.recommendations.len(), 2);
        assert_eq!(outcome.recommendations[0].name, "match");
        assert_eq!(outcome.recommendations[1].name, "partial");
        assert!(outcome.recommendations[0].similarity_score >= outcome.recommendations[1].similarity_score);
        assert_eq!(outcome.backend, SimilarityBackendKind::Jaccard);

        let partial = &outcome.recommendations[1];
        assert_eq!(partial.skill_matches[&SkillCategory::ProgrammingLanguages], vec!["python"]);
        assert_eq!(partial.skill_matches[&SkillCategory::CloudDevops], vec!["docker"]);
        assert_eq!(partial.top_skills, vec!["python", "docker"]);
        assert!(partial.ai_summary.starts_with("This candidate has a similarity score of"));
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let matcher = matcher(CandidateSummarizer::offline(), MatchSettings::default());
        let candidates = vec![
            Candidate::new("first", "first.txt", ""),
            Candidate::new("second", "second.txt", ""),
        ];

        let outcome = matcher.rank(JOB, candidates).await.unwrap();
        assert_eq!(outcome.recommendations[0].name, "first");
        assert_eq!(outcome.recommendations[1].name, "second");
        assert_eq!(outcome.recommendations[0].skill_summary, NO_MATCHES_SUMMARY);
        assert!(outcome.recommendations[0].top_skills.is_empty());
    }

    #[tokio::test]
    async fn test_failing_provider_degrades_summary() {
        let summarizer = CandidateSummarizer::new(Some(Arc::new(FailingProvider)));
        let matcher = matcher(summarizer, MatchSettings::default());

        let outcome = matcher
            .rank(JOB, vec![Candidate::new("a", "a.txt", "Python developer")])
            .await
            .unwrap();

        let result = &outcome.recommendations[0];
        assert_eq!(
            result.ai_summary,
            format!("AI summary unavailable. Similarity score: {:.3}", result.similarity_score)
        );
    }

    #[tokio::test]
    async fn test_crashed_task_does_not_abort_batch() {
        let summarizer = CandidateSummarizer::new(Some(Arc::new(PanickingProvider)));
        let matcher = matcher(summarizer, MatchSettings::default());

        let candidates = vec![
            Candidate::new("ok", "ok.txt", "Python developer with Docker"),
            Candidate::new("bad", "bad.txt", "corrupted Python resume"),
        ];

        let outcome = matcher.rank(JOB, candidates).await.unwrap();
        assert_eq!(outcome.recommendations.len(), 2);

        let bad = outcome
            .recommendations
            .iter()
            .find(|r| r.name == "bad")
            .unwrap();
        assert!(bad.skill_matches.is_empty());
        assert!(bad.ai_summary.starts_with("AI summary unavailable"));

        let ok = outcome.recommendations.iter().find(|r| r.name == "ok").unwrap();
        assert_eq!(ok.ai_summary, "Fine.");
    }
}
