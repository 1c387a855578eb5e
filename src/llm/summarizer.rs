//! Candidate rationales: LLM-written when a provider is configured, templated otherwise

use crate::llm::client::CompletionProvider;
use crate::llm::prompts::{build_skill_prompt, SYSTEM_PROMPT};
use crate::processing::skill_matcher::SkillMatches;
use log::{error, warn};
use std::sync::Arc;

pub struct CandidateSummarizer {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl CandidateSummarizer {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Summarizer that only produces template summaries
    pub fn offline() -> Self {
        Self { provider: None }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Never fails: provider errors become the unavailable notice
    pub async fn summarize(
        &self,
        job_description: &str,
        candidate_text: &str,
        matches: &SkillMatches,
        similarity_score: f32,
    ) -> String {
        let Some(provider) = &self.provider else {
            return template_summary(similarity_score, matches);
        };

        let prompt = build_skill_prompt(job_description, candidate_text, matches, similarity_score);
        match provider.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(summary) => summary,
            Err(e) if e.is_provider_failure() => {
                warn!("{} unavailable: {}", provider.name(), e);
                unavailable_summary(similarity_score)
            }
            Err(e) => {
                error!("{} summary failed: {}", provider.name(), e);
                unavailable_summary(similarity_score)
            }
        }
    }
}

pub fn unavailable_summary(similarity_score: f32) -> String {
    format!("AI summary unavailable. Similarity score: {:.3}", similarity_score)
}

/// Deterministic summary built from the score and the matched skills
pub fn template_summary(similarity_score: f32, matches: &SkillMatches) -> String {
    let mut summary = format!(
        "This candidate has a similarity score of {:.1}%. ",
        similarity_score * 100.0
    );

    let skill_text: Vec<String> = matches
        .iter()
        .filter(|(_, skills)| !skills.is_empty())
        .map(|(category, skills)| format!("{} ({})", skills.join(", "), category.key().replace('_', " ")))
        .collect();

    if !skill_text.is_empty() {
        summary.push_str(&format!("Key matching skills: {}. ", skill_text.join("; ")));
    }

    let verdict = if similarity_score > 0.7 {
        "This candidate appears to be an excellent match for the position."
    } else if similarity_score > 0.5 {
        "This candidate shows good potential for the role."
    } else if similarity_score > 0.3 {
        "This candidate has some relevant experience but may need additional training."
    } else {
        "This candidate may not be the best fit for this specific role."
    };
    summary.push_str(verdict);

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MatcherError, Result};
    use crate::processing::vocabulary::SkillCategory;
    use async_trait::async_trait;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
            assert!(system_prompt.contains("HR assistant"));
            assert!(user_prompt.contains("Similarity Score"));
            Ok(self.0.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Err(MatcherError::ProviderUnavailable("timed out".to_string()))
        }
    }

    struct GarbledProvider;

    #[async_trait]
    impl CompletionProvider for GarbledProvider {
        fn name(&self) -> &str {
            "garbled"
        }

        async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            Err(MatcherError::Processing("response had no choices".to_string()))
        }
    }

    fn python_match() -> SkillMatches {
        let mut matches = SkillMatches::new();
        matches.insert(SkillCategory::ProgrammingLanguages, vec!["python".to_string()]);
        matches
    }

    #[tokio::test]
    async fn test_provider_summary() {
        let summarizer = CandidateSummarizer::new(Some(Arc::new(FixedProvider("Great fit."))));
        let summary = summarizer.summarize("job", "candidate", &python_match(), 0.9).await;
        assert_eq!(summary, "Great fit.");
    }

    #[tokio::test]
    async fn test_failing_provider_degrades() {
        let summarizer = CandidateSummarizer::new(Some(Arc::new(FailingProvider)));
        let summary = summarizer.summarize("job", "candidate", &python_match(), 0.4567).await;
        assert_eq!(summary, "AI summary unavailable. Similarity score: 0.457");
    }

    #[tokio::test]
    async fn test_unexpected_provider_error_degrades() {
        let summarizer = CandidateSummarizer::new(Some(Arc::new(GarbledProvider)));
        assert!(summarizer.has_provider());

        let summary = summarizer.summarize("job", "candidate", &python_match(), 0.1).await;
        assert_eq!(summary, "AI summary unavailable. Similarity score: 0.100");
    }

    #[tokio::test]
    async fn test_offline_uses_template() {
        let summarizer = CandidateSummarizer::offline();
        assert!(!summarizer.has_provider());

        let summary = summarizer.summarize("job", "candidate", &python_match(), 0.75).await;
        assert_eq!(
            summary,
            "This candidate has a similarity score of 75.0%. Key matching skills: python \
             (programming languages). This candidate appears to be an excellent match for the position."
        );
    }

    #[test]
    fn test_template_verdict_bands() {
        let none = SkillMatches::new();
        assert!(template_summary(0.6, &none).ends_with("shows good potential for the role."));
        assert!(template_summary(0.31, &none).contains("may need additional training"));
        assert!(template_summary(0.3, &none).ends_with("not be the best fit for this specific role."));
        assert!(!template_summary(0.1, &none).contains("Key matching skills"));
    }
}
