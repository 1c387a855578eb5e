//! Ranking report structures

use crate::config::SimilarityBackendKind;
use crate::processing::pipeline::{CandidateResult, MatchOutcome};
use crate::processing::skill_extractor::ExtractedSkills;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finished ranking plus the metadata needed to render it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub metadata: ReportMetadata,

    /// Skills found in the job description, every category present
    pub job_skills: ExtractedSkills,

    /// Best candidates first
    pub recommendations: Vec<CandidateResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
    /// File path or `inline` for job text passed on the command line
    pub job_source: String,
    pub backend: SimilarityBackendKind,
    pub total_candidates: usize,
    pub processing_time_ms: u64,
    /// Completion model used for rationales, if any
    pub llm_model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitLevel {
    Excellent,
    Good,
    Partial,
    Weak,
}

impl FitLevel {
    /// Same score bands as the template summaries
    pub fn from_score(score: f32) -> Self {
        if score > 0.7 {
            FitLevel::Excellent
        } else if score > 0.5 {
            FitLevel::Good
        } else if score > 0.3 {
            FitLevel::Partial
        } else {
            FitLevel::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitLevel::Excellent => "EXCELLENT",
            FitLevel::Good => "GOOD",
            FitLevel::Partial => "PARTIAL",
            FitLevel::Weak => "WEAK",
        }
    }
}

impl MatchReport {
    pub fn from_outcome(outcome: MatchOutcome, job_source: impl Into<String>, llm_model: Option<String>) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                matcher_version: env!("CARGO_PKG_VERSION").to_string(),
                job_source: job_source.into(),
                backend: outcome.backend,
                total_candidates: outcome.total_candidates,
                processing_time_ms: outcome.processing_time_ms,
                llm_model,
            },
            job_skills: outcome.job_skills,
            recommendations: outcome.recommendations,
        }
    }

    pub fn job_skill_count(&self) -> usize {
        self.job_skills.values().map(|skills| skills.len()).sum()
    }

    pub fn best(&self) -> Option<&CandidateResult> {
        self.recommendations.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skill_extractor::empty_extraction;
    use crate::processing::vocabulary::SkillCategory;

    #[test]
    fn test_fit_levels() {
        assert_eq!(FitLevel::from_score(0.95), FitLevel::Excellent);
        assert_eq!(FitLevel::from_score(0.7), FitLevel::Good);
        assert_eq!(FitLevel::from_score(0.31), FitLevel::Partial);
        assert_eq!(FitLevel::from_score(0.0), FitLevel::Weak);
    }

    #[test]
    fn test_from_outcome() {
        let mut job_skills = empty_extraction();
        job_skills
            .get_mut(&SkillCategory::ProgrammingLanguages)
            .unwrap()
            .insert("rust".to_string());

        let outcome = MatchOutcome {
            recommendations: Vec::new(),
            total_candidates: 3,
            backend: SimilarityBackendKind::Tfidf,
            job_skills,
            processing_time_ms: 12,
        };

        let report = MatchReport::from_outcome(outcome, "job.txt", None);
        assert_eq!(report.metadata.total_candidates, 3);
        assert_eq!(report.metadata.job_source, "job.txt");
        assert_eq!(report.job_skill_count(), 1);
        assert!(report.best().is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metadata"]["backend"], "tfidf");
        assert_eq!(json["job_skills"]["programming_languages"][0], "rust");
        assert!(json["job_skills"]["soft_skills"].as_array().unwrap().is_empty());
    }
}
