//! Skill extraction, matching and similarity scoring

pub mod embedding_manager;
pub mod embeddings;
pub mod pipeline;
pub mod similarity;
pub mod skill_extractor;
pub mod skill_matcher;
pub mod summary;
pub mod text_processor;
pub mod tfidf;
pub mod vocabulary;

pub use pipeline::{CandidateMatcher, CandidateResult, MatchOutcome, MatchSettings};
pub use similarity::{similarity, SimilarityBackend};
pub use skill_extractor::{ExtractedSkills, SkillExtractor};
pub use skill_matcher::{match_skills, SkillMatches};
pub use summary::{skill_summary, summarize, top_skills, SkillSummary};
pub use vocabulary::{SkillCategory, SkillVocabulary};
