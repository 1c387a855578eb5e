//! Integration tests for the candidate matcher

use candidate_matcher::config::{Config, OutputFormat, SimilarityBackendKind};
use candidate_matcher::error::MatcherError;
use candidate_matcher::input::InputManager;
use candidate_matcher::llm::CandidateSummarizer;
use candidate_matcher::output::{MatchReport, ReportGenerator};
use candidate_matcher::processing::similarity::{load_backend, JaccardBackend, SimilarityBackend};
use candidate_matcher::processing::summary::NO_MATCHES_SUMMARY;
use candidate_matcher::processing::tfidf::TfidfBackend;
use candidate_matcher::processing::{CandidateMatcher, MatchSettings, SkillCategory, SkillExtractor, SkillVocabulary};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn matcher(backend: Arc<dyn SimilarityBackend>) -> CandidateMatcher {
    CandidateMatcher::new(
        Arc::new(SkillExtractor::with_defaults().unwrap()),
        backend,
        Arc::new(CandidateSummarizer::offline()),
        MatchSettings::default(),
    )
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    assert!(text.contains("Jane Smith"));
    assert!(text.contains("PostgreSQL"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();

    assert!(text.contains("Jane Smith"));
    assert!(text.contains("Django"));
    assert!(text.contains("Redis"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
    assert!(!text.contains("https://"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let first = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract_text(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager
        .extract_text(Path::new("tests/fixtures/unsupported.xyz"))
        .await;

    assert!(matches!(result, Err(MatcherError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .await;

    assert!(matches!(result, Err(MatcherError::InvalidInput(_))));
}

#[tokio::test]
async fn test_non_utf8_text_is_malformed() {
    let mut manager = InputManager::new();
    let result = manager
        .extract_text(Path::new("tests/fixtures/latin1.txt"))
        .await;

    assert!(matches!(result, Err(MatcherError::MalformedDocument(_))));
}

#[tokio::test]
async fn test_unreadable_candidate_loads_empty() {
    let mut manager = InputManager::new();
    let candidate = manager
        .load_candidate(Path::new("tests/fixtures/latin1.txt"))
        .await;

    assert_eq!(candidate.name, "latin1");
    assert_eq!(candidate.filename, "latin1.txt");
    assert!(candidate.is_empty());
}

#[tokio::test]
async fn test_skill_extraction_from_fixture() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();

    let skills = SkillExtractor::with_defaults().unwrap().extract(&job);

    assert!(skills[&SkillCategory::ProgrammingLanguages].contains("python"));
    assert!(skills[&SkillCategory::Frameworks].contains("django"));
    assert!(skills[&SkillCategory::Databases].contains("postgresql"));
    assert!(skills[&SkillCategory::Databases].contains("redis"));
    assert!(skills[&SkillCategory::CloudDevops].contains("kubernetes"));
    assert!(skills[&SkillCategory::SoftSkills].contains("agile"));
    assert!(skills[&SkillCategory::SoftSkills].contains("communication"));
    assert!(skills[&SkillCategory::DataScience].is_empty());
}

#[tokio::test]
async fn test_rank_fixture_candidates_with_jaccard() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let candidates = manager
        .load_candidates(&["tests/fixtures/baker.txt", "tests/fixtures/sample_resume.txt"])
        .await;

    let outcome = matcher(Arc::new(JaccardBackend::new()))
        .rank(&job, candidates)
        .await
        .unwrap();

    assert_eq!(outcome.total_candidates, 2);
    assert_eq!(outcome.backend, SimilarityBackendKind::Jaccard);

    let best = &outcome.recommendations[0];
    assert_eq!(best.name, "sample_resume");
    assert!(best.similarity_score > outcome.recommendations[1].similarity_score);
    assert_eq!(best.skill_matches[&SkillCategory::Frameworks], vec!["django".to_string()]);
    assert!(best.skill_matches[&SkillCategory::CloudDevops].contains(&"docker".to_string()));
    assert!(!best.skill_matches.contains_key(&SkillCategory::BusinessDomain));
    assert!(best.ai_summary.starts_with("This candidate has a similarity score of"));
    assert!(best.ai_summary.contains("Key matching skills:"));

    let baker = &outcome.recommendations[1];
    assert!(baker.skill_matches.is_empty());
    assert_eq!(baker.skill_summary, NO_MATCHES_SUMMARY);
    assert!(baker.top_skills.is_empty());
}

#[tokio::test]
async fn test_rank_with_tfidf_scores_in_range() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let candidates = manager
        .load_candidates(&["tests/fixtures/sample_resume.md", "tests/fixtures/baker.txt"])
        .await;

    let outcome = matcher(Arc::new(TfidfBackend::new(1000)))
        .rank(&job, candidates)
        .await
        .unwrap();

    assert_eq!(outcome.recommendations[0].name, "sample_resume");
    for result in &outcome.recommendations {
        assert!((0.0..=1.0).contains(&result.similarity_score));
    }
    assert_eq!(outcome.recommendations[1].similarity_score, 0.0);
}

#[tokio::test]
async fn test_manual_candidates_with_embedded_job() {
    let manager = InputManager::new();
    let batch = manager
        .load_manual_candidates(Path::new("tests/fixtures/candidates.json"))
        .await
        .unwrap();

    let job = batch.job_description.clone().unwrap();
    assert_eq!(batch.candidates.len(), 2);
    assert_eq!(batch.candidates[1].name, "Candidate 2");
    assert_eq!(batch.candidates[1].filename, "manual_input_2.txt");

    let outcome = matcher(Arc::new(JaccardBackend::new()))
        .rank(&job, batch.candidates)
        .await
        .unwrap();

    let ada = &outcome.recommendations[0];
    assert_eq!(ada.name, "Ada");
    assert_eq!(
        ada.skill_matches[&SkillCategory::Frameworks],
        vec!["react".to_string()]
    );
    assert_eq!(
        ada.skill_matches[&SkillCategory::ProgrammingLanguages],
        vec!["typescript".to_string()]
    );
}

#[tokio::test]
async fn test_rank_rejects_empty_requests() {
    let ranker = matcher(Arc::new(JaccardBackend::new()));
    let mut manager = InputManager::new();
    let candidates = manager
        .load_candidates(&["tests/fixtures/sample_resume.txt"])
        .await;

    let result = ranker.rank("   ", candidates).await;
    assert!(matches!(result, Err(MatcherError::InvalidInput(_))));

    let result = ranker.rank("Python developer", Vec::new()).await;
    assert!(matches!(result, Err(MatcherError::InvalidInput(_))));
}

#[tokio::test]
async fn test_missing_embedding_model_falls_back_to_tfidf() {
    let models_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.similarity.models_dir = models_dir.path().to_path_buf();
    config.similarity.embedding_model = "missing-model".to_string();

    let backend = load_backend(SimilarityBackendKind::Embedding, &config).await;
    assert_eq!(backend.kind(), SimilarityBackendKind::Tfidf);
}

#[tokio::test]
async fn test_config_extra_skills_reach_extractor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[matching]\nword_boundary = true\n\n[matching.extra_skills]\ntools_platforms = [\"postman\"]\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let vocabulary = SkillVocabulary::with_extra_skills(&config.matching.extra_skills).unwrap();
    let extractor = SkillExtractor::new(Arc::new(vocabulary), config.matching.word_boundary).unwrap();

    let skills = extractor.extract("API testing with Postman and Git");
    assert!(skills[&SkillCategory::ToolsPlatforms].contains("postman"));
    assert!(skills[&SkillCategory::ToolsPlatforms].contains("git"));
}

#[tokio::test]
async fn test_report_renders_in_every_format() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let candidates = manager
        .load_candidates(&["tests/fixtures/sample_resume.txt"])
        .await;

    let outcome = matcher(Arc::new(JaccardBackend::new()))
        .rank(&job, candidates)
        .await
        .unwrap();
    let report = MatchReport::from_outcome(outcome, "tests/fixtures/job_description.txt", None);
    let generator = ReportGenerator::with_options(false, true, true, true);

    let console = generator.generate_report(&report, OutputFormat::Console).unwrap();
    assert!(console.contains("sample_resume"));

    let json = generator.generate_report(&report, OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["recommendations"][0]["name"], "sample_resume");

    let markdown = generator.generate_report(&report, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("sample_resume"));
}
