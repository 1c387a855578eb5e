//! Candidate matcher: rank job candidates against a job description

use candidate_matcher::cli::{self, Cli, Commands, ConfigAction, JobSource, ModelAction};
use candidate_matcher::config::Config;
use candidate_matcher::error::{MatcherError, Result};
use candidate_matcher::input::file_detector::FileType;
use candidate_matcher::input::{Candidate, InputManager};
use candidate_matcher::llm::{CandidateSummarizer, CompletionProvider, OpenAiClient};
use candidate_matcher::output::formatter::save_report_to_file;
use candidate_matcher::output::{MatchReport, ReportGenerator};
use candidate_matcher::processing::embedding_manager::EmbeddingModelManager;
use candidate_matcher::processing::similarity::{load_backend, JaccardBackend};
use candidate_matcher::processing::tfidf::TfidfBackend;
use candidate_matcher::processing::{
    match_skills, similarity, summarize, CandidateMatcher, MatchSettings, SkillExtractor, SkillVocabulary,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            candidates,
            candidates_json,
            backend,
            top,
            max_results,
            no_llm,
            output,
            save,
            detailed,
        } => {
            info!("Starting candidate ranking");

            if let Some(backend) = backend {
                config.similarity.backend = cli::parse_backend(&backend).map_err(MatcherError::InvalidInput)?;
            }
            if let Some(top) = top {
                config.matching.top_skills = top;
            }
            if let Some(max_results) = max_results {
                config.matching.max_results = max_results;
            }
            if let Some(output) = output {
                config.output.format = cli::parse_output_format(&output).map_err(MatcherError::InvalidInput)?;
            }
            if detailed {
                config.output.detailed = true;
            }

            cli::check_job_source(&job, candidates_json.as_deref()).map_err(MatcherError::InvalidInput)?;

            let mut input_manager = InputManager::new();
            let given_job = explicit_job(&mut input_manager, &job).await?;

            let mut pool: Vec<Candidate> = Vec::new();
            let mut embedded_job = None;
            if let Some(json_path) = &candidates_json {
                let batch = input_manager.load_manual_candidates(json_path).await?;
                info!("Loaded {} manual candidates from {}", batch.candidates.len(), json_path.display());
                pool.extend(batch.candidates);
                embedded_job = batch.job_description;
            }

            let (job_text, job_label) = match (given_job, embedded_job) {
                (Some(explicit), _) => explicit,
                (None, Some(text)) => (text, "candidates JSON".to_string()),
                (None, None) => {
                    return Err(MatcherError::InvalidInput("Job description is required".to_string()))
                }
            };

            for path in &candidates {
                if !FileType::from_path(path).is_supported() {
                    warn!("Candidate {} has an unsupported file type and will be empty", path.display());
                }
            }
            pool.extend(input_manager.load_candidates(&candidates).await);

            let backend = load_backend(config.similarity.backend, &config).await;
            let extractor = Arc::new(build_extractor(&config)?);

            let provider = if no_llm { None } else { completion_provider(&config)? };
            let llm_model = provider.as_ref().map(|_| config.llm.model.clone());
            let summarizer = Arc::new(CandidateSummarizer::new(provider));

            let summaries = if summarizer.has_provider() { "LLM" } else { "template" };
            let matcher = CandidateMatcher::new(extractor, backend, summarizer, MatchSettings::from(&config));

            println!("🚀 Candidate ranking");
            println!("💼 Job Description: {}", job_label);
            println!("👥 Candidates: {}", pool.len());
            println!("🔧 Backend: {}", matcher.backend_kind());
            println!("📝 Summaries: {}", summaries);

            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message(format!("Ranking {} candidates...", pool.len()));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let outcome = matcher.rank(&job_text, pool).await;
            spinner.finish_and_clear();
            let outcome = outcome?;

            info!(
                "Ranked {} candidates in {} ms",
                outcome.total_candidates, outcome.processing_time_ms
            );

            let report = MatchReport::from_outcome(outcome, job_label, llm_model);
            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, config.output.format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("✅ Report saved to: {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Skills { file, text, json } => {
            let text = match (file, text) {
                (Some(path), _) => InputManager::new().extract_text(&path).await?,
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(MatcherError::InvalidInput(
                        "Provide a file or --text to scan".to_string(),
                    ))
                }
            };

            let extractor = build_extractor(&config)?;
            let skills = extractor.extract(&text);

            if json {
                println!("{}", serde_json::to_string_pretty(&skills)?);
            } else {
                println!("🔍 Extracted skills\n");
                let generator = ReportGenerator::with_options(config.output.color_output, false, true, false);
                println!("{}", generator.console().format_extracted_skills(&skills));
            }
        }

        Commands::Compare { job, candidate } => {
            let mut input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;
            let candidate_text = input_manager.extract_text(&candidate).await?;

            let extractor = build_extractor(&config)?;
            let job_skills = extractor.extract(&job_text);
            let candidate_skills = extractor.extract(&candidate_text);
            let matches = match_skills(&job_skills, &candidate_skills);
            let summary = summarize(&matches, config.matching.top_skills);

            let generator = ReportGenerator::with_options(config.output.color_output, true, true, false);
            let console = generator.console();

            println!("⚖️  Comparing {} with {}\n", candidate.display(), job.display());
            println!("💼 Job skills\n{}", console.format_extracted_skills(&job_skills));
            println!("👤 Candidate skills\n{}", console.format_extracted_skills(&candidate_skills));
            println!("🤝 Matches\n{}", console.format_skill_matches(&matches));
            println!("📝 {}", summary.text);
            if !summary.top_skills.is_empty() {
                println!("⭐ Top skills: {}", summary.top_skills.join(", "));
            }

            let jaccard = similarity(&job_text, &candidate_text, &JaccardBackend::new());
            let tfidf = similarity(
                &job_text,
                &candidate_text,
                &TfidfBackend::new(config.similarity.tfidf_max_features),
            );
            println!("\n📊 Similarity");
            println!("  Jaccard: {:.3}", jaccard);
            println!("  TF-IDF:  {:.3}", tfidf);
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("📋 Embedding models\n");
                    for model in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(&model.id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        println!("{} ({})", model.name, model.id);
                        println!("  Repository: {}", model.repo_id);
                        println!("  Size: {} MB, {} dimensions", model.size_mb, model.dimensions);
                        println!("  {}", model.description);
                        println!("  Status: {}\n", status);
                    }
                    println!("📁 Models directory: {}", manager.models_dir().display());
                }

                ModelAction::Download { model } => {
                    let model_id = manager
                        .resolve_model_id(&model)
                        .ok_or_else(|| MatcherError::Embedding(format!("Unknown embedding model: {}", model)))?;

                    if manager.is_model_downloaded(&model_id) {
                        println!("✅ Model '{}' is already downloaded!", model_id);
                        return Ok(());
                    }

                    println!("📥 Downloading model: {}", model_id);
                    let path = manager.download_model(&model_id).await?;
                    println!("✅ Model '{}' downloaded successfully!", model_id);
                    println!("📁 Location: {}", path.display());
                }
            }
        }

        Commands::Config { action } => {
            let path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;
                    println!("{}", rendered);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

/// The job description given on the command line, if any
async fn explicit_job(input_manager: &mut InputManager, source: &JobSource) -> Result<Option<(String, String)>> {
    if let Some(path) = &source.job {
        cli::validate_file_extension(path, &["pdf", "txt", "md", "markdown"])
            .map_err(|e| MatcherError::InvalidInput(format!("Job description file: {}", e)))?;
        let text = input_manager.extract_text(path).await?;
        return Ok(Some((text, path.display().to_string())));
    }
    Ok(source
        .job_text
        .as_ref()
        .map(|text| (text.clone(), "inline text".to_string())))
}

fn build_extractor(config: &Config) -> Result<SkillExtractor> {
    let vocabulary = SkillVocabulary::with_extra_skills(&config.matching.extra_skills)?;
    SkillExtractor::new(Arc::new(vocabulary), config.matching.word_boundary)
}

/// The configured LLM client, or None when summaries should come from the template
fn completion_provider(config: &Config) -> Result<Option<Arc<dyn CompletionProvider>>> {
    if !config.llm.enabled {
        return Ok(None);
    }
    match config.llm_api_key() {
        Some(key) => {
            let client = OpenAiClient::new(&config.llm, key)?;
            info!("Using LLM summaries via {}", client.endpoint());
            let provider: Arc<dyn CompletionProvider> = Arc::new(client);
            Ok(Some(provider))
        }
        None => {
            warn!(
                "LLM summaries enabled but {} is not set, using template summaries",
                config.llm.api_key_env
            );
            Ok(None)
        }
    }
}
