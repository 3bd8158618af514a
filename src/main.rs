//! resume-relevance: score resumes against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_relevance::cli::{self, Cli, Commands, ConfigAction, DOCUMENT_EXTENSIONS};
use resume_relevance::config::{Config, OutputFormat};
use resume_relevance::input::InputManager;
use resume_relevance::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_relevance::processing::analyzer::{AnalysisEngine, ResumeInput};
use resume_relevance::storage::{Database, ResultSink};
use resume_relevance::{Result, ResumeRelevanceError};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Load configuration
    let config = match Config::load(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            job,
            resumes,
            output,
            save,
            detailed,
            compare,
            no_store,
        } => {
            cli::validate_file_extension(&job, DOCUMENT_EXTENSIONS)
                .map_err(|e| ResumeRelevanceError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeRelevanceError::InvalidInput)?,
                None => config.output.format,
            };

            info!("Scoring {} resume(s) against {}", resumes.len(), job.display());

            let mut input_manager = InputManager::new();
            let job_name = cli::display_name(&job);
            let jd_text = input_manager.extract_text(&job).await?;

            let mut inputs = Vec::with_capacity(resumes.len());
            for path in &resumes {
                let text = input_manager.extract_text(path).await;
                inputs.push(ResumeInput::new(cli::display_name(path), text));
            }

            let database = if config.storage.enabled && !no_store {
                match Database::open(&config.storage.database_path) {
                    Ok(db) => Some(db),
                    Err(e) => {
                        warn!("Results will not be stored: {}", e);
                        None
                    }
                }
            } else {
                None
            };
            let sink = database.as_ref().map(|db| db as &dyn ResultSink);

            let engine = AnalysisEngine::new(&config)?.with_progress(progress_bar(inputs.len()));
            let report = engine
                .analyze(&job_name, &jd_text, inputs, sink)
                .with_comparison(&compare, config.output.max_compare)?;

            let detailed = detailed || config.output.detailed;
            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(&output_format, &job_name, true))
                    } else {
                        path
                    };
                    let generator = ReportGenerator::with_options(false, detailed, true, true, true);
                    let content = generator.generate_report(&report, &output_format)?;
                    save_report_to_file(&content, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => {
                    let use_colors = config.output.color_output && output_format == OutputFormat::Console;
                    let generator = ReportGenerator::with_options(use_colors, detailed, true, true, true);
                    println!("{}", generator.generate_report(&report, &output_format)?);
                }
            }
        }

        Commands::Skills { file } => {
            cli::validate_file_extension(&file, DOCUMENT_EXTENSIONS).map_err(ResumeRelevanceError::InvalidInput)?;

            let text = InputManager::new().extract_text(&file).await?;
            let engine = AnalysisEngine::new(&config)?;
            let skills = engine.job_skills(Some(&text));

            if skills.is_empty() {
                println!("No known skills found in {}", file.display());
            } else {
                println!("Skills found in {} ({} of {}):", file.display(), skills.len(), engine.vocabulary().len());
                for skill in &skills {
                    println!("  • {}", skill);
                }
            }
        }

        Commands::History { limit } => {
            let db = Database::open(&config.storage.database_path)?;
            let results = db.recent_results(limit)?;
            if results.is_empty() {
                println!("No stored results.");
            }
            for r in results {
                println!(
                    "{}  {:<24} {:<24} {:>6.2}  {:<14} missing: {}",
                    r.timestamp,
                    r.resume_name,
                    r.jd_name,
                    r.score,
                    r.verdict,
                    if r.missing_keywords.is_empty() { "None" } else { r.missing_keywords.as_str() }
                );
            }
        }

        Commands::Audit { limit } => {
            let db = Database::open(&config.storage.database_path)?;
            let events = db.recent_events(limit)?;
            if events.is_empty() {
                println!("Audit trail is empty.");
            }
            for event in events {
                println!(
                    "{}  {:<18} {}",
                    event.timestamp,
                    event.event_type,
                    event.item_name.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Clear { yes } => {
            if !yes {
                return Err(ResumeRelevanceError::InvalidInput(
                    "Refusing to delete stored results without --yes".to_string(),
                ));
            }
            let db = Database::open(&config.storage.database_path)?;
            let removed = db.clear()?;
            println!("Deleted {} stored rows.", removed);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Configuration file: {}\n", config_path.display());
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeRelevanceError::Configuration(e.to_string()))?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults.");
            }

            Some(ConfigAction::Set { key, value }) => {
                config.set_value(&key, &value)?;
                config.save_to(config_path)?;
                println!("Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    match ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        Ok(style) => bar.with_style(style.progress_chars("=> ")),
        Err(_) => bar,
    }
}
