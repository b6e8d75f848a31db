use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

mod agent_executor;
mod progress;

use agent_executor::AgentExecutor;
use progress::WriteProgress;
use ai_team::contexts::task_analysis::{analyze as analyze_task, classify_task_type, identify_affected_areas, TaskAnalysis};
use ai_team::contexts::{CodeExtraction, ExecutionResult, ExtractionResult, FileWriter, TaskRequest};
use ai_team::data::{AffectedArea, ResolvedFile, TaskMetadata, TaskType};
use ai_team::settings::Settings;

#[derive(Clone, Copy)]
pub struct Config {
    pub verbose: bool,
    pub dry_run: bool,
}

/// Where and how extracted files are written
pub struct OutputOptions {
    pub output: PathBuf,
    pub backup: bool,
    pub json: bool,
}

pub struct ExtractOptions {
    pub input: Option<PathBuf>,
    pub task_type: Option<String>,
    pub areas: Vec<String>,
    pub output: OutputOptions,
}

pub struct GenerateOptions {
    pub description: String,
    pub title: Option<String>,
    pub task_type: Option<String>,
    pub areas: Vec<String>,
    pub agents_dir: Option<PathBuf>,
    pub no_cache: bool,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct FailedWrite {
    path: String,
    error: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    task: &'a TaskMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    cached: bool,
    fallback: bool,
    dry_run: bool,
    files: &'a [ResolvedFile],
    modified_files: &'a [String],
    failed: Vec<FailedWrite>,
    summary: &'a str,
}

#[derive(Serialize)]
struct JsonAnalysis<'a> {
    title: &'a str,
    task_type: TaskType,
    affected_areas: &'a [AffectedArea],
    #[serde(flatten)]
    analysis: &'a TaskAnalysis,
}

/// Extracts code blocks from a saved LLM response (file or stdin) and writes them.
pub async fn extract(options: ExtractOptions, config: &Config) -> Result<()> {
    let raw = read_input(options.input.as_deref())?;
    let metadata = build_metadata(None, options.task_type.as_deref(), &options.areas);

    let result = CodeExtraction::new(&raw, &metadata).run();

    write_and_report(&result, &metadata, None, &options.output, config)
}

/// Prints the heuristic classification of a task.
pub async fn analyze(description: String, title: Option<String>, json: bool) -> Result<()> {
    let title = title.unwrap_or_else(|| description.clone());
    let metadata = build_metadata(Some(&description), None, &[]);
    let analysis = analyze_task(&title, metadata.task_type);

    if json {
        let report = JsonAnalysis {
            title: &title,
            task_type: metadata.task_type,
            affected_areas: &metadata.affected_areas,
            analysis: &analysis,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Type:         {}", metadata.task_type);
    println!("Areas:        {}", join(&metadata.affected_areas));
    println!("Complexity:   {}", analysis.complexity);
    println!("Scope:        {}", analysis.scope);
    println!("Priority:     {}", analysis.priority);
    if !analysis.patterns.is_empty() {
        println!("Patterns:     {}", analysis.patterns.join(", "));
    }
    for group in &analysis.technologies {
        println!("Technologies: {} ({})", group.techs.join(", "), group.category);
    }

    Ok(())
}

/// Prints the prompt that `generate` would send, without calling any model.
pub async fn prompt(
    title: String,
    description: Option<String>,
    task_type: Option<String>,
    agents_dir: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let description = description.unwrap_or_default();
    let text = format!("{} {}", title, description);
    let metadata = build_metadata(Some(&text), task_type.as_deref(), &[]);

    let executor = AgentExecutor::new(agents_dir, false, Settings::default(), config)?;
    let specification = executor.prompt(&TaskRequest::new(&title, &description, metadata))?;

    if config.verbose {
        println!("# template: {}\n", specification.template_name);
    }
    println!("{}", specification.prompt);

    Ok(())
}

/// Asks the model for code, then extracts and writes it.
pub async fn generate(options: GenerateOptions, config: &Config) -> Result<()> {
    let title = options.title.unwrap_or_default();
    let text = format!("{} {}", title, options.description);
    let metadata = build_metadata(Some(&text), options.task_type.as_deref(), &options.areas);

    let use_cache = cache_enabled(options.no_cache, config);
    let executor = AgentExecutor::new(options.agents_dir, use_cache, Settings::load(), config)?;
    let request = TaskRequest::new(&title, &options.description, metadata.clone());

    let execution = executor.execute(request).await?;
    if execution.fallback {
        eprintln!("⚠ The model could not be reached; writing the fallback template instead");
    } else if execution.cached && config.verbose {
        println!("⊚ Using cached answer from {}", execution.model);
    }

    let result = CodeExtraction::new(&execution.output, &metadata).run();
    if result.files.is_empty() {
        warn!("The answer contained no code blocks");
    }

    write_and_report(&result, &metadata, Some(&execution), &options.output, config)
}

/// Reports which credentials are configured and validates the Together.ai key.
pub async fn check(config: &Config) -> Result<()> {
    let executor = AgentExecutor::new(None, false, Settings::load(), config)?;
    let settings = executor.settings();

    let huggingface = if settings.huggingface_token.is_some() { "configured" } else { "missing" };
    println!("Hugging Face token: {}", huggingface);
    println!("Cache directory:    {}", settings.cache_dir.display());

    if settings.together_api_key.is_none() {
        println!("Together.ai key:    missing");
        anyhow::bail!("TOGETHER_AI_API_KEY is not set");
    }

    if config.dry_run {
        println!("Together.ai key:    configured (not verified in dry run)");
        return Ok(());
    }

    executor.verify_credentials().await?;
    println!("Together.ai key:    ✓ valid");

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read standard input")?;
            Ok(raw)
        }
    }
}

/// Explicit flags win; otherwise the keyword heuristics run on `text`.
fn build_metadata(text: Option<&str>, task_type: Option<&str>, areas: &[String]) -> TaskMetadata {
    let task_type = match task_type {
        Some(value) => {
            let parsed = TaskType::parse(value);
            if !parsed.as_str().eq_ignore_ascii_case(value.trim()) {
                warn!("Unknown task type '{}', using {}", value, parsed);
            }
            parsed
        }
        None => text.map(classify_task_type).unwrap_or_default(),
    };

    let mut affected_areas = Vec::new();
    for value in areas {
        match AffectedArea::parse(value) {
            Some(area) if !affected_areas.contains(&area) => affected_areas.push(area),
            Some(_) => {}
            None => warn!("Ignoring unknown area '{}'", value),
        }
    }

    if affected_areas.is_empty() {
        if let Some(text) = text {
            affected_areas = identify_affected_areas(text);
        }
    }

    TaskMetadata::new(task_type, affected_areas)
}

fn write_and_report(
    result: &ExtractionResult,
    metadata: &TaskMetadata,
    execution: Option<&ExecutionResult>,
    options: &OutputOptions,
    config: &Config,
) -> Result<()> {
    let writer = FileWriter::new(&options.output).with_backups(options.backup);

    if options.json {
        let failed = if config.dry_run {
            Vec::new()
        } else {
            writer
                .write_all(&result.files)
                .failed
                .into_iter()
                .map(|(path, e)| FailedWrite {
                    path,
                    error: e.to_string(),
                })
                .collect()
        };

        let report = JsonReport {
            generated_at: Utc::now(),
            task: metadata,
            model: execution.map(|e| e.model.as_str()),
            cached: execution.is_some_and(|e| e.cached),
            fallback: execution.is_some_and(|e| e.fallback),
            dry_run: config.dry_run,
            files: &result.files,
            modified_files: &result.modified_files,
            failed,
            summary: &result.summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);

        if !report.failed.is_empty() {
            anyhow::bail!("{} file(s) could not be written", report.failed.len());
        }
        return Ok(());
    }

    print!("{}", result.summary);

    if config.dry_run {
        println!(
            "\nDry run: {} file(s) would be written to {}",
            result.files.len(),
            options.output.display()
        );
        return Ok(());
    }

    if result.files.is_empty() {
        return Ok(());
    }

    println!();
    let mut progress = WriteProgress::new(&options.output, result.files.len());
    for file in &result.files {
        progress.start_file(&file.path);
        let outcome = writer.write_file(file);
        match &outcome {
            Ok(written) if config.verbose => {
                println!("✓ Wrote {}", written.path.display());
                if let Some(backup) = &written.backup {
                    println!("  backup: {}", backup.display());
                }
            }
            Ok(_) => {}
            Err(e) => eprintln!("✗ {}", e),
        }
        progress.record(&file.path, outcome.as_ref());
    }
    progress.finish();

    if progress.failed() > 0 {
        anyhow::bail!("{} file(s) could not be written", progress.failed());
    }

    Ok(())
}

/// Dry runs neither read nor fill the response cache.
fn cache_enabled(no_cache: bool, config: &Config) -> bool {
    !no_cache && !config.dry_run
}

fn join(areas: &[AffectedArea]) -> String {
    areas.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_heuristics() {
        let meta = build_metadata(
            Some("Fix the API"),
            Some("Frontend"),
            &["testing".to_string(), "bogus".to_string(), "testing".to_string()],
        );
        assert_eq!(meta.task_type, TaskType::Frontend);
        assert_eq!(meta.affected_areas, vec![AffectedArea::Testing]);
    }

    #[test]
    fn test_heuristics_without_flags() {
        let meta = build_metadata(Some("Fix the API"), None, &[]);
        assert_eq!(meta.task_type, TaskType::BugFix);
        assert_eq!(meta.affected_areas, vec![AffectedArea::Backend]);
    }

    #[test]
    fn test_extract_without_text_or_flags() {
        let meta = build_metadata(None, None, &[]);
        assert_eq!(meta, TaskMetadata::default());
    }

    #[test]
    fn test_dry_run_disables_cache() {
        let live = Config { verbose: false, dry_run: false };
        let dry = Config { verbose: false, dry_run: true };
        assert!(cache_enabled(false, &live));
        assert!(!cache_enabled(true, &live));
        assert!(!cache_enabled(false, &dry));
    }

    #[test]
    fn test_unknown_task_type_is_feature() {
        assert_eq!(build_metadata(None, Some("chore"), &[]).task_type, TaskType::Feature);
    }
}
