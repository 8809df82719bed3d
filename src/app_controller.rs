/*!
 * Application controller for locale file translation.
 *
 * Drives the translate workflow over files and folders, and the in-place
 * repair workflow of the `fix` command.
 */

use anyhow::{anyhow, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation::{DocumentTranslator, RuleSet, TranslationService};
use crate::validation::{RepairReport, SyntaxIssue, SyntaxRepairEngine};

/// Result of translating one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Full translation attempts used
    pub attempts: usize,
    /// Line patches applied by the repair engine
    pub fixes_applied: usize,
    /// Syntax problem left in the written file, if any
    pub unresolved: Option<SyntaxIssue>,
}

/// Counters for a translate run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files translated and written
    pub translated: usize,
    /// Files skipped because the target is up to date
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
    /// Written files that still fail to parse
    pub unresolved: usize,
}

/// Counters for a fix run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSummary {
    /// Files parsed
    pub checked: usize,
    /// Files rewritten with patches
    pub repaired: usize,
    /// Files left with a syntax problem no pattern can fix
    pub unfixable: usize,
    /// Files whose structure is broken beyond line patches
    pub needs_retranslation: usize,
}

/// Main application controller for locale translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Chunked document translator
    translator: DocumentTranslator,
    // @field: Syntax repair engine
    repair_engine: SyntaxRepairEngine,
    // @field: Directory rule discovery starts from
    working_dir: PathBuf,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(config.translation.clone())?;
        Ok(Self::with_service(config, service))
    }

    // @method: Create a controller around an existing translation service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        let translator = DocumentTranslator::new(service, config.pipeline.lines_per_chunk);
        let repair_engine = SyntaxRepairEngine::new(config.pipeline.max_repair_passes);
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            config,
            translator,
            repair_engine,
            working_dir,
        }
    }

    // @method: Set the directory rule discovery starts from
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate a source file into a target file.
    ///
    /// The translation is written, re-read and repaired. Structural corruption
    /// discards the target and starts over, up to `max_file_attempts` times.
    /// No target written by this call is left behind when it fails.
    pub async fn translate_file(
        &self,
        source: &Path,
        target: &Path,
        source_language: &str,
        target_language: &str,
        rules: &RuleSet,
    ) -> Result<FileOutcome, AppError> {
        self.translate_file_with_progress(source, target, source_language, target_language, rules, None)
            .await
    }

    async fn translate_file_with_progress(
        &self,
        source: &Path,
        target: &Path,
        source_language: &str,
        target_language: &str,
        rules: &RuleSet,
        multi_progress: Option<&MultiProgress>,
    ) -> Result<FileOutcome, AppError> {
        let max_attempts = self.config.pipeline.max_file_attempts.max(1);
        let mut backup_checked = false;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("Translating {:?} -> {:?} (attempt {}/{})", source, target, attempt, max_attempts);

            let source_text = FileManager::read_to_string(source).map_err(file_error)?;

            let progress_bar = chunk_progress_bar(multi_progress);
            let bar = progress_bar.clone();
            let translated = self
                .translator
                .translate_document(&source_text, source_language, target_language, rules, move |done, total| {
                    bar.set_length(total as u64);
                    bar.set_position(done as u64);
                })
                .await;
            progress_bar.finish_and_clear();

            // Earlier attempts have already removed what they wrote
            let translated = translated?;

            if !backup_checked {
                backup_checked = true;
                if self.config.pipeline.backup && target.is_file() {
                    let backup = FileManager::backup_file(target).map_err(file_error)?;
                    info!("Backed up existing translation to {:?}", backup);
                }
            }

            match self.write_and_repair(target, &translated) {
                Ok(report) => {
                    for fix in &report.fixes {
                        debug!("{:?}:{} fixed with {}", target, fix.line_number, fix.pattern.name());
                    }
                    if let Some(issue) = report.unresolved() {
                        warn!("{:?} still has a syntax problem: {}", target, issue);
                    }

                    return Ok(FileOutcome {
                        attempts: attempt,
                        fixes_applied: report.fixes.len(),
                        unresolved: report.unresolved().cloned(),
                    });
                }
                Err(e) => {
                    discard_target(target);

                    if !e.needs_retranslation() {
                        return Err(e);
                    }
                    if attempt >= max_attempts {
                        error!("Giving up on {:?} after {} attempts: {}", source, attempt, e);
                        return Err(e);
                    }
                    warn!("{} (attempt {}/{}), translating {:?} again", e, attempt, max_attempts, source);
                }
            }
        }
    }

    // @method: Write a translation, then re-read and repair it in place
    // @returns: Repair report; on error the target must be discarded
    fn write_and_repair(&self, target: &Path, translated: &str) -> Result<RepairReport, AppError> {
        FileManager::write_to_file(target, translated).map_err(file_error)?;

        let written_text = FileManager::read_to_string(target).map_err(file_error)?;
        let report = self.repair_engine.repair(&written_text)?;
        if report.content != written_text {
            FileManager::write_to_file(target, &report.content).map_err(file_error)?;
        }
        Ok(report)
    }

    /// Run the translate workflow on a file or a directory
    pub async fn run(&self, path: PathBuf, force: bool) -> Result<RunSummary> {
        if path.is_dir() {
            return self.run_folder(path, force).await;
        }
        if !path.is_file() {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        }

        let source_language = &self.config.source_language;
        if !FileManager::is_source_locale_file(&path, source_language) {
            return Err(anyhow!("{:?} is not a '{}' locale file", path, source_language));
        }

        let mut summary = RunSummary::default();
        self.process_file(&path, force, None, &mut summary).await;
        if summary.failed > 0 {
            return Err(anyhow!("Translation of {:?} failed", path));
        }
        Ok(summary)
    }

    /// Run the workflow in folder mode, translating every source locale file below a directory.
    /// Each file is independent; failures are logged and counted.
    pub async fn run_folder(&self, input_dir: PathBuf, force: bool) -> Result<RunSummary> {
        // Start timing the process
        let start_time = Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let source_language = &self.config.source_language;
        let source_files: Vec<PathBuf> = FileManager::find_yaml_files(&input_dir)?
            .into_iter()
            .filter(|path| FileManager::is_source_locale_file(path, source_language))
            .collect();

        if source_files.is_empty() {
            warn!("No '{}' locale files found in {:?}", source_language, input_dir);
            return Ok(RunSummary::default());
        }

        // Create multi-progress instance for multiple file processing
        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(source_files.len() as u64));
        folder_pb.set_style(progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut summary = RunSummary::default();
        for source in &source_files {
            let file_name = source
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            self.process_file(source, force, Some(&multi_progress), &mut summary).await;
            folder_pb.inc(1);
        }
        folder_pb.finish_and_clear();

        info!(
            "Folder processing completed in {}: {} translated, {} skipped, {} errors, {} with unresolved syntax issues",
            Self::format_duration(start_time.elapsed()),
            summary.translated,
            summary.skipped,
            summary.failed,
            summary.unresolved
        );

        Ok(summary)
    }

    async fn process_file(
        &self,
        source: &Path,
        force: bool,
        multi_progress: Option<&MultiProgress>,
        summary: &mut RunSummary,
    ) {
        let source_language = self.config.source_language.as_str();
        let target_language = self.config.target_language.as_str();

        let Some(target) = FileManager::generate_output_path(source, source_language, target_language) else {
            return;
        };

        if !force && FileManager::is_up_to_date(source, &target) {
            info!("Skipping {:?}, translation is up to date (use --force to translate again)", target);
            summary.skipped += 1;
            return;
        }

        let rules = match RuleSet::discover(source, target_language, &self.working_dir) {
            Ok(rules) => rules,
            Err(e) => {
                error!("Error reading translation rules for {:?}: {:#}", source, e);
                summary.failed += 1;
                return;
            }
        };
        if !rules.is_empty() {
            debug!("Using {} translation rule(s) for {:?}", rules.len(), source);
        }

        let start_time = Instant::now();
        match self
            .translate_file_with_progress(source, &target, source_language, target_language, &rules, multi_progress)
            .await
        {
            Ok(outcome) => {
                summary.translated += 1;
                if outcome.unresolved.is_some() {
                    summary.unresolved += 1;
                }
                info!(
                    "Success: {} ({} attempt(s), {} fix(es), {})",
                    target.display(),
                    outcome.attempts,
                    outcome.fixes_applied,
                    Self::format_duration(start_time.elapsed())
                );
            }
            Err(e) => {
                error!("Error processing file {:?}: {}", source, e);
                summary.failed += 1;
            }
        }
    }

    /// Validate and repair YAML files in place, without translating
    pub fn fix_path(&self, path: &Path, backup: bool) -> Result<FixSummary> {
        let files = if path.is_dir() {
            FileManager::find_yaml_files(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        };

        let mut summary = FixSummary::default();
        for file in &files {
            let original = FileManager::read_to_string(file)?;
            summary.checked += 1;

            let report = match self.repair_engine.repair(&original) {
                Ok(report) => report,
                Err(e) => {
                    warn!("{:?}: {}", file, e);
                    summary.needs_retranslation += 1;
                    continue;
                }
            };

            if report.content != original {
                if backup {
                    FileManager::backup_file(file)?;
                }
                FileManager::write_to_file(file, &report.content)?;
                summary.repaired += 1;
                info!("Fixed {} line(s) in {}", report.fixes.len(), file.display());
            }

            if let Some(issue) = report.unresolved() {
                warn!("{:?} could not be fixed: {}", file, issue);
                summary.unfixable += 1;
            }
        }

        info!(
            "Checked {} file(s): {} fixed, {} unfixable, {} need retranslation",
            summary.checked, summary.repaired, summary.unfixable, summary.needs_retranslation
        );
        Ok(summary)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

fn file_error(error: anyhow::Error) -> AppError {
    AppError::File(format!("{:#}", error))
}

fn discard_target(target: &Path) {
    match FileManager::remove_if_exists(target) {
        Ok(true) => debug!("Removed {:?}", target),
        Ok(false) => {}
        Err(e) => warn!("Failed to remove {:?}: {:#}", target, e),
    }
}

fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        ))
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

fn chunk_progress_bar(multi_progress: Option<&MultiProgress>) -> ProgressBar {
    let bar = ProgressBar::new(0);
    let bar = match multi_progress {
        Some(multi) => multi.add(bar),
        None => bar,
    };
    bar.set_style(progress_style("chunks"));
    bar
}
