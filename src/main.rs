// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use yaltwai::app_config::{self, Config, TranslationProvider};
use yaltwai::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate source locale files into a target locale
    Translate(TranslateArgs),

    /// Check YAML files and repair known token errors in place
    Fix(FixArgs),

    /// Generate shell completions for yaltwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Target locale code (e.g. 'fr', 'ja', 'pt-BR')
    #[arg(value_name = "LOCALE")]
    target_language: String,

    /// Source locale code
    #[arg(long = "from", value_name = "LOCALE")]
    source_language: Option<String>,

    /// Locale file or directory to translate
    #[arg(long, default_value = "config/locales")]
    path: PathBuf,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Keep a .bak copy of existing translations before overwriting them
    #[arg(short, long)]
    backup: bool,

    /// Translate even when the target is newer than the source
    #[arg(short, long)]
    force: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", env = "YALTWAI_CONFIG")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct FixArgs {
    /// YAML file or directory to check
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Keep a .bak copy of every file before rewriting it
    #[arg(short, long)]
    backup: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", env = "YALTWAI_CONFIG")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// YALTwAI - Yet Another Locale Translator with AI
///
/// Translates YAML locale files with AI providers while keeping keys,
/// placeholders, anchors and layout intact.
#[derive(Parser, Debug)]
#[command(name = "yaltwai")]
#[command(version)]
#[command(about = "AI-powered YAML locale translation tool")]
#[command(long_about = "YALTwAI translates YAML locale files using AI providers and repairs the YAML it gets back.

EXAMPLES:
    yaltwai translate fr                              # Translate config/locales from English to French
    yaltwai translate ja --path config/locales/en.yml # Translate a single file
    yaltwai translate de -p anthropic -m claude-3-haiku-20240307
    yaltwai translate es --force --backup             # Retranslate everything, keeping .bak copies
    yaltwai fix config/locales/fr.yml                 # Repair placeholders in an existing translation
    yaltwai completions bash > yaltwai.bash           # Generate bash completions

RULES:
    Instructions in .yaltwairules (all locales) and .yaltwairules.<locale> files are
    added to the prompt, read from the current directory down to the translated path.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (OPENAI_API_KEY or YALTWAI_OPENAI_API_KEY)
    anthropic - Anthropic API (ANTHROPIC_API_KEY)
    ollama    - Local Ollama server
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yaltwai", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Fix(args) => run_fix(args),
    }
}

fn load_config(config_path: &Path, log_level: &Option<CliLogLevel>) -> Result<Config> {
    if !config_path.exists() {
        warn!("Config file not found at {:?}, using defaults.", config_path);
    }
    let mut config = Config::load_or_default(config_path)?;

    // Update log level in config if specified via command line
    if let Some(log_level) = log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, &options.log_level)?;

    // Override config with CLI options if provided
    config.target_language = options.target_language.clone();
    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.set_model(model.clone());
    }
    if options.backup {
        config.pipeline.backup = true;
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    if !options.path.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", options.path));
    }

    info!(
        "Translating {:?} from {} to {} with {} ({})",
        options.path,
        config.source_language,
        config.target_language,
        config.translation.provider.display_name(),
        config.translation.get_model()
    );

    let controller = Controller::with_config(config)?;
    let summary = controller.run(options.path.clone(), options.force).await?;

    if summary.failed > 0 {
        return Err(anyhow!("{} file(s) failed to translate", summary.failed));
    }
    Ok(())
}

fn run_fix(options: FixArgs) -> Result<()> {
    let config = load_config(&options.config_path, &options.log_level)?;

    let controller = Controller::with_config(config)?;
    let summary = controller.fix_path(&options.path, options.backup)?;

    if summary.needs_retranslation > 0 {
        warn!("{} file(s) need to be translated again", summary.needs_retranslation);
    }
    Ok(())
}
