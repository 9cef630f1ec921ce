//! Subtrans - batch subtitle translation
//!
//! Translates SRT files or whole folders of them, and generates subtitles
//! from media files with whisper before translating them with ollama.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subtrans::cli::{Args, Commands};
use subtrans::config::Config;
use subtrans::error::SubtransError;
use subtrans::language::LanguageRegistry;
use subtrans::translate::OllamaTranslator;
use subtrans::walker::WalkOptions;
use subtrans::workflow::{TranscribeOutcome, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match run(args.command, config).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_validation() => {
            report_validation_error(&e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(command: Commands, config: Config) -> subtrans::error::Result<()> {
    match command {
        Commands::Translate { path, source_lang, dest_lang, bilingual, recursive, force } => {
            let workflow = Workflow::new(config.clone())?;
            // Input validation runs before the ollama availability check
            workflow
                .languages()
                .ensure_all_supported(&[source_lang.as_str(), dest_lang.as_str()])?;
            if !path.is_file() && !path.is_dir() {
                return Err(SubtransError::InvalidPath(path.display().to_string()));
            }
            check_translator(&config).await?;

            let options = WalkOptions {
                source_language: source_lang,
                target_language: dest_lang,
                bilingual,
                force,
                recursive,
            };
            workflow.translate_existing(&path, options).await?;
        }
        Commands::Transcribe { media, source_lang, dest_lang, bilingual } => {
            let workflow = Workflow::new(config.clone())?;
            let dest_lang = dest_lang.filter(|code| !code.is_empty());
            let languages_ok = std::iter::once(source_lang.as_str())
                .chain(dest_lang.as_deref())
                .all(|code| workflow.languages().contains(code));
            if dest_lang.is_some() && languages_ok && media.is_file() {
                check_translator(&config).await?;
            }

            match workflow
                .transcribe_and_translate(&media, &source_lang, dest_lang.as_deref(), bilingual)
                .await?
            {
                TranscribeOutcome::Written { path, report } => {
                    info!(
                        "Subtitles written to {} ({} cue translation failure(s))",
                        path.display(),
                        report.failed
                    );
                }
                TranscribeOutcome::Skipped(path) => {
                    println!("'{}' file is already exist.", path.display());
                }
            }
        }
        Commands::Languages => {
            println!("The following languages are supported:");
            println!("{}", LanguageRegistry::default().listing());
        }
    }

    info!("Subtrans completed successfully");
    Ok(())
}

async fn check_translator(config: &Config) -> subtrans::error::Result<()> {
    OllamaTranslator::new(config.translate.clone(), LanguageRegistry::default())?
        .check_availability()
        .await
}

/// Print a validation failure with its remedy
fn report_validation_error(error: &SubtransError) {
    println!("{}", error);
    if let SubtransError::UnsupportedLanguage(_) = error {
        println!("The following languages are supported:");
        println!("{}", LanguageRegistry::default().listing());
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".subtrans").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "subtrans.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("subtrans.log").display());

    Ok(())
}
