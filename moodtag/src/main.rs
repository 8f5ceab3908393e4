//! moodtag command-line entry point
//!
//! Scans a folder, tags every supported audio file with its BPM and a mood
//! label, and prints one progress line per file. Only setup problems
//! (configuration, catalog, input folder, logging) produce a non-zero exit.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodtag::analysis::{ExternalDecoder, SignalFeatureExtractor};
use moodtag::scanner::FileScanner;
use moodtag::tags::FileTags;
use moodtag::{MoodCatalog, PipelineOptions, TaggingPipeline};
use moodtag_common::config::{
    resolve_decoder_path, resolve_input_folder, MoodCategoryConfig, TomlConfig, INPUT_FOLDER_ENV,
};

/// Command-line arguments for moodtag
#[derive(Parser, Debug)]
#[command(name = "moodtag")]
#[command(about = "Tag audio files with their tempo and a mood label")]
#[command(version)]
struct Args {
    /// Folder to scan recursively for audio files
    input_folder: Option<PathBuf>,

    /// File extension to include (repeatable; default from config: mp3, flac)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Read tags back after writing
    #[arg(long, overrides_with = "no_verify")]
    verify: bool,

    /// Skip read-back verification
    #[arg(long = "no-verify", overrides_with = "verify")]
    no_verify: bool,

    /// ffmpeg-compatible decoder used when built-in decoding fails
    #[arg(long, value_name = "PATH")]
    decoder: Option<PathBuf>,

    /// Configuration file (default: user config dir, then /etc/moodtag)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Analyze and classify without writing tags
    #[arg(long)]
    dry_run: bool,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print the active mood catalog as TOML and exit
    #[arg(long)]
    list_moods: bool,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "moodtag=trace")
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn verify(&self, config: &TomlConfig) -> bool {
        if self.no_verify {
            false
        } else if self.verify {
            true
        } else {
            config.verify
        }
    }
}

#[derive(Serialize)]
struct MoodList<'a> {
    moods: &'a [MoodCategoryConfig],
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, config.logging.file.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        built = env!("BUILD_TIMESTAMP"),
        profile = env!("BUILD_PROFILE"),
        "Starting moodtag"
    );
    match &config_path {
        Some(path) => info!("Configuration: {}", path.display()),
        None => warn!("No configuration file found, using built-in defaults"),
    }

    let catalog = match &config.moods {
        Some(entries) => MoodCatalog::from_config(entries)
            .context("Invalid [[moods]] table in configuration")?,
        None => MoodCatalog::builtin(),
    };

    if args.list_moods {
        let moods = catalog.to_config();
        let listing = toml::to_string(&MoodList { moods: &moods })
            .context("Failed to render mood catalog")?;
        print!("{}", listing);
        return Ok(());
    }

    let input_folder = resolve_input_folder(args.input_folder.as_deref(), &config)
        .with_context(|| {
            format!(
                "No input folder: pass INPUT_FOLDER, set {}, or set input_folder in the config file",
                INPUT_FOLDER_ENV
            )
        })?;

    let extensions = if args.extensions.is_empty() {
        config.normalized_extensions()
    } else {
        args.extensions.clone()
    };

    let files = FileScanner::new(&extensions)
        .scan(&input_folder)
        .with_context(|| format!("Failed to scan {}", input_folder.display()))?;

    if files.is_empty() {
        println!("No audio files found in {}", input_folder.display());
        return Ok(());
    }

    let extractor = match resolve_decoder_path(args.decoder.as_deref(), &config) {
        Some(path) => {
            info!("External decoder: {}", path.display());
            SignalFeatureExtractor::with_fallback(ExternalDecoder::new(path))
        }
        None => SignalFeatureExtractor::new(),
    };

    let options = PipelineOptions {
        verify: args.verify(&config),
        dry_run: args.dry_run,
    };
    let pipeline = TaggingPipeline::new(&catalog, extractor, FileTags::new(), options);

    let total = files.len();
    let summary = pipeline.run(&files, |report| {
        let line = report.progress_line(total);
        if args.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    });

    if args.json {
        eprintln!("{}", summary.summary_line());
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        println!("{}", summary.summary_line());
    }

    Ok(())
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level`. Output goes to `file` (appended, no ANSI)
/// when configured, stderr otherwise.
fn init_logging(level: &str, file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {}", level))?;

    let (file_layer, stderr_layer) = match file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false);
            (Some(layer), None)
        }
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
