// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use lingport::app_config::{self, Config};
use lingport::file_utils::FileManager;
use lingport::import::check_site_reference;
use lingport::language_utils::validate_language_code;
use lingport::{
    EntryDecoder, ExportContainer, Importer, MalformedPolicy, Registry, SupportContext,
    TranslationEntry, language_codes_match,
};

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
    /// Render a JSON feed of entries into interchange files
    Export(ExportArgs),

    /// Read translations back from PO or XLIFF files
    Import(ImportArgs),

    /// List registered formats and whether they can be used
    Formats,

    /// Generate shell completions for lingport
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// JSON array of entries to export
    #[arg(value_name = "FEED")]
    feed: PathBuf,

    /// Filetype to write, e.g. 'po', 'xliff_1.2', 'xliff_2.1'
    #[arg(short, long)]
    format: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language used for entries that do not name one
    #[arg(short, long)]
    target_language: Option<String>,

    /// Directory the files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(long)]
    force: bool,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// File or directory to import
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Stop at the first malformed message or unit instead of skipping it
    #[arg(long)]
    abort_on_malformed: bool,

    /// Expected target language; files declaring another one are reported
    #[arg(short, long)]
    target_language: Option<String>,
}

/// lingport - translation interchange files
///
/// Exports translatable content to PO and XLIFF (1.2, 2.0, 2.1) and imports
/// the translated files back as JSON lines.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json", env = "LINGPORT_CONFIG")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// One feed item: an entry plus an optional per-entry target language
#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(flatten)]
    entry: TranslationEntry,

    #[serde(default)]
    target_language: Option<String>,
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
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());

            // stdout carries import results, logs go to stderr
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lingport", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config_path)?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(level_filter(&config.log_level));
    debug!("Using configuration from {}", cli.config_path);

    let registry = Registry::with_defaults();

    match cli.command {
        Commands::Export(args) => run_export(config, &registry, args),
        Commands::Import(args) => run_import(config, &registry, args),
        Commands::Formats => {
            list_formats(&registry);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn run_export(mut config: Config, registry: &Registry, args: ExportArgs) -> Result<()> {
    // Override config with CLI options if provided
    if let Some(format) = args.format {
        config.export.format = format;
    }
    if let Some(source_language) = args.source_language {
        config.source_language = source_language;
    }
    if let Some(target_language) = args.target_language {
        config.target_language = target_language;
    }
    if let Some(output_dir) = args.output_dir {
        config.export.output_dir = output_dir.to_string_lossy().to_string();
    }
    config.validate(registry)?;

    let items = read_feed(&args.feed)?;
    let mut container =
        ExportContainer::for_filetype(registry, &config.export.format, config.export_options())?;

    let mut dropped = 0usize;
    for item in items {
        let target_language = item
            .target_language
            .as_deref()
            .unwrap_or(&config.target_language);
        if let Err(e) = validate_language_code(target_language) {
            warn!("Skipping feed entry: {}", e);
            dropped += 1;
            continue;
        }
        let entry = item.entry;
        if !container.get(&config.source_language, target_language).add_entry(
            entry.reference,
            &entry.source,
            &entry.target,
        ) {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!("{} feed entries were incomplete or invalid and not exported", dropped);
    }

    for file in container.render_all() {
        let path = FileManager::write_rendered(&config.export.output_dir, &file, args.force)?;
        info!("Wrote {} ({})", path.display(), file.mime_type);
    }
    info!(
        "Exported {} language pair(s) as {}",
        container.count(),
        container.codec()
    );
    Ok(())
}

fn read_feed(path: &Path) -> Result<Vec<FeedItem>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open feed file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse feed file: {}", path.display()))
}

fn run_import(config: Config, registry: &Registry, args: ImportArgs) -> Result<()> {
    let policy = if args.abort_on_malformed {
        MalformedPolicy::Abort
    } else {
        config.import.on_malformed
    };
    let importer = Importer::new(registry, policy);
    let expected_site = config.site_reference();

    let files = FileManager::find_importable(&args.path, registry)?;
    if files.is_empty() {
        warn!("No importable files found in {}", args.path.display());
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    for path in files {
        let mut decoder = importer
            .open_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        if config.import.verify_site_reference {
            check_site_reference(decoder.header(), &expected_site);
        }
        if let (Some(expected), Some(found)) =
            (args.target_language.as_deref(), decoder.target_language())
        {
            if !language_codes_match(expected, found) {
                warn!(
                    "{} targets '{}' but '{}' was expected",
                    path.display(),
                    found,
                    expected
                );
            }
        }

        let count = print_entries(decoder.as_mut(), &mut stdout)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        info!(
            "Imported {} entries from {} ({} skipped)",
            count,
            path.display(),
            decoder.skipped()
        );
    }
    Ok(())
}

fn print_entries(decoder: &mut dyn EntryDecoder, out: &mut impl Write) -> Result<usize> {
    let mut count = 0;
    while let Some(entry) = decoder.get_next_entry()? {
        if let Some(Err(e)) = entry.translated_value() {
            warn!(
                "{} {} {}: {}",
                entry.content_type,
                entry.id,
                entry.field_type(),
                e
            );
        }
        writeln!(out, "{}", serde_json::to_string(&entry)?)?;
        count += 1;
    }
    Ok(count)
}

fn list_formats(registry: &Registry) {
    for format in registry.formats() {
        let status = |context| match format.codec.is_supported(context) {
            Ok(()) => "yes".to_string(),
            Err(e) => format!("no ({})", e),
        };
        println!(
            "{:<12} .{:<6} export: {:<4} import: {}  [{}]",
            format.codec.filetype(),
            format.extension,
            status(SupportContext::Export),
            status(SupportContext::Import),
            format.mime_types.join(", ")
        );
    }
}
