use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::export::{ExportOptions, site_reference};
use crate::formats::{Registry, SupportContext};
use crate::import::MalformedPolicy;

/// Application configuration module
/// This module handles loading, validating and saving the settings used by
/// the command line tool.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// URL of the site the content comes from, hashed into the site reference
    #[serde(default)]
    pub site_url: String,

    /// Export config
    #[serde(default)]
    pub export: ExportConfig,

    /// Import config
    #[serde(default)]
    pub import: ImportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Export settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    // @field: Filetype such as `po` or `xliff_2.1`
    #[serde(default = "default_export_format")]
    pub format: String,

    // @field: Directory rendered files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_export_format(),
            output_dir: default_output_dir(),
        }
    }
}

/// Import settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImportConfig {
    // @field: What to do with unusable messages or units
    #[serde(default)]
    pub on_malformed: MalformedPolicy,

    // @field: Warn when a file comes from another site
    #[serde(default = "default_verify_site_reference")]
    pub verify_site_reference: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            on_malformed: MalformedPolicy::default(),
            verify_site_reference: default_verify_site_reference(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "fr".to_string()
}

fn default_export_format() -> String {
    "xliff_2.1".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_verify_site_reference() -> bool {
    true
}

impl Config {
    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Check languages and export format against the registry
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        // Validate languages
        crate::language_utils::validate_language_code(&self.source_language)?;
        crate::language_utils::validate_language_code(&self.target_language)?;

        if self.source_language == self.target_language {
            return Err(anyhow!(
                "Source and target language are both '{}'",
                self.source_language
            ));
        }

        let format = registry
            .from_filetype(&self.export.format)
            .context("Invalid export format")?;
        format
            .codec
            .is_supported(SupportContext::Export)
            .context("Export format cannot be used")?;

        if self.export.output_dir.trim().is_empty() {
            return Err(anyhow!("Export output directory must not be empty"));
        }

        Ok(())
    }

    /// Site reference written into exported files and checked on import
    pub fn site_reference(&self) -> String {
        site_reference(&self.site_url)
    }

    /// Export options derived from this configuration
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::for_site(&self.site_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            site_url: String::new(),
            export: ExportConfig::default(),
            import: ImportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
