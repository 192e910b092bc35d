/*!
 * Tests for app configuration
 */

use anyhow::Result;
use lingport::app_config::{Config, LogLevel};
use lingport::{MalformedPolicy, Registry};

use crate::common;

/// Test that defaults are valid and point at XLIFF 2.1
#[test]
fn test_default_shouldBeValid() {
    let config = Config::default();
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.export.format, "xliff_2.1");
    assert_eq!(config.import.on_malformed, MalformedPolicy::Skip);
    assert!(config.import.verify_site_reference);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate(&Registry::with_defaults()).is_ok());
}

/// Test that a partial file is completed with defaults
#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"target_language": "de", "import": {"on_malformed": "abort"}}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "de");
    assert_eq!(config.import.on_malformed, MalformedPolicy::Abort);
    assert!(config.import.verify_site_reference);
    assert_eq!(config.export.output_dir, ".");
    Ok(())
}

/// Test that a saved configuration loads back unchanged
#[test]
fn test_save_thenLoad_shouldPreserveValues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.site_url = "https://example.org".to_string();
    config.export.format = "po".to_string();
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    assert_eq!(Config::from_file(&path)?, config);
    Ok(())
}

/// Test that a missing file falls back to defaults but a broken one fails
#[test]
fn test_loadOrDefault_shouldOnlyFallBackWhenMissing() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let missing = dir.path().join("absent.json");
    assert_eq!(Config::load_or_default(&missing)?, Config::default());

    let broken = common::create_test_file(dir.path(), "broken.json", "{ not json")?;
    assert!(Config::load_or_default(&broken).is_err());
    Ok(())
}

/// Test that validation rejects unusable settings
#[test]
fn test_validate_withBadSettings_shouldFail() {
    let registry = Registry::with_defaults();

    let mut config = Config::default();
    config.source_language = "xx".to_string();
    assert!(config.validate(&registry).is_err());

    let mut config = Config::default();
    config.target_language = "en".to_string();
    assert!(config.validate(&registry).is_err());

    let mut config = Config::default();
    config.export.format = "csv".to_string();
    assert!(config.validate(&registry).is_err());

    let mut config = Config::default();
    config.export.output_dir = "  ".to_string();
    assert!(config.validate(&registry).is_err());

    let mut config = Config::default();
    config.target_language = "pt-BR".to_string();
    config.export.format = "xliff_1.2".to_string();
    assert!(config.validate(&registry).is_ok());
}

/// Test that the site reference follows the configured URL
#[test]
fn test_siteReference_shouldHashUrl() {
    let mut config = Config::default();
    assert_eq!(config.site_reference(), "");

    config.site_url = "https://example.org/".to_string();
    let with_slash = config.site_reference();
    config.site_url = "https://example.org".to_string();
    assert_eq!(config.site_reference(), with_slash);
    assert_eq!(with_slash.len(), 64);
    assert_eq!(config.export_options().site_reference, with_slash);
}
