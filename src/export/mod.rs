/*!
 * Export side: accumulate translation entries per language pair and render
 * them into interchange files.
 *
 * - `target`: one language pair bound to one format
 * - `container`: the per-export cache of targets
 */

mod container;
mod target;

pub use container::{ExportContainer, RenderedFile};
pub use target::ExportTarget;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::reference::Ref;

/// One source string waiting for translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Which field this text belongs to
    #[serde(rename = "ref")]
    pub reference: Ref,

    /// Text in the source language
    pub source: String,

    /// Existing translation, empty when none
    #[serde(default)]
    pub target: String,
}

/// Settings shared by every file of one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Opaque token identifying the exporting site
    pub site_reference: String,

    /// Name of the generating tool
    pub generator_name: String,

    /// Version of the generating tool
    pub generator_version: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            site_reference: String::new(),
            generator_name: env!("CARGO_PKG_NAME").to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ExportOptions {
    /// Default options with the site reference derived from `site_url`
    pub fn for_site(site_url: &str) -> Self {
        Self {
            site_reference: site_reference(site_url),
            ..Self::default()
        }
    }
}

/// SHA-256 hex digest of the site URL, ignoring surrounding whitespace and a trailing slash
pub fn site_reference(site_url: &str) -> String {
    let normalized = site_url.trim().trim_end_matches('/');
    if normalized.is_empty() {
        return String::new();
    }
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
