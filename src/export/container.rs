use indexmap::IndexMap;
use log::debug;

use super::{ExportOptions, ExportTarget};
use crate::errors::FormatError;
use crate::formats::{Codec, Registry, SupportContext};

/// A rendered file ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Cache of export targets keyed by the ordered language pair
#[derive(Debug, Clone)]
pub struct ExportContainer {
    codec: Codec,
    options: ExportOptions,
    targets: IndexMap<(String, String), ExportTarget>,
}

impl ExportContainer {
    pub fn new(codec: Codec, options: ExportOptions) -> Self {
        Self {
            codec,
            options,
            targets: IndexMap::new(),
        }
    }

    /// Container for a filetype such as `xliff_2.1`, checked for export support
    pub fn for_filetype(
        registry: &Registry,
        filetype: &str,
        options: ExportOptions,
    ) -> Result<Self, FormatError> {
        let codec = registry.from_filetype(filetype)?.codec;
        codec.is_supported(SupportContext::Export)?;
        Ok(Self::new(codec, options))
    }

    /// The target for `(source, target)`, created on first use
    pub fn get(&mut self, source_language: &str, target_language: &str) -> &mut ExportTarget {
        let codec = self.codec;
        let options = &self.options;
        self.targets
            .entry((source_language.to_string(), target_language.to_string()))
            .or_insert_with(|| {
                debug!(
                    "Creating {} export target {} -> {}",
                    codec, source_language, target_language
                );
                ExportTarget::new(codec, source_language, target_language, options.clone())
            })
    }

    /// Number of distinct language pairs
    pub fn count(&self) -> usize {
        self.targets.len()
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Targets in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ExportTarget> {
        self.targets.values()
    }

    /// Render every target
    pub fn render_all(&self) -> Vec<RenderedFile> {
        self.iter()
            .map(|target| RenderedFile {
                filename: target.filename(),
                mime_type: target.mime_type().to_string(),
                bytes: target.render(),
            })
            .collect()
    }
}
