use indexmap::IndexMap;
use log::debug;

use super::{ExportOptions, TranslationEntry};
use crate::formats::{Codec, po, xliff};
use crate::reference::{EntryId, Ref};

type EntryKey = (String, Option<EntryId>, String);

/// Entries for one language pair, rendered with one codec
#[derive(Debug, Clone)]
pub struct ExportTarget {
    codec: Codec,
    source_language: String,
    target_language: String,
    options: ExportOptions,
    entries: IndexMap<EntryKey, TranslationEntry>,
}

impl ExportTarget {
    pub fn new(
        codec: Codec,
        source_language: &str,
        target_language: &str,
        options: ExportOptions,
    ) -> Self {
        Self {
            codec,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            options,
            entries: IndexMap::new(),
        }
    }

    /// Store an entry. Invalid input is dropped and `false` returned.
    ///
    /// Re-adding a ref with the same content type, id and field type
    /// replaces the earlier entry in place.
    pub fn add_entry(&mut self, reference: Ref, source: &str, target: &str) -> bool {
        if !reference.is_valid() {
            debug!(
                "Dropping entry with incomplete ref {}:{} ({:?}/{:?})",
                reference.content_type,
                reference.field_type,
                reference.content_id,
                reference.field_id
            );
            return false;
        }
        if source.is_empty() {
            debug!(
                "Dropping entry {}:{} with empty source",
                reference.content_type, reference.field_type
            );
            return false;
        }

        let key = reference.identity();
        self.entries.insert(
            key,
            TranslationEntry {
                reference,
                source: source.to_string(),
                target: target.to_string(),
            },
        );
        true
    }

    /// Serialize every entry. Calling it twice yields identical bytes.
    pub fn render(&self) -> Vec<u8> {
        match self.codec {
            Codec::Po => po::writer::render(self),
            Codec::Xliff(version) => xliff::encoder::render(version.dialect(), self),
        }
    }

    /// `{source}_{target}.{extension}`
    pub fn filename(&self) -> String {
        format!(
            "{}_{}.{}",
            self.source_language,
            self.target_language,
            self.codec.extension()
        )
    }

    pub fn mime_type(&self) -> &'static str {
        self.codec.mime_type()
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
