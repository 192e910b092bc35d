/*!
 * Import side: turn interchange files back into translation entries.
 *
 * Decoders are pull cursors. [`EntryDecoder::get_next_entry`] hands out one
 * entry at a time and `Ok(None)` once the file is exhausted, so a caller can
 * apply translations as they arrive. The [`Importer`] picks the decoder from
 * the registry based on the file extension.
 */

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, ValueError};
use crate::formats::po::PoDecoder;
use crate::formats::xliff::XliffDecoder;
use crate::formats::{Codec, Registry, SupportContext};
use crate::reference::{EntryId, RefContext};
use crate::value_codec::{self, FieldValue, ValueEncoding};

/// One translated field read from a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub content_type: String,
    pub id: EntryId,
    /// Decoded ref context: field type, encoding
    pub context: RefContext,
    /// Source text as exported
    pub source: String,
    /// Translated text, empty when untranslated
    pub translation: String,
}

impl ImportEntry {
    pub fn field_type(&self) -> &str {
        &self.context.field_type
    }

    /// Encoding of a structured value, if the field carries one
    pub fn encoding(&self) -> Option<ValueEncoding> {
        self.context.value_encoding()
    }

    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }

    /// Decode the translation as a structured value; `None` for plain text fields
    pub fn translated_value(&self) -> Option<Result<FieldValue, ValueError>> {
        if !self.is_translated() {
            return None;
        }
        self.encoding()
            .map(|encoding| value_codec::decode(&self.translation, encoding))
    }
}

/// Metadata found in a file header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub site_reference: Option<String>,
    pub generator_name: Option<String>,
    pub generator_version: Option<String>,
}

/// What to do with a message or unit that cannot become an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Warn, count it and carry on
    #[default]
    Skip,
    /// Stop the import with [`ImportError::MalformedEntry`]
    Abort,
}

impl MalformedPolicy {
    /// Apply the policy to the entry at `position`
    pub(crate) fn handle(
        &self,
        position: usize,
        reason: String,
        skipped: &mut usize,
    ) -> Result<(), ImportError> {
        match self {
            Self::Skip => {
                warn!("Skipping malformed entry #{}: {}", position, reason);
                *skipped += 1;
                Ok(())
            }
            Self::Abort => Err(ImportError::MalformedEntry { position, reason }),
        }
    }
}

/// Pull cursor over the entries of one file
pub trait EntryDecoder {
    fn header(&self) -> &FileHeader;

    /// Next entry, `Ok(None)` at end of file
    fn get_next_entry(&mut self) -> Result<Option<ImportEntry>, ImportError>;

    /// Malformed entries skipped so far
    fn skipped(&self) -> usize;

    fn target_language(&self) -> Option<&str> {
        self.header().target_language.as_deref()
    }

    fn site_reference(&self) -> Option<&str> {
        self.header().site_reference.as_deref()
    }

    /// Generator name and version
    fn generator(&self) -> Option<(&str, &str)> {
        let header = self.header();
        header.generator_name.as_deref().map(|name| {
            (
                name,
                header.generator_version.as_deref().unwrap_or_default(),
            )
        })
    }

    /// Drain the remaining entries
    fn collect_entries(&mut self) -> Result<Vec<ImportEntry>, ImportError> {
        let mut entries = Vec::new();
        while let Some(entry) = self.get_next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Opens files with the decoder their extension maps to
#[derive(Debug, Clone, Copy)]
pub struct Importer<'a> {
    registry: &'a Registry,
    policy: MalformedPolicy,
}

impl<'a> Importer<'a> {
    pub fn new(registry: &'a Registry, policy: MalformedPolicy) -> Self {
        Self { registry, policy }
    }

    /// Open a file, streaming it when the format allows
    pub fn open_path(&self, path: &Path) -> Result<Box<dyn EntryDecoder>, ImportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let codec = self.resolve(extension)?;
        debug!("Importing {} as {}", path.display(), codec);

        match codec {
            Codec::Po => {
                let reader = BufReader::new(File::open(path)?);
                Ok(Box::new(PoDecoder::new(reader, self.policy)?))
            }
            Codec::Xliff(_) => {
                let bytes = std::fs::read(path)?;
                self.open_xliff(bytes)
            }
        }
    }

    /// Open in-memory content; `filetype` is an extension or `extension_version`
    pub fn open_bytes(
        &self,
        filetype: &str,
        bytes: Vec<u8>,
    ) -> Result<Box<dyn EntryDecoder>, ImportError> {
        match self.resolve(filetype)? {
            Codec::Po => Ok(Box::new(PoDecoder::new(Cursor::new(bytes), self.policy)?)),
            Codec::Xliff(_) => self.open_xliff(bytes),
        }
    }

    fn open_xliff(&self, bytes: Vec<u8>) -> Result<Box<dyn EntryDecoder>, ImportError> {
        let text = String::from_utf8(bytes).map_err(|_| ImportError::NotUtf8)?;
        // the declared version, not the extension, picks the dialect
        Ok(Box::new(XliffDecoder::parse(&text, self.policy)?))
    }

    fn resolve(&self, filetype: &str) -> Result<Codec, ImportError> {
        let codec = self.registry.from_filetype(filetype)?.codec;
        codec.is_supported(SupportContext::Import)?;
        Ok(codec)
    }
}

/// Compare the file's site reference with ours. Mismatches are logged, not fatal.
pub fn check_site_reference(header: &FileHeader, expected: &str) -> bool {
    match header.site_reference.as_deref() {
        Some(found) if !expected.is_empty() && found != expected => {
            warn!(
                "File was exported from another site (reference {}), translations may not match",
                found
            );
            false
        }
        _ => true,
    }
}
