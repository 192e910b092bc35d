/*!
 * Interchange formats and the registry that resolves them.
 *
 * A [`Codec`] is a closed set of implementations; the [`Registry`] maps file
 * extensions, versions and mime types onto them. The registry is a plain
 * value built once (usually with [`Registry::with_defaults`]) and passed to
 * whatever needs to resolve a format.
 */

pub mod po;
pub mod xliff;

use std::fmt;

use log::debug;

use crate::errors::FormatError;
use crate::xml;

pub use xliff::XliffVersion;

/// Paired encoder/decoder implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Gettext PO
    Po,
    /// XLIFF in one of its dialects
    Xliff(XliffVersion),
}

/// What a format is about to be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportContext {
    Export,
    Import,
}

impl Codec {
    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Po => po::EXTENSION,
            Self::Xliff(_) => xliff::EXTENSION,
        }
    }

    /// Format version, if the format is versioned
    pub fn version(&self) -> Option<&'static str> {
        match self {
            Self::Po => None,
            Self::Xliff(version) => Some(version.as_str()),
        }
    }

    /// Mime type sent along with rendered files
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Po => po::MIME_TYPES[0],
            Self::Xliff(_) => xliff::MIME_TYPES[0],
        }
    }

    /// `extension[_version]`, the inverse of [`Registry::split_filetype`]
    pub fn filetype(&self) -> String {
        match self.version() {
            Some(version) => format!("{}_{}", self.extension(), version),
            None => self.extension().to_string(),
        }
    }

    /// Check that the codec can run here. Returns the reason when it cannot.
    pub fn is_supported(&self, context: SupportContext) -> Result<(), FormatError> {
        match (self, context) {
            (Self::Po, _) => Ok(()),
            // writing XLIFF only needs the built-in serializer
            (Self::Xliff(_), SupportContext::Export) => Ok(()),
            (Self::Xliff(_), SupportContext::Import) => {
                if xml::engine_available() {
                    Ok(())
                } else {
                    Err(FormatError::Unsupported {
                        format: self.filetype(),
                        reason: "no XML engine in this build (enable the `xml` feature)"
                            .to_string(),
                    })
                }
            }
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filetype())
    }
}

/// Registered format descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub extension: String,
    pub mime_types: Vec<String>,
    pub version: Option<String>,
    pub codec: Codec,
}

/// Lookup table from extension / mime type / filetype to codec
#[derive(Debug, Clone, Default)]
pub struct Registry {
    formats: Vec<Format>,
    aliases: Vec<(String, String)>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with PO and every XLIFF dialect; the newest XLIFF is the default for `.xliff`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            (po::EXTENSION, po::MIME_TYPES, Codec::Po),
            (xliff::EXTENSION, xliff::MIME_TYPES, Codec::Xliff(XliffVersion::V21)),
            (xliff::EXTENSION, xliff::MIME_TYPES, Codec::Xliff(XliffVersion::V20)),
            (xliff::EXTENSION, xliff::MIME_TYPES, Codec::Xliff(XliffVersion::V12)),
        ];
        for (extension, mimes, codec) in defaults {
            // the table above holds no duplicates
            let _ = registry.register(extension, mimes, codec);
        }
        registry.register_alias("xlf", xliff::EXTENSION);
        registry
    }

    /// Register a codec. The first registration of an extension becomes its default version.
    pub fn register(
        &mut self,
        extension: &str,
        mime_types: &[&str],
        codec: Codec,
    ) -> Result<(), FormatError> {
        let extension = normalize_extension(extension);
        let version = codec.version().map(str::to_string);
        if self
            .formats
            .iter()
            .any(|f| f.extension == extension && f.version == version)
        {
            return Err(FormatError::Duplicate(codec.filetype()));
        }

        debug!("Registering format {} for .{}", codec, extension);
        self.formats.push(Format {
            extension,
            mime_types: mime_types.iter().map(|m| m.to_lowercase()).collect(),
            version,
            codec,
        });
        Ok(())
    }

    /// Make `alias` resolve like `extension`
    pub fn register_alias(&mut self, alias: &str, extension: &str) {
        self.aliases
            .push((normalize_extension(alias), normalize_extension(extension)));
    }

    /// All registered formats in registration order
    pub fn formats(&self) -> impl Iterator<Item = &Format> {
        self.formats.iter()
    }

    /// Every extension that resolves to a format, aliases included
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = Vec::new();
        let names = self
            .formats
            .iter()
            .map(|f| f.extension.as_str())
            .chain(self.aliases.iter().map(|(alias, _)| alias.as_str()));
        for name in names {
            if !extensions.contains(&name) {
                extensions.push(name);
            }
        }
        extensions
    }

    /// Default format for an extension (leading dot and case ignored)
    pub fn from_extension(&self, extension: &str) -> Result<&Format, FormatError> {
        let normalized = normalize_extension(extension);
        let extension = self.resolve_alias(&normalized);
        self.formats
            .iter()
            .find(|f| f.extension == extension)
            .ok_or_else(|| FormatError::NotFound {
                kind: "extension",
                key: extension.to_string(),
            })
    }

    /// First format declaring the mime type; parameters such as `charset` are ignored
    pub fn from_mime_type(&self, mime_type: &str) -> Result<&Format, FormatError> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        self.formats
            .iter()
            .find(|f| f.mime_types.iter().any(|m| *m == essence))
            .ok_or_else(|| FormatError::NotFound {
                kind: "mime type",
                key: mime_type.to_string(),
            })
    }

    /// Resolve `extension[_version]`, e.g. `xliff_1.2`, `xliff_12` or `po`
    pub fn from_filetype(&self, filetype: &str) -> Result<&Format, FormatError> {
        let (extension, version) = Self::split_filetype(filetype);
        if version.is_empty() {
            return self.from_extension(&extension);
        }

        let normalized = normalize_extension(&extension);
        let extension = self.resolve_alias(&normalized);
        let wanted = version.replace('.', "");
        self.formats
            .iter()
            .find(|f| {
                f.extension == extension
                    && f.version.as_deref().map(|v| v.replace('.', "")) == Some(wanted.clone())
            })
            .ok_or_else(|| FormatError::NotFound {
                kind: "filetype",
                key: filetype.to_string(),
            })
    }

    /// Split on the first underscore; the version is empty when there is none
    pub fn split_filetype(raw: &str) -> (String, String) {
        match raw.split_once('_') {
            Some((extension, version)) => (extension.to_string(), version.to_string()),
            None => (raw.to_string(), String::new()),
        }
    }

    /// Formats usable in `context`
    pub fn supported_formats(&self, context: SupportContext) -> Vec<&Format> {
        self.formats
            .iter()
            .filter(|f| f.codec.is_supported(context).is_ok())
            .collect()
    }

    /// Formats not usable in `context`, each with the reason
    pub fn unsupported_formats(&self, context: SupportContext) -> Vec<(&Format, FormatError)> {
        self.formats
            .iter()
            .filter_map(|f| f.codec.is_supported(context).err().map(|e| (f, e)))
            .collect()
    }

    fn resolve_alias<'a>(&'a self, extension: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| alias == extension)
            .map_or(extension, |(_, target)| target.as_str())
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
