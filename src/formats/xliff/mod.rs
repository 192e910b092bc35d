/*!
 * XLIFF codec family.
 *
 * Versions 1.2, 2.0 and 2.1 share one encoder and one decoder. Everything
 * that differs between them lives in [`XliffDialect`]; 2.0 and 2.1 are the
 * same dialect with a different version string.
 *
 * Entries are grouped per content item: every field of `post` 42 ends up as
 * a unit inside the same group, whatever its field type.
 */

pub mod decoder;
pub mod dialect;
pub mod encoder;

use std::fmt;

pub use decoder::XliffDecoder;
pub use dialect::{Family, XliffDialect};

use crate::errors::ImportError;

// @const: Canonical XLIFF extension
pub const EXTENSION: &str = "xliff";

// @const: Mime types, the first one is sent with rendered files
pub const MIME_TYPES: &[&str] = &[
    "application/xliff+xml",
    "application/x-xliff+xml",
    "text/xml",
    "application/xml",
];

// @const: Name used for our own metadata blocks and prefixed types
pub const TOOL_CATEGORY: &str = "lingport";

pub const NS_XLIFF_1: &str = "urn:oasis:names:tc:xliff:document:1.2";
pub const NS_XLIFF_2: &str = "urn:oasis:names:tc:xliff:document:2.0";
pub const NS_METADATA_2: &str = "urn:oasis:names:tc:xliff:metadata:2.0";

/// Supported XLIFF versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum XliffVersion {
    V12,
    V20,
    V21,
}

impl XliffVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V12 => "1.2",
            Self::V20 => "2.0",
            Self::V21 => "2.1",
        }
    }

    /// Version written by the given dialect
    pub fn dialect(&self) -> XliffDialect {
        XliffDialect::new(*self)
    }

    /// Map a declared `version` attribute onto a dialect.
    /// Any 1.x reads as 1.2; of 2.x only 2.0 and 2.1 are known.
    pub fn from_declared(declared: &str) -> Result<Self, ImportError> {
        let declared = declared.trim();
        let (major, minor) = declared.split_once('.').unwrap_or((declared, "0"));
        match (major, minor) {
            ("1", _) => Ok(Self::V12),
            ("2", "0") => Ok(Self::V20),
            ("2", "1") => Ok(Self::V21),
            _ => Err(ImportError::UnsupportedVersion(declared.to_string())),
        }
    }
}

impl fmt::Display for XliffVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
