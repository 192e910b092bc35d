/*!
 * Gettext PO codec.
 *
 * Every entry becomes one message: the content type travels in the `#:`
 * reference, the flat ref context in `msgctxt`, the translator note in an
 * extracted `#.` comment. The header message carries the language pair,
 * the generator and the site reference.
 */

pub mod reader;
pub mod writer;

pub use reader::{PoDecoder, PoMessage, PoReader};

use url::form_urlencoded;

// @const: Canonical PO extension
pub const EXTENSION: &str = "po";

// @const: Mime types, the first one is sent with rendered files
pub const MIME_TYPES: &[&str] = &[
    "text/x-po",
    "application/x-po",
    "text/x-gettext-translation",
];

pub(crate) const HEADER_PROJECT: &str = "Project-Id-Version";
pub(crate) const HEADER_MIME_VERSION: &str = "MIME-Version";
pub(crate) const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub(crate) const HEADER_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
pub(crate) const HEADER_LANGUAGE: &str = "Language";
// Older exports used this label for the target language
pub(crate) const HEADER_LANGUAGE_DEPRECATED: &str = "Language-Target";
pub(crate) const HEADER_SOURCE_LANGUAGE: &str = "X-Source-Language";
pub(crate) const HEADER_GENERATOR: &str = "X-Generator";
pub(crate) const HEADER_SITE_REFERENCE: &str = "X-Site-Reference";

/// Escape a string for use between PO double quotes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Content type as one `#:` token. Whitespace, `=` and `&` are form-encoded.
pub fn encode_reference(content_type: &str) -> String {
    form_urlencoded::byte_serialize(content_type.as_bytes()).collect()
}

/// Reverse of [`encode_reference`]
pub fn decode_reference(token: &str) -> String {
    form_urlencoded::parse(token.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

/// Reverse of [`escape`]. Unknown escapes are kept verbatim.
pub fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('"') => unescaped.push('"'),
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
