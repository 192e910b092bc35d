/*!
 * References: which field of which content item a translation belongs to.
 *
 * A [`Ref`] is the full compound key handed in by the content layer. Only a
 * subset of it, the [`RefContext`], travels inside interchange files as a
 * flat string (PO `msgctxt`, XLIFF unit name); the content type and id also
 * live in the surrounding structure of the file.
 */

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::value_codec::ValueEncoding;

const KEY_FIELD_TYPE: &str = "field_type";
const KEY_CONTENT_ID: &str = "id";
const KEY_FIELD_ID: &str = "field_id";
const KEY_ENCODING: &str = "encoding";

/// Compound key identifying one translatable field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ref {
    /// Kind of content item, e.g. `post`, `term`, `string`
    pub content_type: String,

    /// Which field of the item, e.g. `post_title`
    pub field_type: String,

    /// Id of a content-backed item, always > 0 when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<u64>,

    /// Stable id of a standalone string, used instead of `content_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,

    /// Note for translators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Set when the source text is a structured value encoded with this encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<ValueEncoding>,
}

impl Ref {
    /// Reference to a field of a content item
    pub fn content(content_type: &str, field_type: &str, content_id: u64) -> Self {
        Self {
            content_type: content_type.to_string(),
            field_type: field_type.to_string(),
            content_id: Some(content_id),
            ..Self::default()
        }
    }

    /// Reference to a standalone string
    pub fn string(content_type: &str, field_type: &str, field_id: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            field_type: field_type.to_string(),
            field_id: Some(field_id.to_string()),
            ..Self::default()
        }
    }

    /// Attach a translator comment
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Mark the source as an encoded structured value
    pub fn with_encoding(mut self, encoding: ValueEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// The item id this ref points to, if it has a usable one
    pub fn entry_id(&self) -> Option<EntryId> {
        match (self.content_id, self.field_id.as_deref()) {
            (Some(id), _) if id > 0 => Some(EntryId::Content(id)),
            (None, Some(field_id)) if !field_id.is_empty() => {
                Some(EntryId::Field(field_id.to_string()))
            }
            _ => None,
        }
    }

    /// Whether the ref satisfies the invariants required to be exported
    pub fn is_valid(&self) -> bool {
        !self.content_type.is_empty() && !self.field_type.is_empty() && self.entry_id().is_some()
    }

    /// The part of the ref that is written into interchange files
    pub fn context(&self) -> RefContext {
        RefContext {
            field_type: self.field_type.clone(),
            content_id: self.content_id.map(|id| id.to_string()).unwrap_or_default(),
            field_id: self.field_id.clone().unwrap_or_default(),
            encoding: self
                .encoding
                .map(|e| e.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    /// Key under which an export target deduplicates entries
    pub(crate) fn identity(&self) -> (String, Option<EntryId>, String) {
        (
            self.content_type.clone(),
            self.entry_id(),
            self.field_type.clone(),
        )
    }
}

/// Id of the item an entry belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryId {
    /// Content-backed item
    Content(u64),
    /// Standalone string
    Field(String),
}

impl EntryId {
    /// Resolve the id from a decoded context
    pub fn from_context(context: &RefContext) -> Option<Self> {
        if !context.content_id.is_empty() {
            return context
                .content_id
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .map(Self::Content);
        }
        if !context.field_id.is_empty() {
            return Some(Self::Field(context.field_id.clone()));
        }
        None
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(id) => write!(f, "{}", id),
            Self::Field(id) => f.write_str(id),
        }
    }
}

/// Flat subset of a [`Ref`]; every field is a plain string, empty when absent
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefContext {
    pub field_type: String,
    pub content_id: String,
    pub field_id: String,
    pub encoding: String,
}

impl RefContext {
    /// Context with every key empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialize as `field_type=...&id=...&field_id=...&encoding=...`, skipping empty values
    pub fn to_flat_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            (KEY_FIELD_TYPE, &self.field_type),
            (KEY_CONTENT_ID, &self.content_id),
            (KEY_FIELD_ID, &self.field_id),
            (KEY_ENCODING, &self.encoding),
        ] {
            if !value.is_empty() {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Parse a flat context string. Unknown keys are dropped, missing keys stay empty.
    pub fn from_flat_string(flat: &str) -> Self {
        let mut context = Self::empty();
        for (key, value) in form_urlencoded::parse(flat.trim().as_bytes()) {
            let slot = match key.as_ref() {
                KEY_FIELD_TYPE => &mut context.field_type,
                KEY_CONTENT_ID => &mut context.content_id,
                KEY_FIELD_ID => &mut context.field_id,
                KEY_ENCODING => &mut context.encoding,
                _ => continue,
            };
            *slot = value.into_owned();
        }
        context
    }

    /// The declared value encoding, if any and if known
    pub fn value_encoding(&self) -> Option<ValueEncoding> {
        if self.encoding.is_empty() {
            return None;
        }
        self.encoding.parse().ok()
    }
}

impl fmt::Display for RefContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_flat_string())
    }
}
