use std::collections::BTreeMap;
use std::io::{BufRead, ErrorKind};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    HEADER_GENERATOR, HEADER_LANGUAGE, HEADER_LANGUAGE_DEPRECATED, HEADER_SITE_REFERENCE,
    HEADER_SOURCE_LANGUAGE, decode_reference, unescape,
};
use crate::errors::ImportError;
use crate::import::{EntryDecoder, FileHeader, ImportEntry, MalformedPolicy};
use crate::reference::{EntryId, RefContext};

// @const: Keyword line, e.g. `msgstr[1] "text"`
static KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(msgctxt|msgid_plural|msgid|msgstr)(?:\[(\d+)\])?\s+"(.*)"\s*$"#).unwrap()
});

// @const: Continuation line
static CONTINUATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"(.*)"\s*$"#).unwrap());

/// One raw PO message as it appears in the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoMessage {
    /// `#.` lines
    pub extracted_comments: Vec<String>,
    /// Tokens of the `#:` lines
    pub references: Vec<String>,
    /// Tokens of the `#,` lines
    pub flags: Vec<String>,
    pub msgctxt: Option<String>,
    pub msgid: Option<String>,
    pub msgid_plural: Option<String>,
    /// Translations by plural index
    pub msgstr: BTreeMap<usize, String>,
    /// Message was commented out with `#~`
    pub obsolete: bool,
    /// First syntax problem found inside the message
    pub error: Option<String>,
    /// 1-based line the message starts on
    pub line: usize,
}

impl PoMessage {
    /// The header is the message with an empty msgid and no context
    pub fn is_header(&self) -> bool {
        self.msgctxt.is_none() && self.msgid.as_deref() == Some("")
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == "fuzzy")
    }

    /// Singular translation
    pub fn translation(&self) -> &str {
        self.msgstr.get(&0).map(String::as_str).unwrap_or_default()
    }

    fn has_content(&self) -> bool {
        self.msgid.is_some() || self.msgctxt.is_some() || self.obsolete || self.error.is_some()
    }

    fn has_msgstr(&self) -> bool {
        !self.msgstr.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str(usize),
}

/// Pulls messages off a line reader one at a time
pub struct PoReader<R: BufRead> {
    reader: R,
    pending: Option<String>,
    line_number: usize,
    first_line: bool,
}

impl<R: BufRead> PoReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            line_number: 0,
            first_line: true,
        }
    }

    /// Next message, `None` at end of input
    pub fn next_message(&mut self) -> Result<Option<PoMessage>, ImportError> {
        let mut message = PoMessage::default();
        let mut last_field: Option<Field> = None;

        while let Some(line) = self.next_line()? {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if message.has_content() {
                    return Ok(Some(message));
                }
                // comments above a blank line belong to nothing
                message = PoMessage::default();
                last_field = None;
                continue;
            }

            // A comment or keyword after msgstr starts the next message, and so
            // does switching between obsolete `#~` lines and live ones
            let starts_message = trimmed.starts_with('#')
                || trimmed.starts_with("msgctxt")
                || trimmed.starts_with("msgid ");
            let obsolete_line = trimmed.starts_with("#~");
            if (starts_message && message.has_msgstr())
                || (message.has_content() && obsolete_line != message.obsolete)
            {
                self.push_back(line);
                return Ok(Some(message));
            }

            if message.line == 0 {
                message.line = self.line_number;
            }

            if let Some(comment) = trimmed.strip_prefix('#') {
                last_field = None;
                Self::read_comment(&mut message, comment);
                continue;
            }

            if let Some(caps) = KEYWORD_REGEX.captures(trimmed) {
                let value = unescape(&caps[3]);
                let field = match &caps[1] {
                    "msgctxt" => Field::Context,
                    "msgid" => Field::Id,
                    "msgid_plural" => Field::IdPlural,
                    _ => Field::Str(caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0))),
                };
                Self::set_field(&mut message, field, value);
                last_field = Some(field);
                continue;
            }

            if let Some(caps) = CONTINUATION_REGEX.captures(trimmed) {
                match last_field {
                    Some(field) => Self::append_field(&mut message, field, &unescape(&caps[1])),
                    None => Self::flag_error(
                        &mut message,
                        format!("line {}: string continuation without keyword", self.line_number),
                    ),
                }
                continue;
            }

            Self::flag_error(
                &mut message,
                format!("line {}: unexpected content '{}'", self.line_number, trimmed),
            );
        }

        Ok(message.has_content().then_some(message))
    }

    fn push_back(&mut self, line: String) {
        self.pending = Some(line);
        self.line_number -= 1;
    }

    fn next_line(&mut self) -> Result<Option<String>, ImportError> {
        self.line_number += 1;
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => ImportError::NotUtf8,
            _ => ImportError::Io(e),
        })?;
        if read == 0 {
            return Ok(None);
        }

        if self.first_line {
            self.first_line = false;
            if let Some(stripped) = line.strip_prefix('\u{feff}') {
                line = stripped.to_string();
            }
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn read_comment(message: &mut PoMessage, comment: &str) {
        match comment.chars().next() {
            Some('~') => message.obsolete = true,
            Some('.') => message.extracted_comments.push(comment[1..].trim().to_string()),
            Some(':') => message
                .references
                .extend(comment[1..].split_whitespace().map(str::to_string)),
            Some(',') => message.flags.extend(
                comment[1..]
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string),
            ),
            // translator comments and previous-msgid lines carry nothing we use
            _ => {}
        }
    }

    fn set_field(message: &mut PoMessage, field: Field, value: String) {
        match field {
            Field::Context => message.msgctxt = Some(value),
            Field::Id => message.msgid = Some(value),
            Field::IdPlural => message.msgid_plural = Some(value),
            Field::Str(index) => {
                message.msgstr.insert(index, value);
            }
        }
    }

    fn append_field(message: &mut PoMessage, field: Field, value: &str) {
        let slot = match field {
            Field::Context => message.msgctxt.get_or_insert_with(String::new),
            Field::Id => message.msgid.get_or_insert_with(String::new),
            Field::IdPlural => message.msgid_plural.get_or_insert_with(String::new),
            Field::Str(index) => message.msgstr.entry(index).or_default(),
        };
        slot.push_str(value);
    }

    fn flag_error(message: &mut PoMessage, error: String) {
        if message.error.is_none() {
            message.error = Some(error);
        }
    }
}

/// Streaming PO decoder yielding one [`ImportEntry`] per message
pub struct PoDecoder<R: BufRead> {
    reader: PoReader<R>,
    header: FileHeader,
    policy: MalformedPolicy,
    pending: Option<PoMessage>,
    position: usize,
    skipped: usize,
}

impl<R: BufRead> PoDecoder<R> {
    /// Read up to the first message to pick up the header
    pub fn new(reader: R, policy: MalformedPolicy) -> Result<Self, ImportError> {
        let mut reader = PoReader::new(reader);
        let mut header = FileHeader::default();
        let mut pending = None;

        while let Some(message) = reader.next_message()? {
            if message.obsolete {
                continue;
            }
            if message.is_header() {
                header = parse_header(message.translation());
            } else {
                pending = Some(message);
            }
            break;
        }

        debug!(
            "PO header: target={:?} generator={:?}",
            header.target_language, header.generator_name
        );
        Ok(Self {
            reader,
            header,
            policy,
            pending,
            position: 0,
            skipped: 0,
        })
    }

    fn next_message(&mut self) -> Result<Option<PoMessage>, ImportError> {
        match self.pending.take() {
            Some(message) => Ok(Some(message)),
            None => self.reader.next_message(),
        }
    }
}

impl<R: BufRead> EntryDecoder for PoDecoder<R> {
    fn header(&self) -> &FileHeader {
        &self.header
    }

    fn get_next_entry(&mut self) -> Result<Option<ImportEntry>, ImportError> {
        while let Some(message) = self.next_message()? {
            if message.obsolete {
                continue;
            }
            self.position += 1;
            match message_to_entry(&message) {
                Ok(entry) => return Ok(Some(entry)),
                Err(reason) => {
                    self.policy
                        .handle(self.position, reason, &mut self.skipped)?;
                }
            }
        }
        Ok(None)
    }

    fn skipped(&self) -> usize {
        self.skipped
    }
}

fn message_to_entry(message: &PoMessage) -> Result<ImportEntry, String> {
    if let Some(error) = &message.error {
        return Err(error.clone());
    }
    let content_type = message
        .references
        .first()
        .map(|token| decode_reference(token))
        .filter(|content_type| !content_type.is_empty())
        .ok_or_else(|| format!("line {}: message has no content type reference", message.line))?;
    let source = message.msgid.clone().unwrap_or_default();
    if source.is_empty() {
        return Err(format!("line {}: message has an empty msgid", message.line));
    }

    let context = RefContext::from_flat_string(message.msgctxt.as_deref().unwrap_or_default());
    if context.field_type.is_empty() {
        return Err(format!("line {}: context carries no field type", message.line));
    }
    let id = EntryId::from_context(&context)
        .ok_or_else(|| format!("line {}: context carries no id", message.line))?;

    let translation = if message.is_fuzzy() {
        warn!("Ignoring fuzzy translation at line {}", message.line);
        String::new()
    } else {
        message.translation().to_string()
    };

    Ok(ImportEntry {
        content_type,
        id,
        context,
        source,
        translation,
    })
}

fn parse_header(text: &str) -> FileHeader {
    let mut header = FileHeader::default();
    let mut deprecated_language = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            HEADER_LANGUAGE => header.target_language = Some(value.to_string()),
            HEADER_LANGUAGE_DEPRECATED => deprecated_language = Some(value.to_string()),
            HEADER_SOURCE_LANGUAGE => header.source_language = Some(value.to_string()),
            HEADER_SITE_REFERENCE => header.site_reference = Some(value.to_string()),
            HEADER_GENERATOR => {
                let (name, version) = match value.rsplit_once(' ') {
                    Some((name, version)) => (name.trim(), Some(version.trim().to_string())),
                    None => (value, None),
                };
                header.generator_name = Some(name.to_string());
                header.generator_version = version;
            }
            _ => {}
        }
    }

    if header.target_language.is_none() {
        header.target_language = deprecated_language;
    }
    header
}
