use std::fmt::Write;

use super::{
    HEADER_CONTENT_TYPE, HEADER_GENERATOR, HEADER_LANGUAGE, HEADER_MIME_VERSION, HEADER_PROJECT,
    HEADER_SITE_REFERENCE, HEADER_SOURCE_LANGUAGE, HEADER_TRANSFER_ENCODING, encode_reference,
    escape,
};
use crate::export::{ExportTarget, TranslationEntry};

/// Render a target as a PO file, messages in insertion order
pub fn render(target: &ExportTarget) -> Vec<u8> {
    let mut out = String::new();
    write_header(&mut out, target);
    for entry in target.entries() {
        out.push('\n');
        write_message(&mut out, entry);
    }
    out.into_bytes()
}

fn write_header(out: &mut String, target: &ExportTarget) {
    let options = target.options();
    let generator = format!("{} {}", options.generator_name, options.generator_version);
    let fields = [
        (HEADER_PROJECT, generator.as_str()),
        (HEADER_MIME_VERSION, "1.0"),
        (HEADER_CONTENT_TYPE, "text/plain; charset=UTF-8"),
        (HEADER_TRANSFER_ENCODING, "8bit"),
        (HEADER_LANGUAGE, target.target_language()),
        (HEADER_SOURCE_LANGUAGE, target.source_language()),
        (HEADER_GENERATOR, generator.as_str()),
        (HEADER_SITE_REFERENCE, options.site_reference.as_str()),
    ];

    out.push_str("msgid \"\"\nmsgstr \"\"\n");
    for (key, value) in fields {
        let _ = writeln!(out, "\"{}\"", escape(&format!("{}: {}\n", key, value)));
    }
}

fn write_message(out: &mut String, entry: &TranslationEntry) {
    let reference = &entry.reference;
    if let Some(comment) = reference.comment.as_deref().filter(|c| !c.is_empty()) {
        for line in comment.lines() {
            let _ = writeln!(out, "#. {}", line);
        }
    }
    let _ = writeln!(out, "#: {}", encode_reference(&reference.content_type));
    write_string(out, "msgctxt", &reference.context().to_flat_string());
    write_string(out, "msgid", &entry.source);
    write_string(out, "msgstr", &entry.target);
}

// Multi-line values start with an empty string and put one line per chunk
fn write_string(out: &mut String, keyword: &str, value: &str) {
    let trimmed = value.strip_suffix('\n').unwrap_or(value);
    if !trimmed.contains('\n') {
        let _ = writeln!(out, "{} \"{}\"", keyword, escape(value));
        return;
    }

    let _ = writeln!(out, "{} \"\"", keyword);
    for chunk in value.split_inclusive('\n') {
        let _ = writeln!(out, "\"{}\"", escape(chunk));
    }
}
