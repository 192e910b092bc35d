/*!
 * Export to PO and read the file back
 */

use anyhow::Result;
use pretty_assertions::assert_eq;
use std::io::Cursor;

use lingport::formats::po::PoDecoder;
use lingport::{Codec, EntryDecoder, EntryId, FieldValue, MalformedPolicy};

use crate::common;

/// Test that every exported entry comes back in insertion order with its text intact
#[test]
fn test_roundtrip_withMixedTarget_shouldPreserveEntries() -> Result<()> {
    let target = common::mixed_target(Codec::Po);
    let mut decoder = PoDecoder::new(Cursor::new(target.render()), MalformedPolicy::Abort)?;

    assert_eq!(decoder.target_language(), Some("fr"));
    assert_eq!(decoder.header().source_language.as_deref(), Some("en"));

    let entries = decoder.collect_entries()?;
    let summary: Vec<(String, EntryId, String, String, String)> = entries
        .iter()
        .map(|e| {
            (
                e.content_type.clone(),
                e.id.clone(),
                e.field_type().to_string(),
                e.source.clone(),
                e.translation.clone(),
            )
        })
        .collect();

    let expected: Vec<(String, EntryId, String, String, String)> = target
        .entries()
        .map(|e| {
            (
                e.reference.content_type.clone(),
                e.reference.entry_id().unwrap(),
                e.reference.field_type.clone(),
                e.source.clone(),
                e.target.clone(),
            )
        })
        .collect();

    assert_eq!(summary, expected);
    assert_eq!(decoder.skipped(), 0);
    Ok(())
}

/// Test that structured values survive the trip and decode
#[test]
fn test_roundtrip_withJsonField_shouldDecodeTranslation() -> Result<()> {
    let target = common::mixed_target(Codec::Po);
    let mut decoder = PoDecoder::new(Cursor::new(target.render()), MalformedPolicy::Abort)?;

    let term = decoder
        .collect_entries()?
        .into_iter()
        .find(|e| e.content_type == "term")
        .unwrap();
    assert_eq!(term.id, EntryId::Content(7));
    let value = term.translated_value().unwrap()?;
    assert!(matches!(value, FieldValue::Map(ref map) if map.len() == 1));
    Ok(())
}

/// Test that a standalone string keeps its field id and has no translation
#[test]
fn test_roundtrip_withStandaloneString_shouldKeepFieldId() -> Result<()> {
    let target = common::mixed_target(Codec::Po);
    let mut decoder = PoDecoder::new(Cursor::new(target.render()), MalformedPolicy::Abort)?;

    let string = decoder
        .collect_entries()?
        .into_iter()
        .find(|e| e.content_type == "string")
        .unwrap();
    assert_eq!(string.id, EntryId::Field("site_tagline".to_string()));
    assert_eq!(string.source, "Line one\nLine two\n");
    assert!(!string.is_translated());
    assert!(string.translated_value().is_none());
    Ok(())
}

/// Test that an export with no entries still has a readable header
#[test]
fn test_roundtrip_withEmptyTarget_shouldYieldHeaderOnly() -> Result<()> {
    let target = common::empty_target(Codec::Po);
    let mut decoder = PoDecoder::new(Cursor::new(target.render()), MalformedPolicy::Abort)?;
    assert_eq!(decoder.generator(), Some(("lingport", "1.0.0")));
    assert!(decoder.get_next_entry()?.is_none());
    Ok(())
}
