/*!
 * Tests for refs and their flat context
 */

use lingport::{EntryId, Ref, RefContext, ValueEncoding};
use proptest::prelude::*;

/// Test that a standalone string ref carries its field id into the context
#[test]
fn test_context_withStringRef_shouldUseFieldId() {
    let r = Ref::string("string", "label", "site tagline");
    assert!(r.is_valid());
    assert_eq!(r.entry_id(), Some(EntryId::Field("site tagline".to_string())));
    assert_eq!(
        r.context().to_flat_string(),
        "field_type=label&field_id=site+tagline"
    );
}

/// Test that the empty context serializes to an empty string and back
#[test]
fn test_flatString_withEmptyContext_shouldBeEmpty() {
    assert_eq!(RefContext::empty().to_flat_string(), "");
    assert_eq!(RefContext::from_flat_string(""), RefContext::empty());
}

/// Test that reserved characters survive the flat form
#[test]
fn test_flatString_withReservedCharacters_shouldRoundTrip() {
    let context = Ref::string("string", "a&b=c", "x y%z").context();
    let flat = context.to_flat_string();
    assert!(!flat.contains(' '));
    assert_eq!(RefContext::from_flat_string(&flat), context);
}

/// Test that the declared encoding is parsed, unknown names are ignored
#[test]
fn test_valueEncoding_shouldParseKnownNamesOnly() {
    let context = Ref::content("post", "meta", 3)
        .with_encoding(ValueEncoding::Native)
        .context();
    assert_eq!(context.value_encoding(), Some(ValueEncoding::Native));

    let context = RefContext::from_flat_string("field_type=meta&id=3&encoding=php");
    assert_eq!(context.value_encoding(), None);
}

/// Test that refs deserialize from the feed format
#[test]
fn test_deserialize_withMinimalJson_shouldFillDefaults() {
    let r: Ref = serde_json::from_str(
        r#"{"content_type":"post","field_type":"post_title","content_id":5,"encoding":"json"}"#,
    )
    .unwrap();
    assert_eq!(r.content_id, Some(5));
    assert_eq!(r.field_id, None);
    assert_eq!(r.encoding, Some(ValueEncoding::Json));
}

proptest! {
    #[test]
    fn test_context_roundTrip_forValidRefs(
        field_type in "[a-z_]{1,12}",
        id in 1u64..u64::MAX,
        field_id in "\\PC{1,16}",
        use_field_id in any::<bool>(),
    ) {
        let r = if use_field_id {
            Ref::string("string", &field_type, &field_id)
        } else {
            Ref::content("post", &field_type, id)
        };
        let context = r.context();
        let decoded = RefContext::from_flat_string(&context.to_flat_string());
        prop_assert_eq!(EntryId::from_context(&decoded), r.entry_id());
        prop_assert_eq!(decoded, context);
    }
}
