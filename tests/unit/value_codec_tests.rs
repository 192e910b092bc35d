/*!
 * Tests for the structured value codec
 */

use lingport::errors::ValueError;
use lingport::value_codec::{decode, encode};
use lingport::{FieldValue, ValueEncoding};
use proptest::prelude::*;

/// Test that native output is plain lowercase hex
#[test]
fn test_encode_withNative_shouldBeHex() {
    let text = encode(&FieldValue::Text("x".to_string()), ValueEncoding::Native).unwrap();
    assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

/// Test that garbage input yields a typed error, not a panic
#[test]
fn test_decode_withGarbage_shouldReturnMalformed() {
    for (text, encoding) in [
        ("{not json", ValueEncoding::Json),
        ("zz", ValueEncoding::Native),
        ("ffffffffffffffff", ValueEncoding::Native),
    ] {
        assert!(matches!(
            decode(text, encoding),
            Err(ValueError::Malformed { .. })
        ));
    }
}

fn nested_list(depth: usize) -> FieldValue {
    let mut value = FieldValue::Null;
    for _ in 0..depth {
        value = FieldValue::List(vec![value]);
    }
    value
}

/// Test that deeply nested native input is refused with a typed error instead of overflowing the stack
#[test]
fn test_decode_withDeeplyNestedNative_shouldReturnMalformed() {
    // variant 5 (list) with one element, repeated, then a null
    let text = "0501".repeat(200_000) + "00";
    match decode(&text, ValueEncoding::Native) {
        Err(ValueError::Malformed { encoding, reason }) => {
            assert_eq!(encoding, ValueEncoding::Native);
            assert!(reason.contains("nested deeper"), "{}", reason);
        }
        other => panic!("expected malformed value, got {:?}", other),
    }
}

/// Test that nesting within the limit still round trips
#[test]
fn test_decode_withModerateNesting_shouldRoundTrip() {
    let value = nested_list(100);
    let text = encode(&value, ValueEncoding::Native).unwrap();
    assert!(text.starts_with("0501"));
    assert_eq!(decode(&text, ValueEncoding::Native).unwrap(), value);

    let too_deep = encode(&nested_list(200), ValueEncoding::Native).unwrap();
    assert!(decode(&too_deep, ValueEncoding::Native).is_err());
}

/// Test that unknown encoding names are rejected
#[test]
fn test_parse_withUnknownEncoding_shouldFail() {
    assert_eq!("JSON".parse::<ValueEncoding>().unwrap(), ValueEncoding::Json);
    assert_eq!(
        "php".parse::<ValueEncoding>(),
        Err(ValueError::UnknownEncoding("php".to_string()))
    );
}

proptest! {
    #[test]
    fn test_nativeRoundTrip_withArbitraryScalars_shouldHold(i in any::<i64>(), s in ".*", b in any::<bool>()) {
        let value = FieldValue::List(vec![FieldValue::Int(i), FieldValue::Text(s), FieldValue::Bool(b)]);
        let text = encode(&value, ValueEncoding::Native).unwrap();
        prop_assert_eq!(decode(&text, ValueEncoding::Native).unwrap(), value);
    }
}
