/*!
 * Tests for language utilities
 */

use lingport::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, normalize_to_part2t,
    primary_subtag, validate_language_code,
};

/// Test that codes are validated in all three ISO forms
#[test]
fn test_validateLanguageCode_withIsoForms_shouldClassify() {
    assert_eq!(validate_language_code("fr").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("FRA").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert!(validate_language_code("french").is_err());
    assert!(validate_language_code("q").is_err());
}

/// Test that codes shaped like paths are rejected
#[test]
fn test_validateLanguageCode_withPathSeparators_shouldFail() {
    assert!(validate_language_code("../x").is_err());
    assert!(validate_language_code("fr/../../x").is_err());
    assert!(validate_language_code("fr\\x").is_err());
    assert!(validate_language_code("pt-BR").is_ok());
}

/// Test that region and script subtags are dropped
#[test]
fn test_primarySubtag_withRegionAndScript_shouldKeepLanguage() {
    assert_eq!(primary_subtag("pt-BR"), "pt");
    assert_eq!(primary_subtag(" zh_Hant_TW "), "zh");
    assert_eq!(primary_subtag("DE"), "de");
}

/// Test normalization to the three-letter terminology code
#[test]
fn test_normalizeToPart2t_shouldMapEveryForm() {
    assert_eq!(normalize_to_part2t("de").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("de-AT").unwrap(), "deu");
    assert!(normalize_to_part2t("zz").is_err());
}

/// Test matching and naming
#[test]
fn test_languageCodesMatch_andNames() {
    assert!(language_codes_match("es", "es-MX"));
    assert!(language_codes_match("nl", "dut"));
    assert!(!language_codes_match("es", "pt"));
    assert!(!language_codes_match("xx", "xx"));
    assert_eq!(get_language_name("fr-CA").unwrap(), "French");
}
