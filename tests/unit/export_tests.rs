/*!
 * Tests for export targets and the export container
 */

use lingport::{Codec, ExportContainer, ExportOptions, Ref, Registry, XliffVersion};

use crate::common;

/// Test that the same ordered pair gives back the same target
#[test]
fn test_get_withRepeatedPair_shouldReuseTarget() {
    let mut container = ExportContainer::new(Codec::Po, common::fixed_options());
    container
        .get("en", "fr")
        .add_entry(Ref::content("post", "post_title", 1), "Hi", "");
    container
        .get("en", "fr")
        .add_entry(Ref::content("post", "post_content", 1), "Body", "");
    container.get("fr", "en");

    assert_eq!(container.count(), 2);
    assert_eq!(container.get("en", "fr").len(), 2);
    assert!(container.get("fr", "en").is_empty());
}

/// Test that targets are iterated and rendered in creation order
#[test]
fn test_renderAll_shouldFollowCreationOrder() {
    let mut container =
        ExportContainer::new(Codec::Xliff(XliffVersion::V12), common::fixed_options());
    for language in ["de", "fr", "es"] {
        container
            .get("en", language)
            .add_entry(Ref::content("post", "post_title", 1), "Hi", "");
    }

    let files = container.render_all();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["en_de.xliff", "en_fr.xliff", "en_es.xliff"]);
    assert!(files.iter().all(|f| f.mime_type == "application/xliff+xml"));
}

/// Test that the container binds the registry's codec for a filetype
#[test]
fn test_forFiletype_withPo_shouldBindCodec() {
    let registry = Registry::with_defaults();
    let container =
        ExportContainer::for_filetype(&registry, "po", ExportOptions::default()).unwrap();
    assert_eq!(container.codec(), Codec::Po);
    assert_eq!(container.count(), 0);
}

/// Test that rendering twice yields the same bytes for every codec
#[test]
fn test_render_calledTwice_shouldBeIdentical() {
    for codec in [
        Codec::Po,
        Codec::Xliff(XliffVersion::V12),
        Codec::Xliff(XliffVersion::V20),
        Codec::Xliff(XliffVersion::V21),
    ] {
        let target = common::mixed_target(codec);
        assert_eq!(target.render(), target.render(), "codec {}", codec);
    }
}

/// Test that default options name this crate as generator
#[test]
fn test_exportOptions_default_shouldNameCrate() {
    let options = ExportOptions::default();
    assert_eq!(options.generator_name, "lingport");
    assert_eq!(options.generator_version, env!("CARGO_PKG_VERSION"));
    assert!(options.site_reference.is_empty());
    assert_eq!(ExportOptions::for_site("https://example.org").site_reference.len(), 64);
}
