/*!
 * Tests for the XLIFF dialects and the shared encoder
 */

use pretty_assertions::assert_eq;

use lingport::formats::xliff::encoder::build_document;
use lingport::formats::xliff::{Family, XliffDialect};
use lingport::{Codec, Ref, ValueEncoding, XliffVersion};

use crate::common;

/// Test the exact XLIFF 2.1 output for two fields of one post
#[test]
fn test_render_withPost42OnV21_shouldWriteOneGroupWithTwoUnits() {
    let target = common::post_42_target(Codec::Xliff(XliffVersion::V21));
    let rendered = String::from_utf8(target.render()).unwrap();

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="2.1" xmlns="urn:oasis:names:tc:xliff:document:2.0" xmlns:mda="urn:oasis:names:tc:xliff:metadata:2.0" srcLang="en" trgLang="fr">
  <file id="f1" original="en_fr">
    <mda:metadata>
      <mda:metaGroup category="lingport">
        <mda:meta type="site-reference">abc</mda:meta>
        <mda:meta type="generator">lingport</mda:meta>
        <mda:meta type="generator-version">1.0.0</mda:meta>
      </mda:metaGroup>
    </mda:metadata>
    <group id="g1" type="lingport:post" name="42">
      <unit id="u1" name="field_type=post_title&amp;id=42">
        <segment>
          <source>Hello</source>
          <target/>
        </segment>
      </unit>
      <unit id="u2" name="field_type=post_content&amp;id=42">
        <segment>
          <source>Body text</source>
          <target>Texte du corps</target>
        </segment>
      </unit>
    </group>
  </file>
</xliff>
"#;
    assert_eq!(rendered, expected);
}

/// Test the exact XLIFF 1.2 output, including a note and the extradata attribute
#[test]
fn test_render_withV12_shouldUseTransUnitsAndHeaderProps() {
    let mut target = common::empty_target(Codec::Xliff(XliffVersion::V12));
    target.add_entry(
        Ref::content("term", "name", 7)
            .with_comment("Category")
            .with_encoding(ValueEncoding::Json),
        "[\"a\"]",
        "",
    );
    let rendered = String::from_utf8(target.render()).unwrap();

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file original="en_fr" datatype="plaintext" source-language="en" target-language="fr">
    <header>
      <prop-group name="lingport">
        <prop prop-type="site-reference">abc</prop>
        <prop prop-type="generator">lingport</prop>
        <prop prop-type="generator-version">1.0.0</prop>
      </prop-group>
    </header>
    <body>
      <group id="1" restype="x-term" resname="7">
        <trans-unit id="1" resname="field_type=name&amp;id=7&amp;encoding=json" restype="x-name" extradata="json">
          <source>["a"]</source>
          <target/>
          <note>Category</note>
        </trans-unit>
      </group>
    </body>
  </file>
</xliff>
"#;
    assert_eq!(rendered, expected);
}

/// Test that 2.0 and 2.1 differ only in the declared version
#[test]
fn test_render_withV20AndV21_shouldDifferOnlyInVersion() {
    let v20 = String::from_utf8(common::mixed_target(Codec::Xliff(XliffVersion::V20)).render())
        .unwrap();
    let v21 = String::from_utf8(common::mixed_target(Codec::Xliff(XliffVersion::V21)).render())
        .unwrap();
    assert_eq!(v20.replacen("version=\"2.0\"", "version=\"2.1\"", 1), v21);
}

/// Test that 2.x puts the encoding marker in the xml namespace and notes before the segment
#[test]
fn test_buildDocument_withV21_shouldPlaceNotesAndExtradata() {
    let target = common::mixed_target(Codec::Xliff(XliffVersion::V21));
    let doc = build_document(XliffVersion::V21.dialect(), &target);

    let term_unit = doc.select("//group[@name='7']/unit")[0];
    assert_eq!(doc.attr_local(term_unit, "extradata"), Some("json"));
    assert!(doc
        .attributes(term_unit)
        .iter()
        .any(|(name, _)| name == "xml:extradata"));

    let first_unit = doc.select("//unit")[0];
    let children: Vec<_> = doc.child_elements(first_unit).collect();
    assert_eq!(doc.text_content(children[0]), "Keep it short");
    assert_eq!(doc.select_from(first_unit, "notes/note").len(), 1);
}

/// Test that entries sharing content type and id share a group, others never do
#[test]
fn test_buildDocument_shouldGroupPerContentItem() {
    let target = common::mixed_target(Codec::Xliff(XliffVersion::V12));
    let doc = build_document(XliffVersion::V12.dialect(), &target);

    let groups = doc.select("//group");
    let summary: Vec<(String, usize)> = groups
        .iter()
        .map(|g| {
            (
                doc.attr_local(*g, "resname").unwrap_or_default().to_string(),
                doc.select_from(*g, "trans-unit").len(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("1".to_string(), 2),
            ("site_tagline".to_string(), 1),
            ("7".to_string(), 1)
        ]
    );
}

/// Test that the same id under a different content type opens a new group
#[test]
fn test_buildDocument_withSameIdOtherType_shouldSeparateGroups() {
    let mut target = common::empty_target(Codec::Xliff(XliffVersion::V20));
    target.add_entry(Ref::content("post", "post_title", 3), "A", "");
    target.add_entry(Ref::content("term", "name", 3), "B", "");
    let doc = build_document(XliffVersion::V20.dialect(), &target);
    assert_eq!(doc.select("//group").len(), 2);
}

/// Test the dialect table
#[test]
fn test_dialect_shouldMapVersionsToFamilies() {
    let v12 = XliffDialect::new(XliffVersion::V12);
    let v20 = XliffDialect::new(XliffVersion::V20);
    assert_eq!(v12.family(), Family::V1);
    assert_eq!(v20.family(), Family::V2);
    assert_eq!(v12.unit_tag(), "trans-unit");
    assert_eq!(v20.unit_tag(), "unit");
    assert_eq!(v12.extradata_attribute(), "extradata");
    assert_eq!(v20.extradata_attribute(), "xml:extradata");
    assert_eq!(v20.version_string(), "2.0");
}
