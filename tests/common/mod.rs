/*!
 * Common test utilities for the lingport test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lingport::{Codec, ExportOptions, ExportTarget, Ref};

/// Routes library log output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Export options with fixed values so rendered output is stable across versions
pub fn fixed_options() -> ExportOptions {
    ExportOptions {
        site_reference: "abc".to_string(),
        generator_name: "lingport".to_string(),
        generator_version: "1.0.0".to_string(),
    }
}

/// An en -> fr target for the given codec
pub fn empty_target(codec: Codec) -> ExportTarget {
    ExportTarget::new(codec, "en", "fr", fixed_options())
}

/// Title without translation and content with one, both for post 42
pub fn post_42_target(codec: Codec) -> ExportTarget {
    let mut target = empty_target(codec);
    target.add_entry(Ref::content("post", "post_title", 42), "Hello", "");
    target.add_entry(
        Ref::content("post", "post_content", 42),
        "Body text",
        "Texte du corps",
    );
    target
}

/// A mix of content items, standalone strings, comments, encodings and awkward text
pub fn mixed_target(codec: Codec) -> ExportTarget {
    let mut target = empty_target(codec);
    target.add_entry(
        Ref::content("post", "post_title", 1).with_comment("Keep it short"),
        "Fish & \"Chips\"",
        "Poisson & « frites »",
    );
    target.add_entry(
        Ref::string("string", "label", "site_tagline"),
        "Line one\nLine two\n",
        "",
    );
    target.add_entry(
        Ref::content("term", "name", 7).with_encoding(lingport::ValueEncoding::Json),
        "{\"a\":[1,2]}",
        "{\"a\":[1,2]}",
    );
    target.add_entry(
        Ref::content("post", "post_excerpt", 1),
        "Tabs\tand <tags> and \\backslash",
        "Tabulations\tet <balises>",
    );
    target
}

/// XLIFF 1.2 as written by a typical CAT tool: no tool header, inline markup, a note
pub const TOOL_XLIFF_12: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file original="en_de" datatype="plaintext" source-language="en" target-language="de">
    <body>
      <group id="1" restype="x-post" resname="3">
        <trans-unit id="1" resname="field_type=post_title&amp;id=3">
          <source>Hello <g id="b">world</g></source>
          <target state="translated">Hallo <g id="b">Welt</g></target>
          <note>checked</note>
        </trans-unit>
      </group>
    </body>
  </file>
</xliff>
"#;

/// XLIFF 2.0 with two segments in one unit and an unknown metadata group
pub const TOOL_XLIFF_20: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="2.0" xmlns="urn:oasis:names:tc:xliff:document:2.0" srcLang="en" trgLang="es">
  <file id="f1">
    <group id="g1" type="lingport:page" name="9">
      <unit id="u1" name="field_type=post_content&amp;id=9">
        <segment><source>One. </source><target>Uno. </target></segment>
        <segment><source>Two.</source><target>Dos.</target></segment>
      </unit>
    </group>
  </file>
</xliff>
"#;
