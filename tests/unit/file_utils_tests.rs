/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;

use lingport::file_utils::FileManager;
use lingport::{Registry, RenderedFile};

use crate::common;

fn rendered(filename: &str, content: &str) -> RenderedFile {
    RenderedFile {
        filename: filename.to_string(),
        mime_type: "text/x-po".to_string(),
        bytes: content.as_bytes().to_vec(),
    }
}

/// Test that files are found by extension, recursively and sorted
#[test]
fn test_findFiles_withMixedExtensions_shouldReturnMatchesSorted() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let nested = dir.path().join("nested");
    fs::create_dir(&nested)?;
    common::create_test_file(dir.path(), "b.po", "")?;
    common::create_test_file(dir.path(), "a.PO", "")?;
    common::create_test_file(dir.path(), "notes.txt", "")?;
    common::create_test_file(&nested, "c.xliff", "")?;

    let found = FileManager::find_files(dir.path(), &[".po", "xliff"])?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PO", "b.po", "c.xliff"]);
    Ok(())
}

/// Test that a directory yields every file the registry knows, aliases included
#[test]
fn test_findImportable_withDirectory_shouldUseRegistryExtensions() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "en_de.xlf", "")?;
    common::create_test_file(dir.path(), "en_fr.po", "")?;
    common::create_test_file(dir.path(), "readme.md", "")?;

    let registry = Registry::with_defaults();
    let found = FileManager::find_importable(dir.path(), &registry)?;
    assert_eq!(found.len(), 2);

    let single = FileManager::find_importable(dir.path().join("readme.md"), &registry)?;
    assert_eq!(single, vec![dir.path().join("readme.md")]);

    assert!(FileManager::find_importable(dir.path().join("missing"), &registry).is_err());
    Ok(())
}

/// Test that existing output is kept unless forced
#[test]
fn test_writeRendered_withExistingFile_shouldRequireForce() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let output = dir.path().join("out");

    let path = FileManager::write_rendered(&output, &rendered("en_fr.po", "first"), false)?;
    assert_eq!(path, output.join("en_fr.po"));
    assert_eq!(FileManager::read_to_string(&path)?, "first");

    assert!(FileManager::write_rendered(&output, &rendered("en_fr.po", "second"), false).is_err());
    assert_eq!(FileManager::read_to_string(&path)?, "first");

    FileManager::write_rendered(&output, &rendered("en_fr.po", "second"), true)?;
    assert_eq!(FileManager::read_to_string(&path)?, "second");
    Ok(())
}

/// Test that filenames escaping the output directory are refused
#[test]
fn test_writeRendered_withTraversingFilename_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let output = dir.path().join("out");

    assert!(FileManager::write_rendered(&output, &rendered("../en_x.po", "x"), false).is_err());
    assert!(FileManager::write_rendered(&output, &rendered("a/b.po", "x"), false).is_err());
    assert!(FileManager::write_rendered(&output, &rendered("..", "x"), false).is_err());
    assert!(!dir.path().join("en_x.po").exists());
    Ok(())
}

/// Test existence checks and directory creation
#[test]
fn test_ensureDir_shouldCreateNestedDirectories() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let nested = dir.path().join("a").join("b");
    assert!(!FileManager::dir_exists(&nested));

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));
    assert!(!FileManager::file_exists(&nested));
    Ok(())
}
