use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::export::RenderedFile;
use crate::formats::Registry;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with any of the given extensions, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let wanted: Vec<String> = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy().to_lowercase();
                    if wanted.contains(&ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Files under `path` the registry can decode; a file path is returned as is
    pub fn find_importable<P: AsRef<Path>>(path: P, registry: &Registry) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        if Self::file_exists(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        if !Self::dir_exists(path) {
            return Err(anyhow!("Import path does not exist: {:?}", path));
        }

        Self::find_files(path, &registry.extensions())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Write a rendered export file into `output_dir`. Existing files are kept unless `force`.
    pub fn write_rendered<P: AsRef<Path>>(
        output_dir: P,
        file: &RenderedFile,
        force: bool,
    ) -> Result<PathBuf> {
        let name = Path::new(&file.filename);
        if file.filename.contains(['/', '\\'])
            || name.file_name().map_or(true, |n| n != name.as_os_str())
        {
            return Err(anyhow!(
                "Refusing to write outside the output directory: {:?}",
                file.filename
            ));
        }
        let path = output_dir.as_ref().join(name);
        if Self::file_exists(&path) && !force {
            return Err(anyhow!(
                "Output file already exists: {:?} (use --force to overwrite)",
                path
            ));
        }
        Self::write_bytes(&path, &file.bytes)?;
        Ok(path)
    }
}
