use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Characters not allowed in output file names
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[%:/,\\\[\]<>{}*?]").unwrap()
});

// @const: Extension of written subtitle files
pub const SUBTITLE_EXTENSION: &str = "srt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
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

    /// Turn a video title into a file name base.
    ///
    /// Drops `%:/,\[]<>{}*?` and replaces spaces with underscores.
    pub fn title_to_filename(title: &str) -> String {
        UNSAFE_FILENAME_CHARS.replace_all(title, "").replace(' ', "_")
    }

    // @generates: <output_dir>/<base_name>.srt
    pub fn subtitle_output_path<P: AsRef<Path>>(output_dir: P, base_name: &str) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("{}.{}", base_name, SUBTITLE_EXTENSION))
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
            if path.is_file() && matches {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
