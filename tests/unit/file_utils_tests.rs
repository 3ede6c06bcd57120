/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use savetube::file_utils::FileManager;
use crate::common;

/// Test that unsafe characters are removed and spaces replaced
#[test]
fn test_title_to_filename_withUnsafeCharacters_shouldSanitize() {
    assert_eq!(FileManager::title_to_filename("Rust: 100% <Fast> {Safe}?"), "Rust_100_Fast_Safe");
    assert_eq!(FileManager::title_to_filename("a/b\\c,d[e]*f"), "abcdef");
    assert_eq!(FileManager::title_to_filename("plain title"), "plain_title");
}

/// Test that non-ASCII titles survive sanitizing
#[test]
fn test_title_to_filename_withUnicodeTitle_shouldKeepLetters() {
    assert_eq!(FileManager::title_to_filename("비디오 제목"), "비디오_제목");
}

/// Test that the subtitle path lands in the output directory
#[test]
fn test_subtitle_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::subtitle_output_path(Path::new("/tmp/videos"), "My_Video");
    assert_eq!(output_path, Path::new("/tmp/videos/My_Video.srt"));
}

/// Test that file_exists distinguishes files from directories
#[test]
fn test_file_exists_withFileAndDir_shouldOnlyAcceptFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.tmp")));
    Ok(())
}

/// Test writing into a directory that does not exist yet
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("nested").join("out.srt");

    FileManager::write_to_file(&target, "content")?;

    assert_eq!(FileManager::read_to_string(&target)?, "content");
    Ok(())
}

/// Test that find_files matches extensions case-insensitively and recursively
#[test]
fn test_find_files_withMixedFiles_shouldFindOnlyExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("sub");
    std::fs::create_dir_all(&nested)?;
    common::create_test_file(temp_dir.path(), "one.xml", "")?;
    common::create_test_file(&nested, "two.XML", "")?;
    common::create_test_file(temp_dir.path(), "three.srt", "")?;

    let files = FileManager::find_files(temp_dir.path(), ".xml")?;

    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.extension().unwrap().eq_ignore_ascii_case("xml")));
    Ok(())
}

/// Test that reading a missing file reports the path
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    let result = FileManager::read_to_string("definitely_missing_12345.xml");
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("definitely_missing_12345.xml"));
}
