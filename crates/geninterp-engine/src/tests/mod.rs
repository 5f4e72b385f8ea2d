//! Interpreter tests and shared test helpers.

mod includes;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for source files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a source file with content, creating parent directories as needed
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
