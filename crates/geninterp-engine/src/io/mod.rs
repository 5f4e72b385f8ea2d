use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads whole source files for the interpreter.
///
/// Included files are read eagerly and released before they are
/// interpreted; implementations never need to hold a handle open.
pub trait SourceReader: fmt::Debug + Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// A stable identity for `path`, used to detect include cycles.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskReader;

impl SourceReader for DiskReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}

/// Serves files from memory, keyed by the exact path they were added under.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl SourceReader for MemoryReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_dir, create_test_file};

    #[test]
    fn test_disk_reader_reads_file() {
        let dir = create_test_dir();
        let path = create_test_file(&dir, "intro.tex", "aa{bb}cc");

        let content = DiskReader.read_to_string(&path).unwrap();
        assert_eq!(content, "aa{bb}cc");
    }

    #[test]
    fn test_disk_reader_missing_file() {
        let dir = create_test_dir();
        let result = DiskReader.read_to_string(&dir.path().join("missing.tex"));
        assert!(matches!(result, Err(e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_disk_reader_canonicalizes_dot_segments() {
        let dir = create_test_dir();
        let path = create_test_file(&dir, "a.tex", "");
        let dotted = dir.path().join(".").join("a.tex");

        assert_eq!(
            DiskReader.canonicalize(&dotted).unwrap(),
            DiskReader.canonicalize(&path).unwrap()
        );
    }

    #[test]
    fn test_memory_reader() {
        let reader = MemoryReader::new().with_file("ch1.tex", "hello");
        assert_eq!(reader.read_to_string(Path::new("ch1.tex")).unwrap(), "hello");

        let missing = reader.read_to_string(Path::new("ch2.tex"));
        assert!(matches!(missing, Err(e) if e.kind() == io::ErrorKind::NotFound));
    }
}
