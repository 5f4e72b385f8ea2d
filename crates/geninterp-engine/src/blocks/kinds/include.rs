use std::path::{Path, PathBuf};
use std::sync::Arc;

use relative_path::RelativePath;

use super::delimited::Delimiters;
use crate::interpreter::Interpreter;

/// File-include block type.
///
/// The block body is a file reference. When the block closes, the reference
/// is resolved against `base_dir`, the file is interpreted on its own, and
/// the resulting nodes replace the block's children.
#[derive(Debug, Clone)]
pub struct Include {
    pub delimiters: Delimiters,
    /// Directory relative references are resolved against. Without one they
    /// resolve against the working directory.
    pub base_dir: Option<PathBuf>,
    /// Appended to a reference that does not already end with it.
    pub extension: Option<String>,
    /// Interpreter for included files. `None` reuses the enclosing one.
    pub subinterpreter: Option<Arc<Interpreter>>,
}

impl Include {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            delimiters: Delimiters::new(open, close),
            base_dir: None,
            extension: None,
            subinterpreter: None,
        }
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn subinterpreter(mut self, interpreter: Arc<Interpreter>) -> Self {
        self.subinterpreter = Some(interpreter);
        self
    }

    /// Turns a file reference into a path: surrounding whitespace is
    /// trimmed, the extension appended if missing, and relative references
    /// joined onto the base directory.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let mut stub = reference.trim().to_string();
        if let Some(ext) = &self.extension
            && !stub.ends_with(ext.as_str())
        {
            stub.push_str(ext);
        }

        if Path::new(&stub).is_absolute() {
            return PathBuf::from(stub);
        }
        let base = self.base_dir.as_deref().unwrap_or(Path::new(""));
        RelativePath::new(&stub).to_path(base)
    }
}
