use std::path::{Path, PathBuf};

use super::Interpreter;
use crate::error::InterpretError;
use crate::tree::{DocumentTree, NodeId, Source};

/// Files currently being interpreted, outermost first.
#[derive(Debug, Clone, Default)]
pub(crate) struct IncludeChain {
    paths: Vec<PathBuf>,
}

impl IncludeChain {
    pub(crate) fn enter(&mut self, path: PathBuf) -> Result<(), InterpretError> {
        if self.paths.contains(&path) {
            return Err(InterpretError::CyclicInclude { path });
        }
        self.paths.push(path);
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.paths.pop();
    }
}

impl Interpreter {
    /// Interprets the file referenced by include node `id` and splices the
    /// result in as the node's children.
    pub(super) fn run_subinterpreter(
        &self,
        tree: &mut DocumentTree,
        id: NodeId,
        chain: &mut IncludeChain,
    ) -> Result<(), InterpretError> {
        let Some(settings) = tree
            .block(id)
            .and_then(|b| b.block_type().include_settings())
            .cloned()
        else {
            return Ok(());
        };

        let reference = tree.inner_text(id);
        let path = settings.resolve(&reference);
        log::debug!(
            "including {} (reference {:?})",
            path.display(),
            reference.trim()
        );

        let interpreter = settings.subinterpreter.as_deref().unwrap_or(self);
        let subtree = interpreter.interpret_include(&path, chain)?;
        tree.splice(id, subtree);
        Ok(())
    }

    /// Reads `path` in full and interprets it as an independent document.
    fn interpret_include(
        &self,
        path: &Path,
        chain: &mut IncludeChain,
    ) -> Result<DocumentTree, InterpretError> {
        chain.enter(self.chain_key(path))?;
        let result = self
            .reader
            .read_to_string(path)
            .map_err(|source| InterpretError::UnresolvedInclude {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|text| {
                let source = Source {
                    path: Some(path.to_path_buf()),
                    text: text.into(),
                };
                self.interpret_source(source, chain)
            });
        chain.exit();
        result
    }

    /// Identity of `path` on the include chain. Paths that cannot be
    /// canonicalized are compared as written.
    pub(super) fn chain_key(&self, path: &Path) -> PathBuf {
        self.reader
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
