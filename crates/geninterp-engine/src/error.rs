use std::path::PathBuf;

use crate::tree::DocumentTree;

/// Block types the interpreter refuses to register.
#[derive(Debug, thiserror::Error)]
pub enum BlockTypeError {
    #[error("block type '{name}' has an empty open tag")]
    EmptyOpenTag { name: String },
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// Input ended while a block that cannot be closed by EOF was open.
    /// Carries the tree as built so far.
    #[error("{block} is open, but is not allowed to be closed by EOF")]
    UnterminatedBlock {
        block: String,
        tree: Box<DocumentTree>,
    },
    #[error("failed to read included file {path}: {source}")]
    UnresolvedInclude {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cyclic include of {path}")]
    CyclicInclude { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl InterpretError {
    /// The partially built tree, for errors that carry one.
    pub fn partial_tree(&self) -> Option<&DocumentTree> {
        match self {
            InterpretError::UnterminatedBlock { tree, .. } => Some(tree),
            _ => None,
        }
    }
}
