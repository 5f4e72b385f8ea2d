pub mod blocks;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod presets;
pub mod text;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use blocks::{
    Block, BlockFlags, BlockKind, BlockType, CaseSensitivity, Comment, Delimiters, Include, Plain,
};
pub use error::{BlockTypeError, InterpretError};
pub use interpreter::{Interpreter, InterpreterOptions};
pub use io::{DiskReader, MemoryReader, SourceReader};
pub use text::Span;
pub use tree::{DocumentTree, Node, NodeId, Source, SourceId};
