//! # Interpreter
//!
//! A single left-to-right pass over the text that builds a `DocumentTree`.
//!
//! ## Scanning
//!
//! At each position the scanner:
//!
//! 1. **Tries to open** a block, unless the active block forbids new
//!    openings. Block types are tried in registration order and the first
//!    match wins, so a specific marker (`\cite{`) must be registered before
//!    a general one it overlaps (`\`).
//! 2. **Else tries to close** the active block.
//! 3. **Else** treats the character as plain text.
//!
//! Runs of plain text become plain leaves when the next block opens or
//! closes, and at end of input. At end of input, blocks still open are
//! force-closed if their type allows it; otherwise the parse fails with
//! `UnterminatedBlock`.
//!
//! ## Includes
//!
//! When an include block closes, its inner text is resolved to a file which
//! is read and interpreted on its own; the resulting nodes replace the
//! include's children. Files on the current include chain are rejected with
//! `CyclicInclude`.

mod include;

use std::path::Path;
use std::sync::Arc;

use include::IncludeChain;

use crate::blocks::{Block, BlockType};
use crate::error::{BlockTypeError, InterpretError};
use crate::io::{DiskReader, SourceReader};
use crate::text::Cursor;
use crate::tree::{DocumentTree, Source, SourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Characters skipped after the open marker of a self-closing block.
    /// They count as the block's close marker.
    pub self_close_skip: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self { self_close_skip: 1 }
    }
}

/// An ordered set of block types plus the collaborators needed to follow
/// includes. Immutable once built; share it behind an `Arc` to parse on
/// several threads.
#[derive(Debug, Clone)]
pub struct Interpreter {
    block_types: Vec<Arc<BlockType>>,
    plain: Arc<BlockType>,
    options: InterpreterOptions,
    reader: Arc<dyn SourceReader>,
}

impl Interpreter {
    /// Registers `block_types` in order. Order decides which type wins when
    /// several open at the same position.
    pub fn new(block_types: impl IntoIterator<Item = BlockType>) -> Result<Self, BlockTypeError> {
        let block_types: Vec<BlockType> = block_types.into_iter().collect();
        for block_type in &block_types {
            block_type.validate()?;
        }
        Ok(Self::from_validated(block_types))
    }

    pub(crate) fn from_validated(block_types: Vec<BlockType>) -> Self {
        Self {
            block_types: block_types.into_iter().map(Arc::new).collect(),
            plain: Arc::new(BlockType::plain()),
            options: InterpreterOptions::default(),
            reader: Arc::new(DiskReader),
        }
    }

    pub fn with_options(mut self, options: InterpreterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_reader(mut self, reader: impl SourceReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    /// Resolves includes relative to the directory containing `file`.
    pub fn with_base_file(self, file: impl AsRef<Path>) -> Self {
        let dir = file
            .as_ref()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        self.with_base_dir(dir)
    }

    /// Sets the base directory of every include type, including those of
    /// sub-interpreter overrides.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        for block_type in &mut self.block_types {
            if block_type.has_subinterpreter()
                && let Some(include) = Arc::make_mut(block_type).include_settings_mut()
            {
                include.base_dir = Some(dir.to_path_buf());
                if let Some(sub) = include.subinterpreter.take() {
                    let sub = Arc::unwrap_or_clone(sub).with_base_dir(dir);
                    include.subinterpreter = Some(Arc::new(sub));
                }
            }
        }
        self
    }

    pub fn block_types(&self) -> &[Arc<BlockType>] {
        &self.block_types
    }

    pub fn options(&self) -> InterpreterOptions {
        self.options
    }

    pub fn reader(&self) -> &dyn SourceReader {
        self.reader.as_ref()
    }

    pub fn interpret(&self, text: &str) -> Result<DocumentTree, InterpretError> {
        let source = Source {
            path: None,
            text: Arc::from(text),
        };
        self.interpret_source(source, &mut IncludeChain::default())
    }

    pub fn interpret_file(&self, path: impl AsRef<Path>) -> Result<DocumentTree, InterpretError> {
        let path = path.as_ref();
        let text = self
            .reader
            .read_to_string(path)
            .map_err(|source| InterpretError::ReadSource {
                path: path.to_path_buf(),
                source,
            })?;

        let mut chain = IncludeChain::default();
        chain.enter(self.chain_key(path))?;
        let source = Source {
            path: Some(path.to_path_buf()),
            text: text.into(),
        };
        self.interpret_source(source, &mut chain)
    }

    /// Interprets `text` and renders the result.
    pub fn render(&self, text: &str) -> Result<String, InterpretError> {
        Ok(self.interpret(text)?.render())
    }

    fn interpret_source(
        &self,
        source: Source,
        chain: &mut IncludeChain,
    ) -> Result<DocumentTree, InterpretError> {
        let text = Arc::clone(&source.text);
        let mut tree = DocumentTree::from_source(source);
        let mut cursor = Cursor::new(&text);
        let mut run_start = 0;

        while !cursor.eof() {
            let i = cursor.pos();

            let forbidden = tree
                .active_block()
                .is_some_and(|b| b.block_type().flags().forbid_new_openings);
            if !forbidden
                && let Some(block_type) = self.block_types.iter().find(|bt| bt.opens(&text, i))
            {
                self.flush_plain(&mut tree, run_start, i);
                let id = tree.push(Block::new(Arc::clone(block_type), SourceId::MAIN, i));
                cursor.bump_n(block_type.advance_at_open());

                if block_type.flags().close_immediately {
                    if block_type.has_subinterpreter() {
                        self.run_subinterpreter(&mut tree, id, chain)?;
                    }
                    let at = cursor.pos();
                    let skipped = cursor.bump_chars(self.options.self_close_skip);
                    tree.close(at, skipped);
                }
                run_start = cursor.pos();
                continue;
            }

            if let Some(id) = tree.active()
                && let Some(block_type) = tree
                    .block(id)
                    .filter(|b| b.closes(&text, i))
                    .map(|b| Arc::clone(b.block_type()))
            {
                self.flush_plain(&mut tree, run_start, i);
                if block_type.has_subinterpreter() {
                    self.run_subinterpreter(&mut tree, id, chain)?;
                }
                let advance = block_type.advance_at_close();
                tree.close(i, advance);
                cursor.bump_n(advance);
                run_start = cursor.pos();
                continue;
            }

            cursor.bump();
        }

        self.flush_plain(&mut tree, run_start, text.len());

        if let Err(id) = tree.close_at_eof() {
            let block = tree.block(id).map(|b| b.to_string()).unwrap_or_default();
            log::error!("{block} is open at end of input; tree so far:");
            log::error!("{}", tree.render_structure());
            return Err(InterpretError::UnterminatedBlock {
                block,
                tree: Box::new(tree),
            });
        }
        Ok(tree)
    }

    /// Materializes the plain run `[start, end)` as a closed leaf under the
    /// active node. Empty runs produce nothing.
    fn flush_plain(&self, tree: &mut DocumentTree, start: usize, end: usize) {
        if end > start {
            tree.push(Block::new(Arc::clone(&self.plain), SourceId::MAIN, start));
            tree.close(end, 0);
        }
    }
}
