use std::fmt;
use std::sync::Arc;

use super::kinds::{CaseSensitivity, Comment, Delimiters, Include, Plain};
use crate::error::BlockTypeError;
use crate::text::{Span, preceding_char};
use crate::tree::SourceId;

/// Behavior switches shared by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFlags {
    /// The block has no body: it closes right after its open marker.
    pub close_immediately: bool,
    /// The block may be force-closed when input ends while it is open.
    pub closeable_by_eof: bool,
    /// While this block is the active node, no other block can open.
    pub forbid_new_openings: bool,
}

/// The kind of a block, with the syntax it owns.
#[derive(Debug, Clone)]
pub enum BlockKind {
    /// Unclaimed text (default when no opener matches).
    Plain,
    /// Balanced literal tags; renders as `open + children + close`.
    Delimited(Delimiters),
    /// Discarded text up to the close marker.
    Comment(Delimiters),
    /// A file reference replaced by the interpreted file.
    Include(Include),
}

/// A configured block type: a kind plus its name, flags and escape character.
#[derive(Debug, Clone)]
pub struct BlockType {
    name: String,
    kind: BlockKind,
    flags: BlockFlags,
    escape_char: Option<char>,
}

impl BlockType {
    pub fn plain() -> Self {
        Self {
            name: Plain::NAME.to_string(),
            kind: BlockKind::Plain,
            flags: BlockFlags {
                closeable_by_eof: true,
                ..BlockFlags::default()
            },
            escape_char: None,
        }
    }

    pub fn delimited(
        name: impl Into<String>,
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: BlockKind::Delimited(Delimiters::new(open, close)),
            flags: BlockFlags::default(),
            escape_char: None,
        }
    }

    /// A line comment: `open` up to the end of the line.
    pub fn comment(name: impl Into<String>, open: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BlockKind::Comment(Comment::delimiters(open)),
            flags: BlockFlags {
                closeable_by_eof: true,
                forbid_new_openings: true,
                ..BlockFlags::default()
            },
            escape_char: None,
        }
    }

    pub fn include(name: impl Into<String>, include: Include) -> Self {
        Self {
            name: name.into(),
            kind: BlockKind::Include(include),
            flags: BlockFlags::default(),
            escape_char: None,
        }
    }

    /// Match tags case-sensitively. No effect on plain blocks.
    pub fn case_sensitive(mut self) -> Self {
        if let Some(d) = self.delimiters_mut() {
            d.case = CaseSensitivity::Sensitive;
        }
        self
    }

    /// Replace the close marker. Used to end comments on something other
    /// than a newline. No effect on plain blocks.
    pub fn close_tag(mut self, close: impl Into<String>) -> Self {
        if let Some(d) = self.delimiters_mut() {
            d.close = close.into();
        }
        self
    }

    pub fn escape(mut self, escape_char: char) -> Self {
        self.escape_char = Some(escape_char);
        self
    }

    pub fn close_immediately(mut self, value: bool) -> Self {
        self.flags.close_immediately = value;
        self
    }

    pub fn closeable_by_eof(mut self, value: bool) -> Self {
        self.flags.closeable_by_eof = value;
        self
    }

    pub fn forbid_new_openings(mut self, value: bool) -> Self {
        self.flags.forbid_new_openings = value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn flags(&self) -> BlockFlags {
        self.flags
    }

    pub fn escape_char(&self) -> Option<char> {
        self.escape_char
    }

    pub fn has_subinterpreter(&self) -> bool {
        matches!(self.kind, BlockKind::Include(_))
    }

    pub fn include_settings(&self) -> Option<&Include> {
        match &self.kind {
            BlockKind::Include(inc) => Some(inc),
            _ => None,
        }
    }

    pub(crate) fn include_settings_mut(&mut self) -> Option<&mut Include> {
        match &mut self.kind {
            BlockKind::Include(inc) => Some(inc),
            _ => None,
        }
    }

    pub fn delimiters(&self) -> Option<&Delimiters> {
        match &self.kind {
            BlockKind::Plain => None,
            BlockKind::Delimited(d) | BlockKind::Comment(d) => Some(d),
            BlockKind::Include(inc) => Some(&inc.delimiters),
        }
    }

    fn delimiters_mut(&mut self) -> Option<&mut Delimiters> {
        match &mut self.kind {
            BlockKind::Plain => None,
            BlockKind::Delimited(d) | BlockKind::Comment(d) => Some(d),
            BlockKind::Include(inc) => Some(&mut inc.delimiters),
        }
    }

    /// Rejects types the scanner cannot make progress with.
    pub fn validate(&self) -> Result<(), BlockTypeError> {
        match self.delimiters() {
            Some(d) if d.open.is_empty() => Err(BlockTypeError::EmptyOpenTag {
                name: self.name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Whether this type's open marker begins at `pos`.
    pub fn opens(&self, text: &str, pos: usize) -> bool {
        !self.is_escaped(text, pos) && self.delimiters().is_some_and(|d| d.opens_at(text, pos))
    }

    /// Whether this type's close marker begins at `pos`.
    pub fn closes(&self, text: &str, pos: usize) -> bool {
        !self.is_escaped(text, pos) && self.delimiters().is_some_and(|d| d.closes_at(text, pos))
    }

    /// Bytes of open marker to skip once opened.
    pub fn advance_at_open(&self) -> usize {
        self.delimiters().map_or(0, |d| d.open.len())
    }

    /// Bytes of close marker to skip once closed.
    pub fn advance_at_close(&self) -> usize {
        self.delimiters().map_or(0, |d| d.close.len())
    }

    fn is_escaped(&self, text: &str, pos: usize) -> bool {
        self.escape_char
            .is_some_and(|esc| preceding_char(text, pos) == Some(esc))
    }
}

/// An instance of a block type recognized in one source buffer.
///
/// The block does not own text: its offsets index the buffer identified by
/// `source` inside the owning tree.
#[derive(Debug, Clone)]
pub struct Block {
    block_type: Arc<BlockType>,
    source: SourceId,
    begin: usize,
    open_len: usize,
    end: Option<usize>,
    close_len: usize,
}

impl Block {
    /// Opens a block at `begin`. Its open marker is assumed to be present.
    pub fn new(block_type: Arc<BlockType>, source: SourceId, begin: usize) -> Self {
        let open_len = block_type.advance_at_open();
        Self {
            block_type,
            source,
            begin,
            open_len,
            end: None,
            close_len: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.block_type.name()
    }

    pub fn block_type(&self) -> &Arc<BlockType> {
        &self.block_type
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub(crate) fn set_source(&mut self, source: SourceId) {
        self.source = source;
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> Option<usize> {
        self.end
    }

    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// Records the close: the block ends `marker_len` bytes after `at`.
    pub(crate) fn finish(&mut self, at: usize, marker_len: usize) {
        debug_assert!(at >= self.begin, "block {self} closed before it began");
        self.end = Some(at + marker_len);
        self.close_len = marker_len;
    }

    /// The whole block, markers included. `None` while open.
    pub fn span(&self) -> Option<Span> {
        self.end.map(|end| Span::new(self.begin, end))
    }

    /// The text between the markers. `None` while open.
    pub fn body_span(&self) -> Option<Span> {
        let span = self.span()?;
        let start = (self.begin + self.open_len).min(span.end);
        let end = span.end.saturating_sub(self.close_len).max(start);
        Some(Span::new(start, end))
    }

    /// Whether this block's close marker begins at `pos`.
    pub fn closes(&self, text: &str, pos: usize) -> bool {
        self.block_type.closes(text, pos)
    }

    /// The raw source slice of the block. An unclosed block runs to the end
    /// of `text`.
    pub fn raw_text<'t>(&self, text: &'t str) -> &'t str {
        Span::new(self.begin, self.end.unwrap_or(text.len())).slice(text)
    }

    /// Renders the block given its children's rendered text, or `None` for a
    /// childless block.
    ///
    /// Delimited blocks wrap their content in the type's configured markers,
    /// so a case-insensitive match comes out in the configured casing.
    /// Self-closing blocks have no content to wrap and render raw.
    pub fn process(&self, text: &str, children: Option<&str>) -> String {
        match (self.block_type.kind(), children) {
            (BlockKind::Comment(_), _) => String::new(),
            (BlockKind::Delimited(d), inner) if !self.block_type.flags().close_immediately => {
                let close = if self.close_len > 0 { d.close.as_str() } else { "" };
                format!("{}{}{close}", d.open, inner.unwrap_or_default())
            }
            (_, Some(inner)) => inner.to_string(),
            (_, None) => self.raw_text(text).to_string(),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{} {}..{}", self.name(), self.begin, end),
            None => write!(f, "{} {}..", self.name(), self.begin),
        }
    }
}
