//! # Block Types
//!
//! A block is a recognized span of text with open/close detection and a
//! text-rendering rule.
//!
//! ## Modules
//!
//! - **`types`**: `BlockType` (a configured kind plus name, flags and escape
//!   character) and `Block` (an instance with offsets into a source buffer)
//! - **`kinds`**: Kind-specific types owning their syntax (Plain, Delimiters,
//!   Comment, Include)
//!
//! ## Capabilities
//!
//! Every kind answers the same questions, dispatched over `BlockKind`:
//!
//! - `opens(text, pos)` / `closes(text, pos)`: does a marker begin here?
//!   A marker preceded by the type's escape character never matches.
//! - `advance_at_open()` / `advance_at_close()`: marker length in bytes
//! - `process(text, children)`: the block's rendered text
//!
//! Flags (`close_immediately`, `closeable_by_eof`, `forbid_new_openings`)
//! are plain data on the type, defaulted per kind and overridable.

pub mod kinds;
pub mod types;

pub use kinds::{CaseSensitivity, Comment, Delimiters, Include, Plain};
pub use types::{Block, BlockFlags, BlockKind, BlockType};
