//! # Text Primitives
//!
//! Byte spans into a shared source buffer and the scanning cursor. All
//! offsets are byte offsets into UTF-8 text.

pub mod cursor;
pub mod span;

pub use cursor::{Cursor, preceding_char};
pub use span::Span;
