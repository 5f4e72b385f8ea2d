//! # Block Kinds
//!
//! Kind-specific types that own their syntax: delimiter pairs, the comment
//! line terminator, and include resolution settings.

pub mod comment;
pub mod delimited;
pub mod include;
pub mod plain;

pub use comment::Comment;
pub use delimited::{CaseSensitivity, Delimiters};
pub use include::Include;
pub use plain::Plain;
