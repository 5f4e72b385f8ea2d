//! Ready-made interpreters.

use crate::blocks::{BlockType, Include};
use crate::interpreter::Interpreter;

/// Extension appended to `\input{}` references.
pub const LATEX_EXTENSION: &str = ".tex";

/// The LaTeX block types in registration order: `{}` groups, `%` line
/// comments (`\%` is literal), `\cite{}` and `\input{}`.
pub fn latex_block_types() -> Vec<BlockType> {
    vec![
        BlockType::delimited("bracket", "{", "}"),
        BlockType::comment("comment", "%").escape('\\'),
        BlockType::delimited("cite", "\\cite{", "}"),
        BlockType::include(
            "input",
            Include::new("\\input{", "}").extension(LATEX_EXTENSION),
        ),
    ]
}

pub fn latex() -> Interpreter {
    Interpreter::from_validated(latex_block_types())
}
