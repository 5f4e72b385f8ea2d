use super::delimited::Delimiters;

/// Line-scoped comment block type with owned delimiter constant.
///
/// A comment runs from its open marker to the end of the line (or EOF) and
/// renders as nothing. Its newline is consumed along with the body.
pub struct Comment;

impl Comment {
    /// The default closing marker.
    pub const LINE_END: &'static str = "\n";

    /// Delimiters for a comment introduced by `open` and ending at a newline.
    pub fn delimiters(open: impl Into<String>) -> Delimiters {
        Delimiters::new(open, Self::LINE_END)
    }
}
