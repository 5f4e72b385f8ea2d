/// How literal tags are compared against the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    #[default]
    Insensitive,
    Sensitive,
}

/// A balanced pair of literal tags, e.g. `\cite{` and `}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
    pub case: CaseSensitivity,
}

impl Delimiters {
    /// Case-insensitive tags.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            case: CaseSensitivity::Insensitive,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case = CaseSensitivity::Sensitive;
        self
    }

    pub fn opens_at(&self, text: &str, pos: usize) -> bool {
        tag_at(text, pos, &self.open, self.case)
    }

    pub fn closes_at(&self, text: &str, pos: usize) -> bool {
        tag_at(text, pos, &self.close, self.case)
    }
}

/// Returns true if `tag` occurs in `text` starting at byte offset `pos`.
///
/// Case-insensitive comparison lowercases both sides per character and only
/// accepts characters of equal UTF-8 width, so a match always spans exactly
/// `tag.len()` bytes.
pub fn tag_at(text: &str, pos: usize, tag: &str, case: CaseSensitivity) -> bool {
    let Some(rest) = text.get(pos..) else {
        return false;
    };
    match case {
        CaseSensitivity::Sensitive => rest.starts_with(tag),
        CaseSensitivity::Insensitive => {
            let mut rest = rest.chars();
            tag.chars().all(|t| match rest.next() {
                Some(c) => c.len_utf8() == t.len_utf8() && c.to_lowercase().eq(t.to_lowercase()),
                None => false,
            })
        }
    }
}
