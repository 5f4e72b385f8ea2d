/// A cursor for left-to-right scanning with byte position tracking.
///
/// Positions are byte offsets into `s` and always sit on a char boundary:
/// `bump` steps over a whole character, and `bump_n` is only ever called
/// with the length of a marker that was matched at the current position.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The text being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s`.
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Returns the current byte position.
    pub fn pos(&self) -> usize {
        self.i
    }

    /// Returns true if at end of text.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.s.get(self.i..)?.chars().next()
    }

    /// Advances by one character, returning the consumed character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Advances by up to `n` characters, stopping at end of text.
    /// Returns the number of bytes skipped.
    pub fn bump_chars(&mut self, n: usize) -> usize {
        let start = self.i;
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
        self.i - start
    }
}

/// Returns the character immediately preceding byte offset `pos`, if any.
pub fn preceding_char(text: &str, pos: usize) -> Option<char> {
    text.get(..pos)?.chars().next_back()
}
