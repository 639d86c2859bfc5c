//! Replayable forward iterator over the input tokens.

/// Read position over an immutable token slice.
///
/// The matcher shares one cursor by `&mut` across the whole recursive descent.
/// Backtracking is a single [`Cursor::rewind`], never a snapshot of the slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [String],
    index: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens, index: 0 }
    }

    /// Return the next unread token and move past it.
    ///
    /// Returns `None` without side effects once the input is exhausted.
    pub fn advance(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token.as_str())
    }

    /// Step back by exactly one token (clamped at the start).
    pub fn rewind(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Look at the next token without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.index).map(|s| s.as_str())
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Tokens not yet read.
    pub fn remaining(&self) -> &'a [String] {
        &self.tokens[self.index.min(self.tokens.len())..]
    }
}
