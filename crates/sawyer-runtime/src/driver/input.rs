//! Pull-based input text sources.

use sawyer_core::Length;

/// A pull-based byte source.
///
/// The driver seeks once per parse (to the incremental resume position)
/// and then pulls chunks until one comes back empty. Bytes must be valid
/// UTF-8 overall, but a single `read` may end in the middle of a
/// character; the lexer reassembles sequences across chunk boundaries.
pub trait Input {
    /// Position the source so that the next `read` starts at `position`.
    fn seek(&mut self, position: Length);

    /// Return the next chunk of bytes. An empty slice signals end of input.
    fn read(&mut self) -> &[u8];
}

/// An edit applied to the input text since the previous parse.
///
/// The driver itself only consumes `position` (to decide how far the
/// previous parse stack can be trusted); the insert/remove counts are for
/// input implementations that map old positions to new ones.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InputEdit {
    /// Character offset at which the edit happened.
    pub position: u32,
    pub chars_inserted: u32,
    pub chars_removed: u32,
}

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// In-memory input backed by a string, read out in fixed-size chunks.
pub struct StringInput {
    text: String,
    offset: usize,
    chunk_size: usize,
}

impl StringInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_chunk_size(text, DEFAULT_CHUNK_SIZE)
    }

    /// A small chunk size forces reads to split multi-byte characters,
    /// which is useful for exercising the lexer's chunk handling.
    pub fn with_chunk_size(text: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            text: text.into(),
            offset: 0,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl Input for StringInput {
    fn seek(&mut self, position: Length) {
        self.offset = (position.bytes as usize).min(self.text.len());
    }

    fn read(&mut self) -> &[u8] {
        let end = (self.offset + self.chunk_size).min(self.text.len());
        let chunk = &self.text.as_bytes()[self.offset..end];
        self.offset = end;
        chunk
    }
}
