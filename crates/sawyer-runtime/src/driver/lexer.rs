//! The character cursor shared by the driver and a language's lex function.

use sawyer_core::{Length, SYM_END, SYM_ERROR, Symbol, Tree};

use super::input::Input;

/// Streaming cursor over an [`Input`] with a one-character lookahead.
///
/// Three positions are tracked: `current` (where the lookahead character
/// sits), `token_start` (set by [`start_token`](Lexer::start_token)) and
/// `token_end` (the end of the previously finished token). The gap between
/// `token_end` and `token_start` becomes the next token's padding, so
/// trivia skipped before `start_token` — and characters skipped by the
/// driver during error recovery — stay accounted for.
///
/// A lexer is constructed per parse over a borrowed input and discarded
/// afterwards; all persistent parse state lives in the parser.
pub struct Lexer<'i> {
    input: &'i mut dyn Input,
    /// Unconsumed bytes of the current chunk, starting at `chunk_pos`.
    chunk: Vec<u8>,
    chunk_pos: usize,
    lookahead: Option<char>,
    current: Length,
    token_start: Length,
    token_end: Length,
}

impl<'i> Lexer<'i> {
    pub fn new(input: &'i mut dyn Input) -> Self {
        let mut lexer = Self {
            input,
            chunk: Vec::new(),
            chunk_pos: 0,
            lookahead: None,
            current: Length::zero(),
            token_start: Length::zero(),
            token_end: Length::zero(),
        };
        lexer.reset(Length::zero());
        lexer
    }

    /// Reposition the cursor; all three positions collapse to `position`.
    pub fn reset(&mut self, position: Length) {
        self.input.seek(position);
        self.chunk.clear();
        self.chunk_pos = 0;
        self.current = position;
        self.token_start = position;
        self.token_end = position;
        self.fill_lookahead();
    }

    /// The character under the cursor, if any.
    #[inline]
    pub fn lookahead(&self) -> Option<char> {
        self.lookahead
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.lookahead.is_none()
    }

    /// Position of the cursor.
    #[inline]
    pub fn current_position(&self) -> Length {
        self.current
    }

    /// Start position of the most recently started token.
    #[inline]
    pub fn token_start_position(&self) -> Length {
        self.token_start
    }

    /// Consume one character. Returns false at end of input.
    pub fn advance(&mut self) -> bool {
        let Some(ch) = self.lookahead else {
            return false;
        };
        self.chunk_pos += ch.len_utf8();
        self.current += Length::new(1, ch.len_utf8() as u32);
        self.fill_lookahead();
        true
    }

    /// Mark the start of the token now being recognized. Everything
    /// consumed since the previous token's end becomes this token's
    /// padding.
    #[inline]
    pub fn start_token(&mut self) {
        self.token_start = self.current;
    }

    /// Finish the current token as a leaf node and advance `token_end`.
    pub fn finish_token(&mut self, symbol: Symbol) -> Tree {
        let padding = self.token_start - self.token_end;
        let size = self.current - self.token_start;
        self.token_end = self.current;
        Tree::leaf(symbol, padding, size)
    }

    /// Zero-size end-of-input token at the cursor.
    pub fn finish_end_token(&mut self) -> Tree {
        self.start_token();
        self.finish_token(SYM_END)
    }

    /// Zero-size error token at the cursor, without consuming anything.
    /// The lex function emits this when no token can start here; the
    /// driver's recovery loop decides how far to skip.
    pub fn finish_error_token(&mut self) -> Tree {
        self.start_token();
        self.finish_token(SYM_ERROR)
    }

    /// Decode the next lookahead character, pulling more chunks as needed.
    fn fill_lookahead(&mut self) {
        loop {
            if self.chunk_pos >= self.chunk.len() {
                self.chunk.clear();
                self.chunk_pos = 0;
                let next = self.input.read();
                if next.is_empty() {
                    self.lookahead = None;
                    return;
                }
                self.chunk.extend_from_slice(next);
            }

            let rest = &self.chunk[self.chunk_pos..];
            let width = utf8_sequence_len(rest[0]).unwrap_or_else(|| {
                panic!("input is not valid UTF-8 at byte offset {}", self.current.bytes)
            });
            if rest.len() < width {
                // A character split across a chunk boundary: keep the tail
                // and pull the next chunk behind it.
                let tail = rest.to_vec();
                self.chunk = tail;
                self.chunk_pos = 0;
                let next = self.input.read();
                if next.is_empty() {
                    panic!(
                        "input ends inside a UTF-8 sequence at byte offset {}",
                        self.current.bytes
                    );
                }
                self.chunk.extend_from_slice(next);
                continue;
            }

            match std::str::from_utf8(&rest[..width]) {
                Ok(s) => {
                    self.lookahead = s.chars().next();
                    return;
                }
                Err(_) => {
                    panic!("input is not valid UTF-8 at byte offset {}", self.current.bytes)
                }
            }
        }
    }
}

fn utf8_sequence_len(first_byte: u8) -> Option<usize> {
    match first_byte {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}
