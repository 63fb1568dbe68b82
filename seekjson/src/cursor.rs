// SPDX-License-Identifier: Apache-2.0

//! One-byte lookahead cursor over a [`ByteStream`].
//!
//! The lookahead is lazy: [`Cursor::advance`] only marks the current byte as
//! consumed, and the next [`Cursor::ensure`] performs the actual read. This
//! keeps the stream position exactly one byte past the lookahead whenever the
//! slot is filled, which is what makes save/restore byte-exact.

use crate::stream::ByteStream;

/// The lookahead slot: a fetched byte, or the end-of-stream sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Look {
    Byte(u8),
    End,
}

impl Look {
    pub(crate) fn is_whitespace(self) -> bool {
        matches!(self, Look::Byte(b' ' | b'\t' | b'\n' | b'\r'))
    }
}

/// Saved scalar cursor state plus the stream offset it was taken at.
///
/// Restoring reproduces byte-for-byte identical subsequent reads, including
/// re-fetching the same characters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CursorMark {
    look: Look,
    pending: bool,
    line: u32,
    column: u32,
    pos: u64,
}

impl CursorMark {
    /// Placeholder mark handed out when the position query already failed.
    pub(crate) fn dummy() -> Self {
        CursorMark {
            look: Look::End,
            pending: true,
            line: 0,
            column: 0,
            pos: 0,
        }
    }
}

/// Live decoding position: stream handle, lookahead slot, pending-fetch flag,
/// and line/column counters.
#[derive(Debug)]
pub(crate) struct Cursor<S> {
    stream: S,
    look: Look,
    pending: bool,
    line: u32,
    column: u32,
}

impl<S: ByteStream> Cursor<S> {
    pub(crate) fn new(stream: S) -> Self {
        Cursor {
            stream,
            look: Look::End,
            pending: true,
            line: 1,
            column: 0,
        }
    }

    /// Fill the lookahead slot if the previous byte was consumed.
    ///
    /// Idempotent until the next [`advance`](Self::advance): calling it twice
    /// in a row returns the same byte without touching the stream.
    pub(crate) fn ensure(&mut self) -> Result<Look, S::Error> {
        if self.pending {
            self.look = match self.stream.read_byte()? {
                Some(b) => {
                    if b == b'\n' {
                        self.line += 1;
                        self.column = 0;
                    } else {
                        self.column += 1;
                    }
                    Look::Byte(b)
                }
                None => Look::End,
            };
            self.pending = false;
        }
        Ok(self.look)
    }

    /// Mark the lookahead as consumed. The actual read is deferred to the
    /// next `ensure`.
    pub(crate) fn advance(&mut self) {
        self.pending = true;
    }

    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    pub(crate) fn stream(&mut self) -> &mut S {
        &mut self.stream
    }

    pub(crate) fn into_stream(self) -> S {
        self.stream
    }

    pub(crate) fn save(&mut self) -> Result<CursorMark, S::Error> {
        Ok(CursorMark {
            look: self.look,
            pending: self.pending,
            line: self.line,
            column: self.column,
            pos: self.stream.position()?,
        })
    }

    pub(crate) fn restore(&mut self, mark: &CursorMark) -> Result<(), S::Error> {
        self.stream.seek_to(mark.pos)?;
        self.look = mark.look;
        self.pending = mark.pending;
        self.line = mark.line;
        self.column = mark.column;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceStream;

    #[test]
    fn ensure_is_lazy_and_idempotent() {
        let mut cursor = Cursor::new(SliceStream::new(b"ab"));
        assert_eq!(cursor.ensure(), Ok(Look::Byte(b'a')));
        // No advance yet: same byte again, stream untouched
        assert_eq!(cursor.ensure(), Ok(Look::Byte(b'a')));
        assert_eq!(cursor.stream().position(), Ok(1));

        cursor.advance();
        // Advance alone reads nothing
        assert_eq!(cursor.stream().position(), Ok(1));
        assert_eq!(cursor.ensure(), Ok(Look::Byte(b'b')));
        cursor.advance();
        assert_eq!(cursor.ensure(), Ok(Look::End));
    }

    #[test]
    fn line_and_column_tracking() {
        let mut cursor = Cursor::new(SliceStream::new(b"ab\ncd"));
        assert_eq!((cursor.line(), cursor.column()), (1, 0));
        cursor.ensure().unwrap(); // 'a'
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        cursor.advance();
        cursor.ensure().unwrap(); // 'b'
        assert_eq!((cursor.line(), cursor.column()), (1, 2));
        cursor.advance();
        cursor.ensure().unwrap(); // '\n'
        assert_eq!((cursor.line(), cursor.column()), (2, 0));
        cursor.advance();
        cursor.ensure().unwrap(); // 'c'
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
    }

    #[test]
    fn save_restore_is_byte_exact() {
        let mut cursor = Cursor::new(SliceStream::new(b"one\ntwo"));
        cursor.ensure().unwrap();
        cursor.advance();
        cursor.ensure().unwrap();

        let mark = cursor.save().unwrap();
        let line = cursor.line();
        let column = cursor.column();

        // Read ahead arbitrarily
        for _ in 0..4 {
            cursor.advance();
            cursor.ensure().unwrap();
        }
        assert_ne!(cursor.column(), column);

        cursor.restore(&mark).unwrap();
        assert_eq!((cursor.line(), cursor.column()), (line, column));
        assert_eq!(cursor.ensure(), Ok(Look::Byte(b'n')));
        cursor.advance();
        assert_eq!(cursor.ensure(), Ok(Look::Byte(b'e')));
    }
}
