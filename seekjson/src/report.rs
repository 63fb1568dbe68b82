// SPDX-License-Identifier: Apache-2.0

//! Latched error diagnostics.
//!
//! The first grammar violation produces a [`Diagnostic`] that the reader
//! latches; every later operation on that reader is a no-op. The diagnostic
//! carries the error position, a short message, and a window of document text
//! around the offending byte so it can render as:
//!
//! ```text
//! 3:14: error: expected ',' between table elements, got '"'
//!   3 | "a": 5.0 "b": 1.0
//!              ^
//! ```
//!
//! The rendering is a convenience for humans, not a machine contract; only
//! line/column fidelity is guaranteed.

use core::fmt;

/// Error category, matching where in the grammar the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected character where a structural token was required.
    Structural,
    /// Unterminated string or illegal raw control character inside one.
    String,
    /// Malformed numeric literal.
    Number,
    /// Byte mismatch inside `true` / `false` / `null`.
    Literal,
    /// Stream read, position query, or seek failure.
    Io,
    /// No JSON value at the cursor where one was required.
    Type,
    /// Latched by the caller via [`JsonReader::latch_error`](crate::JsonReader::latch_error).
    Caller,
}

/// Fixed-capacity text accumulator. Overflowing writes truncate silently;
/// diagnostics prefer being short over failing.
pub(crate) struct TextBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> TextBuf<N> {
    pub(crate) fn new() -> Self {
        TextBuf {
            buf: [0u8; N],
            len: 0,
        }
    }

    pub(crate) fn push_byte(&mut self, b: u8) {
        if self.len < N {
            self.buf[self.len] = b;
            self.len += 1;
        }
    }

    /// Append a document byte, replacing anything non-printable with `.` so
    /// caret alignment survives tabs and binary junk.
    pub(crate) fn push_printable(&mut self, b: u8) {
        if b.is_ascii_graphic() || b == b' ' {
            self.push_byte(b);
        } else {
            self.push_byte(b'.');
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        // Only ASCII ever goes in via push_printable; fmt writes are valid
        // UTF-8 but may be cut mid-character by truncation.
        match core::str::from_utf8(&self.buf[..self.len]) {
            Ok(s) => s,
            Err(e) => {
                // Fall back to the longest valid prefix.
                let valid = e.valid_up_to();
                core::str::from_utf8(&self.buf[..valid]).unwrap_or("")
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

impl<const N: usize> fmt::Write for TextBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &b in s.as_bytes() {
            self.push_byte(b);
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for TextBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

const MESSAGE_CAP: usize = 128;
const CONTEXT_CAP: usize = 84;

/// A latched decode error: position, message, and a caret-annotated excerpt
/// of the offending line.
#[derive(Debug)]
pub struct Diagnostic {
    kind: ErrorKind,
    line: u32,
    column: u32,
    message: TextBuf<MESSAGE_CAP>,
    context: TextBuf<CONTEXT_CAP>,
    caret: usize,
}

impl Diagnostic {
    pub(crate) fn new(kind: ErrorKind, line: u32, column: u32, args: fmt::Arguments<'_>) -> Self {
        let mut message = TextBuf::new();
        // Truncation is fine; ignore the (never-failing) fmt result.
        let _ = fmt::Write::write_fmt(&mut message, args);
        Diagnostic {
            kind,
            line,
            column,
            message,
            context: TextBuf::new(),
            caret: 0,
        }
    }

    /// Attach the document excerpt. `caret` is the offset of the offending
    /// byte within `excerpt`.
    pub(crate) fn set_context(&mut self, excerpt: &[u8], caret: usize) {
        for &b in excerpt {
            self.context.push_printable(b);
        }
        self.caret = caret.min(self.context.len());
    }

    /// Error category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 1-based line of the error.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the error (0 at the start of a line).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The bare message, without position or context.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

fn decimal_width(mut v: u32) -> usize {
    let mut width = 1;
    while v >= 10 {
        v /= 10;
        width += 1;
    }
    width
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: error: {}",
            self.line,
            self.column,
            self.message.as_str()
        )?;
        if !self.context.is_empty() {
            write!(f, "\n  {} | {}\n", self.line, self.context.as_str())?;
            // "  <line> | " prefix, then the caret under the error column.
            let pad = 2 + decimal_width(self.line) + 3 + self.caret;
            for _ in 0..pad {
                f.write_str(" ")?;
            }
            f.write_str("^")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_buf_truncates_silently() {
        let mut buf: TextBuf<4> = TextBuf::new();
        use core::fmt::Write;
        write!(buf, "abcdef").unwrap();
        assert_eq!(buf.as_str(), "abcd");
    }

    #[test]
    fn push_printable_masks_control_bytes() {
        let mut buf: TextBuf<8> = TextBuf::new();
        buf.push_printable(b'a');
        buf.push_printable(b'\t');
        buf.push_printable(0x01);
        buf.push_printable(b' ');
        assert_eq!(buf.as_str(), "a.. ");
    }

    #[test]
    fn display_without_context() {
        let d = Diagnostic::new(ErrorKind::Number, 2, 7, format_args!("malformed number"));
        let mut out = std::string::String::new();
        use core::fmt::Write;
        write!(out, "{d}").unwrap();
        assert_eq!(out, "2:7: error: malformed number");
    }

    #[test]
    fn display_aligns_caret_under_error() {
        let mut d = Diagnostic::new(
            ErrorKind::Structural,
            3,
            10,
            format_args!("expected ','"),
        );
        d.set_context(b"\"a\": 5.0 \"b\": 1.0", 9);
        let mut out = std::string::String::new();
        use core::fmt::Write;
        write!(out, "{d}").unwrap();

        let mut it = out.lines();
        assert_eq!(it.next(), Some("3:10: error: expected ','"));
        assert_eq!(it.next(), Some("  3 | \"a\": 5.0 \"b\": 1.0"));
        let caret_line = it.next().unwrap();
        // Prefix "  3 | " is 6 chars; caret offset 9 within the excerpt.
        assert_eq!(caret_line.find('^'), Some(6 + 9));
        assert_eq!(it.next(), None);
    }
}
