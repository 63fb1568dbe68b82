// SPDX-License-Identifier: Apache-2.0

//! Value classification and the string continuation protocol types.

use crate::cursor::Look;

/// The kind of JSON value sitting under the cursor.
///
/// Derived from the lookahead byte alone; nothing is consumed. Callers
/// dispatch on this before committing to a decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// No valid value starts here.
    Invalid,
    /// A numeric literal.
    Number,
    /// A JSON list (`[`).
    Array,
    /// A JSON object (`{`).
    Table,
    /// A quoted string.
    String,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
}

impl ValueKind {
    pub(crate) fn classify(look: Look) -> Self {
        match look {
            Look::Byte(b'"') => ValueKind::String,
            Look::Byte(b'-' | b'+' | b'.') => ValueKind::Number,
            Look::Byte(b) if b.is_ascii_digit() => ValueKind::Number,
            Look::Byte(b't' | b'f') => ValueKind::Bool,
            Look::Byte(b'n') => ValueKind::Null,
            Look::Byte(b'{') => ValueKind::Table,
            Look::Byte(b'[') => ValueKind::Array,
            _ => ValueKind::Invalid,
        }
    }
}

/// Outcome of one [`read_string_chunk`](crate::JsonReader::read_string_chunk)
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringStatus {
    /// The closing quote was consumed; the string is fully decoded.
    Done,
    /// The destination buffer filled up before the string ended. Grow the
    /// buffer in place, or drain it and rebase the write cursor, then call
    /// again.
    WantsMore,
}

/// Resume state for decoding one string across multiple chunk calls.
///
/// `written` is the write offset into the caller's (logically growing)
/// destination. Keep it verbatim when enlarging the buffer in place. If you
/// drain the buffer between calls instead, reset it to 0 only after the
/// drained bytes are fully consumed; swapping buffers without rebasing
/// corrupts the decoded text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCursor {
    /// Bytes written into the destination so far.
    pub written: usize,
    /// True when the last consumed byte was an unprocessed `\`.
    pub in_escape: bool,
}
