// SPDX-License-Identifier: Apache-2.0

//! The pull decoder.
//!
//! [`JsonReader`] walks a document structurally: callers loop on
//! `table_begin` / `table_has_next` (and the array equivalents), decide per
//! key what to read or skip, and may peek ahead non-destructively before
//! committing. Nothing is buffered beyond the one-byte lookahead and whatever
//! scratch the caller supplies for strings.
//!
//! # Error latch
//!
//! The first violation latches a [`Diagnostic`] and every later call becomes a
//! no-op returning a zero/default value. This lets a decode loop run without
//! per-call checks; inspect [`error`](JsonReader::error) (or call
//! [`finish`](JsonReader::finish)) once at the end. A latched reader cannot be
//! revived; build a fresh one against a repositioned stream to retry.
//!
//! # Example
//!
//! ```
//! use seekjson::{JsonReader, SliceStream};
//!
//! let doc = br#"{"zoom": 1.5, "debug": true, "ignored": [1, 2]}"#;
//! let mut r = JsonReader::new(SliceStream::new(doc));
//! let mut zoom = 0.0;
//! let mut debug = false;
//! if r.table_begin() {
//!     while r.table_has_next() {
//!         if r.accept_key("zoom") {
//!             zoom = r.read_f64();
//!         } else if r.accept_key("debug") {
//!             debug = r.read_bool();
//!         } else {
//!             r.skip_key_value();
//!         }
//!     }
//! }
//! assert!(r.ok());
//! assert_eq!(zoom, 1.5);
//! assert!(debug);
//! ```

use core::fmt;

use log::{debug, trace};

use crate::cursor::{Cursor, CursorMark, Look};
use crate::options::{CommaMode, ReaderOptions};
use crate::number::{scan_number, ScanResult};
use crate::report::{Diagnostic, ErrorKind};
use crate::stream::ByteStream;
use crate::value::{StringCursor, StringStatus, ValueKind};

/// How far the error reporter looks around the offending byte when grabbing
/// the context excerpt.
const CONTEXT_BACK: u64 = 40;
const CONTEXT_WINDOW: usize = 80;

/// Separator bookkeeping for the strict structural checks. One field suffices
/// for arbitrary nesting: closing a nested container immediately re-derives
/// the enclosing level's state via `maybe_comma`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    /// Just entered a container; the first element needs no comma.
    AfterBegin,
    /// A value was consumed and no comma followed it.
    AfterValue,
    /// A comma was consumed; another element is promised.
    AfterComma,
}

/// Saved reader state for non-destructive lookahead.
///
/// Created by [`JsonReader::peek_begin`], consumed exactly once by
/// [`JsonReader::peek_end`]. Restoring reproduces byte-for-byte identical
/// parsing, including re-fetching the same characters.
#[must_use]
#[derive(Debug)]
pub struct Snapshot {
    mark: CursorMark,
    sep: Separator,
}

/// Display helper for a lookahead byte in error messages.
struct Show(Look);

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Look::Byte(b) if (0x20..0x7f).contains(&b) => write!(f, "'{}'", b as char),
            Look::Byte(b) => write!(f, "byte 0x{b:02x}"),
            Look::End => f.write_str("end of stream"),
        }
    }
}

/// Cursor-based pull decoder over a seekable byte stream.
///
/// One reader per stream per decode pass; it is not synchronized and holds an
/// exclusive cursor into the stream.
pub struct JsonReader<S: ByteStream> {
    cursor: Cursor<S>,
    opts: ReaderOptions,
    sep: Separator,
    fault: Option<Diagnostic>,
}

impl<S: ByteStream> JsonReader<S> {
    /// Create a reader with strict (hardened) validation.
    pub fn new(stream: S) -> Self {
        Self::with_options(stream, ReaderOptions::default())
    }

    /// Create a reader with explicit strictness options.
    pub fn with_options(stream: S, opts: ReaderOptions) -> Self {
        JsonReader {
            cursor: Cursor::new(stream),
            opts,
            sep: Separator::AfterBegin,
            fault: None,
        }
    }

    // ---- error latch ----------------------------------------------------

    /// True while no error has been latched.
    pub fn ok(&self) -> bool {
        self.fault.is_none()
    }

    /// The latched diagnostic, if any.
    pub fn error(&self) -> Option<&Diagnostic> {
        self.fault.as_ref()
    }

    /// Latch a caller-level error (e.g. a duplicate or missing key found by
    /// application logic). Downgrades all further reader calls to no-ops,
    /// exactly like an internal grammar error.
    pub fn latch_error(&mut self, message: &str) {
        self.latch(ErrorKind::Caller, format_args!("{message}"));
    }

    /// Consume the reader: the stream back on success, the diagnostic on
    /// failure.
    pub fn finish(self) -> Result<S, Diagnostic> {
        match self.fault {
            None => Ok(self.cursor.into_stream()),
            Some(d) => Err(d),
        }
    }

    /// Current line (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Current column (0 at the start of a line).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    fn latched(&self) -> bool {
        self.fault.is_some()
    }

    fn latch(&mut self, kind: ErrorKind, args: fmt::Arguments<'_>) {
        if self.fault.is_some() {
            return;
        }
        debug!(
            "latched {:?} error at {}:{}",
            kind,
            self.cursor.line(),
            self.cursor.column()
        );
        let mut diag = Diagnostic::new(kind, self.cursor.line(), self.cursor.column(), args);
        self.capture_context(&mut diag);
        self.fault = Some(diag);
    }

    /// Grab a window of document text around the offending byte and restore
    /// the stream afterward. Any stream failure here just leaves the
    /// diagnostic without context.
    fn capture_context(&mut self, diag: &mut Diagnostic) {
        let stream = self.cursor.stream();
        let Ok(pos) = stream.position() else { return };
        // The lookahead slot is one byte ahead of the offending character.
        let err_off = pos.saturating_sub(1);
        let start = err_off.saturating_sub(CONTEXT_BACK);
        if stream.seek_to(start).is_err() {
            return;
        }

        let mut window = [0u8; CONTEXT_WINDOW];
        let mut len = 0;
        while len < CONTEXT_WINDOW {
            match stream.read_byte() {
                Ok(Some(b)) => {
                    window[len] = b;
                    len += 1;
                }
                _ => break,
            }
        }
        let _ = stream.seek_to(pos);

        // Truncate the window at line boundaries around the error.
        let rel = ((err_off - start) as usize).min(len);
        let line_start = window[..rel]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = window[rel..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| rel + i)
            .unwrap_or(len);
        diag.set_context(&window[line_start..line_end], rel - line_start);
    }

    // ---- lookahead helpers ----------------------------------------------

    /// `ensure` with stream failures routed into the latch.
    fn look(&mut self) -> Look {
        match self.cursor.ensure() {
            Ok(look) => look,
            Err(_) => {
                self.latch(ErrorKind::Io, format_args!("stream read failed"));
                Look::End
            }
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            let look = self.look();
            if look.is_whitespace() {
                self.cursor.advance();
            } else {
                return;
            }
        }
    }

    // ---- separators -----------------------------------------------------

    /// Consume one `,` if present (after skipping whitespace) and record the
    /// separator state for the strict structural checks.
    ///
    /// Scalar reads and the `read_string_into` convenience call this
    /// themselves; users of the low-level string protocol call it once after
    /// [`read_string_chunk`](Self::read_string_chunk) reports `Done`.
    pub fn maybe_comma(&mut self) {
        if self.latched() {
            return;
        }
        self.skip_whitespace();
        if self.look() == Look::Byte(b',') {
            self.cursor.advance();
            self.sep = Separator::AfterComma;
        } else {
            self.sep = Separator::AfterValue;
        }
    }

    // ---- structural parsing ---------------------------------------------

    /// Enter a table. Latches a structural error unless the next
    /// non-whitespace byte is `{`.
    pub fn table_begin(&mut self) -> bool {
        self.container_begin(b'{', "table")
    }

    /// Enter an array. Latches a structural error unless the next
    /// non-whitespace byte is `[`.
    pub fn array_begin(&mut self) -> bool {
        self.container_begin(b'[', "array")
    }

    fn container_begin(&mut self, open: u8, what: &'static str) -> bool {
        if self.latched() {
            return false;
        }
        self.skip_whitespace();
        match self.look() {
            Look::Byte(b) if b == open => {
                self.cursor.advance();
                self.sep = Separator::AfterBegin;
                true
            }
            Look::Byte(b) => {
                self.latch(
                    ErrorKind::Structural,
                    format_args!("expected '{}' to open {what}, got {}", open as char, Show(Look::Byte(b))),
                );
                false
            }
            Look::End => {
                self.latch(
                    ErrorKind::Structural,
                    format_args!("expected '{}' to open {what}, got end of stream", open as char),
                );
                false
            }
        }
    }

    /// True if the current table has another key/value pair. Consumes the
    /// closing `}` (and a separator for the enclosing collection) when it
    /// does not.
    pub fn table_has_next(&mut self) -> bool {
        self.container_has_next(b'}', "table")
    }

    /// True if the current array has another element. Consumes the closing
    /// `]` (and a separator for the enclosing collection) when it does not.
    pub fn array_has_next(&mut self) -> bool {
        self.container_has_next(b']', "array")
    }

    fn container_has_next(&mut self, close: u8, what: &'static str) -> bool {
        if self.latched() {
            return false;
        }
        self.skip_whitespace();
        match self.look() {
            Look::Byte(b) if b == close => {
                if self.opts.commas == CommaMode::Strict && self.sep == Separator::AfterComma {
                    self.latch(
                        ErrorKind::Structural,
                        format_args!("trailing ',' before '{}'", close as char),
                    );
                    return false;
                }
                self.cursor.advance();
                self.maybe_comma();
                false
            }
            Look::End => {
                self.latch(
                    ErrorKind::Structural,
                    format_args!("unexpected end of stream inside {what}"),
                );
                false
            }
            Look::Byte(_) => {
                if self.opts.commas == CommaMode::Strict && self.sep == Separator::AfterValue {
                    self.latch(
                        ErrorKind::Structural,
                        format_args!("expected ',' between {what} elements"),
                    );
                    return false;
                }
                // The comma credit is spent on this element.
                self.sep = Separator::AfterBegin;
                true
            }
        }
    }

    // ---- keys ------------------------------------------------------------

    /// Decode the key under the cursor into `scratch` and consume the
    /// following `:`. Keys longer than the scratch are truncated but still
    /// fully consumed.
    pub fn read_key_into<'b>(&mut self, scratch: &'b mut [u8]) -> &'b [u8] {
        let len = self.read_string_raw(scratch);
        self.expect_colon();
        &scratch[..len]
    }

    /// Non-destructively test whether the key under the cursor equals
    /// `want`. The cursor is rewound either way.
    pub fn key_equals(&mut self, want: &str) -> bool {
        if self.latched() {
            return false;
        }
        let snapshot = self.peek_begin();
        let matched = self.compare_key(want.as_bytes());
        self.peek_end(snapshot);
        matched && !self.latched()
    }

    /// If the key under the cursor equals `want`, consume it (and its `:`)
    /// and report true; otherwise leave the cursor on the key.
    pub fn accept_key(&mut self, want: &str) -> bool {
        if self.key_equals(want) {
            self.compare_key(want.as_bytes());
            true
        } else {
            false
        }
    }

    /// Consume the key under the cursor and its `:` without keeping the text.
    pub fn skip_key(&mut self) {
        if self.latched() {
            return;
        }
        self.begin_string();
        let mut cont = StringCursor::default();
        self.finish_string(&mut cont);
        self.expect_colon();
    }

    /// Consume a whole key/value pair, recursively skipping the value.
    pub fn skip_key_value(&mut self) {
        self.skip_key();
        self.skip_value();
    }

    /// Decode the key and compare it to `want` as it streams past, chunk by
    /// chunk, so key length is unbounded. Consumes the key and its `:`.
    fn compare_key(&mut self, want: &[u8]) -> bool {
        self.begin_string();
        let mut chunk = [0u8; 32];
        let mut cont = StringCursor::default();
        let mut matched = 0usize;
        let mut equal = true;
        loop {
            cont.written = 0;
            let status = self.read_string_chunk(&mut chunk, &mut cont);
            let got = &chunk[..cont.written];
            if equal {
                if matched + got.len() <= want.len() && &want[matched..matched + got.len()] == got {
                    matched += got.len();
                } else {
                    equal = false;
                }
            }
            if status == StringStatus::Done {
                break;
            }
        }
        self.expect_colon();
        !self.latched() && equal && matched == want.len()
    }

    fn expect_colon(&mut self) {
        if self.latched() {
            return;
        }
        self.skip_whitespace();
        match self.look() {
            Look::Byte(b':') => self.cursor.advance(),
            other => self.latch(
                ErrorKind::Structural,
                format_args!("expected ':' after key, got {}", Show(other)),
            ),
        }
    }

    // ---- scalars ----------------------------------------------------------

    /// The kind of value under the cursor, from the lookahead byte alone.
    pub fn value_kind(&mut self) -> ValueKind {
        if self.latched() {
            return ValueKind::Invalid;
        }
        self.skip_whitespace();
        ValueKind::classify(self.look())
    }

    /// Decode a numeric value and consume a trailing comma. Returns 0.0 once
    /// latched.
    pub fn read_f64(&mut self) -> f64 {
        if self.latched() {
            return 0.0;
        }
        self.skip_whitespace();
        match scan_number(&mut self.cursor, self.opts.numbers) {
            Ok(ScanResult::Value(v)) => {
                self.maybe_comma();
                v
            }
            Ok(ScanResult::Empty) => {
                let got = self.look();
                self.latch(
                    ErrorKind::Number,
                    format_args!("expected a number, got {}", Show(got)),
                );
                0.0
            }
            Ok(ScanResult::Eof) => {
                self.latch(
                    ErrorKind::Number,
                    format_args!("expected a number, got end of stream"),
                );
                0.0
            }
            Ok(ScanResult::Malformed) => {
                self.latch(ErrorKind::Number, format_args!("malformed number"));
                0.0
            }
            Err(_) => {
                self.latch(ErrorKind::Io, format_args!("stream read failed"));
                0.0
            }
        }
    }

    /// Decode `true` or `false` and consume a trailing comma. Returns false
    /// once latched.
    pub fn read_bool(&mut self) -> bool {
        if self.latched() {
            return false;
        }
        self.skip_whitespace();
        match self.look() {
            Look::Byte(b't') => {
                if self.expect_literal("true") {
                    self.maybe_comma();
                    true
                } else {
                    false
                }
            }
            Look::Byte(b'f') => {
                if self.expect_literal("false") {
                    self.maybe_comma();
                }
                false
            }
            other => {
                self.latch(
                    ErrorKind::Literal,
                    format_args!("expected 'true' or 'false', got {}", Show(other)),
                );
                false
            }
        }
    }

    /// Decode `null` and consume a trailing comma.
    pub fn read_null(&mut self) {
        if self.latched() {
            return;
        }
        self.skip_whitespace();
        if self.expect_literal("null") {
            self.maybe_comma();
        }
    }

    /// Match `word` byte-by-byte against the stream.
    fn expect_literal(&mut self, word: &'static str) -> bool {
        for want in word.bytes() {
            match self.look() {
                Look::Byte(b) if b == want => self.cursor.advance(),
                Look::Byte(b) => {
                    self.latch(
                        ErrorKind::Literal,
                        format_args!(
                            "expected '{}' in '{word}', got {}",
                            want as char,
                            Show(Look::Byte(b))
                        ),
                    );
                    return false;
                }
                Look::End => {
                    self.latch(
                        ErrorKind::Literal,
                        format_args!("end of stream inside '{word}'"),
                    );
                    return false;
                }
            }
        }
        true
    }

    // ---- strings ----------------------------------------------------------

    /// Start decoding a string: skip whitespace, require and consume the
    /// opening `"`.
    pub fn begin_string(&mut self) {
        if self.latched() {
            return;
        }
        self.skip_whitespace();
        match self.look() {
            Look::Byte(b'"') => self.cursor.advance(),
            other => self.latch(
                ErrorKind::String,
                format_args!("expected '\"', got {}", Show(other)),
            ),
        }
    }

    /// Decode string bytes into `buf` until the closing quote or the buffer
    /// fills up. See [`StringCursor`] for the continuation contract.
    ///
    /// Returns `Done` immediately once latched.
    pub fn read_string_chunk(&mut self, buf: &mut [u8], cont: &mut StringCursor) -> StringStatus {
        if self.latched() {
            return StringStatus::Done;
        }
        loop {
            if cont.written >= buf.len() {
                return StringStatus::WantsMore;
            }
            let b = match self.look() {
                Look::End => {
                    self.latch(ErrorKind::String, format_args!("unterminated string"));
                    return StringStatus::Done;
                }
                Look::Byte(b) => b,
            };
            self.cursor.advance();
            if is_bare_control(b) {
                self.latch(
                    ErrorKind::String,
                    format_args!("unescaped control character in string"),
                );
                return StringStatus::Done;
            }
            if cont.in_escape {
                cont.in_escape = false;
                buf[cont.written] = unescape(b);
                cont.written += 1;
            } else if b == b'\\' {
                cont.in_escape = true;
            } else if b == b'"' {
                return StringStatus::Done;
            } else {
                buf[cont.written] = b;
                cont.written += 1;
            }
        }
    }

    /// Scan to the closing quote without writing anything, honoring escapes.
    /// Used to discard the rest of a string after a `WantsMore`.
    pub fn finish_string(&mut self, cont: &mut StringCursor) {
        if self.latched() {
            return;
        }
        loop {
            let b = match self.look() {
                Look::End => {
                    self.latch(ErrorKind::String, format_args!("unterminated string"));
                    return;
                }
                Look::Byte(b) => b,
            };
            self.cursor.advance();
            if is_bare_control(b) {
                self.latch(
                    ErrorKind::String,
                    format_args!("unescaped control character in string"),
                );
                return;
            }
            if cont.in_escape {
                cont.in_escape = false;
            } else if b == b'\\' {
                cont.in_escape = true;
            } else if b == b'"' {
                return;
            }
        }
    }

    /// Decode a string value into `scratch` and consume a trailing comma.
    ///
    /// Strings longer than `scratch` are truncated to its length, with the
    /// remainder consumed and discarded; the cursor still ends up exactly
    /// past the value. Callers needing full fidelity for long strings use
    /// the resumable [`read_string_chunk`](Self::read_string_chunk) protocol
    /// directly.
    pub fn read_string_into<'b>(&mut self, scratch: &'b mut [u8]) -> &'b [u8] {
        let len = self.read_string_raw(scratch);
        self.maybe_comma();
        &scratch[..len]
    }

    /// begin + one chunk + discard overflow; no comma handling.
    fn read_string_raw(&mut self, scratch: &mut [u8]) -> usize {
        if self.latched() {
            return 0;
        }
        self.begin_string();
        let mut cont = StringCursor::default();
        match self.read_string_chunk(scratch, &mut cont) {
            StringStatus::Done => cont.written,
            StringStatus::WantsMore => {
                let kept = cont.written;
                self.finish_string(&mut cont);
                kept
            }
        }
    }

    // ---- peek / rewind ----------------------------------------------------

    /// Capture the full decoding state (lookahead, line/column, separator
    /// state, stream offset) for later restoration. A position-query failure
    /// latches an I/O error and yields a snapshot that restores nothing.
    pub fn peek_begin(&mut self) -> Snapshot {
        if self.latched() {
            return Snapshot {
                mark: CursorMark::dummy(),
                sep: self.sep,
            };
        }
        match self.cursor.save() {
            Ok(mark) => {
                trace!("peek begin at {}:{}", self.cursor.line(), self.cursor.column());
                Snapshot {
                    mark,
                    sep: self.sep,
                }
            }
            Err(_) => {
                self.latch(
                    ErrorKind::Io,
                    format_args!("stream position query failed"),
                );
                Snapshot {
                    mark: CursorMark::dummy(),
                    sep: self.sep,
                }
            }
        }
    }

    /// Restore a snapshot taken by [`peek_begin`](Self::peek_begin).
    /// Subsequent parsing behaves as if the intervening reads never
    /// happened. No-op once latched: a latched error voids the peek
    /// contract, and the diagnostic keeps pointing at the real failure.
    pub fn peek_end(&mut self, snapshot: Snapshot) {
        if self.latched() {
            return;
        }
        if self.cursor.restore(&snapshot.mark).is_err() {
            self.latch(ErrorKind::Io, format_args!("stream seek failed"));
            return;
        }
        trace!("peek end, back at {}:{}", self.cursor.line(), self.cursor.column());
        self.sep = snapshot.sep;
    }

    // ---- recursive skip ---------------------------------------------------

    /// Discard the value under the cursor, whatever it is. Tables and arrays
    /// are skipped recursively; recursion depth is the document's nesting
    /// depth, bounded only by call-stack space.
    pub fn skip_value(&mut self) {
        if self.latched() {
            return;
        }
        match self.value_kind() {
            ValueKind::Invalid => {
                let got = self.look();
                self.latch(
                    ErrorKind::Type,
                    format_args!("expected a value, got {}", Show(got)),
                );
            }
            ValueKind::Number => {
                self.read_f64();
            }
            ValueKind::Bool => {
                self.read_bool();
            }
            ValueKind::Null => self.read_null(),
            ValueKind::String => {
                self.begin_string();
                let mut cont = StringCursor::default();
                self.finish_string(&mut cont);
                self.maybe_comma();
            }
            ValueKind::Array => {
                if self.array_begin() {
                    while self.array_has_next() {
                        self.skip_value();
                    }
                }
            }
            ValueKind::Table => {
                if self.table_begin() {
                    while self.table_has_next() {
                        self.skip_key();
                        self.skip_value();
                    }
                }
            }
        }
    }
}

/// Raw control characters never allowed inside a bare string; they must be
/// written escaped.
fn is_bare_control(b: u8) -> bool {
    matches!(b, 0x08 | 0x0c | b'\n' | b'\r' | b'\t')
}

/// The standard escape table; unknown letters pass through literally.
fn unescape(b: u8) -> u8 {
    match b {
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceStream;

    fn reader(doc: &[u8]) -> JsonReader<SliceStream<'_>> {
        JsonReader::new(SliceStream::new(doc))
    }

    #[test]
    fn walks_a_flat_table() {
        let mut r = reader(br#"{"a": 5.0, "b": true, "c": null}"#);
        assert!(r.table_begin());
        assert!(r.table_has_next());
        assert!(r.accept_key("a"));
        assert_eq!(r.read_f64(), 5.0);
        assert!(r.table_has_next());
        assert!(r.accept_key("b"));
        assert!(r.read_bool());
        assert!(r.table_has_next());
        assert!(r.accept_key("c"));
        r.read_null();
        assert!(!r.table_has_next());
        assert!(r.ok());
    }

    #[test]
    fn key_equals_is_non_destructive() {
        let mut r = reader(br#"{"position": 9}"#);
        assert!(r.table_begin());
        assert!(r.table_has_next());
        assert!(!r.key_equals("velocity"));
        assert!(r.key_equals("position"));
        assert!(r.key_equals("position"));
        // Still consumable afterwards
        assert!(r.accept_key("position"));
        assert_eq!(r.read_f64(), 9.0);
        assert!(!r.table_has_next());
        assert!(r.ok());
    }

    #[test]
    fn skip_value_handles_nesting() {
        let mut r = reader(br#"{"junk": {"a": [1, {"b": "x"}], "c": 2}, "keep": 7}"#);
        assert!(r.table_begin());
        assert!(r.table_has_next());
        assert!(!r.accept_key("keep"));
        r.skip_key_value();
        assert!(r.table_has_next());
        assert!(r.accept_key("keep"));
        assert_eq!(r.read_f64(), 7.0);
        assert!(!r.table_has_next());
        assert!(r.ok());
    }

    #[test]
    fn latched_reader_goes_quiet() {
        let mut r = reader(b"[1, oops]");
        assert!(r.array_begin());
        assert!(r.array_has_next());
        assert_eq!(r.read_f64(), 1.0);
        assert!(r.array_has_next());
        assert_eq!(r.read_f64(), 0.0);
        assert!(!r.ok());

        // Everything after the latch is a default-returning no-op.
        let line = r.line();
        let column = r.column();
        assert!(!r.array_has_next());
        assert_eq!(r.read_f64(), 0.0);
        assert!(!r.read_bool());
        assert_eq!(r.value_kind(), ValueKind::Invalid);
        assert_eq!(r.line(), line);
        assert_eq!(r.column(), column);
    }

    #[test]
    fn string_chunk_wants_more_then_resumes() {
        let mut r = reader(br#""hello world""#);
        r.begin_string();
        let mut buf = [0u8; 5];
        let mut cont = StringCursor::default();
        assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::WantsMore);
        assert_eq!(&buf[..cont.written], b"hello");

        // Drain and rebase, per the continuation contract.
        cont.written = 0;
        assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::WantsMore);
        assert_eq!(&buf[..cont.written], b" worl");
        cont.written = 0;
        assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::Done);
        assert_eq!(&buf[..cont.written], b"d");
        assert!(r.ok());
    }

    #[test]
    fn escape_state_survives_chunk_boundary() {
        // Buffer fills right before the escape pair
        let mut r = reader(br#""ab\nc""#);
        r.begin_string();
        let mut buf = [0u8; 2];
        let mut cont = StringCursor::default();
        assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::WantsMore);
        assert_eq!(&buf[..2], b"ab");
        cont.written = 0;
        assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::Done);
        assert_eq!(&buf[..cont.written], b"\nc");
    }

    #[test]
    fn truncating_read_still_advances_past_string() {
        let mut r = reader(br#"["a long string value", 3]"#);
        assert!(r.array_begin());
        assert!(r.array_has_next());
        let mut small = [0u8; 6];
        let text_len = {
            let text = r.read_string_into(&mut small);
            assert_eq!(text, b"a long");
            text.len()
        };
        assert_eq!(text_len, 6);
        assert!(r.array_has_next());
        assert_eq!(r.read_f64(), 3.0);
        assert!(!r.array_has_next());
        assert!(r.ok());
    }

    #[test]
    fn peek_rewind_round_trip() {
        let mut r = reader(br#"[10, 20, 30]"#);
        assert!(r.array_begin());
        assert!(r.array_has_next());

        let snapshot = r.peek_begin();
        assert_eq!(r.read_f64(), 10.0);
        assert!(r.array_has_next());
        assert_eq!(r.read_f64(), 20.0);
        r.peek_end(snapshot);

        // Identical replay after restore
        assert_eq!(r.read_f64(), 10.0);
        assert!(r.array_has_next());
        assert_eq!(r.read_f64(), 20.0);
        assert!(r.array_has_next());
        assert_eq!(r.read_f64(), 30.0);
        assert!(!r.array_has_next());
        assert!(r.ok());
    }

    #[test]
    fn peek_with_no_reads_is_identity() {
        let mut r = reader(br#"{"k": 1}"#);
        assert!(r.table_begin());
        let (line, column) = (r.line(), r.column());
        let snapshot = r.peek_begin();
        r.peek_end(snapshot);
        assert_eq!((r.line(), r.column()), (line, column));
        assert!(r.table_has_next());
        assert!(r.accept_key("k"));
        assert_eq!(r.read_f64(), 1.0);
        assert!(!r.table_has_next());
        assert!(r.ok());
    }

    #[test]
    fn root_value_skip() {
        for doc in [
            &br#"{"a": {"b": [1, 2, {"c": "d"}]}, "e": [[], {}]}"#[..],
            br#"[1, "two", true, null, {"x": 3.5}]"#,
            br#""just a string""#,
            br#"12.75"#,
            br#"null"#,
        ] {
            let mut r = reader(doc);
            r.skip_value();
            assert!(r.ok(), "skip failed for {:?}", core::str::from_utf8(doc));
        }
    }

    #[test]
    fn read_key_into_truncates_long_keys() {
        let mut r = reader(br#"{"extremely_long_key_name": 1}"#);
        assert!(r.table_begin());
        assert!(r.table_has_next());
        let mut scratch = [0u8; 9];
        let key_ok = {
            let key = r.read_key_into(&mut scratch);
            key == b"extremely"
        };
        assert!(key_ok);
        assert_eq!(r.read_f64(), 1.0);
        assert!(!r.table_has_next());
        assert!(r.ok());
    }
}
