// SPDX-License-Identifier: Apache-2.0

//! Forward-only JSON emitter, the mirror image of the reader.
//!
//! [`JsonWriter`] buffers nothing and never seeks; commas are inserted
//! automatically between sibling values. Output produced here decodes
//! cleanly under the strict reader settings.

use core::fmt::Write as _;

use crate::report::TextBuf;

/// Destination for writer output.
///
/// Implemented for any `std::io::Write` via [`IoSink`], for `Vec<u8>` under
/// `std`, and for fixed buffers via [`SliceSink`].
pub trait ByteSink {
    type Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Error from a [`SliceSink`] that ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkFull;

impl core::fmt::Display for SinkFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("output buffer full")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SinkFull {}

/// Sink writing into a caller-provided byte buffer.
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceSink { buf, len: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl ByteSink for SliceSink<'_> {
    type Error = SinkFull;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SinkFull> {
        let end = self.len.checked_add(bytes.len()).ok_or(SinkFull)?;
        if end > self.buf.len() {
            return Err(SinkFull);
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

#[cfg(feature = "std")]
impl ByteSink for Vec<u8> {
    type Error = core::convert::Infallible;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Adapter turning any `std::io::Write` into a [`ByteSink`].
#[cfg(feature = "std")]
pub struct IoSink<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for IoSink<W> {
    type Error = std::io::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        self.0.write_all(bytes)
    }
}

/// Streaming JSON emitter.
///
/// Containers nest via `table_begin`/`table_end` and the array equivalents;
/// ending a container that was never begun trips a debug assertion. Keys and
/// string values are escaped on the way out.
pub struct JsonWriter<W: ByteSink> {
    sink: W,
    do_comma: bool,
    depth: u32,
}

impl<W: ByteSink> JsonWriter<W> {
    pub fn new(sink: W) -> Self {
        JsonWriter {
            sink,
            do_comma: false,
            depth: 0,
        }
    }

    /// Take the sink back.
    pub fn into_sink(self) -> W {
        self.sink
    }

    fn separate(&mut self) -> Result<(), W::Error> {
        if self.do_comma {
            self.sink.write_all(b",")?;
        }
        self.do_comma = true;
        Ok(())
    }

    pub fn table_begin(&mut self) -> Result<(), W::Error> {
        self.separate()?;
        self.do_comma = false;
        self.depth += 1;
        self.sink.write_all(b"{")
    }

    pub fn table_end(&mut self) -> Result<(), W::Error> {
        debug_assert!(self.depth > 0, "table_end without table_begin");
        self.depth = self.depth.saturating_sub(1);
        self.do_comma = true;
        self.sink.write_all(b"}")
    }

    pub fn array_begin(&mut self) -> Result<(), W::Error> {
        self.separate()?;
        self.do_comma = false;
        self.depth += 1;
        self.sink.write_all(b"[")
    }

    pub fn array_end(&mut self) -> Result<(), W::Error> {
        debug_assert!(self.depth > 0, "array_end without array_begin");
        self.depth = self.depth.saturating_sub(1);
        self.do_comma = true;
        self.sink.write_all(b"]")
    }

    /// Write a key and its `:`. The following value call must not insert a
    /// comma of its own.
    pub fn key(&mut self, key: &str) -> Result<(), W::Error> {
        self.separate()?;
        self.write_escaped(key)?;
        self.sink.write_all(b":")?;
        self.do_comma = false;
        Ok(())
    }

    pub fn string(&mut self, value: &str) -> Result<(), W::Error> {
        self.separate()?;
        self.write_escaped(value)
    }

    /// Write a number. Non-finite values have no JSON representation and are
    /// emitted as `null`.
    pub fn f64(&mut self, value: f64) -> Result<(), W::Error> {
        if !value.is_finite() {
            return self.null();
        }
        self.separate()?;
        let mut text = TextBuf::<32>::new();
        let _ = write!(text, "{value}");
        self.sink.write_all(text.as_str().as_bytes())
    }

    pub fn i64(&mut self, value: i64) -> Result<(), W::Error> {
        self.separate()?;
        let mut text = TextBuf::<24>::new();
        let _ = write!(text, "{value}");
        self.sink.write_all(text.as_str().as_bytes())
    }

    pub fn u64(&mut self, value: u64) -> Result<(), W::Error> {
        self.separate()?;
        let mut text = TextBuf::<24>::new();
        let _ = write!(text, "{value}");
        self.sink.write_all(text.as_str().as_bytes())
    }

    pub fn bool(&mut self, value: bool) -> Result<(), W::Error> {
        self.separate()?;
        self.sink
            .write_all(if value { b"true" } else { b"false" })
    }

    pub fn null(&mut self) -> Result<(), W::Error> {
        self.separate()?;
        self.sink.write_all(b"null")
    }

    fn write_escaped(&mut self, text: &str) -> Result<(), W::Error> {
        self.sink.write_all(b"\"")?;
        let bytes = text.as_bytes();
        let mut plain = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if let Some(seq) = escape(b) {
                self.sink.write_all(&bytes[plain..i])?;
                self.sink.write_all(seq)?;
                plain = i + 1;
            }
        }
        self.sink.write_all(&bytes[plain..])?;
        self.sink.write_all(b"\"")
    }
}

/// The writer-side escape table, symmetric with the reader's unescaping.
fn escape(b: u8) -> Option<&'static [u8]> {
    match b {
        b'"' => Some(b"\\\""),
        b'\\' => Some(b"\\\\"),
        0x08 => Some(b"\\b"),
        0x0c => Some(b"\\f"),
        b'\n' => Some(b"\\n"),
        b'\r' => Some(b"\\r"),
        b'\t' => Some(b"\\t"),
        _ => None,
    }
}
