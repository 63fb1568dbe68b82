// SPDX-License-Identifier: Apache-2.0

//! Byte sources the decoder can read from.
//!
//! The decoder needs three things from its input: byte-at-a-time reads with an
//! end-of-stream sentinel, a position query, and absolute repositioning. Any
//! source that can do those three is usable, including files, in-memory
//! buffers, and socket-backed buffers that support seeking. Repositioning is
//! only exercised by the peek/rewind machinery; a source that cannot seek
//! should report an error from [`ByteStream::seek_to`], which the reader turns
//! into a latched diagnostic rather than undefined behavior.

/// A seekable byte source.
///
/// Implement this for custom input sources:
///
/// - **Memory**: [`SliceStream`] (provided)
/// - **File I/O**: [`IoStream`] over `std::fs::File` (with the `std` feature)
/// - **Embedded**: flash readers, memory-mapped regions, ring buffers with
///   absolute addressing
pub trait ByteStream {
    /// Error produced by the underlying source.
    type Error;

    /// Read one byte, or `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Current byte offset from the start of the stream.
    fn position(&mut self) -> Result<u64, Self::Error>;

    /// Reposition to an absolute byte offset.
    fn seek_to(&mut self, pos: u64) -> Result<(), Self::Error>;
}

/// A [`ByteStream`] over an in-memory byte slice.
///
/// # Example
/// ```
/// use seekjson::{JsonReader, SliceStream};
///
/// let mut reader = JsonReader::new(SliceStream::new(br#"{"status": true}"#));
/// assert!(reader.table_begin());
/// ```
#[derive(Debug)]
pub struct SliceStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceStream<'a> {
    /// Create a stream over the given slice, positioned at its start.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteStream for SliceStream<'_> {
    type Error = ();

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn position(&mut self) -> Result<u64, Self::Error> {
        Ok(self.pos as u64)
    }

    fn seek_to(&mut self, pos: u64) -> Result<(), Self::Error> {
        // Clamped at the end: reads past it report end-of-stream anyway.
        self.pos = usize::try_from(pos).map_err(|_| ())?.min(self.data.len());
        Ok(())
    }
}

/// A [`ByteStream`] adapter over any `std::io::Read + std::io::Seek` source.
///
/// Reads are byte-at-a-time; wrap files in a `std::io::BufReader` to avoid a
/// syscall per byte. Note that seeking a `BufReader` discards its buffer, so
/// heavy peek/rewind use over buffered files re-reads the window.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoStream<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> IoStream<R> {
    /// Wrap a `Read + Seek` source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> ByteStream for IoStream<R> {
    type Error = std::io::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn position(&mut self) -> Result<u64, Self::Error> {
        self.inner.stream_position()
    }

    fn seek_to(&mut self, pos: u64) -> Result<(), Self::Error> {
        self.inner.seek(std::io::SeekFrom::Start(pos)).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_stream_reads_to_end() {
        let mut stream = SliceStream::new(b"ab");
        assert_eq!(stream.read_byte(), Ok(Some(b'a')));
        assert_eq!(stream.read_byte(), Ok(Some(b'b')));
        assert_eq!(stream.read_byte(), Ok(None));
        // End of stream is sticky, not an error
        assert_eq!(stream.read_byte(), Ok(None));
    }

    #[test]
    fn slice_stream_position_and_seek() {
        let mut stream = SliceStream::new(b"hello");
        assert_eq!(stream.position(), Ok(0));
        stream.read_byte().unwrap();
        stream.read_byte().unwrap();
        assert_eq!(stream.position(), Ok(2));

        stream.seek_to(0).unwrap();
        assert_eq!(stream.read_byte(), Ok(Some(b'h')));

        // Seeking past the end clamps
        stream.seek_to(99).unwrap();
        assert_eq!(stream.read_byte(), Ok(None));
        assert_eq!(stream.position(), Ok(5));
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_stream_round_trips() {
        let cursor = std::io::Cursor::new(b"xyz".to_vec());
        let mut stream = IoStream::new(cursor);
        assert_eq!(stream.read_byte().unwrap(), Some(b'x'));
        assert_eq!(stream.position().unwrap(), 1);
        stream.seek_to(0).unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some(b'x'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'y'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'z'));
        assert_eq!(stream.read_byte().unwrap(), None);
    }
}
