// SPDX-License-Identifier: Apache-2.0

//! Single-pass JSON pull decoding over seekable byte streams.
//!
//! `seekjson` decodes documents in one forward pass with a single byte of
//! lookahead and no heap allocation of its own: string bytes land in
//! caller-supplied scratch buffers, and the structural walk is driven by the
//! caller's control flow rather than by a parsed tree or an event callback.
//! Seekability buys two things a pure forward parser cannot offer: cheap
//! non-destructive lookahead ([`JsonReader::peek_begin`] /
//! [`JsonReader::peek_end`], used by [`JsonReader::key_equals`]) and error
//! reports that quote the offending line.
//!
//! Errors latch: after the first violation the reader goes quiet, returning
//! defaults from every call, so a decode loop needs exactly one error check
//! at the end. See [`JsonReader`] for a worked example.
//!
//! A small forward-only [`JsonWriter`] rounds out the crate; its output
//! always decodes under the strict reader settings.
//!
//! The crate is `no_std` by default. The `std` feature (on by default) adds
//! [`IoStream`] / [`IoSink`] adapters for `std::io` types.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod cursor;
mod number;
mod options;
mod reader;
mod report;
mod stream;
mod value;
mod writer;

pub use options::{CommaMode, NumberMode, ReaderOptions};
pub use reader::{JsonReader, Snapshot};
pub use report::{Diagnostic, ErrorKind};
pub use stream::{ByteStream, SliceStream};
pub use value::{StringCursor, StringStatus, ValueKind};
pub use writer::{ByteSink, JsonWriter, SinkFull, SliceSink};

#[cfg(feature = "std")]
pub use stream::IoStream;
#[cfg(feature = "std")]
pub use writer::IoSink;
