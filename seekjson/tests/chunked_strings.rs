// SPDX-License-Identifier: Apache-2.0

//! The resumable bounded-buffer string protocol.

use seekjson::{JsonReader, SliceStream, StringCursor, StringStatus};

fn reader(doc: &[u8]) -> JsonReader<SliceStream<'_>> {
    JsonReader::new(SliceStream::new(doc))
}

#[test]
fn grow_in_place() {
    // Start with a buffer that is too small, then continue into a larger one
    // carrying the written prefix along.
    let mut r = reader(br#""0123456789""#);
    r.begin_string();

    let mut small = [0u8; 4];
    let mut cont = StringCursor::default();
    assert_eq!(r.read_string_chunk(&mut small, &mut cont), StringStatus::WantsMore);
    assert_eq!(cont.written, 4);

    let mut big = [0u8; 16];
    big[..cont.written].copy_from_slice(&small[..cont.written]);
    assert_eq!(r.read_string_chunk(&mut big, &mut cont), StringStatus::Done);
    assert_eq!(&big[..cont.written], b"0123456789");
    assert!(r.ok());
}

#[test]
fn drain_and_rebase() {
    // Fixed buffer, flushed between calls; rebasing `written` to zero tells
    // the decoder the space is free again.
    let mut r = reader(br#""the quick brown fox""#);
    r.begin_string();

    let mut buf = [0u8; 8];
    let mut cont = StringCursor::default();
    let mut collected = Vec::new();
    loop {
        let status = r.read_string_chunk(&mut buf, &mut cont);
        collected.extend_from_slice(&buf[..cont.written]);
        cont.written = 0;
        if status == StringStatus::Done {
            break;
        }
    }
    assert_eq!(collected, b"the quick brown fox");
    assert!(r.ok());
}

#[test]
fn escapes_shrink_the_output() {
    // Six source bytes decode to four: the escape introducer emits nothing.
    let mut r = reader(br#""a\tb\\c""#);
    r.begin_string();
    let mut buf = [0u8; 16];
    let mut cont = StringCursor::default();
    assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::Done);
    assert_eq!(&buf[..cont.written], b"a\tb\\c");
}

#[test]
fn unknown_escape_passes_through() {
    let mut r = reader(br#""a\qb""#);
    r.begin_string();
    let mut buf = [0u8; 8];
    let mut cont = StringCursor::default();
    assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::Done);
    assert_eq!(&buf[..cont.written], b"aqb");
}

#[test]
fn zero_capacity_buffer_wants_more_immediately() {
    let mut r = reader(br#""x""#);
    r.begin_string();
    let mut cont = StringCursor::default();
    assert_eq!(r.read_string_chunk(&mut [], &mut cont), StringStatus::WantsMore);
    assert_eq!(cont.written, 0);

    let mut buf = [0u8; 2];
    assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::Done);
    assert_eq!(&buf[..cont.written], b"x");
}

#[test]
fn finish_string_discards_the_remainder() {
    let mut r = reader(br#"["head and a long tail", 5]"#);
    assert!(r.array_begin());
    assert!(r.array_has_next());

    r.begin_string();
    let mut buf = [0u8; 4];
    let mut cont = StringCursor::default();
    assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::WantsMore);
    assert_eq!(&buf[..cont.written], b"head");

    // Abandon the rest; the cursor lands exactly past the closing quote.
    r.finish_string(&mut cont);
    r.maybe_comma();
    assert!(r.array_has_next());
    assert_eq!(r.read_f64(), 5.0);
    assert!(!r.array_has_next());
    assert!(r.ok());
}

#[test]
fn finish_string_honors_escaped_quotes() {
    let mut r = reader(br#"["a\"b", 1]"#);
    assert!(r.array_begin());
    assert!(r.array_has_next());
    r.begin_string();
    let mut cont = StringCursor::default();
    r.finish_string(&mut cont);
    r.maybe_comma();
    assert!(r.array_has_next());
    assert_eq!(r.read_f64(), 1.0);
    assert!(r.ok());
}

#[test]
fn empty_string() {
    let mut r = reader(br#""""#);
    r.begin_string();
    let mut buf = [0u8; 4];
    let mut cont = StringCursor::default();
    assert_eq!(r.read_string_chunk(&mut buf, &mut cont), StringStatus::Done);
    assert_eq!(cont.written, 0);
    assert!(r.ok());
}
