// SPDX-License-Identifier: Apache-2.0

//! Numeric literal scanner.
//!
//! Self-contained: consumes the already-buffered lookahead directly instead of
//! pushing bytes back onto the stream, so no push-back primitive is needed.
//! Bytes that can belong to a number are collected into a small fixed buffer
//! and validated by `f64::from_str`; the terminating byte stays in the
//! lookahead slot for the caller.

use core::str::FromStr;

use crate::cursor::{Cursor, Look};
use crate::options::NumberMode;
use crate::stream::ByteStream;

/// Longest accepted literal. Far beyond round-trippable f64 text; anything
/// longer is rejected rather than silently clipped.
const NUMBER_CAP: usize = 64;

#[derive(Debug, PartialEq)]
pub(crate) enum ScanResult {
    /// A complete literal was consumed.
    Value(f64),
    /// The lookahead byte cannot start a number; nothing was consumed.
    Empty,
    /// End of stream where a number was required; nothing was consumed.
    Eof,
    /// Bytes were consumed but do not form a valid number.
    Malformed,
}

fn can_lead(b: u8, mode: NumberMode) -> bool {
    match b {
        b'0'..=b'9' | b'-' => true,
        b'+' | b'.' => mode == NumberMode::Lenient,
        _ => false,
    }
}

fn can_continue(b: u8) -> bool {
    // Superset of the grammar; from_str does the real validation.
    matches!(b, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
}

pub(crate) fn scan_number<S: ByteStream>(
    cursor: &mut Cursor<S>,
    mode: NumberMode,
) -> Result<ScanResult, S::Error> {
    match cursor.ensure()? {
        Look::End => return Ok(ScanResult::Eof),
        Look::Byte(b) if !can_lead(b, mode) => return Ok(ScanResult::Empty),
        Look::Byte(_) => {}
    }

    let mut buf = [0u8; NUMBER_CAP];
    let mut len = 0;
    loop {
        match cursor.ensure()? {
            Look::Byte(b) if can_continue(b) => {
                if len == NUMBER_CAP {
                    return Ok(ScanResult::Malformed);
                }
                buf[len] = b;
                len += 1;
                cursor.advance();
            }
            // Terminator (or end of stream) stays in the lookahead slot.
            _ => break,
        }
    }

    // Collected bytes are ASCII by construction.
    let text = match core::str::from_utf8(&buf[..len]) {
        Ok(s) => s,
        Err(_) => return Ok(ScanResult::Malformed),
    };
    match f64::from_str(text) {
        Ok(v) if v.is_finite() => Ok(ScanResult::Value(v)),
        _ => Ok(ScanResult::Malformed),
    }
}
