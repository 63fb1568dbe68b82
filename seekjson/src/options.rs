// SPDX-License-Identifier: Apache-2.0

//! Reader configuration.
//!
//! Strictness is a runtime choice, not a compile-time one: documents in the
//! wild were produced by both lenient and strict emitters, so the caller picks
//! per decoding session. Defaults are the hardened behavior.

/// Separator validation between table/array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommaMode {
    /// Reject missing, doubled, and trailing commas.
    #[default]
    Strict,
    /// Accept elements with or without separating commas, including a
    /// trailing one.
    Lenient,
}

/// Acceptance of non-standard numeric prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberMode {
    /// A number starts with a digit or `-`.
    #[default]
    Strict,
    /// Additionally accept a leading `+` or `.` (as older emitters produced).
    Lenient,
}

/// Per-session reader options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderOptions {
    /// Comma placement validation.
    pub commas: CommaMode,
    /// Numeric prefix validation.
    pub numbers: NumberMode,
}

impl ReaderOptions {
    /// Both validations relaxed, matching the earliest decoder revisions.
    pub fn lenient() -> Self {
        ReaderOptions {
            commas: CommaMode::Lenient,
            numbers: NumberMode::Lenient,
        }
    }
}
