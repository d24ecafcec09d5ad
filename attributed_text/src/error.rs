// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Rich error type for attributed text operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus contextual information about the
/// offending range or position and, when relevant, the enclosing UTF-8 character
/// span at the offending index.
///
/// Range errors report byte offsets. Placeholder errors report codepoint offsets, which is
/// the unit placeholders are positioned in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,

    /// Start of the caller-provided range, or the placeholder position.
    start: usize,

    /// End (exclusive) of the caller-provided range, or the placeholder position.
    end: usize,

    /// Length of the underlying text at the time of failure.
    len: usize,

    /// Extra detail for boundary-related errors, when available.
    boundary: Option<BoundaryInfo>,

    /// Identifier of the offending placeholder, for placeholder errors.
    placeholder: Option<u64>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` is the length of the source text, not of the error."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start of the range (or the placeholder position) provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end of the range (or the placeholder position) provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The length of the underlying text at the time of the error.
    ///
    /// This is in bytes for range errors and in codepoints for placeholder errors.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Extra details for boundary-related errors, if available.
    pub fn boundary(&self) -> Option<BoundaryInfo> {
        self.boundary
    }

    /// The identifier of the placeholder that failed validation, if any.
    pub fn placeholder(&self) -> Option<u64> {
        self.placeholder
    }

    fn new(kind: ErrorKind, start: usize, end: usize, len: usize) -> Self {
        Self {
            kind,
            start,
            end,
            len,
            boundary: None,
            placeholder: None,
        }
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::new(ErrorKind::InvalidBounds, start, end, len)
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::new(ErrorKind::InvalidRange, start, end, len)
    }

    pub(crate) fn runs_not_contiguous(start: usize, end: usize, len: usize) -> Self {
        Self::new(ErrorKind::RunsNotContiguous, start, end, len)
    }

    pub(crate) fn placeholder_out_of_bounds(id: u64, position: usize, char_len: usize) -> Self {
        Self {
            placeholder: Some(id),
            ..Self::new(
                ErrorKind::PlaceholderOutOfBounds,
                position,
                position,
                char_len,
            )
        }
    }

    pub(crate) fn placeholders_unordered(id: u64, position: usize, char_len: usize) -> Self {
        Self {
            placeholder: Some(id),
            ..Self::new(
                ErrorKind::PlaceholdersUnordered,
                position,
                position,
                char_len,
            )
        }
    }

    pub(crate) fn not_on_char_boundary(
        text: &str,
        start: usize,
        end: usize,
        which: Endpoint,
        index: usize,
    ) -> Self {
        let (cs, ce) = enclosing_char_span(text, index).unwrap_or((index, index));
        Self {
            boundary: Some(BoundaryInfo {
                which,
                index,
                char_start: cs,
                char_end: ce,
            }),
            ..Self::new(ErrorKind::NotOnCharBoundary, start, end, text.len())
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {}..{} out of bounds for len {}",
                self.start, self.end, self.len
            ),
            ErrorKind::InvalidRange => {
                write!(f, "invalid range {}..{}: start > end", self.start, self.end)
            }
            ErrorKind::NotOnCharBoundary => {
                if let Some(b) = self.boundary {
                    let which = match b.which {
                        Endpoint::Start => "start",
                        Endpoint::End => "end",
                    };
                    write!(
                        f,
                        "range {}..{}: {} index {} not on UTF-8 boundary (char {}..{})",
                        self.start, self.end, which, b.index, b.char_start, b.char_end
                    )
                } else {
                    write!(
                        f,
                        "range {}..{} not on UTF-8 boundary",
                        self.start, self.end
                    )
                }
            }
            ErrorKind::RunsNotContiguous => write!(
                f,
                "run {}..{} does not continue the previous run (text len {})",
                self.start, self.end, self.len
            ),
            ErrorKind::PlaceholderOutOfBounds => write!(
                f,
                "placeholder {} at position {} lies outside text of {} chars",
                self.placeholder.unwrap_or_default(),
                self.start,
                self.len
            ),
            ErrorKind::PlaceholdersUnordered => write!(
                f,
                "placeholder {} at position {} precedes the placeholder before it",
                self.placeholder.unwrap_or_default(),
                self.start
            ),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Provided range indices were out of bounds relative to the text length.
    InvalidBounds,

    /// The provided range had `start > end`.
    InvalidRange,

    /// Either `start` or `end` was not aligned to a UTF-8 character boundary.
    NotOnCharBoundary,

    /// Runs supplied in parts leave a gap, overlap, or stop short of the text end.
    RunsNotContiguous,

    /// A placeholder is positioned past the end of the text.
    PlaceholderOutOfBounds,

    /// Placeholders are not sorted by position.
    PlaceholdersUnordered,
}

/// Identifies which endpoint of a range failed boundary validation.
///
/// This type is surfaced via [`BoundaryInfo`], which is attached to [`Error`]
/// for boundary-related failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` endpoint of the range.
    Start,

    /// The `end` endpoint of the range.
    End,
}

/// Details about an offending index that was not on a UTF-8 character boundary.
///
/// Returned by [`Error::boundary`] when the error kind is
/// [`ErrorKind::NotOnCharBoundary`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundaryInfo {
    /// Which endpoint (`start` or `end`) was invalid.
    pub which: Endpoint,

    /// The offending byte index.
    pub index: usize,

    /// The start byte index of the enclosing UTF-8 codepoint.
    pub char_start: usize,

    /// The end byte index (exclusive) of the enclosing UTF-8 codepoint.
    pub char_end: usize,
}

fn enclosing_char_span(text: &str, index: usize) -> Option<(usize, usize)> {
    if index > text.len() {
        return None;
    }
    if text.is_char_boundary(index) {
        return Some((index, index));
    }
    // Index 0 is always a boundary, so both searches terminate within 3 bytes.
    let start = (0..index).rev().find(|&i| text.is_char_boundary(i))?;
    let end = (index + 1..=text.len()).find(|&i| text.is_char_boundary(i))?;
    Some((start, end))
}
