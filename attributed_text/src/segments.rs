// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segmentation of overlapping attribute spans.
//!
//! Given overlapping spans over a text, this module produces non-overlapping, contiguous
//! segments and provides a view of the spans active over each segment.

use alloc::vec::Vec;
use core::ops::Range;

use crate::TextRange;

/// Iterator over contiguous segments of a text split at every span boundary.
///
/// Each yielded item is a non-empty byte range. Together the segments cover `0..len`
/// exactly. The spans covering the most recently yielded segment are exposed through
/// [`SpanSegments::active_spans`], in the order the spans were supplied.
///
/// # Examples
///
/// ```
/// use attributed_text::{SpanSegments, TextRange};
///
/// let text = "hello";
/// let spans = [
///     (TextRange::new(text, 0..2).unwrap(), "red"),
///     (TextRange::new(text, 1..5).unwrap(), "blue"),
/// ];
/// let mut segments = SpanSegments::new(text.len(), &spans);
///
/// assert_eq!(segments.next(), Some(0..1));
/// assert_eq!(segments.active_spans().collect::<Vec<_>>(), [&"red"]);
/// assert_eq!(segments.next(), Some(1..2));
/// assert_eq!(segments.active_spans().collect::<Vec<_>>(), [&"red", &"blue"]);
/// assert_eq!(segments.next(), Some(2..5));
/// assert_eq!(segments.next(), None);
/// ```
#[derive(Debug)]
pub struct SpanSegments<'a, S> {
    spans: &'a [(TextRange, S)],
    boundaries: Vec<usize>,
    /// `(boundary index, span index)`, sorted.
    start_events: Vec<(u32, u32)>,
    /// `(boundary index, span index)`, sorted.
    end_events: Vec<(u32, u32)>,
    next_start: usize,
    next_end: usize,
    /// Span indices active over the current segment, ascending.
    active: Vec<u32>,
    index: usize,
}

impl<'a, S> SpanSegments<'a, S> {
    /// Prepares segmentation of a text of `len` bytes.
    ///
    /// Span ranges are clamped to `len`; empty spans never become active.
    pub fn new(len: usize, spans: &'a [(TextRange, S)]) -> Self {
        let mut boundaries = Vec::with_capacity(2 + spans.len().saturating_mul(2));
        boundaries.push(0);
        boundaries.push(len);
        for (range, _) in spans {
            boundaries.push(range.start().min(len));
            boundaries.push(range.end().min(len));
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let boundary_index = |offset: usize| -> u32 {
            // Every clamped span offset was inserted above.
            let ix = boundaries
                .binary_search(&offset.min(len))
                .unwrap_or_else(|ix| ix);
            u32::try_from(ix).unwrap_or(u32::MAX)
        };

        let mut start_events = Vec::with_capacity(spans.len());
        let mut end_events = Vec::with_capacity(spans.len());
        for (span_ix, (range, _)) in spans.iter().enumerate() {
            let start = boundary_index(range.start());
            let end = boundary_index(range.end());
            if start >= end {
                continue;
            }
            let span_ix = u32::try_from(span_ix).unwrap_or(u32::MAX);
            start_events.push((start, span_ix));
            end_events.push((end, span_ix));
        }
        start_events.sort_unstable();
        end_events.sort_unstable();

        Self {
            spans,
            boundaries,
            active: Vec::with_capacity(start_events.len()),
            start_events,
            end_events,
            next_start: 0,
            next_end: 0,
            index: 0,
        }
    }

    /// The spans covering the segment most recently returned by [`Iterator::next`].
    pub fn active_spans(&self) -> impl Iterator<Item = &'a S> + '_ {
        let spans = self.spans;
        self.active.iter().map(move |&ix| &spans[ix as usize].1)
    }
}

impl<S> Iterator for SpanSegments<'_, S> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index + 1 >= self.boundaries.len() {
            return None;
        }
        let boundary = u32::try_from(self.index).unwrap_or(u32::MAX);

        while let Some(&(at, span)) = self.end_events.get(self.next_end) {
            if at != boundary {
                break;
            }
            if let Ok(pos) = self.active.binary_search(&span) {
                self.active.remove(pos);
            }
            self.next_end += 1;
        }
        while let Some(&(at, span)) = self.start_events.get(self.next_start) {
            if at != boundary {
                break;
            }
            if let Err(pos) = self.active.binary_search(&span) {
                self.active.insert(pos, span);
            }
            self.next_start += 1;
        }

        let segment = self.boundaries[self.index]..self.boundaries[self.index + 1];
        self.index += 1;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::SpanSegments;
    use crate::TextRange;
    use alloc::vec::Vec;

    #[test]
    fn no_spans_yields_single_segment() {
        let spans: [(TextRange, ()); 0] = [];
        let mut segments = SpanSegments::new(5, &spans);
        assert_eq!(segments.next(), Some(0..5));
        assert_eq!(segments.active_spans().count(), 0);
        assert_eq!(segments.next(), None);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let spans: [(TextRange, ()); 0] = [];
        assert_eq!(SpanSegments::new(0, &spans).next(), None);
    }

    #[test]
    fn nested_spans_keep_application_order() {
        let text = "abcdef";
        let spans = [
            (TextRange::new(text, 0..6).unwrap(), 'a'),
            (TextRange::new(text, 2..4).unwrap(), 'b'),
            (TextRange::new(text, 3..3).unwrap(), 'z'),
        ];
        let mut segments = SpanSegments::new(text.len(), &spans);
        let mut seen = Vec::new();
        while let Some(range) = segments.next() {
            let active: Vec<_> = segments.active_spans().copied().collect();
            seen.push((range, active));
        }
        assert_eq!(
            seen,
            [
                (0..2, alloc::vec!['a']),
                (2..3, alloc::vec!['a', 'b']),
                (3..4, alloc::vec!['a', 'b']),
                (4..6, alloc::vec!['a']),
            ]
        );
    }
}
