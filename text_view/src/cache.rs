// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoization of measurements.

use tracing::trace;

use crate::constraints::LayoutConstraints;
use crate::error::LayoutError;
use crate::layout::{fingerprint, LayoutResult, TextLayoutEngine};
use crate::style::ParagraphStyle;
use crate::StyledText;

struct Entry {
    epoch: u64,
    fingerprint: u64,
    constraints: LayoutConstraints,
    paragraph: ParagraphStyle,
    text: StyledText,
    result: LayoutResult,
}

impl Entry {
    fn matches(
        &self,
        fingerprint: u64,
        text: &StyledText,
        constraints: &LayoutConstraints,
        paragraph: &ParagraphStyle,
    ) -> bool {
        self.fingerprint == fingerprint
            && self.constraints == *constraints
            && self.paragraph == *paragraph
            && self.text == *text
    }
}

/// A least-recently-used cache of [`TextLayoutEngine::measure`] results.
///
/// Entries are keyed by the content fingerprint of the text together with the constraints
/// and paragraph directives; a fingerprint match is confirmed by comparing the full text.
/// Lookup is a linear scan, so keep the capacity in the order of tens.
pub struct MeasureCache {
    entries: Vec<Entry>,
    epoch: u64,
    max_entries: usize,
}

impl core::fmt::Debug for MeasureCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MeasureCache")
            .field("len", &self.entries.len())
            .field("epoch", &self.epoch)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl Default for MeasureCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl MeasureCache {
    /// Capacity of [`MeasureCache::default`].
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Creates a cache holding at most `max_entries` results.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the cached measurement, measuring with `engine` on a miss.
    ///
    /// Failed measurements are not cached.
    pub fn measure(
        &mut self,
        engine: &TextLayoutEngine,
        text: &StyledText,
        constraints: &LayoutConstraints,
        paragraph: &ParagraphStyle,
    ) -> Result<LayoutResult, LayoutError> {
        self.epoch += 1;
        let epoch = self.epoch;
        let fingerprint = fingerprint(text);

        let mut lowest_epoch = u64::MAX;
        let mut lowest_index = 0;
        for (ix, entry) in self.entries.iter_mut().enumerate() {
            if entry.matches(fingerprint, text, constraints, paragraph) {
                trace!(fingerprint, "measure cache hit");
                entry.epoch = epoch;
                return Ok(entry.result.clone());
            }
            if entry.epoch < lowest_epoch {
                lowest_epoch = entry.epoch;
                lowest_index = ix;
            }
        }

        trace!(fingerprint, "measure cache miss");
        let result = engine.measure(text, constraints, paragraph)?;
        let entry = Entry {
            epoch,
            fingerprint,
            constraints: *constraints,
            paragraph: *paragraph,
            text: text.clone(),
            result: result.clone(),
        };
        if self.entries.len() < self.max_entries {
            self.entries.push(entry);
        } else {
            self.entries[lowest_index] = entry;
        }
        Ok(result)
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached result.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
