// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use core::ops::Range;

use crate::{Error, InlinePlaceholder, SizeHint, SpanSegments, TextRange};

/// A contiguous piece of text sharing one set of attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextRun<Attr> {
    range: Range<usize>,
    attributes: Attr,
}

impl<Attr> TextRun<Attr> {
    /// The byte range of the run within the text.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The attributes applied to the run.
    pub fn attributes(&self) -> &Attr {
        &self.attributes
    }

    /// Length of the run in bytes.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns `true` if the run is empty.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Styled text: an ordered sequence of runs plus inline placeholders.
///
/// Runs are contiguous and cover the whole text, so the text length is the sum of the run
/// lengths. Placeholders are positioned by codepoint offset between characters and are
/// kept sorted by position.
///
/// Placeholder positions are only checked by [`AttributedText::validate`]; consumers that
/// rely on them (text layout) must validate before use.
#[derive(Clone, Debug)]
pub struct AttributedText<Attr, K = ()> {
    text: Arc<str>,
    char_len: usize,
    runs: Vec<TextRun<Attr>>,
    placeholders: Vec<InlinePlaceholder<K>>,
}

impl<Attr, K> AttributedText<Attr, K> {
    /// Start building attributed text run by run.
    pub fn builder() -> AttributedTextBuilder<Attr, K> {
        AttributedTextBuilder::new()
    }

    /// Assemble attributed text from pre-split runs and placeholders.
    ///
    /// Runs must be contiguous, start at zero, end at the text length, and lie on UTF-8
    /// boundaries. Empty runs are dropped. Placeholders are stored as given and checked by
    /// [`AttributedText::validate`].
    pub fn from_parts(
        text: impl Into<Arc<str>>,
        runs: impl IntoIterator<Item = (Range<usize>, Attr)>,
        placeholders: Vec<InlinePlaceholder<K>>,
    ) -> Result<Self, Error> {
        let text = text.into();
        let mut covered = 0;
        let mut checked = Vec::new();
        for (range, attributes) in runs {
            let range = TextRange::new(&text, range)?;
            if range.start() != covered {
                return Err(Error::runs_not_contiguous(range.start(), range.end(), text.len()));
            }
            covered = range.end();
            if !range.is_empty() {
                checked.push(TextRun {
                    range: range.as_range(),
                    attributes,
                });
            }
        }
        if covered != text.len() {
            return Err(Error::runs_not_contiguous(covered, text.len(), text.len()));
        }
        Ok(Self {
            char_len: text.chars().count(),
            text,
            runs: checked,
            placeholders,
        })
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The shared text storage.
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Length of the text in codepoints.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Returns `true` if there is no text. Placeholders may still be present.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The runs, in text order.
    pub fn runs(&self) -> &[TextRun<Attr>] {
        &self.runs
    }

    /// The placeholders, in position order.
    pub fn placeholders(&self) -> &[InlinePlaceholder<K>] {
        &self.placeholders
    }

    /// Returns `true` if any inline placeholder is embedded in the text.
    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// The run containing the byte at `index`, if any.
    pub fn run_at(&self, index: usize) -> Option<&TextRun<Attr>> {
        let ix = self
            .runs
            .partition_point(|run| run.range.end <= index);
        self.runs.get(ix).filter(|run| run.range.contains(&index))
    }

    /// Converts a codepoint offset to a byte offset. `char_len` maps to the text length.
    pub fn char_to_byte(&self, char_index: usize) -> Option<usize> {
        if char_index == self.char_len {
            return Some(self.text.len());
        }
        self.text.char_indices().nth(char_index).map(|(ix, _)| ix)
    }

    /// Converts a byte offset to a codepoint offset, rounding down inside a codepoint.
    pub fn byte_to_char(&self, byte_index: usize) -> usize {
        let end = byte_index.min(self.text.len());
        self.text
            .char_indices()
            .take_while(|&(ix, _)| ix < end)
            .count()
    }

    /// Checks that every placeholder lies within the text and that they are sorted.
    pub fn validate(&self) -> Result<(), Error> {
        let mut previous = 0;
        for placeholder in &self.placeholders {
            if placeholder.position > self.char_len {
                return Err(Error::placeholder_out_of_bounds(
                    placeholder.id,
                    placeholder.position,
                    self.char_len,
                ));
            }
            if placeholder.position < previous {
                return Err(Error::placeholders_unordered(
                    placeholder.id,
                    placeholder.position,
                    self.char_len,
                ));
            }
            previous = placeholder.position;
        }
        Ok(())
    }
}

impl<Attr: Clone, K> AttributedText<Attr, K> {
    /// Flatten overlapping attribute spans into runs.
    ///
    /// Every segment between span boundaries becomes a run whose attributes are `base` with
    /// `merge` applied for each span covering it, in the order the spans are given.
    pub fn from_spans<S>(
        text: impl Into<Arc<str>>,
        base: Attr,
        spans: &[(TextRange, S)],
        mut merge: impl FnMut(&mut Attr, &S),
    ) -> Self {
        let text = text.into();
        let mut runs = Vec::new();
        let mut segments = SpanSegments::new(text.len(), spans);
        while let Some(range) = segments.next() {
            let mut attributes = base.clone();
            for span in segments.active_spans() {
                merge(&mut attributes, span);
            }
            runs.push(TextRun { range, attributes });
        }
        Self {
            char_len: text.chars().count(),
            text,
            runs,
            placeholders: Vec::new(),
        }
    }

    /// Returns a copy with `placeholder` inserted after any placeholders at the same position.
    pub fn with_placeholder(mut self, placeholder: InlinePlaceholder<K>) -> Self {
        let ix = self
            .placeholders
            .partition_point(|p| p.position <= placeholder.position);
        self.placeholders.insert(ix, placeholder);
        self
    }
}

impl<Attr: PartialEq, K: PartialEq> PartialEq for AttributedText<Attr, K> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.runs == other.runs
            && self.placeholders == other.placeholders
    }
}

impl<Attr: Eq, K: Eq> Eq for AttributedText<Attr, K> {}

impl<Attr: Hash, K: Hash> Hash for AttributedText<Attr, K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.runs.hash(state);
        self.placeholders.hash(state);
    }
}

/// Builds [`AttributedText`] by appending runs and placeholders in order.
#[derive(Debug)]
pub struct AttributedTextBuilder<Attr, K = ()> {
    text: String,
    char_len: usize,
    runs: Vec<TextRun<Attr>>,
    placeholders: Vec<InlinePlaceholder<K>>,
}

impl<Attr, K> Default for AttributedTextBuilder<Attr, K> {
    fn default() -> Self {
        Self {
            text: String::new(),
            char_len: 0,
            runs: Vec::new(),
            placeholders: Vec::new(),
        }
    }
}

impl<Attr, K> AttributedTextBuilder<Attr, K> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run of text. Empty runs are ignored.
    pub fn push_run(&mut self, text: &str, attributes: Attr) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        let start = self.text.len();
        self.text.push_str(text);
        self.char_len += text.chars().count();
        self.runs.push(TextRun {
            range: start..self.text.len(),
            attributes,
        });
        self
    }

    /// Append an inline element at the current end of the text.
    pub fn push_placeholder(&mut self, id: u64, kind: K, size: SizeHint) -> &mut Self {
        let position = self.char_len;
        self.placeholders
            .push(InlinePlaceholder::new(id, position, kind, size));
        self
    }

    /// Insert an inline element at an arbitrary codepoint position.
    ///
    /// The position is not checked here; an element beyond the final text length makes the
    /// built text fail [`AttributedText::validate`].
    pub fn insert_placeholder(
        &mut self,
        id: u64,
        position: usize,
        kind: K,
        size: SizeHint,
    ) -> &mut Self {
        self.placeholders
            .push(InlinePlaceholder::new(id, position, kind, size));
        self
    }

    /// Number of codepoints appended so far.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Finish building. Placeholders are sorted by position, keeping insertion order for ties.
    pub fn build(self) -> AttributedText<Attr, K> {
        let mut placeholders = self.placeholders;
        placeholders.sort_by_key(|p| p.position);
        AttributedText {
            text: Arc::from(self.text),
            char_len: self.char_len,
            runs: self.runs,
            placeholders,
        }
    }
}
