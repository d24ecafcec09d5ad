// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable text update payloads.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::layout::LaidOutText;
use crate::props::TextProps;
use crate::style::{BreakStrategy, JustificationMode, TextAlign};

/// Production stamp of a [`TextUpdateTransaction`]. Later updates compare greater.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UpdateSequence(u64);

impl UpdateSequence {
    /// The raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing [`UpdateSequence`] stamps, from any thread.
#[derive(Debug, Default)]
pub struct UpdateSequencer {
    next: AtomicU64,
}

impl UpdateSequencer {
    /// Creates a sequencer starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a stamp greater than every stamp issued before.
    pub fn issue(&self) -> UpdateSequence {
        UpdateSequence(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Content insets of a text view.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Padding {
    /// Leading inset.
    pub start: f32,
    /// Top inset.
    pub top: f32,
    /// Trailing inset.
    pub end: f32,
    /// Bottom inset.
    pub bottom: f32,
}

/// Everything a view needs to display one text update.
///
/// Produced once per measurement cycle and consumed by
/// [`ViewUpdateApplier`](crate::ViewUpdateApplier); never mutated after hand-off.
#[derive(Clone, Debug, PartialEq)]
pub struct TextUpdateTransaction {
    laid_out_text: LaidOutText,
    generation: i32,
    js_responsible: bool,
    padding: Padding,
    text_align: TextAlign,
    break_strategy: BreakStrategy,
    justification_mode: JustificationMode,
    sequence: UpdateSequence,
}

impl TextUpdateTransaction {
    /// An update carrying `laid_out_text` with the paragraph directives it was laid out with,
    /// no padding and no explicit generation.
    pub fn new(laid_out_text: LaidOutText, sequence: UpdateSequence) -> Self {
        let paragraph = *laid_out_text.paragraph();
        Self {
            laid_out_text,
            generation: -1,
            js_responsible: false,
            padding: Padding::default(),
            text_align: paragraph.text_align,
            break_strategy: paragraph.break_strategy,
            justification_mode: paragraph.justification_mode,
            sequence,
        }
    }

    /// An update whose directives come from the view's props.
    pub fn from_props(
        laid_out_text: LaidOutText,
        props: &TextProps,
        sequence: UpdateSequence,
    ) -> Self {
        Self {
            laid_out_text,
            generation: props.generation,
            js_responsible: props.js_responsible,
            padding: props.padding(),
            text_align: props.text_align,
            break_strategy: props.text_break_strategy,
            justification_mode: props.justification_mode,
            sequence,
        }
    }

    /// Sets the generation marker.
    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = generation;
        self
    }

    /// Sets whether script code owns the text content.
    pub fn with_js_responsible(mut self, js_responsible: bool) -> Self {
        self.js_responsible = js_responsible;
        self
    }

    /// Sets the content padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the line alignment.
    pub fn with_text_align(mut self, text_align: TextAlign) -> Self {
        self.text_align = text_align;
        self
    }

    /// The laid-out text.
    pub fn laid_out_text(&self) -> &LaidOutText {
        &self.laid_out_text
    }

    /// Generation marker, `-1` when none was given.
    pub fn generation(&self) -> i32 {
        self.generation
    }

    /// Whether script code owns the text content.
    pub fn js_responsible(&self) -> bool {
        self.js_responsible
    }

    /// Content padding.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Line alignment.
    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// Break strategy.
    pub fn break_strategy(&self) -> BreakStrategy {
        self.break_strategy
    }

    /// Justification mode.
    pub fn justification_mode(&self) -> JustificationMode {
        self.justification_mode
    }

    /// Production stamp.
    pub fn sequence(&self) -> UpdateSequence {
        self.sequence
    }

    /// Returns `true` if the text embeds inline elements that need patching.
    pub fn contains_inline_elements(&self) -> bool {
        self.laid_out_text.contains_inline_elements()
    }
}
