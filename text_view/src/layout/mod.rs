// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement and line layout of styled text.

pub(crate) mod analysis;
mod align;
mod breaker;

use core::fmt;
use core::hash::BuildHasher;
use core::ops::Range;
use std::sync::Arc;

use foldhash::fast::FixedState;
use icu_segmenter::options::LineBreakOptions;
use icu_segmenter::{LineSegmenter, LineSegmenterBorrowed};
use tracing::{debug, trace};

pub use breaker::BreakReason;

use self::analysis::{char_advance, run_style, style_extent, Item, ItemKind};
use crate::constraints::{LayoutConstraints, MeasureMode};
use crate::error::LayoutError;
use crate::inline::InlineKind;
use crate::style::{EllipsizeMode, ParagraphStyle};
use crate::StyledText;

const ELLIPSIS: char = '\u{2026}';

/// Identity of one laid-out text, derived from its inputs.
///
/// Equal inputs always produce equal ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(u64);

impl LayoutId {
    /// The raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Deterministic content fingerprint of a styled text.
pub fn fingerprint(text: &StyledText) -> u64 {
    FixedState::with_seed(FINGERPRINT_SEED).hash_one(text)
}

const FINGERPRINT_SEED: u64 = 0x7465_7874_5f76_6965;

/// One laid-out line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Range of the line in the source text, in characters.
    ///
    /// Includes trailing whitespace and the terminating newline, if any.
    pub text_range: Range<usize>,
    /// Offset of the line from the left edge of the layout.
    pub x: f32,
    /// Offset of the top of the line box.
    pub y: f32,
    /// Advance of the line content, excluding hanging whitespace.
    pub width: f32,
    /// Height of the line box.
    pub height: f32,
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
    /// Baseline offset from the top of the layout.
    pub baseline: f32,
    /// Extra advance added to every inner space when the line is justified.
    pub justification_gap: f32,
    /// The line was cut short to fit an ellipsis.
    pub ellipsized: bool,
    /// Why the line ended.
    pub break_reason: BreakReason,
    pub(crate) bytes: Range<usize>,
    pub(crate) items: Range<usize>,
    pub(crate) content_end: usize,
    pub(crate) spaces: usize,
}

/// An inline element placed by layout.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineSlot {
    /// Placeholder id.
    pub id: u64,
    /// What the placeholder stands for.
    pub kind: InlineKind,
    /// Character offset of the placeholder.
    pub char_index: usize,
    /// Index of the line holding the element.
    pub line: usize,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Both dimensions came from the placeholder rather than from the surrounding text.
    pub size_known: bool,
}

#[derive(Debug, PartialEq)]
struct LaidOutData {
    id: LayoutId,
    source: StyledText,
    paragraph: ParagraphStyle,
    lines: Vec<Line>,
    inline_slots: Vec<InlineSlot>,
    width: f32,
    height: f32,
    alignment_width: f32,
    truncated: bool,
}

/// Immutable result of laying out a styled text.
///
/// Cloning is cheap; clones share the same data.
#[derive(Clone)]
pub struct LaidOutText {
    data: Arc<LaidOutData>,
}

impl LaidOutText {
    /// Identity derived from the layout inputs.
    pub fn id(&self) -> LayoutId {
        self.data.id
    }

    /// The text that was laid out.
    pub fn source(&self) -> &StyledText {
        &self.data.source
    }

    /// Paragraph directives used for the layout.
    pub fn paragraph(&self) -> &ParagraphStyle {
        &self.data.paragraph
    }

    /// Lines in visual order, top to bottom.
    pub fn lines(&self) -> &[Line] {
        &self.data.lines
    }

    /// Placed inline elements, in text order. Elements cut off by `max_lines` are absent.
    pub fn inline_slots(&self) -> &[InlineSlot] {
        &self.data.inline_slots
    }

    /// Natural width: the widest line before justification.
    pub fn width(&self) -> f32 {
        self.data.width
    }

    /// Natural height: the sum of the line heights.
    pub fn height(&self) -> f32 {
        self.data.height
    }

    /// Width lines were aligned against.
    pub fn alignment_width(&self) -> f32 {
        self.data.alignment_width
    }

    /// Returns `true` if `max_lines` dropped some of the text.
    pub fn is_truncated(&self) -> bool {
        self.data.truncated
    }

    /// Returns `true` if the text embeds inline elements.
    pub fn contains_inline_elements(&self) -> bool {
        self.data.source.has_placeholders()
    }

    /// Source text of the line at `index`.
    pub fn line_text(&self, index: usize) -> Option<&str> {
        let line = self.data.lines.get(index)?;
        self.data.source.as_str().get(line.bytes.clone())
    }
}

impl PartialEq for LaidOutText {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data == other.data
    }
}

impl fmt::Debug for LaidOutText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaidOutText")
            .field("id", &self.data.id)
            .field("lines", &self.data.lines.len())
            .field("width", &self.data.width)
            .field("height", &self.data.height)
            .finish_non_exhaustive()
    }
}

/// Output of [`TextLayoutEngine::measure`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    /// The laid-out text.
    pub laid_out_text: LaidOutText,
    /// Measured width after applying the width mode.
    pub width: f32,
    /// Measured height after applying the height mode.
    pub height: f32,
    /// The text embeds inline elements.
    pub contains_inline_elements: bool,
}

/// Lays out styled text into lines.
///
/// The engine holds no mutable state: the same inputs always produce the same output, and
/// one engine may be shared between threads.
#[derive(Clone, Copy)]
pub struct TextLayoutEngine {
    segmenter: LineSegmenterBorrowed<'static>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLayoutEngine").finish_non_exhaustive()
    }
}

impl TextLayoutEngine {
    /// Creates an engine using the built-in Unicode line break data.
    pub fn new() -> Self {
        Self {
            segmenter: LineSegmenter::new_auto(LineBreakOptions::default()),
        }
    }

    /// Measures `text` under `constraints`.
    ///
    /// Width wraps only when the width mode bounds it; the height mode only clamps the
    /// reported height.
    pub fn measure(
        &self,
        text: &StyledText,
        constraints: &LayoutConstraints,
        paragraph: &ParagraphStyle,
    ) -> Result<LayoutResult, LayoutError> {
        let wrap = constraints.wrap_width();
        let alignment_width = |natural: f32| match constraints.width_mode {
            MeasureMode::Exact => wrap.unwrap_or(natural),
            MeasureMode::AtMost | MeasureMode::Unspecified => natural,
        };
        let laid_out = self.lay_out(text, wrap, alignment_width, paragraph)?;
        let width = constraints
            .width_mode
            .resolve(constraints.width, laid_out.width());
        let height = constraints
            .height_mode
            .resolve(constraints.height, laid_out.height());
        trace!(
            width,
            height,
            lines = laid_out.lines().len(),
            "measured text"
        );
        Ok(LayoutResult {
            contains_inline_elements: laid_out.contains_inline_elements(),
            laid_out_text: laid_out,
            width,
            height,
        })
    }

    /// Lays out `text` for a container of `container_width`.
    ///
    /// A finite width wraps lines and is the width they are aligned against; an infinite or
    /// NaN width lays out without wrapping.
    pub fn layout(
        &self,
        text: &StyledText,
        container_width: f32,
        paragraph: &ParagraphStyle,
    ) -> Result<LaidOutText, LayoutError> {
        let wrap = container_width
            .is_finite()
            .then_some(container_width.max(0.0));
        self.lay_out(text, wrap, |natural| wrap.unwrap_or(natural), paragraph)
    }

    fn lay_out(
        &self,
        text: &StyledText,
        wrap: Option<f32>,
        alignment_width: impl FnOnce(f32) -> f32,
        paragraph: &ParagraphStyle,
    ) -> Result<LaidOutText, LayoutError> {
        if let Err(err) = text.validate() {
            debug!(%err, "rejecting invalid layout input");
            return Err(err.into());
        }

        let items = analysis::analyze(text, self.segmenter);
        let breaks = breaker::break_lines(&items, wrap, paragraph.break_strategy);
        let mut lines = build_lines(text, &items, &breaks);

        let mut truncated = false;
        if let Some(max_lines) = paragraph.max_lines.filter(|n| *n > 0) {
            let max_lines = max_lines as usize;
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                truncated = true;
                if paragraph.ellipsize_mode == EllipsizeMode::Tail {
                    if let Some(last) = lines.last_mut() {
                        ellipsize(text, &items, last, wrap);
                    }
                }
            }
        }

        let natural_width = lines.iter().fold(0.0_f32, |w, line| w.max(line.width));
        let alignment_width = alignment_width(natural_width);
        align::align(&mut lines, alignment_width, paragraph);

        let mut y = 0.0;
        for line in &mut lines {
            line.y = y;
            line.baseline = y + line.ascent;
            y += line.height;
        }
        let inline_slots = place_inline_elements(text, &items, &lines);

        let id = LayoutId(
            FixedState::with_seed(FINGERPRINT_SEED)
                .hash_one((text, wrap.map(f32::to_bits), paragraph)),
        );
        Ok(LaidOutText {
            data: Arc::new(LaidOutData {
                id,
                source: text.clone(),
                paragraph: *paragraph,
                lines,
                inline_slots,
                width: natural_width,
                height: y,
                alignment_width,
                truncated,
            }),
        })
    }
}

fn build_lines(text: &StyledText, items: &[Item], breaks: &[breaker::LineBreak]) -> Vec<Line> {
    let mut lines = Vec::with_capacity(breaks.len());
    let mut prev_chars = 0;
    let mut prev_bytes = 0;
    for line_break in breaks {
        let range = line_break.items.clone();
        let line_items = &items[range.clone()];
        let content_end = range.start
            + line_items
                .iter()
                .rposition(|item| !item.hangs())
                .map_or(0, |ix| ix + 1);

        let (mut ascent, mut descent) = (0.0_f32, 0.0_f32);
        if line_items.is_empty() {
            // An empty line takes the metrics of the text before it.
            let style = items.get(range.start.wrapping_sub(1)).map_or_else(
                || run_style(text, usize::MAX),
                |item| match &item.kind {
                    ItemKind::Cluster(cluster) => run_style(text, cluster.run),
                    ItemKind::Inline(_) => run_style(text, text.runs().len().wrapping_sub(1)),
                },
            );
            (ascent, descent) = style_extent(style);
        } else {
            for item in line_items {
                let (a, d) = item.extent(text);
                ascent = ascent.max(a);
                descent = descent.max(d);
            }
        }

        let chars = match (line_items.first(), line_items.last()) {
            (Some(first), Some(last)) => first.chars().start..last.chars().end,
            _ => prev_chars..prev_chars,
        };
        let bytes = match (line_items.first(), line_items.last()) {
            (Some(first), Some(last)) => first.bytes().start..last.bytes().end,
            _ => prev_bytes..prev_bytes,
        };
        prev_chars = chars.end;
        prev_bytes = bytes.end;

        lines.push(Line {
            text_range: chars,
            x: 0.0,
            y: 0.0,
            width: items[range.start..content_end]
                .iter()
                .map(Item::advance)
                .sum(),
            height: ascent + descent,
            ascent,
            descent,
            baseline: 0.0,
            justification_gap: 0.0,
            ellipsized: false,
            break_reason: line_break.reason,
            bytes,
            items: range.clone(),
            content_end,
            spaces: items[range.start..content_end]
                .iter()
                .filter(|item| item.is_space())
                .count(),
        });
    }
    lines
}

/// Shorten `line` until an ellipsis fits within `wrap`, then account for the ellipsis.
fn ellipsize(text: &StyledText, items: &[Item], line: &mut Line, wrap: Option<f32>) {
    let style = items[line.items.start..line.content_end]
        .iter()
        .rev()
        .find_map(|item| match &item.kind {
            ItemKind::Cluster(cluster) => Some(run_style(text, cluster.run)),
            ItemKind::Inline(_) => None,
        })
        .unwrap_or_else(|| run_style(text, text.runs().len().wrapping_sub(1)));
    let ellipsis = char_advance(ELLIPSIS, style);

    let mut end = line.content_end;
    let mut width = line.width;
    if let Some(limit) = wrap {
        while end > line.items.start && width + ellipsis > limit {
            end -= 1;
            width -= items[end].advance();
        }
    }
    while end > line.items.start && items[end - 1].hangs() {
        end -= 1;
        width -= items[end].advance();
    }

    line.content_end = end;
    line.items.end = end;
    line.width = width.max(0.0) + ellipsis;
    line.spaces = items[line.items.start..end]
        .iter()
        .filter(|item| item.is_space())
        .count();
    if end > line.items.start {
        let last = &items[end - 1];
        line.text_range.end = last.chars().end;
        line.bytes.end = last.bytes().end;
    } else {
        line.text_range.end = line.text_range.start;
        line.bytes.end = line.bytes.start;
    }
    line.ellipsized = true;
}

fn place_inline_elements(text: &StyledText, items: &[Item], lines: &[Line]) -> Vec<InlineSlot> {
    let mut slots = Vec::new();
    if !text.has_placeholders() {
        return slots;
    }
    for (line_ix, line) in lines.iter().enumerate() {
        let mut pen = line.x;
        for item in &items[line.items.clone()] {
            match &item.kind {
                ItemKind::Inline(inline) => {
                    let placeholder = &text.placeholders()[inline.placeholder];
                    slots.push(InlineSlot {
                        id: placeholder.id,
                        kind: placeholder.kind.clone(),
                        char_index: inline.position,
                        line: line_ix,
                        x: pen,
                        y: line.baseline - inline.height,
                        width: inline.width,
                        height: inline.height,
                        size_known: inline.size_known,
                    });
                    pen += inline.width;
                }
                ItemKind::Cluster(_) if item.is_space() => {
                    pen += item.advance() + line.justification_gap;
                }
                ItemKind::Cluster(_) => pen += item.advance(),
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BreakStrategy, TextAlign, TextStyle};
    use attributed_text::{AttributedText, ErrorKind, InlinePlaceholder, SizeHint};

    fn text(s: &str) -> StyledText {
        let mut builder = AttributedText::builder();
        builder.push_run(s, TextStyle::with_font_size(10.0));
        builder.build()
    }

    fn simple() -> ParagraphStyle {
        ParagraphStyle {
            break_strategy: BreakStrategy::Simple,
            ..ParagraphStyle::default()
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn empty_text_has_no_lines() {
        let engine = TextLayoutEngine::new();
        let result = engine
            .measure(&text(""), &LayoutConstraints::UNBOUNDED, &simple())
            .unwrap();
        assert!(result.laid_out_text.lines().is_empty());
        assert_eq!(result.width, 0.0);
        assert_eq!(result.height, 0.0);
    }

    #[test]
    fn line_metrics() {
        let engine = TextLayoutEngine::new();
        let laid_out = engine.layout(&text("ab\ncd"), f32::INFINITY, &simple()).unwrap();
        let lines = laid_out.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text_range, 0..3);
        assert_eq!(laid_out.line_text(0), Some("ab\n"));
        assert_eq!(laid_out.line_text(1), Some("cd"));
        assert!(close(lines[0].width, 12.0));
        // 0.8 em ascent plus half of the 0.2 em leading.
        assert!(close(lines[0].ascent, 9.0));
        assert!(close(lines[0].height, 12.0));
        assert!(close(lines[1].y, 12.0));
        assert!(close(lines[1].baseline, 21.0));
        assert!(close(laid_out.height(), 24.0));
    }

    #[test]
    fn trailing_newline_keeps_an_empty_line() {
        let engine = TextLayoutEngine::new();
        let laid_out = engine.layout(&text("ab\n"), f32::INFINITY, &simple()).unwrap();
        assert_eq!(laid_out.lines().len(), 2);
        assert_eq!(laid_out.lines()[1].text_range, 3..3);
        assert!(close(laid_out.height(), 24.0));
    }

    #[test]
    fn center_and_right_alignment() {
        let engine = TextLayoutEngine::new();
        let mut paragraph = simple();
        paragraph.text_align = TextAlign::Center;
        let centered = engine.layout(&text("ab"), 100.0, &paragraph).unwrap();
        assert!(close(centered.lines()[0].x, 44.0));
        paragraph.text_align = TextAlign::Right;
        let right = engine.layout(&text("ab"), 100.0, &paragraph).unwrap();
        assert!(close(right.lines()[0].x, 88.0));
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let engine = TextLayoutEngine::new();
        let mut paragraph = simple();
        paragraph.text_align = TextAlign::Justify;
        let laid_out = engine.layout(&text("aa bb cc dd"), 40.0, &paragraph).unwrap();
        let lines = laid_out.lines();
        assert_eq!(lines.len(), 2);
        // "aa bb" is 30 wide with one inner space.
        assert!(close(lines[0].justification_gap, 10.0));
        assert!(close(lines[0].width, 40.0));
        // The last line keeps its natural width.
        assert_eq!(lines[1].justification_gap, 0.0);
        assert!(close(lines[1].width, 30.0));
        // Natural width is measured before justification.
        assert!(close(laid_out.width(), 30.0));
    }

    #[test]
    fn max_lines_with_tail_ellipsis() {
        let engine = TextLayoutEngine::new();
        let paragraph = ParagraphStyle {
            max_lines: Some(1),
            ..simple()
        };
        let laid_out = engine.layout(&text("aaa bbb ccc"), 45.0, &paragraph).unwrap();
        assert_eq!(laid_out.lines().len(), 1);
        assert!(laid_out.is_truncated());
        let line = &laid_out.lines()[0];
        assert!(line.ellipsized);
        // "aaa bbb" plus the ellipsis would overflow, so one more character goes.
        assert!(close(line.width, 42.0));
        assert_eq!(laid_out.line_text(0), Some("aaa bb"));
    }

    #[test]
    fn max_lines_with_clip() {
        let engine = TextLayoutEngine::new();
        let paragraph = ParagraphStyle {
            max_lines: Some(1),
            ellipsize_mode: EllipsizeMode::Clip,
            ..simple()
        };
        let laid_out = engine.layout(&text("a\nb\nc"), f32::INFINITY, &paragraph).unwrap();
        assert_eq!(laid_out.lines().len(), 1);
        assert!(!laid_out.lines()[0].ellipsized);
        assert!(close(laid_out.height(), 12.0));
    }

    #[test]
    fn zero_max_lines_means_unlimited() {
        let engine = TextLayoutEngine::new();
        let paragraph = ParagraphStyle {
            max_lines: Some(0),
            ..simple()
        };
        let laid_out = engine.layout(&text("a\nb"), f32::INFINITY, &paragraph).unwrap();
        assert_eq!(laid_out.lines().len(), 2);
        assert!(!laid_out.is_truncated());
    }

    #[test]
    fn inline_elements_sit_on_the_baseline() {
        let mut builder = AttributedText::builder();
        builder
            .push_run("ab", TextStyle::with_font_size(10.0))
            .push_placeholder(
                5,
                InlineKind::Image {
                    source: "icon.png".into(),
                },
                SizeHint::new(20.0, 30.0),
            )
            .push_run("c", TextStyle::with_font_size(10.0));
        let laid_out = TextLayoutEngine::new()
            .layout(&builder.build(), f32::INFINITY, &simple())
            .unwrap();
        assert!(laid_out.contains_inline_elements());
        let line = &laid_out.lines()[0];
        assert!(close(line.ascent, 30.0));
        let slot = &laid_out.inline_slots()[0];
        assert_eq!(slot.id, 5);
        assert!(close(slot.x, 12.0));
        assert!(close(slot.y, 0.0));
        assert!(close(line.width, 38.0));
    }

    #[test]
    fn placeholder_past_the_end_is_rejected() {
        let text = text("ab").with_placeholder(InlinePlaceholder::new(
            1,
            3,
            InlineKind::View { tag: 1 },
            SizeHint::UNKNOWN,
        ));
        let err = TextLayoutEngine::new()
            .measure(&text, &LayoutConstraints::UNBOUNDED, &simple())
            .unwrap_err();
        let LayoutError::InvalidLayoutInput(inner) = err;
        assert_eq!(inner.kind(), ErrorKind::PlaceholderOutOfBounds);
    }

    #[test]
    fn equal_inputs_share_an_id() {
        let engine = TextLayoutEngine::new();
        let a = engine.layout(&text("hello"), 50.0, &simple()).unwrap();
        let b = engine.layout(&text("hello"), 50.0, &simple()).unwrap();
        let c = engine.layout(&text("hello"), 60.0, &simple()).unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
        assert_ne!(a.id(), c.id());
        assert_eq!(fingerprint(a.source()), fingerprint(b.source()));
    }
}
