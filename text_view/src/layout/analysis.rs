// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting styled text into measured layout items.

use core::ops::Range;

use icu_segmenter::LineSegmenterBorrowed;
use unicode_width::UnicodeWidthChar;

use crate::style::TextStyle;
use crate::StyledText;

/// Advance of one display column, as a fraction of the font size.
pub(crate) const COLUMN_ADVANCE_EM: f32 = 0.6;

/// Ascent of a glyph box, as a fraction of the font size.
pub(crate) const ASCENT_EM: f32 = 0.8;

/// Descent of a glyph box, as a fraction of the font size.
pub(crate) const DESCENT_EM: f32 = 0.2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ClusterKind {
    Visible,
    Space,
    Newline,
}

/// One or more codepoints that are measured and broken as a unit.
///
/// Zero-width codepoints (combining marks, joiners) are folded into the preceding cluster.
#[derive(Clone, Debug)]
pub(crate) struct Cluster {
    pub(crate) bytes: Range<usize>,
    pub(crate) chars: Range<usize>,
    pub(crate) advance: f32,
    pub(crate) kind: ClusterKind,
    pub(crate) run: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct InlineItem {
    /// Index into the text's placeholders.
    pub(crate) placeholder: usize,
    pub(crate) position: usize,
    pub(crate) byte_position: usize,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) size_known: bool,
}

#[derive(Clone, Debug)]
pub(crate) enum ItemKind {
    Cluster(Cluster),
    Inline(InlineItem),
}

#[derive(Clone, Debug)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    /// A line may end after this item.
    pub(crate) break_after: bool,
}

impl Item {
    pub(crate) fn advance(&self) -> f32 {
        match &self.kind {
            ItemKind::Cluster(cluster) => cluster.advance,
            ItemKind::Inline(inline) => inline.width,
        }
    }

    pub(crate) fn is_space(&self) -> bool {
        matches!(&self.kind, ItemKind::Cluster(c) if c.kind == ClusterKind::Space)
    }

    pub(crate) fn is_newline(&self) -> bool {
        matches!(&self.kind, ItemKind::Cluster(c) if c.kind == ClusterKind::Newline)
    }

    /// Whether the item hangs at the end of a line rather than counting toward its width.
    pub(crate) fn hangs(&self) -> bool {
        self.is_space() || self.is_newline()
    }

    pub(crate) fn chars(&self) -> Range<usize> {
        match &self.kind {
            ItemKind::Cluster(cluster) => cluster.chars.clone(),
            ItemKind::Inline(inline) => inline.position..inline.position,
        }
    }

    pub(crate) fn bytes(&self) -> Range<usize> {
        match &self.kind {
            ItemKind::Cluster(cluster) => cluster.bytes.clone(),
            ItemKind::Inline(inline) => inline.byte_position..inline.byte_position,
        }
    }

    /// Space above and below the baseline this item needs.
    pub(crate) fn extent(&self, text: &StyledText) -> (f32, f32) {
        match &self.kind {
            ItemKind::Cluster(cluster) => style_extent(run_style(text, cluster.run)),
            ItemKind::Inline(inline) => (inline.height, 0.0),
        }
    }
}

/// Ascent and descent of a line box made of text in `style`, with the leading split evenly.
pub(crate) fn style_extent(style: &TextStyle) -> (f32, f32) {
    let leading = style.resolved_line_height() - style.font_size;
    (
        style.font_size * ASCENT_EM + leading * 0.5,
        style.font_size * DESCENT_EM + leading * 0.5,
    )
}

pub(crate) fn run_style(text: &StyledText, run: usize) -> &TextStyle {
    text.runs()
        .get(run)
        .map(|run| run.attributes())
        .unwrap_or(&DEFAULT_STYLE)
}

static DEFAULT_STYLE: TextStyle = TextStyle::DEFAULT;

/// Advance of a single codepoint in `style`.
pub(crate) fn char_advance(ch: char, style: &TextStyle) -> f32 {
    let columns = ch.width().unwrap_or(0);
    if columns == 0 {
        return 0.0;
    }
    columns as f32 * COLUMN_ADVANCE_EM * style.font_size + style.letter_spacing
}

/// Produce the measured items of `text` in logical order.
///
/// Placeholders are interleaved before the character at their position. Line break
/// opportunities come from the Unicode line breaking algorithm; a line may also end on
/// either side of an inline element.
pub(crate) fn analyze(text: &StyledText, segmenter: LineSegmenterBorrowed<'_>) -> Vec<Item> {
    let source = text.as_str();
    let breaks: Vec<usize> = segmenter
        .segment_str(source)
        .filter(|&ix| ix > 0 && ix < source.len())
        .collect();
    let placeholders = text.placeholders();

    let mut items: Vec<Item> = Vec::with_capacity(source.len() + placeholders.len());
    let mut next_placeholder = 0;
    let mut char_index = 0;

    for (run_ix, run) in text.runs().iter().enumerate() {
        let style = run.attributes();
        let run_start = run.range().start;
        for (offset, ch) in source[run.range()].char_indices() {
            let byte = run_start + offset;
            while let Some(p) = placeholders.get(next_placeholder) {
                if p.position != char_index {
                    break;
                }
                push_inline(&mut items, text, next_placeholder, byte, run_ix);
                next_placeholder += 1;
            }

            let bytes = byte..byte + ch.len_utf8();
            if ch == '\n' {
                let joined = items
                    .last_mut()
                    .and_then(|item| carriage_return(item, source, byte));
                if let Some(cr) = joined {
                    cr.bytes.end = bytes.end;
                    cr.chars.end = char_index + 1;
                    char_index += 1;
                    continue;
                }
            }
            let kind = if is_mandatory_break(ch) {
                ClusterKind::Newline
            } else if ch.is_whitespace() {
                ClusterKind::Space
            } else {
                ClusterKind::Visible
            };
            let advance = if kind == ClusterKind::Newline {
                0.0
            } else {
                char_advance(ch, style)
            };

            let folds = kind != ClusterKind::Newline && advance == 0.0 && ch.width() == Some(0);
            let previous = items.last_mut().and_then(|item| match &mut item.kind {
                ItemKind::Cluster(c) if c.run == run_ix && c.kind != ClusterKind::Newline => {
                    Some(c)
                }
                _ => None,
            });
            match previous {
                Some(cluster) if folds => {
                    cluster.bytes.end = bytes.end;
                    cluster.chars.end = char_index + 1;
                }
                _ => items.push(Item {
                    kind: ItemKind::Cluster(Cluster {
                        bytes,
                        chars: char_index..char_index + 1,
                        advance,
                        kind,
                        run: run_ix,
                    }),
                    break_after: false,
                }),
            }
            char_index += 1;
        }
    }

    let last_run = text.runs().len().saturating_sub(1);
    while next_placeholder < placeholders.len() {
        push_inline(&mut items, text, next_placeholder, source.len(), last_run);
        next_placeholder += 1;
    }

    for item in &mut items {
        if let ItemKind::Cluster(cluster) = &item.kind {
            item.break_after |= breaks.binary_search(&cluster.bytes.end).is_ok();
        }
    }
    items
}

/// Characters that end a line unconditionally (line breaking classes BK, CR, LF and NL).
fn is_mandatory_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// The cluster of `item` if it is a lone CR ending at `byte`, which a following LF joins.
fn carriage_return<'a>(item: &'a mut Item, source: &str, byte: usize) -> Option<&'a mut Cluster> {
    match &mut item.kind {
        ItemKind::Cluster(c)
            if c.kind == ClusterKind::Newline
                && c.bytes.end == byte
                && source.get(c.bytes.clone()) == Some("\r") =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn push_inline(
    items: &mut Vec<Item>,
    text: &StyledText,
    placeholder: usize,
    byte_position: usize,
    run: usize,
) {
    let p = &text.placeholders()[placeholder];
    let fallback = run_style(text, run).resolved_line_height();
    let height = p.size.known_height().unwrap_or(fallback);
    let width = p.size.known_width().unwrap_or(height);
    if let Some(previous) = items.last_mut() {
        previous.break_after = true;
    }
    items.push(Item {
        kind: ItemKind::Inline(InlineItem {
            placeholder,
            position: p.position,
            byte_position,
            width,
            height,
            size_known: p.size.known_width().is_some() && p.size.known_height().is_some(),
        }),
        break_after: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::InlineKind;
    use attributed_text::{AttributedText, SizeHint};
    use icu_segmenter::options::LineBreakOptions;
    use icu_segmenter::LineSegmenter;

    fn items_of(text: &StyledText) -> Vec<Item> {
        analyze(text, LineSegmenter::new_auto(LineBreakOptions::default()))
    }

    fn plain(s: &str) -> StyledText {
        let mut builder = AttributedText::builder();
        builder.push_run(s, TextStyle::with_font_size(10.0));
        builder.build()
    }

    #[test]
    fn clusters_and_break_opportunities() {
        let items = items_of(&plain("ab cd"));
        assert_eq!(items.len(), 5);
        assert!(items[2].is_space());
        // A line may end after the space, not inside the words.
        let breaks: Vec<bool> = items.iter().map(|item| item.break_after).collect();
        assert_eq!(breaks, [false, false, true, false, false]);
        assert!((items[0].advance() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn combining_marks_fold_into_base() {
        let items = items_of(&plain("e\u{301}x"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].chars(), 0..2);
        assert_eq!(items[0].bytes(), 0..3);
    }

    #[test]
    fn wide_characters_take_two_columns() {
        let items = items_of(&plain("中"));
        assert!((items[0].advance() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn placeholders_are_interleaved() {
        let mut builder = AttributedText::builder();
        builder
            .push_run("ab", TextStyle::with_font_size(10.0))
            .push_placeholder(7, InlineKind::View { tag: 7 }, SizeHint::new(20.0, 10.0))
            .push_run("c", TextStyle::with_font_size(10.0))
            .push_placeholder(8, InlineKind::View { tag: 8 }, SizeHint::UNKNOWN);
        let items = items_of(&builder.build());
        assert_eq!(items.len(), 5);
        assert!(items[1].break_after, "may break before an inline element");
        match &items[2].kind {
            ItemKind::Inline(inline) => {
                assert_eq!(inline.position, 2);
                assert_eq!(inline.width, 20.0);
                assert!(inline.size_known);
            }
            other => panic!("expected inline item, got {other:?}"),
        }
        match &items[4].kind {
            ItemKind::Inline(inline) => {
                assert!(!inline.size_known);
                assert_eq!(inline.byte_position, 3);
                assert!((inline.height - 12.0).abs() < 1e-4);
            }
            other => panic!("expected inline item, got {other:?}"),
        }
    }

    #[test]
    fn every_mandatory_break_ends_a_line() {
        for separator in ["\r", "\u{0B}", "\u{0C}", "\u{85}", "\u{2028}", "\u{2029}"] {
            let items = items_of(&plain(&format!("a{separator}b")));
            assert_eq!(items.len(), 3, "{separator:?}");
            assert!(items[1].is_newline(), "{separator:?}");
            assert_eq!(items[1].advance(), 0.0);
        }
    }

    #[test]
    fn crlf_is_one_break() {
        let items = items_of(&plain("a\r\nb"));
        assert_eq!(items.len(), 3);
        assert!(items[1].is_newline());
        assert_eq!(items[1].chars(), 1..3);
        assert_eq!(items[1].bytes(), 1..3);
        // Only a CR directly before an LF is joined.
        assert_eq!(items_of(&plain("a\r\rb")).len(), 4);
        assert_eq!(items_of(&plain("a\n\nb")).len(), 4);
        assert_eq!(items_of(&plain("a\r\n\nb")).len(), 4);
    }

    #[test]
    fn newline_is_its_own_cluster() {
        let items = items_of(&plain("a\nb"));
        assert_eq!(items.len(), 3);
        assert!(items[1].is_newline());
        assert_eq!(items[1].advance(), 0.0);
    }
}
