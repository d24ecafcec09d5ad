// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use attributed_text::{AttributedText, InlinePlaceholder, SizeHint, TextRange};

use super::utils::{assert_close, plain, setup_test_logging, with_image};
use crate::{
    BreakReason, BreakStrategy, Error, InlineKind, LayoutConstraints, LayoutError, MeasureMode,
    MeasureOutput, OutboundEvent, ParagraphStyle, QueuedEventChannel, TextLayoutEngine,
    TextLocalData, TextMeasureFunction, TextProps, TextStyle, TextStyleOverride,
};

fn simple() -> ParagraphStyle {
    ParagraphStyle {
        break_strategy: BreakStrategy::Simple,
        ..ParagraphStyle::default()
    }
}

#[test]
fn unspecified_width_never_wraps() {
    setup_test_logging();
    let engine = TextLayoutEngine::new();
    let result = engine
        .measure(
            &plain("the quick brown fox"),
            &LayoutConstraints::new(
                10.0,
                MeasureMode::Unspecified,
                5.0,
                MeasureMode::Unspecified,
            ),
            &simple(),
        )
        .unwrap();
    assert_eq!(result.laid_out_text.lines().len(), 1);
    assert_close(result.width, 19.0 * 6.0);
    assert_close(result.height, 12.0);
}

#[test]
fn at_most_wraps_and_reports_natural_width() {
    let engine = TextLayoutEngine::new();
    let result = engine
        .measure(
            &plain("aaa bbb ccc"),
            &LayoutConstraints::width(45.0, MeasureMode::AtMost),
            &simple(),
        )
        .unwrap();
    let lines = result.laid_out_text.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].break_reason, BreakReason::Regular);
    assert_close(result.width, 42.0);
    assert_close(result.height, 24.0);
}

#[test]
fn at_most_caps_the_reported_width() {
    let engine = TextLayoutEngine::new();
    // A single unbreakable character wider than the bound still occupies its line.
    let result = engine
        .measure(
            &plain("ab"),
            &LayoutConstraints::width(4.0, MeasureMode::AtMost),
            &simple(),
        )
        .unwrap();
    assert_eq!(result.laid_out_text.lines().len(), 2);
    assert_close(result.width, 4.0);
}

#[test]
fn exact_width_and_height_are_taken_verbatim() {
    let engine = TextLayoutEngine::new();
    let constraints = LayoutConstraints::new(300.0, MeasureMode::Exact, 7.0, MeasureMode::Exact);
    let result = engine
        .measure(&plain("short"), &constraints, &simple())
        .unwrap();
    assert_eq!(result.width, 300.0);
    assert_eq!(result.height, 7.0);
    assert_eq!(result.laid_out_text.alignment_width(), 300.0);
}

#[test]
fn height_at_most_clamps_without_wrapping() {
    let engine = TextLayoutEngine::new();
    let constraints = LayoutConstraints::new(
        f32::INFINITY,
        MeasureMode::Unspecified,
        20.0,
        MeasureMode::AtMost,
    );
    let result = engine
        .measure(&plain("a\nb\nc"), &constraints, &simple())
        .unwrap();
    assert_eq!(result.laid_out_text.lines().len(), 3);
    assert_close(result.laid_out_text.height(), 36.0);
    assert_close(result.height, 20.0);
}

#[test]
fn separators_and_crlf_end_lines() {
    let text = plain("ab\u{2029}cd\r\nef");
    let result = TextLayoutEngine::new()
        .measure(&text, &LayoutConstraints::UNBOUNDED, &simple())
        .unwrap();
    let laid_out = &result.laid_out_text;
    assert_eq!(laid_out.lines().len(), 3);
    assert_eq!(laid_out.lines()[0].break_reason, BreakReason::Explicit);
    assert_eq!(laid_out.line_text(1), Some("cd\r\n"));
    assert_close(result.width, 12.0);
}

#[test]
fn runs_with_different_sizes_share_a_line() {
    let mut builder = AttributedText::builder();
    builder
        .push_run("ab", TextStyle::with_font_size(10.0))
        .push_run("CD", TextStyle::with_font_size(20.0));
    let result = TextLayoutEngine::new()
        .measure(&builder.build(), &LayoutConstraints::UNBOUNDED, &simple())
        .unwrap();
    let line = &result.laid_out_text.lines()[0];
    assert_close(line.width, 12.0 + 24.0);
    assert_close(line.height, 24.0);
    assert_close(result.height, 24.0);
}

#[test]
fn letter_spacing_adds_to_each_character() {
    let mut builder = AttributedText::builder();
    builder.push_run(
        "abc",
        TextStyle {
            letter_spacing: 2.0,
            ..TextStyle::with_font_size(10.0)
        },
    );
    let result = TextLayoutEngine::new()
        .measure(&builder.build(), &LayoutConstraints::UNBOUNDED, &simple())
        .unwrap();
    assert_close(result.width, 24.0);
}

#[test]
fn nested_spans_flatten_into_runs() {
    let text = "small BIG small";
    let spans = [
        (
            TextRange::new(text, 0..15).unwrap(),
            TextStyleOverride {
                letter_spacing: Some(1.0),
                ..TextStyleOverride::default()
            },
        ),
        (
            TextRange::new(text, 6..9).unwrap(),
            TextStyleOverride {
                font_size: Some(20.0),
                ..TextStyleOverride::default()
            },
        ),
    ];
    let styled = AttributedText::from_spans(
        text,
        TextStyle::with_font_size(10.0),
        &spans,
        TextStyle::merge_from,
    );
    assert_eq!(styled.runs().len(), 3);
    let result = TextLayoutEngine::new()
        .measure(&styled, &LayoutConstraints::UNBOUNDED, &simple())
        .unwrap();
    // Twelve characters at 6 + 1 and three at 12 + 1.
    assert_close(result.width, 12.0 * 7.0 + 3.0 * 13.0);
    assert_close(result.height, 24.0);
}

#[test]
fn break_strategy_is_honored() {
    let engine = TextLayoutEngine::new();
    let constraints = LayoutConstraints::width(36.0, MeasureMode::AtMost);
    let text = plain("aaa bb cc ddddd");
    let greedy = engine.measure(&text, &constraints, &simple()).unwrap();
    let optimal = engine
        .measure(
            &text,
            &constraints,
            &ParagraphStyle {
                break_strategy: BreakStrategy::HighQuality,
                ..ParagraphStyle::default()
            },
        )
        .unwrap();
    assert_eq!(greedy.laid_out_text.line_text(0), Some("aaa bb "));
    assert_eq!(optimal.laid_out_text.line_text(0), Some("aaa "));
    assert_eq!(optimal.laid_out_text.line_text(1), Some("bb cc "));
}

#[test]
fn long_paragraphs_measure_with_the_default_strategy() {
    let text = plain(&"ab ".repeat(30_000));
    let result = TextLayoutEngine::new()
        .measure(
            &text,
            &LayoutConstraints::width(100.0, MeasureMode::AtMost),
            &ParagraphStyle::default(),
        )
        .unwrap();
    assert_eq!(result.laid_out_text.lines().len(), 6_000);
    assert_close(result.width, 84.0);
}

#[test]
fn inline_elements_are_reported() {
    let engine = TextLayoutEngine::new();
    let plain_result = engine
        .measure(&plain("abc"), &LayoutConstraints::UNBOUNDED, &simple())
        .unwrap();
    assert!(!plain_result.contains_inline_elements);

    let result = engine
        .measure(
            &with_image("ab", 20.0, 10.0, "c"),
            &LayoutConstraints::UNBOUNDED,
            &simple(),
        )
        .unwrap();
    assert!(result.contains_inline_elements);
    assert_close(result.width, 38.0);
    assert_eq!(result.laid_out_text.inline_slots().len(), 1);
}

#[test]
fn unknown_inline_size_follows_the_text() {
    let text = plain("ab").with_placeholder(InlinePlaceholder::new(
        3,
        1,
        InlineKind::View { tag: 3 },
        SizeHint::UNKNOWN,
    ));
    let laid_out = TextLayoutEngine::new()
        .layout(&text, f32::INFINITY, &simple())
        .unwrap();
    let slot = &laid_out.inline_slots()[0];
    assert!(!slot.size_known);
    assert_close(slot.height, 12.0);
    assert_close(slot.width, 12.0);
    assert_close(slot.x, 6.0);
}

#[test]
fn malformed_input_fails_loudly() {
    let text = plain("ab").with_placeholder(InlinePlaceholder::new(
        3,
        9,
        InlineKind::View { tag: 3 },
        SizeHint::UNKNOWN,
    ));
    let engine = TextLayoutEngine::new();
    assert!(matches!(
        engine.layout(&text, 100.0, &simple()),
        Err(LayoutError::InvalidLayoutInput(_))
    ));
}

#[test]
fn measure_function_packs_and_notifies() {
    setup_test_logging();
    let channel = Arc::new(QueuedEventChannel::new());
    let mut measure = TextMeasureFunction::new(TextLayoutEngine::new(), channel.clone());
    let local_data = TextLocalData::new(plain("ab\ncd"));
    let props = TextProps {
        on_text_layout: true,
        ..TextProps::default()
    };

    let packed = measure
        .measure(
            42,
            &local_data,
            &props,
            100.0,
            MeasureMode::AtMost,
            f32::INFINITY,
            MeasureMode::Unspecified,
        )
        .unwrap();
    let size = MeasureOutput::from_packed(packed);
    assert_close(size.width, 12.0);
    assert_close(size.height, 24.0);

    let events = channel.drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        OutboundEvent::TextLayout { view_id, lines } => {
            assert_eq!(*view_id, 42);
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0].text, "ab\n");
            assert_eq!(lines[1].text, "cd");
            assert_close(lines[1].y, 12.0);
        }
        other => panic!("unexpected event {other:?}"),
    }
    let payload = events[0].payload();
    assert_eq!(payload["viewId"], 42);
    assert!(payload["lines"][0]["capHeight"].is_number());
}

#[test]
fn measure_function_is_quiet_without_listener() {
    let channel = Arc::new(QueuedEventChannel::new());
    let mut measure = TextMeasureFunction::new(TextLayoutEngine::new(), channel.clone());
    let local_data = TextLocalData::new(plain("abc"));
    let constraints = LayoutConstraints::width(50.0, MeasureMode::Exact);
    for _ in 0..3 {
        let size = measure
            .measure_size(1, &local_data, &TextProps::default(), &constraints)
            .unwrap();
        assert_eq!(size.width, 50.0);
    }
    assert!(channel.is_empty());
    assert_eq!(measure.cache().len(), 1);
}

#[test]
fn measure_function_reports_invalid_input() {
    let channel = Arc::new(QueuedEventChannel::new());
    let mut measure = TextMeasureFunction::new(TextLayoutEngine::new(), channel);
    let local_data = TextLocalData::new(plain("").with_placeholder(InlinePlaceholder::new(
        1,
        1,
        InlineKind::View { tag: 1 },
        SizeHint::UNKNOWN,
    )));
    let err = measure
        .measure_size(
            1,
            &local_data,
            &TextProps::default(),
            &LayoutConstraints::UNBOUNDED,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Layout(LayoutError::InvalidLayoutInput(_))));
}
