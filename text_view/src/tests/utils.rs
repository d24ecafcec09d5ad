// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Once;

use attributed_text::{AttributedText, SizeHint};

use crate::{ActionMenu, InlineKind, StyledText, TextStyle};

pub(crate) fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Plain text at font size 10, where every column advances 6.
pub(crate) fn plain(text: &str) -> StyledText {
    let mut builder = AttributedText::builder();
    builder.push_run(text, TextStyle::with_font_size(10.0));
    builder.build()
}

/// `before`, an image of `width` × `height`, then `after`.
pub(crate) fn with_image(before: &str, width: f32, height: f32, after: &str) -> StyledText {
    let mut builder = AttributedText::builder();
    builder
        .push_run(before, TextStyle::with_font_size(10.0))
        .push_placeholder(
            1,
            InlineKind::Image {
                source: "asset://icon.png".into(),
            },
            SizeHint::new(width, height),
        )
        .push_run(after, TextStyle::with_font_size(10.0));
    builder.build()
}

/// `before`, an inline view with `tag`, then `after`.
pub(crate) fn with_view(before: &str, tag: u64, after: &str) -> StyledText {
    let mut builder = AttributedText::builder();
    builder
        .push_run(before, TextStyle::with_font_size(10.0))
        .push_placeholder(tag, InlineKind::View { tag }, SizeHint::new(16.0, 16.0))
        .push_run(after, TextStyle::with_font_size(10.0));
    builder.build()
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

/// A selection menu recording what the controller does to it.
#[derive(Debug, Default)]
pub(crate) struct RecordingMenu {
    pub(crate) items: Vec<(i32, i32, i32, String)>,
    pub(crate) finished: usize,
}

impl ActionMenu for RecordingMenu {
    fn add_item(&mut self, group: i32, item_id: i32, order: i32, title: &str) {
        self.items.push((group, item_id, order, title.to_owned()));
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}
