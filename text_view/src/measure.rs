// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement requests from the host layout tree.

use std::sync::Arc;

use tracing::debug;

use crate::cache::MeasureCache;
use crate::constraints::{LayoutConstraints, MeasureMode, MeasureOutput};
use crate::error::Error;
use crate::event::{EventChannel, LineMetrics, OutboundEvent};
use crate::layout::TextLayoutEngine;
use crate::props::TextProps;
use crate::view::ViewId;
use crate::StyledText;

/// Per-node data the layout tree attaches to a text node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLocalData {
    /// The text to measure.
    pub attributed_string: Arc<StyledText>,
}

impl TextLocalData {
    /// Wraps `text`.
    pub fn new(text: StyledText) -> Self {
        Self {
            attributed_string: Arc::new(text),
        }
    }
}

/// Answers measurement requests for text nodes.
///
/// Results are memoized; nodes that listen for layout events receive one after every
/// measurement.
pub struct TextMeasureFunction {
    engine: TextLayoutEngine,
    cache: MeasureCache,
    channel: Arc<dyn EventChannel>,
}

impl core::fmt::Debug for TextMeasureFunction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextMeasureFunction")
            .field("engine", &self.engine)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl TextMeasureFunction {
    /// Creates a measure function emitting layout events to `channel`.
    pub fn new(engine: TextLayoutEngine, channel: Arc<dyn EventChannel>) -> Self {
        Self {
            engine,
            cache: MeasureCache::default(),
            channel,
        }
    }

    /// Measures a node and returns its size packed as by [`MeasureOutput::to_packed`].
    pub fn measure(
        &mut self,
        view_id: ViewId,
        local_data: &TextLocalData,
        props: &TextProps,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Result<u64, Error> {
        let constraints = LayoutConstraints::new(width, width_mode, height, height_mode);
        Ok(self
            .measure_size(view_id, local_data, props, &constraints)?
            .to_packed())
    }

    /// Measures a node.
    pub fn measure_size(
        &mut self,
        view_id: ViewId,
        local_data: &TextLocalData,
        props: &TextProps,
        constraints: &LayoutConstraints,
    ) -> Result<MeasureOutput, Error> {
        let paragraph = props.paragraph_style();
        let text = &local_data.attributed_string;
        let result = self
            .cache
            .measure(&self.engine, text, constraints, &paragraph)
            .inspect_err(|err| debug!(view = view_id, %err, "measurement failed"))?;
        if props.on_text_layout {
            self.channel.dispatch(OutboundEvent::TextLayout {
                view_id,
                lines: LineMetrics::from_layout(&result.laid_out_text),
            });
        }
        Ok(MeasureOutput::new(result.width, result.height))
    }

    /// The underlying cache.
    pub fn cache(&self) -> &MeasureCache {
        &self.cache
    }
}
