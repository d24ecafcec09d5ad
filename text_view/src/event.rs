// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events emitted toward application callbacks.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::inline::Rect;
use crate::layout::LaidOutText;
use crate::view::ViewId;

/// Wire names of one event type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventName {
    /// Name the event is dispatched under.
    pub top_level: &'static str,
    /// Name of the callback prop the event is delivered to.
    pub registration: &'static str,
}

/// Layout of the text changed.
pub const TEXT_LAYOUT: EventName = EventName {
    top_level: "topTextLayout",
    registration: "onTextLayout",
};

/// An inline view was placed.
pub const INLINE_VIEW_LAYOUT: EventName = EventName {
    top_level: "topInlineViewLayout",
    registration: "onInlineViewLayout",
};

/// The custom selection action was chosen.
pub const CUSTOM_ACTION_ITEM_CLICKED: EventName = EventName {
    top_level: "topCustomActionItemClicked",
    registration: "onCustomActionItemClicked",
};

/// Metrics of one line, as delivered with [`OutboundEvent::TextLayout`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMetrics {
    /// Source text of the line.
    pub text: String,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Content width.
    pub width: f32,
    /// Line box height.
    pub height: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descender: f32,
    /// Height of capital letters above the baseline.
    pub cap_height: f32,
    /// Distance from the top of the line box to the baseline.
    pub ascender: f32,
    /// Height of lowercase letters above the baseline.
    pub x_height: f32,
}

impl LineMetrics {
    /// Per-line metrics of `laid_out`.
    pub fn from_layout(laid_out: &LaidOutText) -> Vec<Self> {
        laid_out
            .lines()
            .iter()
            .enumerate()
            .map(|(ix, line)| {
                let font_size = laid_out
                    .source()
                    .run_at(line.bytes.start.min(laid_out.source().len().saturating_sub(1)))
                    .map_or(crate::style::DEFAULT_FONT_SIZE, |run| {
                        run.attributes().font_size
                    });
                Self {
                    text: laid_out.line_text(ix).unwrap_or_default().to_owned(),
                    x: line.x,
                    y: line.y,
                    width: line.width,
                    height: line.height,
                    descender: line.descent,
                    cap_height: font_size * CAP_HEIGHT_EM,
                    ascender: line.ascent,
                    x_height: font_size * X_HEIGHT_EM,
                }
            })
            .collect()
    }
}

const CAP_HEIGHT_EM: f32 = 0.7;
const X_HEIGHT_EM: f32 = 0.5;

/// An event on its way to application code.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundEvent {
    /// The custom selection action was chosen over a character range.
    CustomActionItemClicked {
        /// Source view.
        view_id: ViewId,
        /// Start of the range, in characters.
        start: usize,
        /// End of the range, in characters.
        end: usize,
    },
    /// Text was laid out.
    TextLayout {
        /// Source view.
        view_id: ViewId,
        /// Line metrics, top to bottom.
        lines: Vec<LineMetrics>,
    },
    /// An inline view received its frame.
    InlineViewLayout {
        /// Source view.
        view_id: ViewId,
        /// Host tag of the inline view.
        inline_id: u64,
        /// Frame within the text layout.
        frame: Rect,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangePayload {
    view_id: ViewId,
    start: usize,
    end: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutPayload<'a> {
    view_id: ViewId,
    lines: &'a [LineMetrics],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlinePayload {
    view_id: ViewId,
    inline_id: u64,
    #[serde(flatten)]
    frame: Rect,
}

impl OutboundEvent {
    /// Wire names of this event.
    pub fn name(&self) -> EventName {
        match self {
            Self::CustomActionItemClicked { .. } => CUSTOM_ACTION_ITEM_CLICKED,
            Self::TextLayout { .. } => TEXT_LAYOUT,
            Self::InlineViewLayout { .. } => INLINE_VIEW_LAYOUT,
        }
    }

    /// Source view.
    pub fn view_id(&self) -> ViewId {
        match self {
            Self::CustomActionItemClicked { view_id, .. }
            | Self::TextLayout { view_id, .. }
            | Self::InlineViewLayout { view_id, .. } => *view_id,
        }
    }

    /// The payload delivered to the callback.
    pub fn payload(&self) -> Value {
        let payload = match self {
            Self::CustomActionItemClicked {
                view_id,
                start,
                end,
            } => serde_json::to_value(RangePayload {
                view_id: *view_id,
                start: *start,
                end: *end,
            }),
            Self::TextLayout { view_id, lines } => serde_json::to_value(LayoutPayload {
                view_id: *view_id,
                lines,
            }),
            Self::InlineViewLayout {
                view_id,
                inline_id,
                frame,
            } => serde_json::to_value(InlinePayload {
                view_id: *view_id,
                inline_id: *inline_id,
                frame: *frame,
            }),
        };
        // Plain structs of numbers and strings always serialize.
        payload.unwrap_or(Value::Null)
    }
}

/// Transport delivering events to application callbacks.
pub trait EventChannel: Send + Sync {
    /// Hands `event` to the transport.
    fn dispatch(&self, event: OutboundEvent);
}

impl<F> EventChannel for F
where
    F: Fn(OutboundEvent) + Send + Sync,
{
    fn dispatch(&self, event: OutboundEvent) {
        self(event);
    }
}

/// A channel that keeps events in memory until drained.
#[derive(Debug, Default)]
pub struct QueuedEventChannel {
    queue: Mutex<Vec<OutboundEvent>>,
}

impl QueuedEventChannel {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&self) -> Vec<OutboundEvent> {
        core::mem::take(&mut *self.queue.lock())
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Returns `true` if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl EventChannel for QueuedEventChannel {
    fn dispatch(&self, event: OutboundEvent) {
        self.queue.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_action_payload() {
        let event = OutboundEvent::CustomActionItemClicked {
            view_id: 12,
            start: 3,
            end: 7,
        };
        assert_eq!(event.name().registration, "onCustomActionItemClicked");
        assert_eq!(event.name().top_level, "topCustomActionItemClicked");
        assert_eq!(event.payload(), json!({"viewId": 12, "start": 3, "end": 7}));
    }

    #[test]
    fn inline_layout_payload_is_flat() {
        let event = OutboundEvent::InlineViewLayout {
            view_id: 4,
            inline_id: 9,
            frame: Rect {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
            },
        };
        assert_eq!(
            event.payload(),
            json!({"viewId": 4, "inlineId": 9, "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0})
        );
    }

    #[test]
    fn queued_channel_drains_in_order() {
        let channel = QueuedEventChannel::new();
        for view_id in [1, 2] {
            channel.dispatch(OutboundEvent::TextLayout {
                view_id,
                lines: Vec::new(),
            });
        }
        assert_eq!(channel.len(), 2);
        let ids: Vec<_> = channel.drain().iter().map(OutboundEvent::view_id).collect();
        assert_eq!(ids, [1, 2]);
        assert!(channel.is_empty());
    }
}
