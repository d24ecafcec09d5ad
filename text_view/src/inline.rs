// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline elements embedded in text and their resolution against a target view.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::layout::{InlineSlot, LaidOutText};
use crate::view::TextViewPort;

/// What an inline placeholder stands for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InlineKind {
    /// An image loaded from `source`.
    Image {
        /// Image URI.
        source: Arc<str>,
    },
    /// A native child view laid out by the host.
    View {
        /// Host tag of the child view.
        tag: u64,
    },
}

/// An axis-aligned rectangle in layout units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Sizing context provided by an attached view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContainerMetrics {
    /// Content width of the container, `f32::INFINITY` when unknown.
    pub width: f32,
    /// Physical pixels per layout unit.
    pub density: f32,
}

impl Default for ContainerMetrics {
    fn default() -> Self {
        Self {
            width: f32::INFINITY,
            density: 1.0,
        }
    }
}

impl ContainerMetrics {
    fn density(self) -> f32 {
        if self.density.is_finite() && self.density > 0.0 {
            self.density
        } else {
            1.0
        }
    }
}

/// What a resolved inline element renders.
#[derive(Clone, Debug, PartialEq)]
pub enum InlineRenderable {
    /// An image decoded at the given pixel size.
    Image {
        /// Image URI.
        source: Arc<str>,
        /// Decoded width in physical pixels.
        pixel_width: u32,
        /// Decoded height in physical pixels.
        pixel_height: u32,
    },
    /// A child view positioned by the host.
    View {
        /// Host tag of the child view.
        tag: u64,
    },
}

/// An inline element ready to be drawn by a particular view.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedInline {
    /// Placeholder id.
    pub id: u64,
    /// Frame within the text layout.
    pub frame: Rect,
    /// What to draw in the frame.
    pub renderable: InlineRenderable,
}

/// Materializes inline placeholders for a concrete view.
#[derive(Clone, Debug, Default)]
pub struct InlineElementPatcher;

impl InlineElementPatcher {
    /// Resolves every placed inline element of `laid_out` against `container`.
    pub fn resolve(
        &self,
        laid_out: &LaidOutText,
        container: ContainerMetrics,
    ) -> Vec<ResolvedInline> {
        let density = container.density();
        laid_out
            .inline_slots()
            .iter()
            .map(|slot| resolve_slot(slot, container, density))
            .collect()
    }

    /// Replaces the inline elements held by `target` with those of `laid_out`.
    ///
    /// Does nothing when the text has no inline elements. Patching the same text twice
    /// leaves the same state as patching it once.
    pub fn patch<V: TextViewPort + ?Sized>(&self, laid_out: &LaidOutText, target: &mut V) {
        if !laid_out.contains_inline_elements() {
            return;
        }
        let resolved = self.resolve(laid_out, target.container_metrics());
        trace!(
            view = target.view_id(),
            count = resolved.len(),
            "patched inline elements"
        );
        target
            .render_state_mut()
            .attach_inline_elements(laid_out.id(), resolved);
    }
}

fn resolve_slot(slot: &InlineSlot, container: ContainerMetrics, density: f32) -> ResolvedInline {
    let mut width = slot.width;
    if container.width.is_finite() && container.width > 0.0 {
        width = width.min(container.width);
    }
    let frame = Rect {
        x: slot.x,
        y: slot.y,
        width,
        height: slot.height,
    };
    let renderable = match &slot.kind {
        InlineKind::Image { source } => InlineRenderable::Image {
            source: source.clone(),
            pixel_width: to_pixels(frame.width, density),
            pixel_height: to_pixels(frame.height, density),
        },
        InlineKind::View { tag } => InlineRenderable::View { tag: *tag },
    };
    ResolvedInline {
        id: slot.id,
        frame,
        renderable,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is rounded and clamped to the u32 range first."
)]
fn to_pixels(value: f32, density: f32) -> u32 {
    (value * density).round().clamp(0.0, u32::MAX as f32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_sizes_scale_with_density() {
        assert_eq!(to_pixels(10.0, 2.5), 25);
        assert_eq!(to_pixels(-3.0, 2.0), 0);
        assert_eq!(to_pixels(f32::NAN, 2.0), 0);
    }

    #[test]
    fn invalid_density_falls_back_to_one() {
        let metrics = ContainerMetrics {
            width: 100.0,
            density: 0.0,
        };
        assert_eq!(metrics.density(), 1.0);
    }
}
