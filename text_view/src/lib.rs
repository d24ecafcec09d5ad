// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text View measures attributed text, turns the result into immutable update
//! transactions, applies them to live text views, and bridges the text selection menu to
//! an event stream.
//!
//! The pieces, leaves first:
//!
//! - [`TextLayoutEngine`] lays out a [`StyledText`] under [`LayoutConstraints`]. It is pure
//!   and deterministic; [`MeasureCache`] memoizes it.
//! - [`InlineElementPatcher`] resolves inline placeholders against a concrete view.
//! - [`TextUpdateTransaction`] bundles a laid-out text with paragraph directives.
//! - [`ViewUpdateApplier`] applies transactions to views exactly once, in order.
//! - [`SelectionActionController`] runs the custom selection action menu lifecycle and
//!   emits [`OutboundEvent`]s through an [`EventChannel`].
//! - [`TextViewManager`] and [`TextMeasureFunction`] are the host-facing entry points.
//!
//! Views are reached only through the [`TextViewPort`] trait.
//!
//! ## Example
//!
//! ```
//! use attributed_text::AttributedText;
//! use text_view::{LayoutConstraints, MeasureMode, ParagraphStyle, TextLayoutEngine, TextStyle};
//!
//! let mut builder = AttributedText::builder();
//! builder.push_run("Hello, world", TextStyle::default());
//! let text = builder.build();
//!
//! let engine = TextLayoutEngine::new();
//! let constraints = LayoutConstraints::width(200.0, MeasureMode::Exact);
//! let result = engine
//!     .measure(&text, &constraints, &ParagraphStyle::default())
//!     .unwrap();
//! assert_eq!(result.width, 200.0);
//! assert_eq!(result.laid_out_text.lines().len(), 1);
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod applier;
mod cache;
mod constraints;
mod error;
mod event;
mod inline;
mod layout;
mod manager;
mod measure;
mod props;
mod selection;
mod style;
mod update;
mod view;

#[cfg(test)]
mod tests;

pub use applier::{ApplyOutcome, PendingUpdates, ViewUpdateApplier};
pub use cache::MeasureCache;
pub use constraints::{LayoutConstraints, MeasureMode, MeasureOutput};
pub use error::{Error, LayoutError};
pub use event::{
    EventChannel, EventName, LineMetrics, OutboundEvent, QueuedEventChannel,
    CUSTOM_ACTION_ITEM_CLICKED, INLINE_VIEW_LAYOUT, TEXT_LAYOUT,
};
pub use inline::{
    ContainerMetrics, InlineElementPatcher, InlineKind, InlineRenderable, Rect, ResolvedInline,
};
pub use layout::{
    fingerprint, BreakReason, InlineSlot, LaidOutText, LayoutId, LayoutResult, Line,
    TextLayoutEngine,
};
pub use manager::{TextViewManager, REACT_CLASS, VALID_ATTRIBUTES, VIRTUAL_TEXT_CLASS};
pub use measure::{TextLocalData, TextMeasureFunction};
pub use props::TextProps;
pub use selection::{
    ActionMenu, ActionOutcome, MenuState, SelectionActionController, SelectionRange,
    CUSTOM_ACTION_ITEM_ID,
};
pub use style::{
    BreakStrategy, EllipsizeMode, FontWeight, JustificationMode, ParagraphStyle, TextAlign,
    TextStyle, TextStyleOverride, DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT_SCALE,
};
pub use update::{Padding, TextUpdateTransaction, UpdateSequence, UpdateSequencer};
pub use view::{HeadlessTextView, RenderState, TextViewPort, ViewId};

/// Attributed text as measured by this crate: runs styled with [`TextStyle`], placeholders
/// standing for [`InlineKind`] elements.
pub type StyledText = attributed_text::AttributedText<TextStyle, InlineKind>;
