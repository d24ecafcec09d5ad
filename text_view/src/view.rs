// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow capability set the core needs from a live text view.

use crate::inline::{ContainerMetrics, ResolvedInline};
use crate::layout::{LaidOutText, LayoutId};
use crate::style::{BreakStrategy, JustificationMode, TextAlign};
use crate::update::{Padding, TextUpdateTransaction, UpdateSequence};

/// Host tag of a view.
pub type ViewId = i32;

/// A live, platform-owned text view.
///
/// The core reads selection and focus state through this trait and writes only the
/// [`RenderState`]. All calls happen on the UI thread.
pub trait TextViewPort {
    /// Host tag of the view.
    fn view_id(&self) -> ViewId;

    /// Returns `false` once the view has been detached or destroyed.
    fn is_attached(&self) -> bool;

    /// Returns `true` while the view holds input focus.
    fn is_focused(&self) -> bool;

    /// Current selection as `(anchor, cursor)` in characters. Negative values mean there is
    /// no selection.
    fn selection_bounds(&self) -> (i32, i32);

    /// Length of the displayed text, in characters.
    fn text_len(&self) -> usize;

    /// Sizing context for inline elements.
    fn container_metrics(&self) -> ContainerMetrics;

    /// The view's render state.
    fn render_state_mut(&mut self) -> &mut RenderState;

    /// Drops cached drawing state and schedules a redraw.
    fn invalidate(&mut self);
}

/// What a view currently renders.
///
/// Materialized from the last applied [`TextUpdateTransaction`]; the transaction itself is
/// not retained.
#[derive(Clone, Debug)]
pub struct RenderState {
    text: Option<LaidOutText>,
    padding: Padding,
    text_align: TextAlign,
    break_strategy: BreakStrategy,
    justification_mode: JustificationMode,
    generation: i32,
    js_responsible: bool,
    sequence: Option<UpdateSequence>,
    inline_owner: Option<LayoutId>,
    inline_elements: Vec<ResolvedInline>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            text: None,
            padding: Padding::default(),
            text_align: TextAlign::default(),
            break_strategy: BreakStrategy::default(),
            justification_mode: JustificationMode::default(),
            generation: -1,
            js_responsible: false,
            sequence: None,
            inline_owner: None,
            inline_elements: Vec::new(),
        }
    }
}

impl RenderState {
    /// The displayed text.
    pub fn text(&self) -> Option<&LaidOutText> {
        self.text.as_ref()
    }

    /// Content padding.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Line alignment.
    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// Break strategy the text was laid out with.
    pub fn break_strategy(&self) -> BreakStrategy {
        self.break_strategy
    }

    /// Justification mode.
    pub fn justification_mode(&self) -> JustificationMode {
        self.justification_mode
    }

    /// Generation marker of the applied update, `-1` if none was given.
    pub fn generation(&self) -> i32 {
        self.generation
    }

    /// Whether script code is responsible for the text content.
    pub fn js_responsible(&self) -> bool {
        self.js_responsible
    }

    /// Production stamp of the applied update.
    pub fn sequence(&self) -> Option<UpdateSequence> {
        self.sequence
    }

    /// Resolved inline elements of the displayed text.
    pub fn inline_elements(&self) -> &[ResolvedInline] {
        &self.inline_elements
    }

    /// Replaces all inline elements with `elements`, resolved for the text `owner`.
    pub fn attach_inline_elements(&mut self, owner: LayoutId, elements: Vec<ResolvedInline>) {
        self.inline_owner = Some(owner);
        self.inline_elements = elements;
    }

    /// Forgets everything, as when a view is recycled.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn assign(&mut self, transaction: &TextUpdateTransaction) {
        let text = transaction.laid_out_text();
        if self.inline_owner != Some(text.id()) {
            self.inline_owner = None;
            self.inline_elements.clear();
        }
        self.text = Some(text.clone());
        self.padding = transaction.padding();
        self.text_align = transaction.text_align();
        self.break_strategy = transaction.break_strategy();
        self.justification_mode = transaction.justification_mode();
        self.generation = transaction.generation();
        self.js_responsible = transaction.js_responsible();
        self.sequence = Some(transaction.sequence());
    }
}

/// A text view without a platform behind it.
///
/// Keeps focus, selection and attachment as plain values. Useful for offscreen rendering
/// and for driving the update and selection protocols in tests.
#[derive(Clone, Debug)]
pub struct HeadlessTextView {
    id: ViewId,
    attached: bool,
    focused: bool,
    selection: (i32, i32),
    metrics: ContainerMetrics,
    state: RenderState,
    invalidations: usize,
}

impl HeadlessTextView {
    /// An attached, unfocused view with no selection.
    pub fn new(id: ViewId) -> Self {
        Self {
            id,
            attached: true,
            focused: false,
            selection: (-1, -1),
            metrics: ContainerMetrics::default(),
            state: RenderState::default(),
            invalidations: 0,
        }
    }

    /// Sets the sizing context reported to the inline patcher.
    pub fn with_container_metrics(mut self, metrics: ContainerMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Marks the view detached; later updates are ignored.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Gives or takes input focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Sets the selection anchor and cursor, in characters.
    pub fn set_selection(&mut self, anchor: i32, cursor: i32) {
        self.selection = (anchor, cursor);
    }

    /// The current render state.
    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// Number of refreshes requested so far.
    pub fn invalidation_count(&self) -> usize {
        self.invalidations
    }
}

impl TextViewPort for HeadlessTextView {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn selection_bounds(&self) -> (i32, i32) {
        self.selection
    }

    fn text_len(&self) -> usize {
        self.state
            .text()
            .map_or(0, |text| text.source().char_len())
    }

    fn container_metrics(&self) -> ContainerMetrics {
        self.metrics
    }

    fn render_state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}
