// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text view manager: the host-facing surface tying layout, updates and selection
//! actions together.

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::applier::{ApplyOutcome, ViewUpdateApplier};
use crate::error::Error;
use crate::event::{
    EventChannel, EventName, OutboundEvent, CUSTOM_ACTION_ITEM_CLICKED, INLINE_VIEW_LAYOUT,
    TEXT_LAYOUT,
};
use crate::inline::{InlineKind, Rect};
use crate::layout::TextLayoutEngine;
use crate::measure::TextMeasureFunction;
use crate::props::TextProps;
use crate::selection::{ActionMenu, ActionOutcome, SelectionActionController};
use crate::update::{TextUpdateTransaction, UpdateSequencer};
use crate::view::{TextViewPort, ViewId};
use crate::StyledText;

/// Class name of anchor text views.
pub const REACT_CLASS: &str = "RCTText";

/// Class name of nested, virtual text nodes.
pub const VIRTUAL_TEXT_CLASS: &str = "RCTVirtualText";

/// Prop names understood by [`TextProps`].
pub const VALID_ATTRIBUTES: &[&str] = &[
    "customActionItem",
    "ellipsizeMode",
    "generation",
    "jsResponsible",
    "justificationMode",
    "numberOfLines",
    "onTextLayout",
    "paddingBottom",
    "paddingEnd",
    "paddingStart",
    "paddingTop",
    "textAlign",
    "textBreakStrategy",
];

/// Manages the text views of one host surface.
pub struct TextViewManager {
    engine: TextLayoutEngine,
    sequencer: UpdateSequencer,
    applier: ViewUpdateApplier,
    controllers: HashMap<ViewId, SelectionActionController>,
    channel: Arc<dyn EventChannel>,
}

impl core::fmt::Debug for TextViewManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextViewManager")
            .field("sequencer", &self.sequencer)
            .field("applier", &self.applier)
            .field("controllers", &self.controllers)
            .finish_non_exhaustive()
    }
}

impl TextViewManager {
    /// Creates a manager emitting events to `channel`.
    pub fn new(channel: Arc<dyn EventChannel>) -> Self {
        Self {
            engine: TextLayoutEngine::new(),
            sequencer: UpdateSequencer::new(),
            applier: ViewUpdateApplier::new(),
            controllers: HashMap::new(),
            channel,
        }
    }

    /// Class name of the managed views.
    pub fn name(&self) -> &'static str {
        REACT_CLASS
    }

    /// Events delivered directly to the view that produced them.
    pub fn exported_direct_event_types(&self) -> [EventName; 3] {
        [CUSTOM_ACTION_ITEM_CLICKED, TEXT_LAYOUT, INLINE_VIEW_LAYOUT]
    }

    /// A measure function sharing this manager's engine and event channel.
    pub fn measure_function(&self) -> TextMeasureFunction {
        TextMeasureFunction::new(self.engine, Arc::clone(&self.channel))
    }

    /// Applies the props a view manager reacts to directly.
    pub fn update_props(&mut self, view_id: ViewId, props: &TextProps) {
        self.set_custom_action_item(view_id, props.custom_action_label());
    }

    /// Enables the custom selection action with `label`, or disables it when `label` is
    /// absent or empty.
    pub fn set_custom_action_item(&mut self, view_id: ViewId, label: Option<&str>) {
        match label.and_then(SelectionActionController::new) {
            Some(controller) => {
                debug!(view = view_id, label = controller.label(), "custom action enabled");
                self.controllers.insert(view_id, controller);
            }
            None => {
                if self.controllers.remove(&view_id).is_some() {
                    debug!(view = view_id, "custom action disabled");
                }
            }
        }
    }

    /// Returns `true` if `view_id` offers the custom selection action.
    pub fn has_custom_action(&self, view_id: ViewId) -> bool {
        self.controllers.contains_key(&view_id)
    }

    /// The selection controller of `view_id`, if the action is enabled.
    pub fn controller(&self, view_id: ViewId) -> Option<&SelectionActionController> {
        self.controllers.get(&view_id)
    }

    /// Lays out `text` for a view of `width` and packages it as an update.
    ///
    /// Horizontal padding narrows the layout width. Every inline view gets an
    /// [`OutboundEvent::InlineViewLayout`] with its frame in view coordinates.
    pub fn create_update(
        &self,
        view_id: ViewId,
        text: &StyledText,
        props: &TextProps,
        width: f32,
    ) -> Result<TextUpdateTransaction, Error> {
        let padding = props.padding();
        let content_width = width - padding.start - padding.end;
        let laid_out = self
            .engine
            .layout(text, content_width, &props.paragraph_style())?;
        for slot in laid_out.inline_slots() {
            if let InlineKind::View { tag } = slot.kind {
                self.channel.dispatch(OutboundEvent::InlineViewLayout {
                    view_id,
                    inline_id: tag,
                    frame: Rect {
                        x: slot.x + padding.start,
                        y: slot.y + padding.top,
                        width: slot.width,
                        height: slot.height,
                    },
                });
            }
        }
        let transaction =
            TextUpdateTransaction::from_props(laid_out, props, self.sequencer.issue());
        trace!(
            view = view_id,
            sequence = transaction.sequence().get(),
            "created text update"
        );
        Ok(transaction)
    }

    /// Applies an update produced by [`TextViewManager::create_update`].
    pub fn update_extra_data<V: TextViewPort + ?Sized>(
        &mut self,
        view: &mut V,
        transaction: TextUpdateTransaction,
    ) -> ApplyOutcome {
        self.applier.apply_update(view, transaction)
    }

    /// Refreshes `view` after a batch of prop changes.
    pub fn on_after_update_transaction<V: TextViewPort + ?Sized>(&self, view: &mut V) {
        if view.is_attached() {
            view.invalidate();
        }
    }

    /// The platform prepares the selection menu of `view_id`.
    pub fn on_prepare_menu(&mut self, view_id: ViewId) -> bool {
        if let Some(controller) = self.controllers.get_mut(&view_id) {
            controller.on_prepare_menu();
        }
        true
    }

    /// The platform creates the selection menu of `view_id`.
    ///
    /// Returns `false`, leaving the menu untouched, when the view has no custom action.
    pub fn on_create_menu<M: ActionMenu + ?Sized>(
        &mut self,
        view_id: ViewId,
        menu: &mut M,
    ) -> bool {
        self.controllers
            .get_mut(&view_id)
            .is_some_and(|controller| controller.on_create_menu(menu))
    }

    /// The user picked `item_id` in the selection menu of `view`.
    pub fn on_action_item_clicked<V, M>(
        &mut self,
        view: &V,
        item_id: i32,
        menu: &mut M,
    ) -> ActionOutcome
    where
        V: TextViewPort + ?Sized,
        M: ActionMenu + ?Sized,
    {
        match self.controllers.get_mut(&view.view_id()) {
            Some(controller) => {
                controller.on_action_item_clicked(item_id, view, &*self.channel, menu)
            }
            None => ActionOutcome::Disabled,
        }
    }

    /// The selection menu of `view_id` was destroyed.
    pub fn on_destroy_menu(&mut self, view_id: ViewId) {
        if let Some(controller) = self.controllers.get_mut(&view_id) {
            controller.on_destroy_menu();
        }
    }

    /// Forgets all state of a dropped view.
    pub fn drop_view(&mut self, view_id: ViewId) {
        self.controllers.remove(&view_id);
        self.applier.forget_view(view_id);
    }
}
