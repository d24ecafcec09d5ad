// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The custom selection action protocol.
//!
//! A platform selection menu moves through a fixed lifecycle. The controller adds one custom
//! item to the menu and, when the user picks it, reports the selected character range
//! exactly once.

use tracing::{debug, trace};

use crate::event::{EventChannel, OutboundEvent};
use crate::view::TextViewPort;

/// Item id reserved for the custom action.
pub const CUSTOM_ACTION_ITEM_ID: i32 = 0;

/// A platform selection menu, as seen by the controller.
pub trait ActionMenu {
    /// Adds an item to the menu.
    fn add_item(&mut self, group: i32, item_id: i32, order: i32, title: &str);

    /// Closes the menu.
    fn finish(&mut self);
}

/// A validated character range of a text view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionRange {
    /// Start, in characters.
    pub start: usize,
    /// End, in characters; never before `start`.
    pub end: usize,
}

impl SelectionRange {
    /// The range an action applies to.
    ///
    /// A focused view uses its selection, ordered and clamped to `0..=text_len`. Without
    /// focus the whole text is selected.
    pub fn from_view_state(focused: bool, anchor: i32, cursor: i32, text_len: usize) -> Self {
        if !focused {
            return Self {
                start: 0,
                end: text_len,
            };
        }
        let clamp = |offset: i32| usize::try_from(offset.max(0)).map_or(0, |v| v.min(text_len));
        Self {
            start: clamp(anchor.min(cursor)),
            end: clamp(anchor.max(cursor)),
        }
    }

    /// Length of the range in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range is collapsed.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lifecycle state of the selection menu.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    /// No menu.
    #[default]
    Idle,
    /// The platform is preparing the menu.
    MenuPreparing,
    /// The menu is showing with the custom item.
    MenuActive,
    /// The custom item was chosen and its event emitted.
    ActionInvoked,
    /// The menu was destroyed. The next preparation starts over.
    Closed,
}

/// Result of a menu item click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The custom action fired for this range.
    Emitted(SelectionRange),
    /// The item is not the custom action; the platform handles it.
    UnrecognizedAction,
    /// The custom action already fired for the current menu, or no menu is active.
    AlreadyInvoked,
    /// The view has no custom action configured.
    Disabled,
}

/// Drives the selection menu lifecycle for one view.
#[derive(Clone, Debug)]
pub struct SelectionActionController {
    label: String,
    state: MenuState,
}

impl SelectionActionController {
    /// Creates a controller for the action `label`.
    ///
    /// Returns `None` when the label is empty: the feature is then disabled for the view.
    pub fn new(label: &str) -> Option<Self> {
        (!label.is_empty()).then(|| Self {
            label: label.to_owned(),
            state: MenuState::Idle,
        })
    }

    /// The action label shown in the menu.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// The platform is about to show or refresh the menu. Always allowed.
    pub fn on_prepare_menu(&mut self) -> bool {
        if matches!(self.state, MenuState::Idle | MenuState::Closed) {
            self.transition(MenuState::MenuPreparing);
        }
        true
    }

    /// The platform creates the menu: the custom item is added with the reserved id.
    ///
    /// Creating the menu again before it was destroyed leaves both the menu and the
    /// lifecycle state untouched.
    pub fn on_create_menu<M: ActionMenu + ?Sized>(&mut self, menu: &mut M) -> bool {
        match self.state {
            MenuState::Idle | MenuState::MenuPreparing | MenuState::Closed => {
                menu.add_item(0, CUSTOM_ACTION_ITEM_ID, 0, &self.label);
                self.transition(MenuState::MenuActive);
            }
            MenuState::MenuActive | MenuState::ActionInvoked => {
                trace!(state = ?self.state, "selection menu already created");
            }
        }
        true
    }

    /// The user picked `item_id`.
    ///
    /// The reserved id emits one [`OutboundEvent::CustomActionItemClicked`] through
    /// `channel` and closes the menu. Any other id is left to the platform.
    pub fn on_action_item_clicked<V, C, M>(
        &mut self,
        item_id: i32,
        view: &V,
        channel: &C,
        menu: &mut M,
    ) -> ActionOutcome
    where
        V: TextViewPort + ?Sized,
        C: EventChannel + ?Sized,
        M: ActionMenu + ?Sized,
    {
        if item_id != CUSTOM_ACTION_ITEM_ID {
            trace!(item_id, "ignoring unrecognized menu item");
            return ActionOutcome::UnrecognizedAction;
        }
        if self.state != MenuState::MenuActive {
            debug!(state = ?self.state, "custom action already handled for this menu");
            return ActionOutcome::AlreadyInvoked;
        }

        let (anchor, cursor) = view.selection_bounds();
        let range =
            SelectionRange::from_view_state(view.is_focused(), anchor, cursor, view.text_len());
        channel.dispatch(OutboundEvent::CustomActionItemClicked {
            view_id: view.view_id(),
            start: range.start,
            end: range.end,
        });
        self.transition(MenuState::ActionInvoked);
        menu.finish();
        ActionOutcome::Emitted(range)
    }

    /// The menu was destroyed. Emits nothing.
    pub fn on_destroy_menu(&mut self) {
        self.transition(MenuState::Closed);
    }

    fn transition(&mut self, to: MenuState) {
        trace!(from = ?self.state, ?to, "selection menu transition");
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfocused_selects_everything() {
        assert_eq!(
            SelectionRange::from_view_state(false, 2, 5, 10),
            SelectionRange { start: 0, end: 10 }
        );
    }

    #[test]
    fn focused_orders_and_clamps() {
        assert_eq!(
            SelectionRange::from_view_state(true, 7, 3, 10),
            SelectionRange { start: 3, end: 7 }
        );
        assert_eq!(
            SelectionRange::from_view_state(true, -1, -1, 10),
            SelectionRange { start: 0, end: 0 }
        );
        assert_eq!(
            SelectionRange::from_view_state(true, 4, 40, 10),
            SelectionRange { start: 4, end: 10 }
        );
    }

    #[test]
    fn empty_label_disables() {
        assert!(SelectionActionController::new("").is_none());
        let controller = SelectionActionController::new("Define").unwrap();
        assert_eq!(controller.label(), "Define");
        assert_eq!(controller.state(), MenuState::Idle);
    }
}
