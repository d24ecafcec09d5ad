// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying text updates to live views, once each and in production order.

use hashbrown::HashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::inline::InlineElementPatcher;
use crate::update::{TextUpdateTransaction, UpdateSequence};
use crate::view::{TextViewPort, ViewId};

/// What happened to a transaction handed to [`ViewUpdateApplier::apply_update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The view now shows the transaction's content.
    Applied,
    /// The view was detached; nothing changed.
    StaleTargetIgnored,
    /// This transaction, or a newer one, had already been applied to the view; it was
    /// dropped.
    Superseded,
}

/// Applies [`TextUpdateTransaction`]s to views on the UI thread.
///
/// Remembers the newest stamp applied to each view so that a stale transaction can never
/// overwrite a newer one.
#[derive(Debug, Default)]
pub struct ViewUpdateApplier {
    patcher: InlineElementPatcher,
    applied: HashMap<ViewId, UpdateSequence>,
}

impl ViewUpdateApplier {
    /// Creates an applier that has not applied anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `transaction` to `view`.
    ///
    /// Inline elements are patched before the content is assigned, and the view is refreshed
    /// afterwards. The transaction is consumed either way.
    pub fn apply_update<V: TextViewPort + ?Sized>(
        &mut self,
        view: &mut V,
        transaction: TextUpdateTransaction,
    ) -> ApplyOutcome {
        let view_id = view.view_id();
        if !view.is_attached() {
            trace!(view = view_id, "ignoring update for detached view");
            return ApplyOutcome::StaleTargetIgnored;
        }
        let sequence = transaction.sequence();
        if self
            .applied
            .get(&view_id)
            .is_some_and(|applied| *applied >= sequence)
        {
            debug!(
                view = view_id,
                sequence = sequence.get(),
                "dropping superseded update"
            );
            return ApplyOutcome::Superseded;
        }

        if transaction.contains_inline_elements() {
            self.patcher.patch(transaction.laid_out_text(), view);
        }
        view.render_state_mut().assign(&transaction);
        view.invalidate();
        self.applied.insert(view_id, sequence);
        trace!(view = view_id, sequence = sequence.get(), "applied update");
        ApplyOutcome::Applied
    }

    /// The newest stamp applied to `view_id`.
    pub fn last_applied(&self, view_id: ViewId) -> Option<UpdateSequence> {
        self.applied.get(&view_id).copied()
    }

    /// Forgets a dropped view so its id can be reused.
    pub fn forget_view(&mut self, view_id: ViewId) {
        self.applied.remove(&view_id);
    }
}

/// Transactions waiting to be applied, at most one per view.
///
/// Worker threads [`submit`](Self::submit) freshly produced updates; the UI thread drains
/// them. A newer submission replaces a pending older one, which is then never applied.
#[derive(Debug, Default)]
pub struct PendingUpdates {
    slots: Mutex<HashMap<ViewId, TextUpdateTransaction>>,
}

impl PendingUpdates {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `transaction` for `view_id`.
    ///
    /// Returns `false` if a newer transaction is already pending, in which case
    /// `transaction` is dropped.
    pub fn submit(&self, view_id: ViewId, transaction: TextUpdateTransaction) -> bool {
        let mut slots = self.slots.lock();
        match slots.get(&view_id) {
            Some(pending) if pending.sequence() > transaction.sequence() => {
                trace!(view = view_id, "dropping update older than the pending one");
                false
            }
            _ => {
                slots.insert(view_id, transaction);
                true
            }
        }
    }

    /// Takes the pending transaction for `view_id`.
    pub fn take(&self, view_id: ViewId) -> Option<TextUpdateTransaction> {
        self.slots.lock().remove(&view_id)
    }

    /// Number of views with a pending update.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Takes every pending transaction, oldest first.
    pub fn drain(&self) -> Vec<(ViewId, TextUpdateTransaction)> {
        let mut drained: Vec<_> = self.slots.lock().drain().collect();
        drained.sort_by_key(|(_, transaction)| transaction.sequence());
        drained
    }
}
