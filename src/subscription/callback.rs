// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for per-cable subscriptions.
//!
//! This module provides the core types for managing cable observers:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`NotifierRegistry`] - Per-cable-index observer lists and dispatch

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::connector::Connector;
use crate::state::changed_cables;

/// Unique identifier for a subscription.
///
/// This ID is returned when subscribing to a cable and is used to
/// unsubscribe later. IDs are unique within a connector's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback invoked with the new attach status and the connector.
pub type CableCallback = Arc<dyn Fn(bool, &Connector) + Send + Sync>;

/// Per-cable observer lists of one connector.
///
/// There is one ordered list per cable index; observers are kept in
/// registration order. Dispatch clones the callback handles of a list
/// before invoking them, so observers may subscribe or unsubscribe from
/// inside a callback and a concurrent [`clear`](Self::clear) never leaves
/// a dispatch holding a dangling reference.
pub struct NotifierRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// One observer list per cable index.
    chains: RwLock<Vec<Vec<(SubscriptionId, CableCallback)>>>,
}

impl NotifierRegistry {
    /// Creates empty observer lists for `cable_count` cables.
    #[must_use]
    pub fn new(cable_count: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            chains: RwLock::new((0..cable_count).map(|_| Vec::new()).collect()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Appends an observer to the list of cable `index`.
    ///
    /// Returns `None` if `index` has no list.
    pub fn subscribe<F>(&self, index: usize, callback: F) -> Option<SubscriptionId>
    where
        F: Fn(bool, &Connector) + Send + Sync + 'static,
    {
        let mut chains = self.chains.write();
        let chain = chains.get_mut(index)?;
        let id = self.next_id();
        chain.push((id, Arc::new(callback)));
        Some(id)
    }

    /// Removes an observer from the list of cable `index`.
    ///
    /// Returns `true` if the observer was found and removed.
    pub fn unsubscribe(&self, index: usize, id: SubscriptionId) -> bool {
        let mut chains = self.chains.write();
        let Some(chain) = chains.get_mut(index) else {
            return false;
        };
        let before = chain.len();
        chain.retain(|(sub, _)| *sub != id);
        chain.len() != before
    }

    /// Drops every observer of every cable.
    pub fn clear(&self) {
        for chain in self.chains.write().iter_mut() {
            chain.clear();
        }
    }

    /// Returns the observers of cable `index` in registration order.
    #[must_use]
    pub fn observers(&self, index: usize) -> Vec<CableCallback> {
        self.chains
            .read()
            .get(index)
            .map(|chain| chain.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default()
    }

    /// Invokes the observers of every cable that differs between `old` and `new`.
    ///
    /// Cables are visited in ascending index order; each observer of a
    /// changed cable is called exactly once with the new attach status.
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&self, connector: &Connector, old: u32, new: u32) -> usize {
        let count = self.chains.read().len();
        let mut invoked = 0;

        for change in changed_cables(old, new, count) {
            for callback in self.observers(change.index) {
                callback(change.attached, connector);
                invoked += 1;
            }
        }

        invoked
    }

    /// Returns the number of observers of cable `index`.
    #[must_use]
    pub fn observer_count(&self, index: usize) -> usize {
        self.chains.read().get(index).map_or(0, Vec::len)
    }

    /// Returns the total number of registered observers.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.chains.read().iter().map(Vec::len).sum()
    }

    /// Returns `true` if there are no registered observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl std::fmt::Debug for NotifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cables = self.chains.read().len();
        f.debug_struct("NotifierRegistry")
            .field("cables", &cables)
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
