// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connector devices and their state store.
//!
//! A [`Connector`] owns a fixed list of cables, a 32-bit attach bitmask, an
//! optional mutual-exclusion table, per-cable observer lists and an
//! optional external notification sink.
//!
//! # Update pipeline
//!
//! Every update goes through the same steps:
//!
//! 1. Under the connector's state lock the candidate
//!    `(state & !mask) | (bits & mask)` is computed. A candidate equal to the
//!    current state is a silent no-op.
//! 2. During a suspend window with delivery disabled the candidate is
//!    buffered and nothing else happens.
//! 3. Otherwise the exclusion table is checked and the candidate committed.
//! 4. With the lock released, observers of every flipped cable are called
//!    and the sink receives one post-commit snapshot.
//!
//! # Examples
//!
//! ```
//! use extcon_lib::{CableId, ConnectorBuilder, Error};
//!
//! # fn main() -> extcon_lib::Result<()> {
//! let connector = ConnectorBuilder::new("muic", [CableId::USB, CableId::DISP_HDMI])
//!     .with_exclusive_group([CableId::USB, CableId::DISP_HDMI])
//!     .build()?;
//!
//! connector.set_cable_state(CableId::USB, true)?;
//! assert_eq!(connector.state(), 0b01);
//!
//! let err = connector.set_cable_state(CableId::DISP_HDMI, true).unwrap_err();
//! assert!(matches!(err, Error::ExclusivityViolation { group: 1, .. }));
//! assert_eq!(connector.state(), 0b01);
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod power;

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::event::{NotificationSink, SinkEvent};
use crate::state::{ConnectorState, ExclusionTable, Lifecycle, StateSnapshot, UpdateOutcome};
use crate::subscription::{NotifierRegistry, SubscriptionId};
use crate::types::{ALL_BITS, CableId, CableSet, HandleId};

pub use builder::ConnectorBuilder;
pub use config::ConnectorConfig;
pub use power::PowerEvent;

/// A connector device tracking the attach state of its cables.
pub struct Connector {
    /// Unique name within a registry.
    name: String,
    /// Supported cables in bit order.
    cables: CableSet,
    /// State, exclusion table, suspend bookkeeping and lifecycle.
    inner: Mutex<ConnectorState>,
    /// Per-cable observers.
    notifiers: NotifierRegistry,
    /// External notification sink.
    sink: Option<Arc<dyn NotificationSink>>,
    /// External handle used for handle-based lookup.
    parent: Option<HandleId>,
    /// Device number assigned at registration.
    dev_name: OnceLock<String>,
}

impl Connector {
    fn new(
        name: String,
        cables: CableSet,
        exclusion: ExclusionTable,
        deliver_during_suspend: bool,
        sink: Option<Arc<dyn NotificationSink>>,
        parent: Option<HandleId>,
    ) -> Self {
        let notifiers = NotifierRegistry::new(cables.len());
        Self {
            name,
            cables,
            inner: Mutex::new(ConnectorState::new(exclusion, deliver_during_suspend)),
            notifiers,
            sink,
            parent,
            dev_name: OnceLock::new(),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the connector name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device number (`extcon<N>`) assigned at first registration.
    #[must_use]
    pub fn dev_name(&self) -> Option<&str> {
        self.dev_name.get().map(String::as_str)
    }

    /// Returns the supported cables.
    #[must_use]
    pub fn cables(&self) -> &CableSet {
        &self.cables
    }

    /// Returns the external handle this connector is bound to.
    #[must_use]
    pub fn parent(&self) -> Option<HandleId> {
        self.parent
    }

    /// Returns the mutual-exclusion group masks.
    ///
    /// Empty once the connector has been unregistered.
    #[must_use]
    pub fn mutually_exclusive(&self) -> Vec<u32> {
        self.inner.lock().exclusion().groups().to_vec()
    }

    /// Returns the lifecycle stage.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lock().lifecycle()
    }

    /// Resolves a cable to its bit index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the cable is not supported.
    pub fn resolve_index(&self, cable: CableId) -> Result<usize> {
        self.cables.index_of(cable).ok_or_else(|| Error::Unsupported {
            connector: self.name.clone(),
            cable,
        })
    }

    // =========================================================================
    // Query / update
    // =========================================================================

    /// Returns the committed state bitmask.
    #[must_use]
    pub fn state(&self) -> u32 {
        self.inner.lock().state()
    }

    /// Returns a snapshot of the committed state.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        let state = self.state();
        self.snapshot_of(state)
    }

    fn snapshot_of(&self, state: u32) -> StateSnapshot {
        StateSnapshot::new(
            self.name.clone(),
            self.dev_name().map(str::to_string),
            &self.cables,
            state,
        )
    }

    /// Updates the bits selected by `mask` to the values in `bits`.
    ///
    /// Bits outside the supported cables are ignored. Requesting the current
    /// state is a no-op that notifies nobody. While suspended with delivery
    /// disabled, the update applies on top of earlier buffered changes and
    /// resume commits their combined result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExclusivityViolation`] if the resulting state would
    /// attach two cables of one exclusion group; the state is left
    /// unchanged. Returns [`Error::Unregistered`] after unregistration.
    pub fn update_state(&self, mask: u32, bits: u32) -> Result<()> {
        let outcome = {
            let mut inner = self.inner.lock();
            inner.ensure_live(&self.name)?;
            inner.update(mask & self.cables.valid_bits(), bits)
        };
        self.finish(outcome, mask, bits)
    }

    /// Replaces the whole state.
    ///
    /// # Errors
    ///
    /// Same as [`update_state`](Self::update_state).
    pub fn set_state(&self, state: u32) -> Result<()> {
        self.update_state(ALL_BITS, state)
    }

    /// Returns the attach status of one cable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the cable is not supported.
    pub fn cable_state(&self, cable: CableId) -> Result<bool> {
        let index = self.checked_index(cable)?;
        Ok(self.state() & (1 << index) != 0)
    }

    /// Attaches or detaches one cable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the cable is not supported, and
    /// the errors of [`update_state`](Self::update_state).
    pub fn set_cable_state(&self, cable: CableId, attached: bool) -> Result<()> {
        let index = self.checked_index(cable)?;
        let bit = 1u32 << index;
        self.update_state(bit, if attached { bit } else { 0 })
    }

    fn checked_index(&self, cable: CableId) -> Result<usize> {
        let index = self.resolve_index(cable)?;
        if index >= self.cables.len() {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.cables.len(),
            });
        }
        Ok(index)
    }

    /// Runs the unlocked part of an update: logging, dispatch and sink.
    fn finish(&self, outcome: Result<UpdateOutcome>, mask: u32, bits: u32) -> Result<()> {
        match outcome {
            Ok(UpdateOutcome::Unchanged) => {}
            Ok(UpdateOutcome::Deferred { pending }) => {
                tracing::info!(
                    connector = %self.name,
                    mask = format_args!("{mask:#010x}"),
                    bits = format_args!("{bits:#010x}"),
                    pending = format_args!("{pending:#010x}"),
                    "suspended, deferring state change until resume"
                );
            }
            Ok(UpdateOutcome::Committed { old, new }) => self.deliver(old, new),
            Err(err) => {
                tracing::warn!(connector = %self.name, error = %err, "state change rejected");
                return Err(err);
            }
        }
        Ok(())
    }

    fn deliver(&self, old: u32, new: u32) {
        tracing::debug!(
            connector = %self.name,
            old = format_args!("{old:#010x}"),
            new = format_args!("{new:#010x}"),
            "state committed"
        );

        let invoked = self.notifiers.dispatch(self, old, new);
        tracing::trace!(connector = %self.name, invoked, "observers notified");

        if let Some(sink) = &self.sink {
            sink.notify(&SinkEvent::from_snapshot(self.snapshot_of(new)));
        }
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Subscribes to attach/detach edges of one cable.
    ///
    /// The callback receives the new attach status and this connector. It
    /// is called synchronously from the updating thread with no connector
    /// lock held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the cable is not supported and
    /// [`Error::Unregistered`] after unregistration.
    pub fn on_cable_changed<F>(&self, cable: CableId, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(bool, &Connector) + Send + Sync + 'static,
    {
        let index = self.resolve_index(cable)?;

        // Held so that unregistration cannot clear the lists in between.
        let inner = self.inner.lock();
        inner.ensure_live(&self.name)?;
        let id = self
            .notifiers
            .subscribe(index, callback)
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.cables.len(),
            })?;
        drop(inner);

        tracing::debug!(connector = %self.name, %cable, %id, "observer registered");
        Ok(id)
    }

    /// Removes an observer of one cable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the cable is not supported,
    /// [`Error::NotFound`] if the subscription is not registered for that
    /// cable and [`Error::Unregistered`] after unregistration.
    pub fn unsubscribe(&self, cable: CableId, id: SubscriptionId) -> Result<()> {
        let index = self.resolve_index(cable)?;

        let inner = self.inner.lock();
        inner.ensure_live(&self.name)?;
        let removed = self.notifiers.unsubscribe(index, id);
        drop(inner);

        if !removed {
            return Err(Error::NotFound(format!("{id} on cable {cable}")));
        }
        tracing::debug!(connector = %self.name, %cable, %id, "observer unregistered");
        Ok(())
    }

    /// Returns the number of observers of one cable.
    #[must_use]
    pub fn observer_count(&self, cable: CableId) -> usize {
        self.cables
            .index_of(cable)
            .map_or(0, |index| self.notifiers.observer_count(index))
    }

    // =========================================================================
    // Lifecycle (driven by the registry)
    // =========================================================================

    pub(crate) fn mark_registered(&self, dev_name: impl FnOnce() -> String) -> Result<()> {
        self.inner.lock().mark_registered(&self.name)?;
        // Keep the first number if the connector is registered again.
        let _ = self.dev_name.get_or_init(dev_name);
        Ok(())
    }

    /// Releases observer lists and the exclusion table.
    pub(crate) fn release(&self) {
        let mut inner = self.inner.lock();
        inner.release();
        self.notifiers.clear();
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("name", &self.name)
            .field("dev_name", &self.dev_name())
            .field("cables", &self.cables)
            .field("notifiers", &self.notifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn three_cables() -> Arc<Connector> {
        ConnectorBuilder::new(
            "test",
            [CableId::USB, CableId::CHG_USB_DCP, CableId::JACK_HEADPHONE],
        )
        .build()
        .unwrap()
    }

    #[test]
    fn mask_correctness() {
        let connector = three_cables();
        connector.set_state(0b101).unwrap();
        connector.update_state(0b011, 0b110).unwrap();
        assert_eq!(connector.state(), (0b101 & !0b011) | (0b110 & 0b011));
    }

    #[test]
    fn high_bits_are_ignored() {
        let connector = three_cables();
        connector.set_state(0xffff_fff0).unwrap();
        assert_eq!(connector.state(), 0);
        connector.set_state(u32::MAX).unwrap();
        assert_eq!(connector.state(), 0b111);
    }

    #[test]
    fn cable_state_queries() {
        let connector = three_cables();
        connector.set_cable_state(CableId::CHG_USB_DCP, true).unwrap();
        assert!(connector.cable_state(CableId::CHG_USB_DCP).unwrap());
        assert!(!connector.cable_state(CableId::USB).unwrap());
        assert_eq!(connector.state(), 0b010);

        connector.set_cable_state(CableId::CHG_USB_DCP, false).unwrap();
        assert_eq!(connector.state(), 0);
    }

    #[test]
    fn unsupported_cable() {
        let connector = three_cables();
        let err = connector.cable_state(CableId::DISP_HDMI).unwrap_err();
        assert_eq!(
            err,
            Error::Unsupported {
                connector: "test".to_string(),
                cable: CableId::DISP_HDMI
            }
        );
        assert!(connector.set_cable_state(CableId::DOCK, true).is_err());
        assert!(connector.on_cable_changed(CableId::DOCK, |_, _| {}).is_err());
    }

    #[test]
    fn observer_sees_edge_once() {
        let connector = three_cables();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        connector
            .on_cable_changed(CableId::CHG_USB_DCP, move |attached, _| {
                assert!(attached);
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        connector.set_state(0b010).unwrap();
        connector.set_state(0b010).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn observer_reads_committed_state() {
        let connector = three_cables();
        let seen = Arc::new(AtomicU32::new(u32::MAX));
        let s = Arc::clone(&seen);
        connector
            .on_cable_changed(CableId::USB, move |_, connector| {
                s.store(connector.state(), Ordering::SeqCst);
            })
            .unwrap();

        connector.set_state(0b101).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 0b101);
    }

    #[test]
    fn observer_may_update_its_connector() {
        let connector = three_cables();
        connector
            .on_cable_changed(CableId::USB, |attached, connector| {
                if attached {
                    connector
                        .set_cable_state(CableId::CHG_USB_DCP, true)
                        .unwrap();
                }
            })
            .unwrap();

        connector.set_cable_state(CableId::USB, true).unwrap();
        assert_eq!(connector.state(), 0b011);
    }

    #[test]
    fn unsubscribe_errors() {
        let connector = three_cables();
        let id = connector.on_cable_changed(CableId::USB, |_, _| {}).unwrap();

        assert!(matches!(
            connector.unsubscribe(CableId::JACK_HEADPHONE, id),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            connector.unsubscribe(CableId::DISP_VGA, id),
            Err(Error::Unsupported { .. })
        ));
        connector.unsubscribe(CableId::USB, id).unwrap();
        assert_eq!(connector.observer_count(CableId::USB), 0);
    }

    #[test]
    fn sink_gets_post_commit_snapshot() {
        let events = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let e = Arc::clone(&events);
        let connector = ConnectorBuilder::new("snk", [CableId::USB, CableId::DISP_HDMI])
            .with_sink(Arc::new(move |event: &SinkEvent| e.lock().push(event.clone())))
            .build()
            .unwrap();

        connector.set_state(0b10).unwrap();
        connector.set_state(0b10).unwrap();
        connector.set_state(0b01).unwrap();

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].env(), ["NAME=snk", "STATE=USB=0\nHDMI=1"]);
        assert_eq!(events[1].snapshot().unwrap().state, 0b01);
    }

    #[test]
    fn released_connector_rejects_operations() {
        let connector = three_cables();
        connector.on_cable_changed(CableId::USB, |_, _| {}).unwrap();
        connector.release();

        assert_eq!(connector.observer_count(CableId::USB), 0);
        assert!(connector.mutually_exclusive().is_empty());
        assert_eq!(
            connector.set_state(1).unwrap_err(),
            Error::Unregistered("test".to_string())
        );
        assert!(matches!(
            connector.on_cable_changed(CableId::USB, |_, _| {}),
            Err(Error::Unregistered(_))
        ));
    }

    #[test]
    fn debug_output() {
        let debug = format!("{:?}", three_cables());
        assert!(debug.contains("Connector"));
        assert!(debug.contains("test"));
    }
}
