// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of connectors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::connector::{Connector, PowerEvent};
use crate::error::{Error, Result};
use crate::subscription::{Subscription, SubscriptionId};
use crate::types::{CableId, HandleId};

use super::HandleBinding;

/// Registry of connectors, keyed by name.
///
/// The registry holds shared handles to registered connectors. Lookups run
/// concurrently; registration and unregistration are exclusive. The
/// registry lock is independent of the connectors' state locks and is
/// never held while observers or sinks run.
///
/// Connectors are iterated most-recently-registered first, which decides
/// the winner of cable-based lookups when several connectors expose the
/// same cable.
///
/// # Examples
///
/// ```
/// use extcon_lib::{CableId, ConnectorBuilder, ConnectorRegistry};
///
/// # fn main() -> extcon_lib::Result<()> {
/// let registry = ConnectorRegistry::new();
/// let connector = ConnectorBuilder::new("muic", [CableId::USB, CableId::CHG_USB_SDP]).build()?;
/// registry.register(&connector)?;
///
/// let (found, index) = registry.find_by_cable(CableId::CHG_USB_SDP)?;
/// assert_eq!(found.name(), "muic");
/// assert_eq!(index, 1);
///
/// registry.unregister(&connector)?;
/// assert!(registry.find_by_name("muic").is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConnectorRegistry {
    /// Registered connectors, newest first.
    connectors: RwLock<Vec<Arc<Connector>>>,
    /// Next device number.
    next_number: AtomicU64,
}

impl ConnectorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, creating it on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ConnectorRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a connector and assigns its device number.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateName`] if a connector with that name is
    ///   registered here, or the connector is already registered elsewhere
    /// - [`Error::Unregistered`] if the connector was unregistered before
    /// - [`Error::ResourceExhausted`] if the registry cannot grow; nothing is
    ///   left registered
    pub fn register(&self, connector: &Arc<Connector>) -> Result<()> {
        let mut connectors = self.connectors.write();

        if connectors.iter().any(|c| c.name() == connector.name()) {
            tracing::warn!(connector = connector.name(), "name already registered");
            return Err(Error::DuplicateName(connector.name().to_string()));
        }

        connectors
            .try_reserve(1)
            .map_err(|err| Error::ResourceExhausted(err.to_string()))?;
        connector.mark_registered(|| {
            format!("extcon{}", self.next_number.fetch_add(1, Ordering::Relaxed))
        })?;
        connectors.insert(0, Arc::clone(connector));
        drop(connectors);

        tracing::info!(
            connector = connector.name(),
            dev_name = connector.dev_name().unwrap_or_default(),
            cables = connector.cables().len(),
            "connector registered"
        );
        Ok(())
    }

    /// Unregisters a connector and releases its observers and exclusion table.
    ///
    /// A dispatch already running on another thread completes with the
    /// callbacks it had collected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the connector is not registered here.
    pub fn unregister(&self, connector: &Arc<Connector>) -> Result<()> {
        {
            let mut connectors = self.connectors.write();
            let position = connectors
                .iter()
                .position(|c| Arc::ptr_eq(c, connector))
                .ok_or_else(|| Error::NotFound(format!("connector {:?}", connector.name())))?;
            connectors.remove(position);
        }

        connector.release();
        tracing::info!(connector = connector.name(), "connector unregistered");
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns the registered connector with exactly this name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Connector>> {
        self.connectors
            .read()
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    /// Returns the first connector exposing `cable` and the cable's index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no registered connector exposes it.
    pub fn find_by_cable(&self, cable: CableId) -> Result<(Arc<Connector>, usize)> {
        self.connectors
            .read()
            .iter()
            .find_map(|c| c.cables().index_of(cable).map(|i| (Arc::clone(c), i)))
            .ok_or_else(|| Error::NotFound(format!("no connector exposes cable {cable}")))
    }

    /// Returns the registered connector bound to `handle`.
    #[must_use]
    pub fn find_by_parent(&self, handle: HandleId) -> Option<Arc<Connector>> {
        self.connectors
            .read()
            .iter()
            .find(|c| c.parent() == Some(handle))
            .cloned()
    }

    /// Resolves the `index`-th connector handle of `binding`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the binding has no such handle
    /// - [`Error::RetryLater`] if no connector for the handle is registered
    ///   yet
    pub fn find_by_handle(
        &self,
        binding: &dyn HandleBinding,
        index: usize,
    ) -> Result<Arc<Connector>> {
        let handle = binding
            .connector_handle(index)
            .ok_or_else(|| Error::NotFound(format!("connector handle #{index}")))?;
        self.find_by_parent(handle).ok_or_else(|| {
            tracing::debug!(%handle, "connector for handle not registered yet");
            Error::RetryLater(handle.value())
        })
    }

    /// Resolves a named cable reference of `binding` to a connector and index.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the binding has no such reference
    /// - [`Error::RetryLater`] if the referenced connector is not registered
    ///   yet
    /// - [`Error::IndexOutOfRange`] if the index is beyond the connector's
    ///   cables
    pub fn find_by_cable_name(
        &self,
        binding: &dyn HandleBinding,
        cable_name: &str,
    ) -> Result<(Arc<Connector>, usize)> {
        let (handle, index) = binding
            .cable_reference(cable_name)
            .ok_or_else(|| Error::NotFound(format!("cable reference {cable_name:?}")))?;
        let connector = self
            .find_by_parent(handle)
            .ok_or(Error::RetryLater(handle.value()))?;
        let count = connector.cables().len();
        if index >= count {
            return Err(Error::IndexOutOfRange { index, count });
        }
        Ok((connector, index))
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Subscribes to one cable.
    ///
    /// With `connector` set, the cable is resolved on that connector. With
    /// `None`, the observer binds to the first registered connector exposing
    /// the cable; later registrations do not move it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `connector` is `None` and no registered
    ///   connector exposes the cable
    /// - [`Error::Unsupported`] if the given connector lacks the cable
    /// - [`Error::Unregistered`] if the connector has been unregistered
    pub fn register_observer<F>(
        &self,
        connector: Option<&Arc<Connector>>,
        cable: CableId,
        callback: F,
    ) -> Result<Subscription>
    where
        F: Fn(bool, &Connector) + Send + Sync + 'static,
    {
        let connector = match connector {
            Some(connector) => Arc::clone(connector),
            None => self.find_by_cable(cable)?.0,
        };
        let id = connector.on_cable_changed(cable, callback)?;
        Ok(Subscription::new(&connector, cable, id))
    }

    /// Removes an observer registered on `connector`.
    ///
    /// # Errors
    ///
    /// See [`Connector::unsubscribe`].
    pub fn unregister_observer(
        &self,
        connector: &Connector,
        cable: CableId,
        id: SubscriptionId,
    ) -> Result<()> {
        connector.unsubscribe(cable, id)
    }

    // =========================================================================
    // Power management
    // =========================================================================

    /// Forwards a power event to every registered connector.
    ///
    /// Every connector sees the event even if an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by a connector.
    pub fn notify_power_event(&self, event: PowerEvent) -> Result<()> {
        let connectors = self.connectors.read().clone();
        tracing::debug!(%event, connectors = connectors.len(), "forwarding power event");

        let mut first_error = None;
        for connector in &connectors {
            if let Err(err) = connector.handle_power_event(event) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns the number of registered connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connectors.read().len()
    }

    /// Returns `true` if no connector is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connectors.read().is_empty()
    }

    /// Returns the registered names in iteration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.connectors
            .read()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectorBuilder;
    use crate::registry::StaticBinding;
    use crate::state::Lifecycle;

    fn connector(name: &str, cables: &[CableId]) -> Arc<Connector> {
        ConnectorBuilder::new(name, cables.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn register_assigns_device_numbers() {
        let registry = ConnectorRegistry::new();
        let a = connector("a", &[CableId::USB]);
        let b = connector("b", &[CableId::USB]);
        registry.register(&a).unwrap();
        registry.register(&b).unwrap();

        assert_eq!(a.dev_name(), Some("extcon0"));
        assert_eq!(b.dev_name(), Some("extcon1"));
        assert_eq!(a.lifecycle(), Lifecycle::Registered);
        assert_eq!(registry.names(), vec!["b", "a"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let registry = ConnectorRegistry::new();
        registry.register(&connector("dup", &[CableId::USB])).unwrap();

        let second = connector("dup", &[CableId::DOCK]);
        assert_eq!(
            registry.register(&second).unwrap_err(),
            Error::DuplicateName("dup".to_string())
        );
        assert_eq!(second.lifecycle(), Lifecycle::Allocated);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn double_registration_is_rejected() {
        let one = ConnectorRegistry::new();
        let two = ConnectorRegistry::new();
        let c = connector("shared", &[CableId::USB]);
        one.register(&c).unwrap();
        assert!(matches!(two.register(&c), Err(Error::DuplicateName(_))));
        assert!(two.is_empty());
    }

    #[test]
    fn failed_registration_consumes_no_device_number() {
        let one = ConnectorRegistry::new();
        let two = ConnectorRegistry::new();
        let shared = connector("shared", &[CableId::USB]);
        one.register(&shared).unwrap();

        let first = connector("first", &[CableId::DOCK]);
        two.register(&first).unwrap();
        assert!(two.register(&shared).is_err());
        assert!(two.register(&connector("first", &[CableId::USB])).is_err());
        assert_eq!(shared.dev_name(), Some("extcon0"));
        assert_eq!(shared.lifecycle(), Lifecycle::Registered);

        let second = connector("second", &[CableId::DOCK]);
        two.register(&second).unwrap();
        assert_eq!(first.dev_name(), Some("extcon0"));
        assert_eq!(second.dev_name(), Some("extcon1"));
        assert_eq!(two.names(), vec!["second", "first"]);
    }

    #[test]
    fn unregister_releases_and_forbids_reuse() {
        let registry = ConnectorRegistry::new();
        let c = connector("gone", &[CableId::USB]);
        registry.register(&c).unwrap();
        registry.unregister(&c).unwrap();

        assert!(registry.find_by_name("gone").is_none());
        assert_eq!(c.lifecycle(), Lifecycle::Released);
        assert!(matches!(registry.unregister(&c), Err(Error::NotFound(_))));
        assert!(matches!(registry.register(&c), Err(Error::Unregistered(_))));
    }

    #[test]
    fn find_by_cable_prefers_newest() {
        let registry = ConnectorRegistry::new();
        registry.register(&connector("old", &[CableId::USB])).unwrap();
        registry
            .register(&connector("new", &[CableId::DOCK, CableId::USB]))
            .unwrap();

        let (found, index) = registry.find_by_cable(CableId::USB).unwrap();
        assert_eq!(found.name(), "new");
        assert_eq!(index, 1);
        assert!(matches!(
            registry.find_by_cable(CableId::DISP_VGA),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn handle_lookup() {
        let registry = ConnectorRegistry::new();
        let binding = vec![HandleId::new(1), HandleId::new(2)];
        let bound = ConnectorBuilder::new("bound", [CableId::USB])
            .with_parent(HandleId::new(1))
            .build()
            .unwrap();
        registry.register(&bound).unwrap();

        assert_eq!(registry.find_by_handle(&binding, 0).unwrap().name(), "bound");
        assert_eq!(
            registry.find_by_handle(&binding, 1).unwrap_err(),
            Error::RetryLater(2)
        );
        assert!(matches!(
            registry.find_by_handle(&binding, 2),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn cable_name_lookup() {
        let registry = ConnectorRegistry::new();
        let binding = StaticBinding::default()
            .with_cable("vbus", HandleId::new(9), 1)
            .with_cable("bogus", HandleId::new(9), 5)
            .with_cable("later", HandleId::new(10), 0);
        let bound = ConnectorBuilder::new("pmic", [CableId::USB, CableId::CHG_USB_SDP])
            .with_parent(HandleId::new(9))
            .build()
            .unwrap();
        registry.register(&bound).unwrap();

        let (found, index) = registry.find_by_cable_name(&binding, "vbus").unwrap();
        assert_eq!((found.name(), index), ("pmic", 1));
        assert_eq!(
            registry.find_by_cable_name(&binding, "bogus").unwrap_err(),
            Error::IndexOutOfRange { index: 5, count: 2 }
        );
        assert_eq!(
            registry.find_by_cable_name(&binding, "later").unwrap_err(),
            Error::RetryLater(10)
        );
        assert!(matches!(
            registry.find_by_cable_name(&binding, "none"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn observer_without_connector_binds_to_first_match() {
        let registry = ConnectorRegistry::new();
        assert!(matches!(
            registry.register_observer(None, CableId::USB, |_, _| {}),
            Err(Error::NotFound(_))
        ));

        let first = connector("first", &[CableId::USB]);
        registry.register(&first).unwrap();
        let sub = registry
            .register_observer(None, CableId::USB, |_, _| {})
            .unwrap();
        registry.register(&connector("second", &[CableId::USB])).unwrap();

        assert!(Arc::ptr_eq(&sub.connector().unwrap(), &first));
        assert_eq!(sub.connector_name(), "first");
        assert_eq!(first.observer_count(CableId::USB), 1);
        registry
            .unregister_observer(&first, CableId::USB, sub.id())
            .unwrap();
        assert_eq!(first.observer_count(CableId::USB), 0);
    }

    #[test]
    fn observer_on_explicit_connector() {
        let registry = ConnectorRegistry::new();
        let c = connector("explicit", &[CableId::USB]);
        assert!(matches!(
            registry.register_observer(Some(&c), CableId::DOCK, |_, _| {}),
            Err(Error::Unsupported { .. })
        ));
        let sub = registry
            .register_observer(Some(&c), CableId::USB, |_, _| {})
            .unwrap();
        sub.unsubscribe().unwrap();
    }

    #[test]
    fn power_event_reaches_every_connector() {
        let registry = ConnectorRegistry::new();
        let a = connector("a", &[CableId::USB]);
        let b = connector("b", &[CableId::DOCK]);
        registry.register(&a).unwrap();
        registry.register(&b).unwrap();

        registry.notify_power_event(PowerEvent::SuspendPrepare).unwrap();
        assert!(a.is_suspended() && b.is_suspended());
        registry.notify_power_event(PowerEvent::PostSuspend).unwrap();
        assert!(!a.is_suspended() && !b.is_suspended());
    }

    #[test]
    fn global_is_shared() {
        assert!(std::ptr::eq(
            ConnectorRegistry::global(),
            ConnectorRegistry::global()
        ));
    }
}
