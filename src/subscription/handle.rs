// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription handle bound to a resolved connector.

use std::sync::{Arc, Weak};

use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::types::CableId;

use super::SubscriptionId;

/// A live cable subscription.
///
/// Returned by [`ConnectorRegistry::register_observer`](crate::ConnectorRegistry::register_observer),
/// which may pick the connector on the caller's behalf. The handle records
/// which connector and cable the observer was bound to so it can be
/// removed later. Dropping the handle does not unsubscribe, and the handle
/// does not keep the connector alive.
#[derive(Debug, Clone)]
pub struct Subscription {
    connector: Weak<Connector>,
    name: String,
    cable: CableId,
    id: SubscriptionId,
}

impl Subscription {
    pub(crate) fn new(connector: &Arc<Connector>, cable: CableId, id: SubscriptionId) -> Self {
        Self {
            connector: Arc::downgrade(connector),
            name: connector.name().to_string(),
            cable,
            id,
        }
    }

    /// Returns the connector the observer is bound to, if it still exists.
    #[must_use]
    pub fn connector(&self) -> Option<Arc<Connector>> {
        self.connector.upgrade()
    }

    /// Returns the name of the connector the observer was bound to.
    #[must_use]
    pub fn connector_name(&self) -> &str {
        &self.name
    }

    /// Returns the observed cable.
    #[must_use]
    pub fn cable(&self) -> CableId {
        self.cable
    }

    /// Returns the subscription identifier.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the observer from its connector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the observer was already removed and
    /// [`Error::Unregistered`] if the connector has been unregistered or
    /// dropped.
    pub fn unsubscribe(self) -> Result<()> {
        let connector = self
            .connector
            .upgrade()
            .ok_or_else(|| Error::Unregistered(self.name.clone()))?;
        connector.unsubscribe(self.cable, self.id)
    }
}
