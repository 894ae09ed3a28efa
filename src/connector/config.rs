// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative connector descriptions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::NotificationSink;
use crate::types::{CableId, HandleId};

use super::{Connector, ConnectorBuilder};

const fn default_deliver_during_suspend() -> bool {
    true
}

/// Serializable description of a connector.
///
/// Cables are written by display name and exclusion groups as lists of
/// cables.
///
/// # Examples
///
/// ```
/// use extcon_lib::ConnectorConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config: ConnectorConfig = serde_json::from_str(
///     r#"{
///         "name": "sm5502-muic",
///         "cables": ["USB", "USB-HOST", "DCP", "JIG"],
///         "mutually_exclusive": [["USB", "USB-HOST"]]
///     }"#,
/// )?;
///
/// let connector = config.build()?;
/// assert_eq!(connector.mutually_exclusive(), vec![0b0011]);
/// assert!(connector.deliver_during_suspend());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name.
    pub name: String,
    /// Supported cables in bit order.
    pub cables: Vec<CableId>,
    /// Groups of cables of which at most one may be attached.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutually_exclusive: Vec<Vec<CableId>>,
    /// Whether changes are delivered while suspended.
    #[serde(default = "default_deliver_during_suspend")]
    pub deliver_during_suspend: bool,
    /// External handle for handle-based lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<HandleId>,
}

impl ConnectorConfig {
    /// Creates a description with no exclusion groups.
    #[must_use]
    pub fn new(name: impl Into<String>, cables: impl IntoIterator<Item = CableId>) -> Self {
        Self {
            name: name.into(),
            cables: cables.into_iter().collect(),
            mutually_exclusive: Vec::new(),
            deliver_during_suspend: true,
            parent: None,
        }
    }

    /// Adds an exclusion group.
    #[must_use]
    pub fn with_exclusive_group(mut self, cables: impl IntoIterator<Item = CableId>) -> Self {
        self.mutually_exclusive.push(cables.into_iter().collect());
        self
    }

    /// Converts the description into a builder, e.g. to attach a sink.
    pub fn into_builder(self) -> ConnectorBuilder {
        let mut builder = ConnectorBuilder::new(self.name, self.cables)
            .deliver_during_suspend(self.deliver_during_suspend);
        for group in self.mutually_exclusive {
            builder = builder.with_exclusive_group(group);
        }
        if let Some(parent) = self.parent {
            builder = builder.with_parent(parent);
        }
        builder
    }

    /// Builds a connector from a copy of this description.
    ///
    /// # Errors
    ///
    /// See [`ConnectorBuilder::build`].
    pub fn build(&self) -> Result<Arc<Connector>> {
        self.clone().into_builder().build()
    }

    /// Builds a connector that reports to `sink`.
    ///
    /// # Errors
    ///
    /// See [`ConnectorBuilder::build`].
    pub fn build_with_sink(&self, sink: Arc<dyn NotificationSink>) -> Result<Arc<Connector>> {
        self.clone().into_builder().with_sink(sink).build()
    }
}
