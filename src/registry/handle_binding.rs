// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handle-based connector references.

use std::collections::HashMap;

use crate::types::HandleId;

/// Source of connector references held by a consumer's description node.
///
/// A consumer lists the connectors it depends on as an ordered sequence of
/// handles and may name individual cables of those connectors. The
/// registry resolves the handles to registered connectors.
pub trait HandleBinding {
    /// Returns the `index`-th connector handle, if present.
    fn connector_handle(&self, index: usize) -> Option<HandleId>;

    /// Resolves a named cable reference to a connector handle and cable index.
    fn cable_reference(&self, _cable_name: &str) -> Option<(HandleId, usize)> {
        None
    }
}

/// In-memory [`HandleBinding`].
///
/// # Examples
///
/// ```
/// use extcon_lib::registry::{HandleBinding, StaticBinding};
/// use extcon_lib::types::HandleId;
///
/// let binding = StaticBinding::new([HandleId::new(0x10)])
///     .with_cable("usb-id", HandleId::new(0x10), 1);
///
/// assert_eq!(binding.connector_handle(0), Some(HandleId::new(0x10)));
/// assert_eq!(binding.connector_handle(1), None);
/// assert_eq!(binding.cable_reference("usb-id"), Some((HandleId::new(0x10), 1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticBinding {
    handles: Vec<HandleId>,
    cables: HashMap<String, (HandleId, usize)>,
}

impl StaticBinding {
    /// Creates a binding from an ordered list of connector handles.
    #[must_use]
    pub fn new(handles: impl IntoIterator<Item = HandleId>) -> Self {
        Self {
            handles: handles.into_iter().collect(),
            cables: HashMap::new(),
        }
    }

    /// Adds a named cable reference.
    #[must_use]
    pub fn with_cable(mut self, name: impl Into<String>, handle: HandleId, index: usize) -> Self {
        self.cables.insert(name.into(), (handle, index));
        self
    }
}

impl HandleBinding for StaticBinding {
    fn connector_handle(&self, index: usize) -> Option<HandleId> {
        self.handles.get(index).copied()
    }

    fn cable_reference(&self, cable_name: &str) -> Option<(HandleId, usize)> {
        self.cables.get(cable_name).copied()
    }
}

impl HandleBinding for [HandleId] {
    fn connector_handle(&self, index: usize) -> Option<HandleId> {
        self.get(index).copied()
    }
}

impl HandleBinding for Vec<HandleId> {
    fn connector_handle(&self, index: usize) -> Option<HandleId> {
        self.get(index).copied()
    }
}
