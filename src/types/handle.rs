// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opaque external handle type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle associating a connector with an external description node.
///
/// The library never interprets the value. A connector created with
/// [`ConnectorBuilder::with_parent`](crate::ConnectorBuilder::with_parent)
/// can be found through handle-based lookup on the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(u64);

impl HandleId {
    /// Creates a handle from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for HandleId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
