// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connector registry and lookups.
//!
//! The [`ConnectorRegistry`] makes connectors visible to consumers. It is
//! usually owned by the application; [`ConnectorRegistry::global`] offers a
//! process-wide instance for code that cannot thread one through.
//!
//! Consumers find connectors by name, by supported cable, or through a
//! [`HandleBinding`] that lists the connectors their description depends
//! on. A handle whose connector is not registered yet yields
//! [`Error::RetryLater`](crate::Error::RetryLater) so the consumer can retry
//! once the provider shows up.

mod connector_registry;
mod handle_binding;

pub use connector_registry::ConnectorRegistry;
pub use handle_binding::{HandleBinding, StaticBinding};
