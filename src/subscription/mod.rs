// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for cable state changes.
//!
//! Observers subscribe to one cable of one connector and are called
//! synchronously whenever that cable is attached or detached.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`NotifierRegistry`] - Per-cable observer lists owned by each connector
//! - [`Subscription`] - Handle returned by registry-level subscription, bound
//!   to whichever connector was resolved
//!
//! # Usage
//!
//! ```
//! use extcon_lib::{CableId, ConnectorBuilder};
//!
//! # fn main() -> extcon_lib::Result<()> {
//! let connector = ConnectorBuilder::new("muic", [CableId::USB, CableId::CHG_USB_DCP]).build()?;
//!
//! let sub_id = connector.on_cable_changed(CableId::USB, |attached, connector| {
//!     println!("USB on {} is now {}", connector.name(), attached);
//! })?;
//!
//! connector.set_cable_state(CableId::USB, true)?;
//!
//! // Later, unsubscribe
//! connector.unsubscribe(CableId::USB, sub_id)?;
//! # Ok(())
//! # }
//! ```

mod callback;
mod handle;

pub use callback::{CableCallback, NotifierRegistry, SubscriptionId};
pub use handle::Subscription;
