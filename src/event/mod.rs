// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External notification of committed state changes.
//!
//! Every committed change of a connector is reported once to its
//! [`NotificationSink`] as a [`SinkEvent`]. The [`EventBus`] sink
//! rebroadcasts those events over a tokio broadcast channel.
//!
//! # Examples
//!
//! ```
//! use extcon_lib::event::{EventBus, NotificationSink, SinkEvent};
//! use extcon_lib::state::StateSnapshot;
//! use extcon_lib::types::{CableId, CableSet};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let cables = CableSet::new([CableId::DOCK]).unwrap();
//! bus.notify(&SinkEvent::from_snapshot(StateSnapshot::new("dock", None, &cables, 1)));
//!
//! assert_eq!(rx.try_recv().unwrap().name(), "dock");
//! ```

mod event_bus;
mod sink;

pub use event_bus::EventBus;
pub use sink::{NotificationSink, SinkEvent};
