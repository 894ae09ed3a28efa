// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `extcon` Lib - External connector state tracking.
//!
//! This library tracks which external cables (USB, chargers, audio jacks,
//! display links, docks, ...) are attached to the connectors of a system
//! and tells interested parties when that changes.
//!
//! # Supported Features
//!
//! - **Registry**: Register connectors by name, find them by name, cable or
//!   external handle
//! - **State store**: 32-bit attach bitmask per connector with masked updates
//! - **Exclusivity**: Reject states that attach two cables of one group
//! - **Notifications**: Per-cable observers plus one external sink per
//!   connector
//! - **Suspend safety**: Buffer changes during a suspend window and replay
//!   the latest one on resume
//!
//! # Quick Start
//!
//! ```
//! use extcon_lib::{CableId, ConnectorBuilder, ConnectorRegistry, PowerEvent};
//!
//! # fn main() -> extcon_lib::Result<()> {
//! let registry = ConnectorRegistry::new();
//!
//! let muic = ConnectorBuilder::new(
//!     "max14577-muic",
//!     [CableId::USB, CableId::CHG_USB_DCP, CableId::JIG],
//! )
//! .with_exclusive_group([CableId::USB, CableId::CHG_USB_DCP])
//! .build()?;
//! registry.register(&muic)?;
//!
//! // A charger driver only knows which cable it cares about
//! let charger = registry.register_observer(None, CableId::CHG_USB_DCP, |attached, _| {
//!     println!("charger {}", if attached { "plugged" } else { "unplugged" });
//! })?;
//!
//! muic.set_cable_state(CableId::CHG_USB_DCP, true)?;
//! assert_eq!(muic.snapshot().to_string(), "USB=0\nDCP=1\nJIG=0\n");
//!
//! // Changes during suspend are held back until resume
//! registry.notify_power_event(PowerEvent::SuspendPrepare)?;
//! registry.notify_power_event(PowerEvent::PostSuspend)?;
//!
//! charger.unsubscribe()?;
//! registry.unregister(&muic)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Watching Changes Asynchronously
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use extcon_lib::event::EventBus;
//! use extcon_lib::{CableId, ConnectorBuilder};
//!
//! #[tokio::main]
//! async fn main() -> extcon_lib::Result<()> {
//!     let bus = EventBus::new();
//!     let mut events = bus.subscribe();
//!
//!     let jack = ConnectorBuilder::new("jack", [CableId::JACK_HEADPHONE])
//!         .with_sink(Arc::new(bus.clone()))
//!         .build()?;
//!
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("{:?}", event.env());
//!         }
//!     });
//!
//!     jack.set_cable_state(CableId::JACK_HEADPHONE, true)?;
//!     Ok(())
//! }
//! ```

pub mod connector;
pub mod error;
pub mod event;
pub mod registry;
pub mod state;
pub mod subscription;
pub mod types;

pub use connector::{Connector, ConnectorBuilder, ConnectorConfig, PowerEvent};
pub use error::{Error, Result, ValueError};
pub use event::{EventBus, NotificationSink, SinkEvent};
pub use registry::{ConnectorRegistry, HandleBinding, StaticBinding};
pub use state::{ExclusionTable, Lifecycle, StateSnapshot, SuspendPhase};
pub use subscription::{Subscription, SubscriptionId};
pub use types::{CableId, CableSet, HandleId};
