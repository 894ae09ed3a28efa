// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting committed state changes.

use tokio::sync::broadcast;

use super::{NotificationSink, SinkEvent};

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Notification sink that broadcasts changes to async subscribers.
///
/// The `EventBus` uses tokio's broadcast channel so that any number of
/// subscribers receive every change. Publishing never blocks, which makes
/// it safe to use as a connector sink.
///
/// # Capacity
///
/// The event bus has a fixed capacity (default 256). If a subscriber falls
/// behind, older events are dropped for that subscriber (it receives a
/// `RecvError::Lagged` error).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use extcon_lib::event::EventBus;
/// use extcon_lib::{CableId, ConnectorBuilder};
///
/// # fn main() -> extcon_lib::Result<()> {
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// let connector = ConnectorBuilder::new("jack", [CableId::JACK_HEADPHONE])
///     .with_sink(Arc::new(bus.clone()))
///     .build()?;
/// connector.set_cable_state(CableId::JACK_HEADPHONE, true)?;
///
/// let event = rx.try_recv().unwrap();
/// assert_eq!(event.env(), ["NAME=jack", "STATE=HEADPHONE=1"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<SinkEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events that can be buffered
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to change events.
    ///
    /// Returns a receiver that will receive all events published after
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SinkEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: SinkEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl NotificationSink for EventBus {
    fn notify(&self, event: &SinkEvent) {
        tracing::trace!(connector = event.name(), "broadcasting state change");
        self.publish(event.clone());
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
