// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External notification sink.

use serde::{Deserialize, Serialize};

use crate::state::StateSnapshot;

/// Notification delivered once per committed state change.
///
/// # Examples
///
/// ```
/// use extcon_lib::event::SinkEvent;
/// use extcon_lib::state::StateSnapshot;
/// use extcon_lib::types::{CableId, CableSet};
///
/// let cables = CableSet::new([CableId::USB]).unwrap();
/// let event = SinkEvent::from_snapshot(StateSnapshot::new("muic", None, &cables, 1));
///
/// assert_eq!(event.name(), "muic");
/// assert_eq!(event.env(), ["NAME=muic", "STATE=USB=1"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkEvent {
    /// A committed change with its rendered summary.
    Change {
        /// Post-commit snapshot.
        snapshot: StateSnapshot,
        /// `NAME=` and `STATE=` entries.
        env: Vec<String>,
    },

    /// A committed change whose summary could not be rendered.
    ///
    /// Consumers should re-read the connector state.
    ChangeUnformatted {
        /// Connector name.
        name: String,
        /// Device number assigned at registration.
        dev_name: Option<String>,
    },
}

impl SinkEvent {
    /// Builds the notification for a post-commit snapshot.
    ///
    /// Falls back to [`SinkEvent::ChangeUnformatted`] when the summary
    /// cannot be rendered; the committed state is not affected.
    #[must_use]
    pub fn from_snapshot(snapshot: StateSnapshot) -> Self {
        match snapshot.env() {
            Ok(env) => Self::Change { snapshot, env },
            Err(err) => Self::unformatted(snapshot, &err),
        }
    }

    pub(crate) fn unformatted(snapshot: StateSnapshot, err: &dyn std::error::Error) -> Self {
        tracing::error!(
            connector = %snapshot.name,
            error = %err,
            "out of memory rendering state change, sending bare notification"
        );
        Self::ChangeUnformatted {
            name: snapshot.name,
            dev_name: snapshot.dev_name,
        }
    }

    /// Returns the connector name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Change { snapshot, .. } => &snapshot.name,
            Self::ChangeUnformatted { name, .. } => name,
        }
    }

    /// Returns the snapshot, if one was rendered.
    #[must_use]
    pub fn snapshot(&self) -> Option<&StateSnapshot> {
        match self {
            Self::Change { snapshot, .. } => Some(snapshot),
            Self::ChangeUnformatted { .. } => None,
        }
    }

    /// Returns the environment entries; empty for unformatted changes.
    #[must_use]
    pub fn env(&self) -> &[String] {
        match self {
            Self::Change { env, .. } => env,
            Self::ChangeUnformatted { .. } => &[],
        }
    }

    /// Returns `true` if this is the unformatted fallback.
    #[must_use]
    pub fn is_unformatted(&self) -> bool {
        matches!(self, Self::ChangeUnformatted { .. })
    }
}

/// Consumer of committed state changes.
///
/// The sink is called exactly once per commit, after observers have run and
/// without any connector lock held. Its outcome does not affect the update.
/// Any `Fn(&SinkEvent)` closure is a sink.
pub trait NotificationSink: Send + Sync {
    /// Handles one committed change.
    fn notify(&self, event: &SinkEvent);
}

impl<F> NotificationSink for F
where
    F: Fn(&SinkEvent) + Send + Sync,
{
    fn notify(&self, event: &SinkEvent) {
        self(event);
    }
}
