// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Suspend/resume handling.
//!
//! The power-management collaborator drives each connector through a
//! two-state machine with [`PowerEvent`]s. With suspend-time delivery
//! disabled, changes requested while suspended are buffered and the last
//! requested state is committed once on resume.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::{SuspendPhase, UpdateOutcome};

use super::Connector;

/// System power transition signalled to connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerEvent {
    /// The system is about to suspend.
    SuspendPrepare,
    /// The system has resumed.
    PostSuspend,
}

impl std::fmt::Display for PowerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuspendPrepare => write!(f, "suspend-prepare"),
            Self::PostSuspend => write!(f, "post-suspend"),
        }
    }
}

impl Connector {
    /// Drives the suspend state machine.
    ///
    /// # Errors
    ///
    /// See [`post_resume`](Self::post_resume).
    pub fn handle_power_event(&self, event: PowerEvent) -> Result<()> {
        match event {
            PowerEvent::SuspendPrepare => {
                self.prepare_suspend();
                Ok(())
            }
            PowerEvent::PostSuspend => self.post_resume(),
        }
    }

    /// Enters the suspend window. Calling it again while suspended does nothing.
    pub fn prepare_suspend(&self) {
        let (entered, deliver) = {
            let mut inner = self.inner.lock();
            let was = inner.phase();
            inner.suspend();
            (was == SuspendPhase::Active, inner.deliver_during_suspend())
        };
        if entered {
            tracing::info!(connector = %self.name, deliver, "entering suspend window");
        }
    }

    /// Leaves the suspend window and commits the buffered state, if any.
    ///
    /// The replay runs through the normal update path: it is validated
    /// against the exclusion table and, when it changes the state, observers
    /// and the sink are notified once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExclusivityViolation`](crate::Error::ExclusivityViolation)
    /// if the buffered state is rejected; the committed state is kept and
    /// the buffer is dropped.
    pub fn post_resume(&self) -> Result<()> {
        let outcome = {
            let mut inner = self.inner.lock();
            if inner.phase() == SuspendPhase::Active {
                return Ok(());
            }
            let pending = inner.pending();
            let outcome = inner.resume(self.cables.valid_bits());
            if let Some(pending) = pending {
                tracing::info!(
                    connector = %self.name,
                    pending = format_args!("{pending:#010x}"),
                    "resumed, replaying buffered state"
                );
            }
            outcome
        };
        if let Ok(UpdateOutcome::Unchanged) = outcome {
            tracing::debug!(connector = %self.name, "resumed without state change");
        }
        let valid = self.cables.valid_bits();
        self.finish(outcome, valid, valid)
    }

    /// Returns `true` while inside a suspend window.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspend_phase() == SuspendPhase::Suspended
    }

    /// Returns the current suspend phase.
    #[must_use]
    pub fn suspend_phase(&self) -> SuspendPhase {
        self.inner.lock().phase()
    }

    /// Returns whether changes are delivered while suspended.
    #[must_use]
    pub fn deliver_during_suspend(&self) -> bool {
        self.inner.lock().deliver_during_suspend()
    }

    /// Sets whether changes are delivered while suspended.
    ///
    /// Takes effect immediately. Enabling delivery inside a suspend window
    /// commits the buffered state on the spot, so later live changes are
    /// not rolled back on resume. Disabling it inside a window buffers
    /// further changes on top of the committed state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExclusivityViolation`](crate::Error::ExclusivityViolation)
    /// if the flushed buffer is rejected; the committed state is kept, the
    /// buffer is dropped and the new setting still applies.
    pub fn set_deliver_during_suspend(&self, deliver: bool) -> Result<()> {
        let valid = self.cables.valid_bits();
        let outcome = {
            let mut inner = self.inner.lock();
            let suspended = inner.phase() == SuspendPhase::Suspended;
            let outcome = inner.set_deliver_during_suspend(deliver, valid);
            if suspended {
                tracing::info!(
                    connector = %self.name,
                    deliver,
                    "suspend-time delivery switched inside suspend window"
                );
            }
            outcome
        };
        self.finish(outcome, valid, valid)
    }

    /// Returns the state buffered for replay on resume.
    #[must_use]
    pub fn pending_state(&self) -> Option<u32> {
        self.inner.lock().pending()
    }
}
