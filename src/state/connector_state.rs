// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lock-protected state of a single connector.
//!
//! [`ConnectorState`] holds everything guarded by a connector's state lock:
//! the committed bitmask, the exclusion table, the suspend bookkeeping and
//! the lifecycle stage. Its methods only compute and commit; observer
//! dispatch and sink notification are left to the caller once the lock is
//! released.

use crate::error::{Error, Result};

use super::ExclusionTable;

/// Lifecycle stage of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built but not registered.
    Allocated,
    /// Visible in a registry.
    Registered,
    /// Unregistered; resources released.
    Released,
}

/// Suspend phase of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendPhase {
    /// Changes are committed and delivered immediately.
    Active,
    /// The system is suspending; changes may be buffered.
    Suspended,
}

/// Result of a state update computed under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update requested no change.
    Unchanged,
    /// The update was buffered until resume.
    Deferred {
        /// The buffered state.
        pending: u32,
    },
    /// The update was committed.
    Committed {
        /// State before the commit.
        old: u32,
        /// State after the commit.
        new: u32,
    },
}

#[derive(Debug)]
pub(crate) struct ConnectorState {
    state: u32,
    exclusion: ExclusionTable,
    phase: SuspendPhase,
    deliver_during_suspend: bool,
    pending: Option<u32>,
    lifecycle: Lifecycle,
}

impl ConnectorState {
    pub(crate) fn new(exclusion: ExclusionTable, deliver_during_suspend: bool) -> Self {
        Self {
            state: 0,
            exclusion,
            phase: SuspendPhase::Active,
            deliver_during_suspend,
            pending: None,
            lifecycle: Lifecycle::Allocated,
        }
    }

    pub(crate) fn state(&self) -> u32 {
        self.state
    }

    pub(crate) fn exclusion(&self) -> &ExclusionTable {
        &self.exclusion
    }

    pub(crate) fn phase(&self) -> SuspendPhase {
        self.phase
    }

    pub(crate) fn pending(&self) -> Option<u32> {
        self.pending
    }

    pub(crate) fn deliver_during_suspend(&self) -> bool {
        self.deliver_during_suspend
    }

    /// Switches suspend-time delivery.
    ///
    /// Enabling delivery inside a suspend window commits the buffered state
    /// right away, so nothing is left for the resume replay.
    pub(crate) fn set_deliver_during_suspend(
        &mut self,
        deliver: bool,
        valid_bits: u32,
    ) -> Result<UpdateOutcome> {
        self.deliver_during_suspend = deliver;
        if !deliver {
            return Ok(UpdateOutcome::Unchanged);
        }
        match self.pending.take() {
            Some(pending) => self.update(valid_bits, pending),
            None => Ok(UpdateOutcome::Unchanged),
        }
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Fails with [`Error::Unregistered`] once the connector is released.
    pub(crate) fn ensure_live(&self, name: &str) -> Result<()> {
        if self.lifecycle == Lifecycle::Released {
            return Err(Error::Unregistered(name.to_string()));
        }
        Ok(())
    }

    pub(crate) fn mark_registered(&mut self, name: &str) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Allocated => {
                self.lifecycle = Lifecycle::Registered;
                Ok(())
            }
            Lifecycle::Registered => Err(Error::DuplicateName(name.to_string())),
            Lifecycle::Released => Err(Error::Unregistered(name.to_string())),
        }
    }

    /// Releases the exclusion table and ends the connector's life.
    pub(crate) fn release(&mut self) {
        self.lifecycle = Lifecycle::Released;
        self.exclusion = ExclusionTable::default();
        self.pending = None;
    }

    fn defers(&self) -> bool {
        self.phase == SuspendPhase::Suspended && !self.deliver_during_suspend
    }

    /// Applies `(state & !mask) | (bits & mask)`.
    ///
    /// `mask` must already be limited to the connector's valid bits.
    pub(crate) fn update(&mut self, mask: u32, bits: u32) -> Result<UpdateOutcome> {
        if self.defers() {
            // Deferred updates compose on top of the buffered state so the
            // replay on resume reflects the last request.
            let base = self.pending.unwrap_or(self.state);
            let candidate = (base & !mask) | (bits & mask);
            if self.pending.is_none() && candidate == self.state {
                return Ok(UpdateOutcome::Unchanged);
            }
            self.pending = Some(candidate);
            return Ok(UpdateOutcome::Deferred { pending: candidate });
        }

        let candidate = (self.state & !mask) | (bits & mask);
        if candidate == self.state {
            return Ok(UpdateOutcome::Unchanged);
        }

        if let Some(group) = self.exclusion.check(candidate) {
            return Err(Error::ExclusivityViolation {
                group,
                state: candidate,
            });
        }

        let old = self.state;
        self.state = candidate;
        Ok(UpdateOutcome::Committed {
            old,
            new: candidate,
        })
    }

    /// Enters the suspend window.
    pub(crate) fn suspend(&mut self) {
        if self.phase == SuspendPhase::Suspended {
            return;
        }
        self.phase = SuspendPhase::Suspended;
        if !self.deliver_during_suspend {
            self.pending = Some(self.state);
        }
    }

    /// Leaves the suspend window and replays any buffered state.
    pub(crate) fn resume(&mut self, valid_bits: u32) -> Result<UpdateOutcome> {
        if self.phase == SuspendPhase::Active {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.phase = SuspendPhase::Active;
        match self.pending.take() {
            Some(pending) if !self.deliver_during_suspend => self.update(valid_bits, pending),
            _ => Ok(UpdateOutcome::Unchanged),
        }
    }
}
