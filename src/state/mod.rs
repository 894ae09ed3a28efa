// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connector state management types.
//!
//! This module provides the building blocks of the state store:
//!
//! - [`ExclusionTable`] - Mutually exclusive cable groups checked before commit
//! - [`CableChange`] / [`changed_cables`] - Per-cable edges of a committed transition
//! - [`StateSnapshot`] - Post-commit view handed to notification sinks
//! - [`UpdateOutcome`] - What a state update did (nothing, deferred, committed)
//!
//! # Examples
//!
//! ```
//! use extcon_lib::state::ExclusionTable;
//!
//! let table = ExclusionTable::new([0b11]);
//! assert_eq!(table.check(0b01), None);
//! assert_eq!(table.check(0b11), Some(1));
//! ```

mod cable_change;
mod connector_state;
mod exclusion;
mod snapshot;

pub use cable_change::{CableChange, changed_cables};
pub(crate) use connector_state::ConnectorState;
pub use connector_state::{Lifecycle, SuspendPhase, UpdateOutcome};
pub use exclusion::ExclusionTable;
pub use snapshot::{CableStatus, ENV_ENTRY_MAX, StateSnapshot};
