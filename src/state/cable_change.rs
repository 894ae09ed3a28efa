// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-cable edges between two committed states.
//!
//! A committed transition `old -> new` is broken down into one
//! [`CableChange`] per flipped bit. Changes are produced in ascending bit
//! order, which is the order in which observers are notified.
//!
//! # Examples
//!
//! ```
//! use extcon_lib::state::{CableChange, changed_cables};
//!
//! let changes: Vec<CableChange> = changed_cables(0b101, 0b011, 3).collect();
//! assert_eq!(
//!     changes,
//!     vec![
//!         CableChange { index: 1, attached: true },
//!         CableChange { index: 2, attached: false },
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};

/// Edge of a single cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableChange {
    /// Bit index of the cable inside its connector.
    pub index: usize,
    /// `true` if the cable became attached, `false` if it was detached.
    pub attached: bool,
}

impl CableChange {
    /// Returns `true` for an attach edge.
    #[must_use]
    pub fn is_attach(&self) -> bool {
        self.attached
    }

    /// Returns `true` for a detach edge.
    #[must_use]
    pub fn is_detach(&self) -> bool {
        !self.attached
    }
}

/// Iterates over the cables whose bit differs between `old` and `new`.
///
/// Only the first `count` bits are considered.
pub fn changed_cables(old: u32, new: u32, count: usize) -> impl Iterator<Item = CableChange> {
    let diff = old ^ new;
    (0..count.min(32))
        .filter(move |index| diff & (1 << index) != 0)
        .map(move |index| CableChange {
            index,
            attached: new & (1 << index) != 0,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_changes_for_equal_states() {
        assert_eq!(changed_cables(0b1010, 0b1010, 4).count(), 0);
    }

    #[test]
    fn attach_and_detach_edges() {
        let changes: Vec<_> = changed_cables(0b01, 0b10, 2).collect();
        assert_eq!(changes.len(), 2);
        assert!(changes[0].is_detach());
        assert_eq!(changes[0].index, 0);
        assert!(changes[1].is_attach());
        assert_eq!(changes[1].index, 1);
    }

    #[test]
    fn ignores_bits_beyond_count() {
        let changes: Vec<_> = changed_cables(0, 0b1_0001, 2).collect();
        assert_eq!(changes, vec![CableChange { index: 0, attached: true }]);
    }

    #[test]
    fn highest_bit() {
        let changes: Vec<_> = changed_cables(0, 1 << 31, 32).collect();
        assert_eq!(changes, vec![CableChange { index: 31, attached: true }]);
    }
}
