// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutual-exclusion groups.

/// Table of mutually exclusive cable groups.
///
/// Each group is a bitmask over the connector state. A state is valid when
/// no group has more than one of its bits set.
///
/// # Examples
///
/// ```
/// use extcon_lib::state::ExclusionTable;
///
/// // USB (bit 0) and USB-HOST (bit 1) cannot both be attached,
/// // nor can HDMI (bit 2) and DVI (bit 3).
/// let table = ExclusionTable::new([0b0011, 0b1100]);
///
/// assert_eq!(table.check(0b0101), None);
/// assert_eq!(table.check(0b0011), Some(1));
/// assert_eq!(table.check(0b1111), Some(1));
/// assert_eq!(table.check(0b1101), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionTable {
    groups: Vec<u32>,
}

impl ExclusionTable {
    /// Creates a table from group masks in declaration order.
    #[must_use]
    pub fn new(groups: impl IntoIterator<Item = u32>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    /// Creates a table from a zero-terminated list of group masks.
    #[must_use]
    pub fn from_terminated(groups: &[u32]) -> Self {
        Self::new(groups.iter().copied().take_while(|g| *g != 0))
    }

    /// Returns the 1-based index of the first group violated by `candidate`.
    ///
    /// Only the first offending group in declaration order is reported.
    #[must_use]
    pub fn check(&self, candidate: u32) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| (candidate & group).count_ones() > 1)
            .map(|i| i + 1)
    }

    /// Returns the group masks.
    #[must_use]
    pub fn groups(&self) -> &[u32] {
        &self.groups
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the table has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
