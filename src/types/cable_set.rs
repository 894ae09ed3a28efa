// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered set of supported cables and index resolution.

use std::collections::HashSet;

use crate::error::ValueError;

use super::{CableId, MAX_CABLES};

/// The cables supported by one connector, in bit order.
///
/// Position `i` in the set is bit `i` of the connector state. The set is
/// validated on construction: at most [`MAX_CABLES`] entries, no duplicates
/// and no [`CableId::NONE`].
///
/// # Examples
///
/// ```
/// use extcon_lib::types::{CableId, CableSet};
///
/// let cables = CableSet::new([CableId::USB, CableId::DISP_HDMI]).unwrap();
/// assert_eq!(cables.len(), 2);
/// assert_eq!(cables.index_of(CableId::DISP_HDMI), Some(1));
/// assert_eq!(cables.valid_bits(), 0b11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CableSet {
    cables: Vec<CableId>,
}

impl CableSet {
    /// Creates a cable set from an ordered list of cables.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TooManyCables`] for more than [`MAX_CABLES`]
    /// cables, [`ValueError::NoneCable`] if the terminator appears in the
    /// list and [`ValueError::DuplicateCable`] for repeated entries.
    pub fn new(cables: impl IntoIterator<Item = CableId>) -> Result<Self, ValueError> {
        let cables: Vec<CableId> = cables.into_iter().collect();

        if cables.len() > MAX_CABLES {
            return Err(ValueError::TooManyCables {
                count: cables.len(),
                max: MAX_CABLES,
            });
        }

        let mut seen = HashSet::with_capacity(cables.len());
        for cable in &cables {
            if cable.is_none() {
                return Err(ValueError::NoneCable);
            }
            if !seen.insert(*cable) {
                return Err(ValueError::DuplicateCable(*cable));
            }
        }

        Ok(Self { cables })
    }

    /// Creates a cable set from a [`CableId::NONE`]-terminated list.
    ///
    /// Entries after the first terminator are ignored. A list without a
    /// terminator is taken whole.
    ///
    /// # Errors
    ///
    /// Same as [`CableSet::new`].
    pub fn from_terminated(cables: &[CableId]) -> Result<Self, ValueError> {
        Self::new(cables.iter().copied().take_while(|c| !c.is_none()))
    }

    /// Returns the number of supported cables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cables.len()
    }

    /// Returns `true` if no cables are supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    /// Resolves a cable identifier to its bit index.
    #[must_use]
    pub fn index_of(&self, cable: CableId) -> Option<usize> {
        self.cables.iter().position(|c| *c == cable)
    }

    /// Returns `true` if the cable is supported.
    #[must_use]
    pub fn contains(&self, cable: CableId) -> bool {
        self.index_of(cable).is_some()
    }

    /// Returns the cable at a bit index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CableId> {
        self.cables.get(index).copied()
    }

    /// Iterates over the cables in bit order.
    pub fn iter(&self) -> impl Iterator<Item = CableId> + '_ {
        self.cables.iter().copied()
    }

    /// Returns the mask of state bits backed by a cable.
    #[must_use]
    pub fn valid_bits(&self) -> u32 {
        match self.cables.len() {
            0 => 0,
            n if n >= MAX_CABLES => u32::MAX,
            n => (1u32 << n) - 1,
        }
    }
}

impl<'a> IntoIterator for &'a CableSet {
    type Item = CableId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, CableId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cables.iter().copied()
    }
}
