// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for connectors.

use std::sync::Arc;

use crate::error::{Result, ValueError};
use crate::event::NotificationSink;
use crate::state::ExclusionTable;
use crate::types::{CableId, CableSet, HandleId};

use super::Connector;

/// Builder for [`Connector`].
///
/// The builder is the allocation step: the cable list and the exclusion
/// table are fixed when [`build`](Self::build) is called and cannot be
/// changed afterwards.
///
/// # Examples
///
/// ```
/// use extcon_lib::{CableId, ConnectorBuilder};
///
/// # fn main() -> extcon_lib::Result<()> {
/// let connector = ConnectorBuilder::new(
///     "max77843-muic",
///     [CableId::USB, CableId::USB_HOST, CableId::CHG_USB_DCP, CableId::JIG],
/// )
/// .with_exclusive_group([CableId::USB, CableId::USB_HOST])
/// .with_mutually_exclusive(&[0b1100])
/// .deliver_during_suspend(false)
/// .build()?;
///
/// assert_eq!(connector.mutually_exclusive(), vec![0b1100, 0b0011]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct ConnectorBuilder {
    name: String,
    cables: Vec<CableId>,
    exclusive_masks: Vec<u32>,
    exclusive_groups: Vec<Vec<CableId>>,
    deliver_during_suspend: bool,
    sink: Option<Arc<dyn NotificationSink>>,
    parent: Option<HandleId>,
}

impl ConnectorBuilder {
    /// Starts a connector description from its name and ordered cable list.
    pub fn new(name: impl Into<String>, cables: impl IntoIterator<Item = CableId>) -> Self {
        Self {
            name: name.into(),
            cables: cables.into_iter().collect(),
            exclusive_masks: Vec::new(),
            exclusive_groups: Vec::new(),
            deliver_during_suspend: true,
            sink: None,
            parent: None,
        }
    }

    /// Starts a connector description from a [`CableId::NONE`]-terminated list.
    pub fn from_terminated(name: impl Into<String>, cables: &[CableId]) -> Self {
        Self::new(name, cables.iter().copied().take_while(|c| !c.is_none()))
    }

    /// Adds raw group masks, stopping at the first zero mask.
    pub fn with_mutually_exclusive(mut self, groups: &[u32]) -> Self {
        self.exclusive_masks
            .extend(ExclusionTable::from_terminated(groups).groups());
        self
    }

    /// Adds a group of cables of which at most one may be attached.
    ///
    /// Groups given as cables are appended after raw masks, in call order.
    pub fn with_exclusive_group(mut self, cables: impl IntoIterator<Item = CableId>) -> Self {
        self.exclusive_groups.push(cables.into_iter().collect());
        self
    }

    /// Sets whether changes are delivered while the system is suspended.
    ///
    /// Defaults to `true`.
    pub fn deliver_during_suspend(mut self, deliver: bool) -> Self {
        self.deliver_during_suspend = deliver;
        self
    }

    /// Sets the external notification sink.
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Binds the connector to an external handle for handle-based lookup.
    pub fn with_parent(mut self, handle: HandleId) -> Self {
        self.parent = Some(handle);
        self
    }

    /// Validates the description and allocates the connector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) for
    /// an empty name, an invalid cable list, or an exclusion group naming an
    /// unsupported cable.
    pub fn build(self) -> Result<Arc<Connector>> {
        if self.name.is_empty() {
            return Err(ValueError::EmptyName.into());
        }

        let cables = CableSet::new(self.cables)?;

        let mut masks = self.exclusive_masks;
        for group in &self.exclusive_groups {
            let mut mask = 0u32;
            for cable in group {
                let index = cables
                    .index_of(*cable)
                    .ok_or(ValueError::GroupCableUnsupported(*cable))?;
                mask |= 1 << index;
            }
            if mask != 0 {
                masks.push(mask);
            }
        }

        tracing::debug!(
            connector = %self.name,
            cables = cables.len(),
            groups = masks.len(),
            "connector allocated"
        );

        Ok(Arc::new(Connector::new(
            self.name,
            cables,
            ExclusionTable::new(masks),
            self.deliver_during_suspend,
            self.sink,
            self.parent,
        )))
    }
}

impl std::fmt::Debug for ConnectorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorBuilder")
            .field("name", &self.name)
            .field("cables", &self.cables)
            .field("deliver_during_suspend", &self.deliver_during_suspend)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}
