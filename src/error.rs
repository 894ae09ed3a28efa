// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the extcon library.
//!
//! Every fallible operation returns [`Error`]. Construction-time validation
//! of cable lists and names is reported through [`ValueError`], which is
//! wrapped into [`Error::InvalidArgument`].

use thiserror::Error;

use crate::types::CableId;

/// The main error type for this library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValueError),

    /// A connector with the same name is already registered.
    #[error("a connector named {0:?} is already registered")]
    DuplicateName(String),

    /// The connector, cable or subscription could not be found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The cable is not one of the connector's supported cables.
    #[error("cable {cable} is not supported by {connector:?}")]
    Unsupported {
        /// Name of the connector that was queried.
        connector: String,
        /// The cable that could not be resolved.
        cable: CableId,
    },

    /// A resolved cable index is outside the connector's cable list.
    #[error("cable index {index} is out of range (connector has {count} cables)")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of supported cables.
        count: usize,
    },

    /// The requested state would attach two cables of one exclusion group.
    #[error("state {state:#010x} violates mutually exclusive group {group}")]
    ExclusivityViolation {
        /// 1-based index of the first violated group.
        group: usize,
        /// The rejected candidate state.
        state: u32,
    },

    /// Bookkeeping storage could not be allocated.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The handle refers to a connector that is not registered yet.
    #[error("connector for handle {0} is not available yet, retry later")]
    RetryLater(u64),

    /// The connector was unregistered and cannot be used anymore.
    #[error("connector {0:?} has been unregistered")]
    Unregistered(String),
}

/// Errors raised while validating connector descriptions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// More cables were supplied than fit in the state bitmask.
    #[error("{count} cables exceed the maximum of {max}")]
    TooManyCables {
        /// Number of cables supplied.
        count: usize,
        /// Maximum supported.
        max: usize,
    },

    /// The same cable appears twice in one connector.
    #[error("cable {0} is listed more than once")]
    DuplicateCable(CableId),

    /// The terminator sentinel was used as a real cable.
    #[error("the NONE cable cannot be supported")]
    NoneCable,

    /// The connector name is empty.
    #[error("connector name must not be empty")]
    EmptyName,

    /// An exclusion group names a cable the connector does not support.
    #[error("exclusion group cable {0} is not a supported cable")]
    GroupCableUnsupported(CableId),

    /// A cable display name is not part of the known enumeration.
    #[error("unknown cable name: {0}")]
    UnknownCableName(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
