// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-time view of a connector state.

use std::collections::TryReserveError;
use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::types::{CableId, CableSet};

/// Size of the scratch buffer used to render a snapshot.
const RENDER_BUFFER_LEN: usize = 4096;

/// Maximum length of one rendered environment entry, terminator included.
pub const ENV_ENTRY_MAX: usize = 120;

/// Attach status of one cable inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableStatus {
    /// The cable.
    pub cable: CableId,
    /// Whether it is attached.
    pub attached: bool,
}

/// Snapshot of a connector's committed state.
///
/// A snapshot is taken from the `(old, new)` pair captured when a change is
/// committed, so it always reflects the exact post-commit bits even if the
/// connector has moved on since.
///
/// # Examples
///
/// ```
/// use extcon_lib::state::StateSnapshot;
/// use extcon_lib::types::{CableId, CableSet};
///
/// let cables = CableSet::new([CableId::USB, CableId::DISP_HDMI]).unwrap();
/// let snapshot = StateSnapshot::new("muic", None, &cables, 0b10);
///
/// assert_eq!(snapshot.pairs(), vec!["USB=0", "HDMI=1"]);
/// assert_eq!(snapshot.to_string(), "USB=0\nHDMI=1\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Connector name.
    pub name: String,
    /// Device number assigned at registration (`extcon<N>`), if registered.
    pub dev_name: Option<String>,
    /// Raw state bitmask.
    pub state: u32,
    /// Per-cable status in bit order.
    pub cables: Vec<CableStatus>,
}

impl StateSnapshot {
    /// Builds a snapshot of `state` for a connector's cable list.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dev_name: Option<String>,
        cables: &CableSet,
        state: u32,
    ) -> Self {
        let cables = cables
            .iter()
            .enumerate()
            .map(|(index, cable)| CableStatus {
                cable,
                attached: state & (1 << index) != 0,
            })
            .collect();

        Self {
            name: name.into(),
            dev_name,
            state,
            cables,
        }
    }

    /// Returns the attach status of a cable, if it is part of the snapshot.
    #[must_use]
    pub fn is_attached(&self, cable: CableId) -> Option<bool> {
        self.cables
            .iter()
            .find(|status| status.cable == cable)
            .map(|status| status.attached)
    }

    /// Returns the `cableName=0|1` pairs in bit order.
    #[must_use]
    pub fn pairs(&self) -> Vec<String> {
        self.cables
            .iter()
            .map(|status| format!("{}={}", status.cable, u8::from(status.attached)))
            .collect()
    }

    /// Renders the `NAME=` and `STATE=` environment entries.
    ///
    /// Each entry is truncated to [`ENV_ENTRY_MAX`]` - 1` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendering buffer cannot be allocated.
    pub fn env(&self) -> Result<Vec<String>, TryReserveError> {
        self.env_with_buffer(RENDER_BUFFER_LEN)
    }

    pub(crate) fn env_with_buffer(&self, capacity: usize) -> Result<Vec<String>, TryReserveError> {
        let mut buf = String::new();
        buf.try_reserve(capacity)?;

        let mut env = Vec::with_capacity(2);

        buf.push_str(&self.name);
        env.push(bounded_entry("NAME", &buf));

        buf.clear();
        // Writing into a String cannot fail.
        let _ = write!(buf, "{self}");
        if buf.ends_with('\n') {
            buf.pop();
        }
        env.push(bounded_entry("STATE", &buf));

        Ok(env)
    }
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cables.is_empty() {
            return writeln!(f, "{}", self.state);
        }
        for status in &self.cables {
            writeln!(f, "{}={}", status.cable, u8::from(status.attached))?;
        }
        Ok(())
    }
}

fn bounded_entry(key: &str, value: &str) -> String {
    let mut entry = format!("{key}={value}");
    if entry.len() >= ENV_ENTRY_MAX {
        let mut end = ENV_ENTRY_MAX - 1;
        while !entry.is_char_boundary(end) {
            end -= 1;
        }
        entry.truncate(end);
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb_hdmi() -> CableSet {
        CableSet::new([CableId::USB, CableId::DISP_HDMI]).unwrap()
    }

    #[test]
    fn snapshot_reflects_bits() {
        let snapshot = StateSnapshot::new("dev", None, &usb_hdmi(), 0b01);
        assert_eq!(snapshot.is_attached(CableId::USB), Some(true));
        assert_eq!(snapshot.is_attached(CableId::DISP_HDMI), Some(false));
        assert_eq!(snapshot.is_attached(CableId::DOCK), None);
    }

    #[test]
    fn env_entries() {
        let snapshot = StateSnapshot::new("max14577-muic", None, &usb_hdmi(), 0b11);
        let env = snapshot.env().unwrap();
        assert_eq!(env, vec!["NAME=max14577-muic", "STATE=USB=1\nHDMI=1"]);
    }

    #[test]
    fn cableless_connector_renders_raw_state() {
        let snapshot = StateSnapshot::new("raw", None, &CableSet::default(), 0);
        assert_eq!(snapshot.to_string(), "0\n");
        assert_eq!(snapshot.env().unwrap()[1], "STATE=0");
    }

    #[test]
    fn long_state_is_truncated() {
        let cables = CableSet::new((100..132).map(CableId::new)).unwrap();
        let snapshot = StateSnapshot::new("wide", None, &cables, u32::MAX);
        let env = snapshot.env().unwrap();
        assert_eq!(env[1].len(), ENV_ENTRY_MAX - 1);
        assert!(env[1].starts_with("STATE=CABLE-100=1\n"));
    }

    #[test]
    fn env_fails_when_buffer_cannot_be_reserved() {
        let snapshot = StateSnapshot::new("dev", None, &usb_hdmi(), 0);
        assert!(snapshot.env_with_buffer(usize::MAX).is_err());
    }

    #[test]
    fn serializes_to_json() {
        let snapshot = StateSnapshot::new("dev", Some("extcon0".to_string()), &usb_hdmi(), 0b10);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "dev");
        assert_eq!(json["dev_name"], "extcon0");
        assert_eq!(json["cables"][1]["cable"], "HDMI");
        assert_eq!(json["cables"][1]["attached"], true);
    }
}
