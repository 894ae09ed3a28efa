// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cable identifiers.
//!
//! A cable identifier names one kind of external connection (USB, a
//! headphone jack, HDMI, ...). Identifiers are global: the same
//! [`CableId`] means the same kind of cable on every connector, while its
//! bit position inside a connector's state depends on that connector's
//! cable list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Identifier of a cable kind.
///
/// The well-known identifiers are provided as associated constants. Other
/// values are accepted as opaque identifiers and display as `CABLE-<n>`.
///
/// # Examples
///
/// ```
/// use extcon_lib::types::CableId;
///
/// assert_eq!(CableId::USB.name(), Some("USB"));
/// assert_eq!(CableId::JACK_HEADPHONE.to_string(), "HEADPHONE");
/// assert_eq!("HDMI".parse::<CableId>().unwrap(), CableId::DISP_HDMI);
/// assert_eq!(CableId::new(500).to_string(), "CABLE-500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CableId(u32);

impl CableId {
    /// List terminator; never a supported cable.
    pub const NONE: Self = Self(0);

    pub const USB: Self = Self(1);
    pub const USB_HOST: Self = Self(2);

    pub const CHG_USB_SDP: Self = Self(5);
    pub const CHG_USB_DCP: Self = Self(6);
    pub const CHG_USB_CDP: Self = Self(7);
    pub const CHG_USB_ACA: Self = Self(8);
    pub const CHG_USB_FAST: Self = Self(9);
    pub const CHG_USB_SLOW: Self = Self(10);

    pub const JACK_MICROPHONE: Self = Self(20);
    pub const JACK_HEADPHONE: Self = Self(21);
    pub const JACK_LINE_IN: Self = Self(22);
    pub const JACK_LINE_OUT: Self = Self(23);
    pub const JACK_VIDEO_IN: Self = Self(24);
    pub const JACK_VIDEO_OUT: Self = Self(25);
    pub const JACK_SPDIF_IN: Self = Self(26);
    pub const JACK_SPDIF_OUT: Self = Self(27);

    pub const DISP_HDMI: Self = Self(40);
    pub const DISP_MHL: Self = Self(41);
    pub const DISP_DVI: Self = Self(42);
    pub const DISP_VGA: Self = Self(43);

    pub const DOCK: Self = Self(60);
    pub const JIG: Self = Self(61);
    pub const MECHANICAL: Self = Self(62);

    pub const USB_QC2: Self = Self(63);
    pub const USB_MAXIM: Self = Self(64);
    pub const USB_APPLE_500MA: Self = Self(65);
    pub const USB_APPLE_1A: Self = Self(66);
    pub const USB_APPLE_2A: Self = Self(67);
    pub const USB_ACA_NV: Self = Self(68);
    pub const USB_ACA_RIDA: Self = Self(69);
    pub const USB_ACA_RIDB: Self = Self(70);
    pub const USB_ACA_RIDC: Self = Self(71);
    pub const USB_Y_CABLE: Self = Self(72);
    pub const USB_PD: Self = Self(73);

    const NAMES: &'static [(Self, &'static str)] = &[
        (Self::NONE, "NONE"),
        (Self::USB, "USB"),
        (Self::USB_HOST, "USB-HOST"),
        (Self::CHG_USB_SDP, "SDP"),
        (Self::CHG_USB_DCP, "DCP"),
        (Self::CHG_USB_CDP, "CDP"),
        (Self::CHG_USB_ACA, "ACA"),
        (Self::CHG_USB_FAST, "FAST-CHARGER"),
        (Self::CHG_USB_SLOW, "SLOW-CHARGER"),
        (Self::JACK_MICROPHONE, "MICROPHONE"),
        (Self::JACK_HEADPHONE, "HEADPHONE"),
        (Self::JACK_LINE_IN, "LINE-IN"),
        (Self::JACK_LINE_OUT, "LINE-OUT"),
        (Self::JACK_VIDEO_IN, "VIDEO-IN"),
        (Self::JACK_VIDEO_OUT, "VIDEO-OUT"),
        (Self::JACK_SPDIF_IN, "SPDIF-IN"),
        (Self::JACK_SPDIF_OUT, "SPDIF-OUT"),
        (Self::DISP_HDMI, "HDMI"),
        (Self::DISP_MHL, "MHL"),
        (Self::DISP_DVI, "DVI"),
        (Self::DISP_VGA, "VGA"),
        (Self::DOCK, "DOCK"),
        (Self::JIG, "JIG"),
        (Self::MECHANICAL, "MECHANICAL"),
        (Self::USB_QC2, "QC2"),
        (Self::USB_MAXIM, "MAXIM"),
        (Self::USB_APPLE_500MA, "APPLE-500mA"),
        (Self::USB_APPLE_1A, "APPLE-1A"),
        (Self::USB_APPLE_2A, "APPLE-2A"),
        (Self::USB_ACA_NV, "ACA-NV"),
        (Self::USB_ACA_RIDA, "ACA-RIDA"),
        (Self::USB_ACA_RIDB, "ACA-RIDB"),
        (Self::USB_ACA_RIDC, "ACA-RIDC"),
        (Self::USB_Y_CABLE, "Y-CABLE"),
        (Self::USB_PD, "USB-PD"),
    ];

    /// Creates a cable identifier from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns `true` for the [`NONE`](Self::NONE) terminator.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Returns the display name of a well-known cable.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMES
            .iter()
            .find(|(id, _)| id == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for CableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "CABLE-{}", self.0),
        }
    }
}

impl FromStr for CableId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((id, _)) = Self::NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*id);
        }
        s.strip_prefix("CABLE-")
            .unwrap_or(s)
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ValueError::UnknownCableName(s.to_string()))
    }
}

impl From<u32> for CableId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<CableId> for String {
    fn from(id: CableId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CableId {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
