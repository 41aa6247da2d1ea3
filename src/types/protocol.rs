// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device protocol tag.
//!
//! The protocol stored for a device names the device family (and with it the
//! RF encoding and parameter schema) used to drive it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device family selected by the stored protocol string.
///
/// Parsing is case-insensitive, so `"ARCTECH"`, `"arctech"` and `"ArcTech"`
/// all select [`Protocol::ArcTech`].
///
/// # Examples
///
/// ```
/// use tellcore_lib::types::Protocol;
///
/// let protocol: Protocol = "ArcTech".parse().unwrap();
/// assert_eq!(protocol, Protocol::ArcTech);
/// assert_eq!(protocol.as_str(), "arctech");
///
/// assert!("bogus".parse::<Protocol>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Nexa / Proove / KlikAanKlikUit devices (ArcTech chipset).
    ArcTech,
    /// A virtual device forwarding to a list of member devices.
    Group,
    /// Waveman devices (ArcTech-compatible addressing).
    Waveman,
    /// Sartano devices addressed by a ten-position DIP code.
    Sartano,
    /// Ikea Koppla devices.
    Ikea,
}

impl Protocol {
    /// All built-in protocols.
    pub const ALL: [Self; 5] = [
        Self::ArcTech,
        Self::Group,
        Self::Waveman,
        Self::Sartano,
        Self::Ikea,
    ];

    /// Returns the canonical lowercase name stored in settings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ArcTech => "arctech",
            Self::Group => "group",
            Self::Waveman => "waveman",
            Self::Sartano => "sartano",
            Self::Ikea => "ikea",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string does not name a known protocol.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown protocol: {0:?}")]
pub struct UnknownProtocolError(pub String);

impl FromStr for Protocol {
    type Err = UnknownProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|protocol| protocol.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownProtocolError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        for name in ["ARCTECH", "arctech", "ArcTech"] {
            assert_eq!(name.parse::<Protocol>().unwrap(), Protocol::ArcTech);
        }
        assert_eq!("Waveman".parse::<Protocol>().unwrap(), Protocol::Waveman);
        assert_eq!("SARTANO".parse::<Protocol>().unwrap(), Protocol::Sartano);
        assert_eq!("Ikea".parse::<Protocol>().unwrap(), Protocol::Ikea);
        assert_eq!("group".parse::<Protocol>().unwrap(), Protocol::Group);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "bogus".parse::<Protocol>().unwrap_err();
        assert_eq!(err, UnknownProtocolError("bogus".to_string()));
    }

    #[test]
    fn parse_does_not_trim() {
        assert!(" arctech".parse::<Protocol>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for protocol in Protocol::ALL {
            assert_eq!(protocol.to_string().parse::<Protocol>().unwrap(), protocol);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Protocol::ArcTech).unwrap();
        assert_eq!(json, "\"arctech\"");
    }
}
