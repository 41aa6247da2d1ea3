// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `TellCore` library.
//!
//! This module provides the error hierarchy used across the library: device
//! lookup outcomes, device parameter validation, and settings persistence.

use thiserror::Error;

use crate::types::DeviceId;

/// The main error type for this library.
///
/// Two variants describe *expected absences* rather than faults:
/// [`Error::NotConfigured`] and [`Error::UnknownProtocol`]. Use
/// [`Error::is_absent`] (or [`Manager::find_device`](crate::Manager::find_device))
/// to treat them as an empty result.
#[derive(Debug, Error)]
pub enum Error {
    /// No protocol is stored for the device.
    #[error("device {0} is not configured")]
    NotConfigured(DeviceId),

    /// The stored protocol does not name a known device family.
    #[error("device {id} uses unknown protocol {protocol:?}")]
    UnknownProtocol {
        /// The device that was requested.
        id: DeviceId,
        /// The protocol string as stored.
        protocol: String,
    },

    /// The stored parameters were rejected by the device variant.
    #[error("failed to construct device {id}: {source}")]
    Construction {
        /// The device that was requested.
        id: DeviceId,
        /// The underlying validation failure.
        #[source]
        source: ConstructionError,
    },

    /// Writing to the settings store failed.
    #[error("failed to persist settings for device {id}: {source}")]
    Persistence {
        /// The device whose settings were written.
        id: DeviceId,
        /// The store failure.
        #[source]
        source: SettingsError,
    },

    /// The manager has been shut down.
    #[error("manager is closed")]
    Closed,
}

impl Error {
    /// Returns `true` if this error means "no device" rather than a fault.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::NotConfigured(_) | Self::UnknownProtocol { .. })
    }
}

/// Errors raised by device variants when stored parameters are malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A required parameter is absent or empty.
    #[error("missing parameter {0:?}")]
    MissingParameter(&'static str),

    /// A parameter is present but cannot be parsed or is out of range.
    #[error("invalid value {value:?} for parameter {key:?}: {reason}")]
    InvalidParameter {
        /// The parameter key.
        key: &'static str,
        /// The stored value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConstructionError {
    pub(crate) fn invalid(
        key: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by a [`SettingsStore`](crate::settings::SettingsStore) write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The store does not accept writes.
    #[error("settings store is read-only")]
    ReadOnly,

    /// The backing storage failed.
    #[error("settings backend error: {0}")]
    Backend(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_is_absent() {
        assert!(Error::NotConfigured(DeviceId::new(3)).is_absent());
    }

    #[test]
    fn unknown_protocol_is_absent() {
        let err = Error::UnknownProtocol {
            id: DeviceId::new(1),
            protocol: "bogus".to_string(),
        };
        assert!(err.is_absent());
        assert_eq!(err.to_string(), "device 1 uses unknown protocol \"bogus\"");
    }

    #[test]
    fn construction_is_a_fault() {
        let err = Error::Construction {
            id: DeviceId::new(7),
            source: ConstructionError::MissingParameter("nexa_house"),
        };
        assert!(!err.is_absent());
        assert_eq!(
            err.to_string(),
            "failed to construct device 7: missing parameter \"nexa_house\""
        );
    }

    #[test]
    fn invalid_parameter_display() {
        let err = ConstructionError::invalid("nexa_unit", "42", "must be in 1..=16");
        assert_eq!(
            err.to_string(),
            "invalid value \"42\" for parameter \"nexa_unit\": must be in 1..=16"
        );
    }

    #[test]
    fn persistence_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::Persistence {
            id: DeviceId::new(2),
            source: SettingsError::ReadOnly,
        };
        assert!(err.source().is_some());
        assert!(!err.is_absent());
    }
}
