// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device and controller identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a configured device.
///
/// Device ids are assigned externally (by whoever writes the settings store)
/// and are used as the key of the device registry.
///
/// # Examples
///
/// ```
/// use tellcore_lib::types::DeviceId;
///
/// let id = DeviceId::new(4);
/// assert_eq!(id.value(), 4);
/// assert_eq!(id.to_string(), "4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(i32);

impl DeviceId {
    /// Creates a device identifier from its raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for DeviceId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<DeviceId> for i32 {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

/// Identifier of a controller unit in the controller registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(u32);

impl ControllerId {
    /// Creates a controller identifier from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ControllerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_equality() {
        assert_eq!(DeviceId::new(1), DeviceId::from(1));
        assert_ne!(DeviceId::new(1), DeviceId::new(2));
    }

    #[test]
    fn device_id_ordering() {
        let mut ids = vec![DeviceId::new(3), DeviceId::new(-1), DeviceId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![DeviceId::new(-1), DeviceId::new(2), DeviceId::new(3)]);
    }

    #[test]
    fn hashable() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(DeviceId::new(5));
        set.insert(DeviceId::new(5));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn controller_id_display() {
        assert_eq!(ControllerId::new(1).to_string(), "1");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&DeviceId::new(12)).unwrap();
        assert_eq!(json, "12");
        let id: ControllerId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ControllerId::new(7));
    }
}
