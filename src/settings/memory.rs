// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory settings store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::types::{DeviceId, Protocol};

use super::SettingsStore;

/// Stored configuration of one device.
///
/// # Examples
///
/// ```
/// use tellcore_lib::settings::DeviceSettings;
/// use tellcore_lib::types::Protocol;
///
/// let lamp = DeviceSettings::new(Protocol::ArcTech)
///     .with_model(1)
///     .with_parameter("nexa_house", "A")
///     .with_parameter("nexa_unit", "2");
///
/// assert_eq!(lamp.protocol, "arctech");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Protocol name as stored. Empty means unconfigured.
    pub protocol: String,
    /// Device model.
    pub model: i32,
    /// Protocol-specific parameters.
    pub parameters: BTreeMap<String, String>,
}

impl DeviceSettings {
    /// Creates settings for a device using a built-in protocol.
    #[must_use]
    pub fn new(protocol: Protocol) -> Self {
        Self::with_protocol_name(protocol.as_str())
    }

    /// Creates settings with an arbitrary protocol string, as a user or an
    /// older configuration might have stored it.
    #[must_use]
    pub fn with_protocol_name(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            ..Self::default()
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: i32) -> Self {
        self.model = model;
        self
    }

    /// Adds a protocol-specific parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Serializable copy of everything held by a [`MemorySettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsSnapshot {
    /// Per-device settings.
    pub devices: BTreeMap<DeviceId, DeviceSettings>,
    /// Global settings.
    pub settings: BTreeMap<String, String>,
}

/// Thread-safe settings store held entirely in memory.
///
/// Writes can be disabled with [`set_read_only`](Self::set_read_only), which
/// makes every write fail with [`SettingsError::ReadOnly`].
#[derive(Debug, Default)]
pub struct MemorySettings {
    data: RwLock<SettingsSnapshot>,
    read_only: AtomicBool,
}

impl MemorySettings {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: SettingsSnapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
            read_only: AtomicBool::new(false),
        }
    }

    /// Adds or replaces a device's settings.
    #[must_use]
    pub fn with_device(self, id: DeviceId, settings: DeviceSettings) -> Self {
        self.insert_device(id, settings);
        self
    }

    /// Adds or replaces a global setting.
    #[must_use]
    pub fn with_setting(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.write().settings.insert(key.into(), value.into());
        self
    }

    /// Adds or replaces a device's settings.
    pub fn insert_device(&self, id: DeviceId, settings: DeviceSettings) {
        self.data.write().devices.insert(id, settings);
    }

    /// Sets a protocol-specific parameter, creating the device entry if needed.
    pub fn set_device_parameter(
        &self,
        id: DeviceId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.data
            .write()
            .devices
            .entry(id)
            .or_default()
            .parameters
            .insert(key.into(), value.into());
    }

    /// Removes a device's settings, returning them.
    pub fn remove_device(&self, id: DeviceId) -> Option<DeviceSettings> {
        self.data.write().devices.remove(&id)
    }

    /// Enables or disables write rejection.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Returns a copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> SettingsSnapshot {
        self.data.read().clone()
    }

    fn check_writable(&self) -> Result<(), SettingsError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(SettingsError::ReadOnly);
        }
        Ok(())
    }
}

impl SettingsStore for MemorySettings {
    fn protocol(&self, id: DeviceId) -> Option<String> {
        self.data
            .read()
            .devices
            .get(&id)
            .map(|device| device.protocol.clone())
    }

    fn model(&self, id: DeviceId) -> i32 {
        self.data
            .read()
            .devices
            .get(&id)
            .map_or(0, |device| device.model)
    }

    fn device_parameter(&self, id: DeviceId, key: &str) -> Option<String> {
        self.data
            .read()
            .devices
            .get(&id)
            .and_then(|device| device.parameters.get(key).cloned())
    }

    fn setting(&self, key: &str) -> Option<String> {
        self.data.read().settings.get(key).cloned()
    }

    fn set_protocol(&self, id: DeviceId, protocol: &str) -> Result<(), SettingsError> {
        self.check_writable()?;
        self.data.write().devices.entry(id).or_default().protocol = protocol.to_string();
        Ok(())
    }

    fn set_model(&self, id: DeviceId, model: i32) -> Result<(), SettingsError> {
        self.check_writable()?;
        self.data.write().devices.entry(id).or_default().model = model;
        Ok(())
    }
}
