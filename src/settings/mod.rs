// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistent device settings.
//!
//! The manager reads each device's protocol, model and protocol-specific
//! parameters through the [`SettingsStore`] trait and writes protocol and
//! model changes back through it. How settings are persisted is up to the
//! implementation; [`MemorySettings`] keeps everything in memory and can be
//! snapshotted for hosts that want to save it themselves.

mod memory;

use std::sync::Arc;

use crate::error::SettingsError;
use crate::types::DeviceId;

pub use memory::{DeviceSettings, MemorySettings, SettingsSnapshot};

/// Storage backend for device configuration.
///
/// Reads are infallible: a value that cannot be read is reported as absent.
/// Implementations may block; the manager never calls them while holding its
/// registry lock.
pub trait SettingsStore: Send + Sync {
    /// The stored protocol name. `None` or an empty string means the device
    /// is not configured.
    fn protocol(&self, id: DeviceId) -> Option<String>;

    /// The stored model, `0` if unset.
    fn model(&self, id: DeviceId) -> i32;

    /// A protocol-specific parameter.
    fn device_parameter(&self, id: DeviceId, key: &str) -> Option<String>;

    /// A global setting, such as the transmitter device node.
    fn setting(&self, key: &str) -> Option<String>;

    /// Persists a new protocol.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the value could not be persisted.
    fn set_protocol(&self, id: DeviceId, protocol: &str) -> Result<(), SettingsError>;

    /// Persists a new model.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the value could not be persisted.
    fn set_model(&self, id: DeviceId, model: i32) -> Result<(), SettingsError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn protocol(&self, id: DeviceId) -> Option<String> {
        (**self).protocol(id)
    }

    fn model(&self, id: DeviceId) -> i32 {
        (**self).model(id)
    }

    fn device_parameter(&self, id: DeviceId, key: &str) -> Option<String> {
        (**self).device_parameter(id, key)
    }

    fn setting(&self, key: &str) -> Option<String> {
        (**self).setting(key)
    }

    fn set_protocol(&self, id: DeviceId, protocol: &str) -> Result<(), SettingsError> {
        (**self).set_protocol(id, protocol)
    }

    fn set_model(&self, id: DeviceId, model: i32) -> Result<(), SettingsError> {
        (**self).set_model(id, model)
    }
}
