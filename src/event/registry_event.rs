// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry lifecycle events.

use serde::{Deserialize, Serialize};

use crate::types::{DeviceId, Protocol};

/// Events emitted by the manager when its registry changes.
///
/// # Examples
///
/// ```
/// use tellcore_lib::event::RegistryEvent;
/// use tellcore_lib::types::{DeviceId, Protocol};
///
/// let loaded = RegistryEvent::device_loaded(DeviceId::new(3), Protocol::ArcTech);
/// assert_eq!(loaded.device_id(), Some(DeviceId::new(3)));
///
/// let delivered = RegistryEvent::MessageDelivered { delivered: 2, failed: 0 };
/// assert_eq!(delivered.device_id(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A device was built and cached.
    DeviceLoaded {
        /// The loaded device.
        device_id: DeviceId,
        /// The protocol it was built for.
        protocol: Protocol,
    },

    /// A cached device was dropped after a protocol change.
    DeviceEvicted {
        /// The evicted device.
        device_id: DeviceId,
    },

    /// The model of a device was persisted.
    ModelChanged {
        /// The device.
        device_id: DeviceId,
        /// The new model.
        model: i32,
    },

    /// A raw message was handed to the device event callbacks.
    MessageDelivered {
        /// Callbacks that returned normally.
        delivered: usize,
        /// Callbacks that panicked.
        failed: usize,
    },
}

impl RegistryEvent {
    /// Returns the device this event concerns, if any.
    #[must_use]
    pub fn device_id(&self) -> Option<DeviceId> {
        match self {
            Self::DeviceLoaded { device_id, .. }
            | Self::DeviceEvicted { device_id }
            | Self::ModelChanged { device_id, .. } => Some(*device_id),
            Self::MessageDelivered { .. } => None,
        }
    }

    /// Returns `true` for cache membership changes (loaded/evicted).
    #[must_use]
    pub fn is_cache_change(&self) -> bool {
        matches!(
            self,
            Self::DeviceLoaded { .. } | Self::DeviceEvicted { .. }
        )
    }

    /// Creates a device loaded event.
    #[must_use]
    pub fn device_loaded(device_id: DeviceId, protocol: Protocol) -> Self {
        Self::DeviceLoaded {
            device_id,
            protocol,
        }
    }

    /// Creates a device evicted event.
    #[must_use]
    pub fn device_evicted(device_id: DeviceId) -> Self {
        Self::DeviceEvicted { device_id }
    }

    /// Creates a model changed event.
    #[must_use]
    pub fn model_changed(device_id: DeviceId, model: i32) -> Self {
        Self::ModelChanged { device_id, model }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_extraction() {
        let id = DeviceId::new(7);

        assert_eq!(RegistryEvent::device_loaded(id, Protocol::Ikea).device_id(), Some(id));
        assert_eq!(RegistryEvent::device_evicted(id).device_id(), Some(id));
        assert_eq!(RegistryEvent::model_changed(id, 2).device_id(), Some(id));
        assert_eq!(
            RegistryEvent::MessageDelivered {
                delivered: 1,
                failed: 0
            }
            .device_id(),
            None
        );
    }

    #[test]
    fn cache_change_events() {
        let id = DeviceId::new(1);

        assert!(RegistryEvent::device_loaded(id, Protocol::Group).is_cache_change());
        assert!(RegistryEvent::device_evicted(id).is_cache_change());
        assert!(!RegistryEvent::model_changed(id, 1).is_cache_change());
    }

    #[test]
    fn serializes_with_protocol_name() {
        let event = RegistryEvent::device_loaded(DeviceId::new(4), Protocol::Sartano);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"DeviceLoaded": {"device_id": 4, "protocol": "sartano"}})
        );
    }
}
