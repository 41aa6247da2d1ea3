// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the device manager.

use serde::{Deserialize, Serialize};

use crate::controller::ControllerConfig;
use crate::event::{DEFAULT_CHANNEL_CAPACITY, EventClassification};

/// Global setting that names the transmitter device node by default.
pub const DEFAULT_DEVICE_NODE_SETTING: &str = "deviceNode";

/// Configuration for a [`Manager`](super::Manager).
///
/// Every field has a default, so a host can embed this in its own config file
/// and only spell out what it changes.
///
/// # Examples
///
/// ```
/// use tellcore_lib::controller::ControllerConfig;
/// use tellcore_lib::event::EventClassification;
/// use tellcore_lib::manager::ManagerConfig;
///
/// let config = ManagerConfig::default()
///     .with_event_classification(EventClassification::new(2, 1))
///     .with_controllers(vec![ControllerConfig::duo(1, "A6014HQR")]);
///
/// assert_eq!(config.device_node_setting, "deviceNode");
/// assert_eq!(config.controllers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Global setting read for the device node attached to new devices.
    pub device_node_setting: String,
    /// Classification used by [`Manager::parse_message`](super::Manager::parse_message).
    pub event_classification: EventClassification,
    /// Capacity of the registry event channel.
    pub event_capacity: usize,
    /// Controllers registered when no custom discovery is supplied.
    pub controllers: Vec<ControllerConfig>,
}

impl ManagerConfig {
    /// Sets the global setting key holding the device node path.
    #[must_use]
    pub fn with_device_node_setting(mut self, key: impl Into<String>) -> Self {
        self.device_node_setting = key.into();
        self
    }

    /// Sets the classification forwarded with unclassified messages.
    #[must_use]
    pub fn with_event_classification(mut self, classification: EventClassification) -> Self {
        self.event_classification = classification;
        self
    }

    /// Sets the registry event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Replaces the statically configured controllers.
    #[must_use]
    pub fn with_controllers(mut self, controllers: Vec<ControllerConfig>) -> Self {
        self.controllers = controllers;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            device_node_setting: DEFAULT_DEVICE_NODE_SETTING.to_string(),
            event_classification: EventClassification::DEVICE,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
            controllers: vec![ControllerConfig::default()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControllerId;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();

        assert_eq!(config.device_node_setting, "deviceNode");
        assert_eq!(config.event_classification, EventClassification::new(1, 1));
        assert_eq!(config.event_capacity, 256);
        assert_eq!(config.controllers.len(), 1);
        assert_eq!(config.controllers[0].id, ControllerId::new(1));
        assert_eq!(config.controllers[0].serial, "TSQVB5HU");
    }

    #[test]
    fn builder_methods() {
        let config = ManagerConfig::default()
            .with_device_node_setting("transmitter")
            .with_event_capacity(16)
            .with_controllers(Vec::new());

        assert_eq!(config.device_node_setting, "transmitter");
        assert_eq!(config.event_capacity, 16);
        assert!(config.controllers.is_empty());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{"event_classification": {"class": 4, "number": 2}}"#)
                .unwrap();

        assert_eq!(config.event_classification, EventClassification::new(4, 2));
        assert_eq!(config.device_node_setting, DEFAULT_DEVICE_NODE_SETTING);
        assert_eq!(config.controllers, vec![ControllerConfig::default()]);
    }

    #[test]
    fn json_controllers_table() {
        let config: ManagerConfig = serde_json::from_str(
            r#"{"controllers": [
                {"id": 1, "serial": "A"},
                {"id": 2, "serial": "B", "model": "classic"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(config.controllers.len(), 2);
        assert_eq!(config.controllers[1].serial, "B");
    }
}
