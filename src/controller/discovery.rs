// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller discovery.

use serde::{Deserialize, Serialize};

use crate::types::ControllerId;

use super::{Controller, TellStick, TellStickModel};

/// Serial of the controller registered when nothing else is configured.
pub(crate) const DEFAULT_SERIAL: &str = "TSQVB5HU";

/// Source of the controllers a manager should own.
///
/// The manager calls [`discover`](Self::discover) exactly once, while it is
/// being built. A USB-enumerating implementation can replace
/// [`StaticControllers`] without any change to the manager.
pub trait ControllerDiscovery: Send {
    /// Returns every controller to register, keyed by id.
    fn discover(&mut self) -> Vec<(ControllerId, Box<dyn Controller>)>;
}

/// Configuration entry for one statically known TellStick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Registry id.
    pub id: ControllerId,
    /// USB serial.
    pub serial: String,
    /// Hardware generation.
    #[serde(default)]
    pub model: TellStickModel,
}

impl ControllerConfig {
    /// Creates a TellStick Duo entry.
    #[must_use]
    pub fn duo(id: impl Into<ControllerId>, serial: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            serial: serial.into(),
            model: TellStickModel::Duo,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::duo(1, DEFAULT_SERIAL)
    }
}

/// Discovery over a fixed table of TellStick units.
///
/// # Examples
///
/// ```
/// use tellcore_lib::controller::{ControllerConfig, ControllerDiscovery, StaticControllers};
///
/// let mut discovery = StaticControllers::new(vec![
///     ControllerConfig::duo(1, "TSQVB5HU"),
///     ControllerConfig::duo(2, "A6014HQR"),
/// ]);
/// assert_eq!(discovery.discover().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticControllers {
    entries: Vec<ControllerConfig>,
}

impl StaticControllers {
    /// Creates discovery over the given entries.
    #[must_use]
    pub fn new(entries: Vec<ControllerConfig>) -> Self {
        Self { entries }
    }

    /// Discovery that yields no controllers.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

impl ControllerDiscovery for StaticControllers {
    fn discover(&mut self) -> Vec<(ControllerId, Box<dyn Controller>)> {
        self.entries
            .iter()
            .map(|entry| {
                let controller: Box<dyn Controller> =
                    Box::new(TellStick::new(entry.serial.clone(), entry.model));
                (entry.id, controller)
            })
            .collect()
    }
}
