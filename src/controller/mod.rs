// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller units and their registry.
//!
//! A controller is the physical transceiver through which commands reach
//! devices and from which device events arrive. The manager learns about
//! controllers once, at construction, through a [`ControllerDiscovery`]
//! implementation and keeps them in a [`ControllerRegistry`].

mod discovery;
mod registry;

use std::any::Any;
use std::fmt;

pub use discovery::{ControllerConfig, ControllerDiscovery, StaticControllers};
pub use registry::ControllerRegistry;

/// A physical controller unit.
///
/// Communication with the unit is the concern of the hardware driver; the
/// registry only needs its identity.
pub trait Controller: fmt::Debug + Send + 'static {
    /// The hardware serial identifying the unit.
    fn serial(&self) -> &str;

    /// Upcast used for downcasting to the concrete driver type.
    fn as_any(&self) -> &dyn Any;
}

/// Hardware generation of a TellStick unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TellStickModel {
    /// Transmit-only TellStick.
    Classic,
    /// TellStick Duo, which also receives.
    #[default]
    Duo,
}

/// A TellStick controller identified by its USB serial.
///
/// # Examples
///
/// ```
/// use tellcore_lib::controller::{Controller, TellStick, TellStickModel};
///
/// let duo = TellStick::duo("TSQVB5HU");
/// assert_eq!(duo.serial(), "TSQVB5HU");
/// assert_eq!(duo.model(), TellStickModel::Duo);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TellStick {
    serial: String,
    model: TellStickModel,
}

impl TellStick {
    /// Creates a controller descriptor.
    #[must_use]
    pub fn new(serial: impl Into<String>, model: TellStickModel) -> Self {
        Self {
            serial: serial.into(),
            model,
        }
    }

    /// Creates a TellStick Duo descriptor.
    #[must_use]
    pub fn duo(serial: impl Into<String>) -> Self {
        Self::new(serial, TellStickModel::Duo)
    }

    /// The hardware generation.
    #[must_use]
    pub fn model(&self) -> TellStickModel {
        self.model
    }

    /// Returns `true` if the unit can receive device events.
    #[must_use]
    pub fn can_receive(&self) -> bool {
        self.model == TellStickModel::Duo
    }
}

impl Controller for TellStick {
    fn serial(&self) -> &str {
        &self.serial
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
