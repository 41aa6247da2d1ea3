// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol-keyed device construction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConstructionError;
use crate::types::Protocol;

use super::{Device, DeviceParameters, Group, Ikea, Nexa, Sartano, Waveman};

/// Constructor invoked with the stored model and parameters.
pub type BuildFn =
    Arc<dyn Fn(i32, &DeviceParameters) -> Result<Box<dyn Device>, ConstructionError> + Send + Sync>;

/// How to build one device family: which parameters to read and how to turn
/// them into a device.
#[derive(Clone)]
pub struct DeviceBlueprint {
    parameters: Vec<&'static str>,
    build: BuildFn,
}

impl DeviceBlueprint {
    /// Creates a blueprint reading `parameters` from settings before `build`.
    #[must_use]
    pub fn new<F>(parameters: &[&'static str], build: F) -> Self
    where
        F: Fn(i32, &DeviceParameters) -> Result<Box<dyn Device>, ConstructionError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            parameters: parameters.to_vec(),
            build: Arc::new(build),
        }
    }

    /// Parameter keys to read from the settings store.
    #[must_use]
    pub fn parameters(&self) -> &[&'static str] {
        &self.parameters
    }

    /// Builds a device.
    ///
    /// # Errors
    ///
    /// Propagates the variant's [`ConstructionError`].
    pub fn build(
        &self,
        model: i32,
        params: &DeviceParameters,
    ) -> Result<Box<dyn Device>, ConstructionError> {
        (self.build)(model, params)
    }
}

impl fmt::Debug for DeviceBlueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBlueprint")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Table mapping each [`Protocol`] to the blueprint that builds it.
///
/// [`DeviceFactory::default`] registers every built-in family. Embedders can
/// [`register`](Self::register) a replacement blueprint for a protocol, for
/// example to wrap a variant with extra behaviour.
///
/// # Examples
///
/// ```
/// use tellcore_lib::device::{DeviceFactory, DeviceParameters};
/// use tellcore_lib::types::Protocol;
///
/// let factory = DeviceFactory::default();
/// let blueprint = factory.blueprint(Protocol::Sartano).unwrap();
/// assert_eq!(blueprint.parameters(), &["sartano_code"]);
///
/// let params = DeviceParameters::new().with("sartano_code", "0101010101");
/// let device = blueprint.build(1, &params).unwrap();
/// assert_eq!(device.protocol(), Protocol::Sartano);
/// ```
#[derive(Debug, Clone)]
pub struct DeviceFactory {
    blueprints: HashMap<Protocol, DeviceBlueprint>,
}

impl DeviceFactory {
    /// Creates a factory with no registered protocols.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            blueprints: HashMap::new(),
        }
    }

    /// Registers a blueprint, returning the one it replaced.
    pub fn register(
        &mut self,
        protocol: Protocol,
        blueprint: DeviceBlueprint,
    ) -> Option<DeviceBlueprint> {
        self.blueprints.insert(protocol, blueprint)
    }

    /// Returns the blueprint for a protocol.
    #[must_use]
    pub fn blueprint(&self, protocol: Protocol) -> Option<&DeviceBlueprint> {
        self.blueprints.get(&protocol)
    }

    /// Returns `true` if the protocol can be built.
    #[must_use]
    pub fn supports(&self, protocol: Protocol) -> bool {
        self.blueprints.contains_key(&protocol)
    }
}

impl Default for DeviceFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register(
            Protocol::ArcTech,
            DeviceBlueprint::new(Nexa::PARAMETERS, |model, params| {
                Ok(Box::new(Nexa::from_parameters(model, params)?))
            }),
        );
        factory.register(
            Protocol::Group,
            DeviceBlueprint::new(Group::PARAMETERS, |model, params| {
                Ok(Box::new(Group::from_parameters(model, params)?))
            }),
        );
        factory.register(
            Protocol::Waveman,
            DeviceBlueprint::new(Waveman::PARAMETERS, |model, params| {
                Ok(Box::new(Waveman::from_parameters(model, params)?))
            }),
        );
        factory.register(
            Protocol::Sartano,
            DeviceBlueprint::new(Sartano::PARAMETERS, |model, params| {
                Ok(Box::new(Sartano::from_parameters(model, params)?))
            }),
        );
        factory.register(
            Protocol::Ikea,
            DeviceBlueprint::new(Ikea::PARAMETERS, |model, params| {
                Ok(Box::new(Ikea::from_parameters(model, params)?))
            }),
        );
        factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_supports_every_protocol() {
        let factory = DeviceFactory::default();
        for protocol in Protocol::ALL {
            assert!(factory.supports(protocol), "{protocol} missing");
        }
    }

    #[test]
    fn empty_supports_nothing() {
        let factory = DeviceFactory::empty();
        assert!(Protocol::ALL.iter().all(|p| !factory.supports(*p)));
    }

    #[test]
    fn built_device_matches_protocol() {
        let factory = DeviceFactory::default();
        let params = DeviceParameters::new()
            .with("nexa_house", "A")
            .with("nexa_unit", "1");

        for protocol in [Protocol::ArcTech, Protocol::Waveman] {
            let device = factory
                .blueprint(protocol)
                .unwrap()
                .build(4, &params)
                .unwrap();
            assert_eq!(device.protocol(), protocol);
            assert_eq!(device.model(), 4);
        }
    }

    #[test]
    fn build_propagates_construction_error() {
        let factory = DeviceFactory::default();
        let result = factory
            .blueprint(Protocol::Ikea)
            .unwrap()
            .build(0, &DeviceParameters::new());
        assert_eq!(
            result.unwrap_err(),
            ConstructionError::MissingParameter("ikea_system")
        );
    }

    #[test]
    fn register_replaces_blueprint() {
        let mut factory = DeviceFactory::default();
        let previous = factory.register(
            Protocol::Group,
            DeviceBlueprint::new(&[], |model, _| {
                Ok(Box::new(Group::from_parameters(model, &DeviceParameters::new())?))
            }),
        );

        assert!(previous.is_some());
        assert!(
            factory
                .blueprint(Protocol::Group)
                .unwrap()
                .parameters()
                .is_empty()
        );
    }
}
