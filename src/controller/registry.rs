// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller registry.

use std::collections::HashMap;

use crate::types::ControllerId;

use super::{Controller, ControllerDiscovery};

/// Table of controllers owned by the manager.
///
/// Membership is fixed once the registry is built. Controllers are dropped
/// together with the registry.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<ControllerId, Box<dyn Controller>>,
}

impl ControllerRegistry {
    /// Builds the registry from a discovery source.
    ///
    /// If discovery reports the same id twice, the later controller replaces
    /// the earlier one.
    pub fn discover(discovery: &mut dyn ControllerDiscovery) -> Self {
        let mut controllers = HashMap::new();
        for (id, controller) in discovery.discover() {
            tracing::debug!(%id, serial = controller.serial(), "Registering controller");
            if let Some(previous) = controllers.insert(id, controller) {
                tracing::warn!(
                    %id,
                    replaced = previous.serial(),
                    "Duplicate controller id from discovery"
                );
            }
        }
        Self { controllers }
    }

    /// Returns a controller by id.
    #[must_use]
    pub fn get(&self, id: ControllerId) -> Option<&dyn Controller> {
        self.controllers.get(&id).map(|controller| &**controller)
    }

    /// Returns the id of the controller with the given serial.
    #[must_use]
    pub fn find_by_serial(&self, serial: &str) -> Option<ControllerId> {
        self.controllers
            .iter()
            .find(|(_, controller)| controller.serial() == serial)
            .map(|(id, _)| *id)
    }

    /// Returns all controller ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<ControllerId> {
        let mut ids: Vec<_> = self.controllers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the number of controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns `true` if no controllers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerConfig, StaticControllers, TellStick};

    #[test]
    fn registers_discovered_controllers() {
        let mut discovery = StaticControllers::new(vec![
            ControllerConfig::duo(2, "B"),
            ControllerConfig::duo(1, "A"),
        ]);
        let registry = ControllerRegistry::discover(&mut discovery);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec![ControllerId::new(1), ControllerId::new(2)]);
        assert_eq!(registry.get(ControllerId::new(2)).unwrap().serial(), "B");
        assert!(registry.get(ControllerId::new(3)).is_none());
    }

    #[test]
    fn duplicate_id_keeps_last() {
        let mut discovery = StaticControllers::new(vec![
            ControllerConfig::duo(1, "FIRST"),
            ControllerConfig::duo(1, "SECOND"),
        ]);
        let registry = ControllerRegistry::discover(&mut discovery);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(ControllerId::new(1)).unwrap().serial(), "SECOND");
    }

    #[test]
    fn find_by_serial() {
        let mut discovery = StaticControllers::new(vec![ControllerConfig::duo(5, "XYZ")]);
        let registry = ControllerRegistry::discover(&mut discovery);

        assert_eq!(registry.find_by_serial("XYZ"), Some(ControllerId::new(5)));
        assert_eq!(registry.find_by_serial("nope"), None);
    }

    #[test]
    fn downcast_to_tellstick() {
        let mut discovery = StaticControllers::new(vec![ControllerConfig::default()]);
        let registry = ControllerRegistry::discover(&mut discovery);

        let controller = registry.get(ControllerId::new(1)).unwrap();
        let tellstick = controller.as_any().downcast_ref::<TellStick>().unwrap();
        assert!(tellstick.can_receive());
    }

    #[test]
    fn empty_discovery() {
        let registry = ControllerRegistry::discover(&mut StaticControllers::none());
        assert!(registry.is_empty());
    }
}
