// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared manager state guarded by a single lock.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::controller::ControllerRegistry;
use crate::device::{Device, DeviceHandle};
use crate::error::{Error, Result};
use crate::event::EventBroadcaster;
use crate::types::DeviceId;

/// Result of offering a freshly built device to the registry.
#[derive(Debug)]
pub(crate) enum Admission {
    /// The device was cached under its id.
    Inserted(DeviceHandle),
    /// Another caller cached the id first; its handle wins.
    Existing(DeviceHandle),
    /// The configuration changed while the device was being built.
    Stale,
}

/// Lazily populated cache of live devices.
///
/// Each id carries a generation counting configuration changes to that id.
/// A build records the generation before reading settings and is only
/// admitted if the id has not changed since.
#[derive(Debug, Default)]
pub(crate) struct DeviceRegistry {
    devices: HashMap<DeviceId, DeviceHandle>,
    generations: HashMap<DeviceId, u64>,
}

impl DeviceRegistry {
    pub(crate) fn get(&self, id: DeviceId) -> Option<&DeviceHandle> {
        self.devices.get(&id)
    }

    pub(crate) fn contains(&self, id: DeviceId) -> bool {
        self.devices.contains_key(&id)
    }

    pub(crate) fn generation(&self, id: DeviceId) -> u64 {
        self.generations.get(&id).copied().unwrap_or_default()
    }

    pub(crate) fn admit(
        &mut self,
        id: DeviceId,
        device: Box<dyn Device>,
        generation: u64,
    ) -> Admission {
        if generation != self.generation(id) {
            return Admission::Stale;
        }
        match self.devices.entry(id) {
            Entry::Occupied(entry) => Admission::Existing(entry.get().clone()),
            Entry::Vacant(entry) => {
                let handle = DeviceHandle::new(id, device);
                entry.insert(handle.clone());
                Admission::Inserted(handle)
            }
        }
    }

    /// Marks a configuration change to `id` without touching the cache.
    pub(crate) fn invalidate(&mut self, id: DeviceId) {
        let generation = self.generations.entry(id).or_default();
        *generation = generation.wrapping_add(1);
    }

    /// Marks a configuration change to `id` and drops its cached entry.
    pub(crate) fn evict(&mut self, id: DeviceId) -> Option<DeviceHandle> {
        self.invalidate(id);
        self.devices.remove(&id)
    }

    pub(crate) fn ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<_> = self.devices.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn len(&self) -> usize {
        self.devices.len()
    }
}

/// Everything the manager owns, guarded together.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) devices: DeviceRegistry,
    pub(crate) controllers: ControllerRegistry,
    pub(crate) callbacks: EventBroadcaster,
    closed: bool,
}

impl State {
    pub(crate) fn new(controllers: ControllerRegistry) -> Self {
        Self {
            controllers,
            ..Self::default()
        }
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    /// Marks the state closed and hands back everything it owned so the
    /// caller can drop it outside the lock. Returns `None` if already closed.
    pub(crate) fn close(&mut self) -> Option<Self> {
        if self.closed {
            return None;
        }
        self.closed = true;
        Some(Self {
            devices: std::mem::take(&mut self.devices),
            controllers: std::mem::take(&mut self.controllers),
            callbacks: std::mem::take(&mut self.callbacks),
            closed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{HouseCode, Nexa};

    fn lamp() -> Box<dyn Device> {
        Box::new(Nexa::new(1, HouseCode::Letter('A'), 1))
    }

    #[test]
    fn admit_inserts_when_vacant() {
        let mut registry = DeviceRegistry::default();
        let id = DeviceId::new(1);
        let generation = registry.generation(id);

        let Admission::Inserted(handle) = registry.admit(id, lamp(), generation) else {
            panic!("expected insertion");
        };

        assert!(registry.contains(id));
        assert!(registry.get(id).unwrap().ptr_eq(&handle));
    }

    #[test]
    fn first_insert_wins() {
        let mut registry = DeviceRegistry::default();
        let id = DeviceId::new(1);
        let generation = registry.generation(id);

        let Admission::Inserted(first) = registry.admit(id, lamp(), generation) else {
            panic!("expected insertion");
        };
        let Admission::Existing(second) = registry.admit(id, lamp(), generation) else {
            panic!("expected existing handle");
        };

        assert!(first.ptr_eq(&second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn stale_build_is_rejected() {
        let mut registry = DeviceRegistry::default();
        let id = DeviceId::new(1);
        let generation = registry.generation(id);
        registry.invalidate(id);

        assert!(matches!(
            registry.admit(id, lamp(), generation),
            Admission::Stale
        ));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn change_to_other_id_does_not_stale_build() {
        let mut registry = DeviceRegistry::default();
        let id = DeviceId::new(1);
        let generation = registry.generation(id);
        registry.invalidate(DeviceId::new(2));
        registry.evict(DeviceId::new(3));

        assert!(matches!(
            registry.admit(id, lamp(), generation),
            Admission::Inserted(_)
        ));
    }

    #[test]
    fn evict_removes_and_bumps_generation() {
        let mut registry = DeviceRegistry::default();
        let id = DeviceId::new(5);
        registry.admit(id, lamp(), registry.generation(id));
        let before = registry.generation(id);

        assert!(registry.evict(id).is_some());
        assert!(!registry.contains(id));
        assert_ne!(registry.generation(id), before);
        assert!(registry.evict(id).is_none());
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = DeviceRegistry::default();
        for raw in [9, 2, 5] {
            registry.admit(DeviceId::new(raw), lamp(), 0);
        }

        assert_eq!(
            registry.ids(),
            vec![DeviceId::new(2), DeviceId::new(5), DeviceId::new(9)]
        );
    }

    #[test]
    fn close_is_one_shot() {
        let mut state = State::default();
        state.devices.admit(DeviceId::new(1), lamp(), 0);

        let owned = state.close().unwrap();
        assert_eq!(owned.devices.len(), 1);
        assert_eq!(state.devices.len(), 0);
        assert!(state.is_closed());
        assert!(matches!(state.ensure_open(), Err(Error::Closed)));
        assert!(state.close().is_none());
    }
}
