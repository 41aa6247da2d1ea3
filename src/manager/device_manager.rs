// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device manager owning the device cache, controllers and event callbacks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::controller::{Controller, ControllerDiscovery, ControllerRegistry, StaticControllers};
use crate::device::{Device, DeviceFactory, DeviceHandle, DeviceParameters};
use crate::error::{Error, Result};
use crate::event::{
    Delivery, EventBroadcaster, EventBus, EventClassification, EventMessage, RegistryEvent,
};
use crate::settings::{MemorySettings, SettingsStore};
use crate::types::{ControllerId, DeviceId, Protocol};

use super::config::ManagerConfig;
use super::state::{Admission, State};

/// Registry of devices, controllers and device event callbacks.
///
/// Devices are built lazily from the [`SettingsStore`] the first time they
/// are requested and cached until their protocol changes. Controllers are
/// discovered once, when the manager is built. Callbacks registered with
/// [`register_device_event`](Self::register_device_event) receive every raw
/// message passed to [`parse_message`](Self::parse_message).
///
/// `Manager` is cheap to clone; clones share the same state.
///
/// # Examples
///
/// ```
/// use tellcore_lib::Manager;
/// use tellcore_lib::settings::{DeviceSettings, MemorySettings};
/// use tellcore_lib::types::{DeviceId, Protocol};
///
/// # fn main() -> tellcore_lib::Result<()> {
/// let settings = MemorySettings::new().with_device(
///     DeviceId::new(1),
///     DeviceSettings::new(Protocol::ArcTech)
///         .with_parameter("nexa_house", "A")
///         .with_parameter("nexa_unit", "1"),
/// );
/// let manager = Manager::builder().settings(settings).build();
///
/// let lamp = manager.get_device(DeviceId::new(1))?;
/// assert_eq!(lamp.protocol(), Protocol::ArcTech);
/// assert!(manager.device_loaded(DeviceId::new(1)));
///
/// // Unconfigured ids are an empty result, not a fault.
/// assert!(manager.find_device(DeviceId::new(2))?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Manager {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    /// Serializes configuration writes so the cache follows store order.
    writes: Mutex<()>,
    settings: Arc<dyn SettingsStore>,
    factory: DeviceFactory,
    config: ManagerConfig,
    event_bus: EventBus,
}

impl Manager {
    /// Returns a builder for a manager.
    #[must_use]
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    /// Creates a manager over the given settings store with default
    /// configuration.
    #[must_use]
    pub fn new(settings: impl SettingsStore + 'static) -> Self {
        Self::builder().settings(settings).build()
    }

    /// The configuration this manager was built with.
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.inner.config
    }

    /// The factory used to build devices.
    #[must_use]
    pub fn factory(&self) -> &DeviceFactory {
        &self.inner.factory
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Returns the device with the given id, building and caching it on first
    /// use.
    ///
    /// Repeated calls return handles to the same instance until the device's
    /// protocol is changed with [`set_protocol`](Self::set_protocol).
    ///
    /// # Errors
    ///
    /// - [`Error::NotConfigured`] if no protocol is stored for `id`
    /// - [`Error::UnknownProtocol`] if the stored protocol is not recognized
    /// - [`Error::Construction`] if the stored parameters are rejected
    /// - [`Error::Closed`] after [`shutdown`](Self::shutdown)
    pub fn get_device(&self, id: DeviceId) -> Result<DeviceHandle> {
        loop {
            let generation = {
                let state = self.inner.state.lock();
                state.ensure_open()?;
                if let Some(handle) = state.devices.get(id) {
                    tracing::debug!(device_id = %id, "Device cache hit");
                    return Ok(handle.clone());
                }
                state.devices.generation(id)
            };

            tracing::debug!(device_id = %id, "Device cache miss, building");
            let device = self.build_device(id)?;
            let protocol = device.protocol();

            let admission = {
                let mut state = self.inner.state.lock();
                state.ensure_open()?;
                state.devices.admit(id, device, generation)
            };

            match admission {
                Admission::Inserted(handle) => {
                    tracing::debug!(device_id = %id, %protocol, "Device loaded");
                    self.inner
                        .event_bus
                        .publish(RegistryEvent::device_loaded(id, protocol));
                    return Ok(handle);
                }
                Admission::Existing(handle) => return Ok(handle),
                Admission::Stale => {
                    tracing::debug!(
                        device_id = %id,
                        "Configuration changed during build, retrying"
                    );
                }
            }
        }
    }

    /// Like [`get_device`](Self::get_device), but reports an unconfigured or
    /// unknown-protocol device as `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] or [`Error::Closed`] as
    /// [`get_device`](Self::get_device) does.
    pub fn find_device(&self, id: DeviceId) -> Result<Option<DeviceHandle>> {
        match self.get_device(id) {
            Ok(handle) => Ok(Some(handle)),
            Err(e) if e.is_absent() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns `true` if the device is currently cached.
    ///
    /// Never builds a device and never reads settings.
    #[must_use]
    pub fn device_loaded(&self, id: DeviceId) -> bool {
        self.inner.state.lock().devices.contains(id)
    }

    /// Ids of all cached devices, in ascending order.
    #[must_use]
    pub fn loaded_devices(&self) -> Vec<DeviceId> {
        self.inner.state.lock().devices.ids()
    }

    /// Number of cached devices.
    #[must_use]
    pub fn loaded_device_count(&self) -> usize {
        self.inner.state.lock().devices.len()
    }

    /// Persists a new protocol for a device and evicts any cached instance.
    ///
    /// The cached instance is evicted whether or not the write succeeds, so
    /// the next [`get_device`](Self::get_device) rebuilds from whatever the
    /// store now holds.
    ///
    /// # Errors
    ///
    /// - [`Error::Persistence`] if the store rejected the write
    /// - [`Error::Closed`] after [`shutdown`](Self::shutdown)
    pub fn set_protocol(&self, id: DeviceId, protocol: &str) -> Result<()> {
        let _writes = self.inner.writes.lock();
        self.inner.state.lock().ensure_open()?;

        let persisted = self.inner.settings.set_protocol(id, protocol);

        let evicted = {
            let mut state = self.inner.state.lock();
            state.ensure_open()?;
            state.devices.evict(id)
        };
        if evicted.is_some() {
            tracing::debug!(device_id = %id, "Evicted device after protocol change");
            self.inner
                .event_bus
                .publish(RegistryEvent::device_evicted(id));
        }

        persisted.map_err(|source| {
            tracing::warn!(
                device_id = %id,
                protocol,
                error = %source,
                "Failed to persist protocol"
            );
            Error::Persistence { id, source }
        })
    }

    /// Persists a new model for a device and updates a cached instance in
    /// place.
    ///
    /// The cached instance is left untouched if the write fails. If a caller
    /// is holding that instance's [`lock`](DeviceHandle::lock), this call
    /// and later writes wait for the guard to drop. Lookups do not.
    ///
    /// # Errors
    ///
    /// - [`Error::Persistence`] if the store rejected the write
    /// - [`Error::Closed`] after [`shutdown`](Self::shutdown)
    pub fn set_model(&self, id: DeviceId, model: i32) -> Result<()> {
        let _writes = self.inner.writes.lock();
        self.inner.state.lock().ensure_open()?;

        if let Err(source) = self.inner.settings.set_model(id, model) {
            tracing::warn!(device_id = %id, model, error = %source, "Failed to persist model");
            return Err(Error::Persistence { id, source });
        }

        let cached = {
            let mut state = self.inner.state.lock();
            state.ensure_open()?;
            state.devices.invalidate(id);
            state.devices.get(id).cloned()
        };
        if let Some(handle) = cached {
            handle.set_model(model);
        }

        tracing::debug!(device_id = %id, model, "Model changed");
        self.inner
            .event_bus
            .publish(RegistryEvent::model_changed(id, model));
        Ok(())
    }

    fn build_device(&self, id: DeviceId) -> Result<Box<dyn Device>> {
        let settings = &self.inner.settings;

        let stored = settings.protocol(id).unwrap_or_default();
        let stored = stored.trim();
        if stored.is_empty() {
            tracing::debug!(device_id = %id, "No protocol configured");
            return Err(Error::NotConfigured(id));
        }

        let unknown = || {
            tracing::debug!(device_id = %id, protocol = stored, "Unknown protocol");
            Error::UnknownProtocol {
                id,
                protocol: stored.to_string(),
            }
        };
        let protocol: Protocol = stored.parse().map_err(|_| unknown())?;
        let blueprint = self.inner.factory.blueprint(protocol).ok_or_else(unknown)?;

        let model = settings.model(id);
        let mut params = DeviceParameters::new();
        for &key in blueprint.parameters() {
            if let Some(value) = settings.device_parameter(id, key) {
                params.insert(key, value);
            }
        }

        let mut device = blueprint.build(model, &params).map_err(|source| {
            tracing::debug!(
                device_id = %id,
                %protocol,
                error = %source,
                "Device rejected its parameters"
            );
            Error::Construction { id, source }
        })?;
        self.attach_device_node(device.as_mut());
        Ok(device)
    }

    #[cfg(target_os = "linux")]
    fn attach_device_node(&self, device: &mut dyn Device) {
        if let Some(node) = self.inner.settings.setting(&self.inner.config.device_node_setting) {
            device.set_device_node(node);
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn attach_device_node(&self, _device: &mut dyn Device) {}

    // =========================================================================
    // Controllers
    // =========================================================================

    /// Ids of all registered controllers, in ascending order.
    #[must_use]
    pub fn controller_ids(&self) -> Vec<ControllerId> {
        self.inner.state.lock().controllers.ids()
    }

    /// Number of registered controllers.
    #[must_use]
    pub fn controller_count(&self) -> usize {
        self.inner.state.lock().controllers.len()
    }

    /// Serial of a registered controller.
    #[must_use]
    pub fn controller_serial(&self, id: ControllerId) -> Option<String> {
        self.inner
            .state
            .lock()
            .controllers
            .get(id)
            .map(|controller| controller.serial().to_string())
    }

    /// Id of the registered controller with the given serial.
    #[must_use]
    pub fn find_controller(&self, serial: &str) -> Option<ControllerId> {
        self.inner.state.lock().controllers.find_by_serial(serial)
    }

    /// Runs `f` against a registered controller.
    ///
    /// `f` runs while the manager lock is held and must not call back into
    /// the manager.
    pub fn with_controller<R>(
        &self,
        id: ControllerId,
        f: impl FnOnce(&dyn Controller) -> R,
    ) -> Option<R> {
        self.inner.state.lock().controllers.get(id).map(f)
    }

    // =========================================================================
    // Device events
    // =========================================================================

    /// Registers a callback for raw device events.
    ///
    /// `context` is owned by the manager and passed back to `callback` on
    /// every delivery. Callbacks are delivered in registration order and stay
    /// registered until the manager shuts down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] after [`shutdown`](Self::shutdown).
    pub fn register_device_event<C, F>(&self, callback: F, context: C) -> Result<()>
    where
        C: Send + Sync + 'static,
        F: Fn(&EventMessage<'_>, &C) + Send + Sync + 'static,
    {
        let mut state = self.inner.state.lock();
        state.ensure_open()?;
        state.callbacks.register(callback, context);
        tracing::debug!(callback_count = state.callbacks.len(), "Registered device event callback");
        Ok(())
    }

    /// Delivers a raw message to every registered callback using the
    /// configured classification.
    ///
    /// Returns once every callback has returned.
    pub fn parse_message(&self, message: &str) -> Delivery {
        self.parse_message_with(self.inner.config.event_classification, message)
    }

    /// Delivers a raw message with an explicit classification.
    ///
    /// Callbacks run without the manager lock held, so they may call back
    /// into the manager. A callback registered during delivery first sees the
    /// next message.
    pub fn parse_message_with(
        &self,
        classification: EventClassification,
        message: &str,
    ) -> Delivery {
        let snapshot = self.inner.state.lock().callbacks.snapshot();
        let delivery = snapshot.deliver(&EventMessage::new(classification, message));

        self.inner.event_bus.publish(RegistryEvent::MessageDelivered {
            delivered: delivery.delivered,
            failed: delivery.failed,
        });
        delivery
    }

    /// Number of registered device event callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.inner.state.lock().callbacks.len()
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to registry events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.inner.event_bus.subscribe()
    }

    /// Returns the number of active registry event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.event_bus.subscriber_count()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Shuts the manager down.
    ///
    /// Drops every cached device, every controller and every callback without
    /// notifying them. Outstanding [`DeviceHandle`]s stay usable but are no
    /// longer reachable through the manager. Later calls to fallible
    /// operations return [`Error::Closed`]. Calling this more than once has no
    /// further effect.
    pub fn shutdown(&self) {
        let Some(owned) = self.inner.state.lock().close() else {
            return;
        };
        tracing::info!(
            devices = owned.devices.len(),
            controllers = owned.controllers.len(),
            callbacks = owned.callbacks.len(),
            "Manager shut down"
        );
        drop(owned);
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().is_closed()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Manager")
            .field("loaded_devices", &state.devices.len())
            .field("controllers", &state.controllers.len())
            .field("callback_count", &state.callbacks.len())
            .field("closed", &state.is_closed())
            .finish()
    }
}

/// Builder for [`Manager`].
///
/// Every part is optional: the settings store defaults to an empty
/// [`MemorySettings`], the factory to [`DeviceFactory::default`], and
/// controller discovery to the [`StaticControllers`] listed in the
/// configuration.
///
/// # Examples
///
/// ```
/// use tellcore_lib::Manager;
/// use tellcore_lib::controller::StaticControllers;
/// use tellcore_lib::manager::ManagerConfig;
/// use tellcore_lib::settings::MemorySettings;
///
/// let manager = Manager::builder()
///     .settings(MemorySettings::new())
///     .discovery(StaticControllers::none())
///     .config(ManagerConfig::default())
///     .build();
///
/// assert_eq!(manager.controller_count(), 0);
/// ```
#[derive(Default)]
pub struct ManagerBuilder {
    settings: Option<Arc<dyn SettingsStore>>,
    discovery: Option<Box<dyn ControllerDiscovery>>,
    factory: Option<DeviceFactory>,
    config: ManagerConfig,
}

impl ManagerBuilder {
    /// Creates a builder with every part defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the settings store.
    #[must_use]
    pub fn settings(mut self, settings: impl SettingsStore + 'static) -> Self {
        self.settings = Some(Arc::new(settings));
        self
    }

    /// Sets the controller discovery used at build time.
    #[must_use]
    pub fn discovery(mut self, discovery: impl ControllerDiscovery + 'static) -> Self {
        self.discovery = Some(Box::new(discovery));
        self
    }

    /// Sets the device factory.
    #[must_use]
    pub fn factory(mut self, factory: DeviceFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets the manager configuration.
    #[must_use]
    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the manager, running controller discovery once.
    #[must_use]
    pub fn build(self) -> Manager {
        let Self {
            settings,
            discovery,
            factory,
            config,
        } = self;

        let settings = settings.unwrap_or_else(|| Arc::new(MemorySettings::new()));
        let mut discovery = discovery
            .unwrap_or_else(|| Box::new(StaticControllers::new(config.controllers.clone())));
        let controllers = ControllerRegistry::discover(discovery.as_mut());

        tracing::info!(controllers = controllers.len(), "Manager created");

        Manager {
            inner: Arc::new(Inner {
                state: Mutex::new(State::new(controllers)),
                writes: Mutex::new(()),
                settings,
                factory: factory.unwrap_or_default(),
                event_bus: EventBus::with_capacity(config.event_capacity),
                config,
            }),
        }
    }
}

impl fmt::Debug for ManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerBuilder")
            .field("has_settings", &self.settings.is_some())
            .field("has_discovery", &self.discovery.is_some())
            .field("factory", &self.factory)
            .field("config", &self.config)
            .finish()
    }
}
