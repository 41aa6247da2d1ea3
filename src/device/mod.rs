// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device variants and the factory that builds them.
//!
//! A device is resolved from its stored protocol into one concrete variant:
//!
//! | Protocol  | Variant     | Parameters                                |
//! |-----------|-------------|-------------------------------------------|
//! | `arctech` | [`Nexa`]    | `nexa_house`, `nexa_unit`                 |
//! | `waveman` | [`Waveman`] | `nexa_house`, `nexa_unit`                 |
//! | `sartano` | [`Sartano`] | `sartano_code`                            |
//! | `ikea`    | [`Ikea`]    | `ikea_system`, `ikea_units`, `ikea_fade`  |
//! | `group`   | [`Group`]   | `devices`                                 |
//!
//! Variants only hold validated addressing parameters. Encoding them into RF
//! pulse trains is the job of the transmitter driver.

mod factory;
mod group;
mod ikea;
mod nexa;
mod sartano;
mod waveman;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::ConstructionError;
use crate::types::{DeviceId, Protocol};

pub use factory::{BuildFn, DeviceBlueprint, DeviceFactory};
pub use group::Group;
pub use ikea::{Fade, Ikea};
pub use nexa::{HouseCode, Nexa};
pub use sartano::Sartano;
pub use waveman::Waveman;

/// State shared by every device variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCommon {
    model: i32,
    device_node: Option<String>,
}

impl DeviceCommon {
    /// Creates common state for the given model.
    #[must_use]
    pub fn new(model: i32) -> Self {
        Self {
            model,
            device_node: None,
        }
    }
}

/// Behaviour shared by all device variants.
///
/// Implementors only provide access to their [`DeviceCommon`] block and their
/// protocol; model and device-node handling come for free.
pub trait Device: fmt::Debug + Send + 'static {
    /// The protocol this variant was built for.
    fn protocol(&self) -> Protocol;

    /// Shared state.
    fn common(&self) -> &DeviceCommon;

    /// Mutable shared state.
    fn common_mut(&mut self) -> &mut DeviceCommon;

    /// Upcast used for downcasting to the concrete variant.
    fn as_any(&self) -> &dyn Any;

    /// The device model.
    fn model(&self) -> i32 {
        self.common().model
    }

    /// Changes the device model in place.
    fn set_model(&mut self, model: i32) {
        self.common_mut().model = model;
    }

    /// The platform device node used to transmit, if one was attached.
    fn device_node(&self) -> Option<&str> {
        self.common().device_node.as_deref()
    }

    /// Attaches the platform device node.
    fn set_device_node(&mut self, path: String) {
        self.common_mut().device_node = Some(path);
    }
}

/// Protocol-specific parameters read from the settings store.
///
/// # Examples
///
/// ```
/// use tellcore_lib::device::DeviceParameters;
///
/// let params = DeviceParameters::new()
///     .with("nexa_house", "A")
///     .with("nexa_unit", "3");
///
/// assert_eq!(params.get("nexa_unit"), Some("3"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceParameters {
    values: HashMap<String, String>,
}

impl DeviceParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the raw value of a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the trimmed value of a parameter, treating empty as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::MissingParameter`] if the value is absent
    /// or blank.
    pub fn require(&self, key: &'static str) -> Result<&str, ConstructionError> {
        self.optional(key)
            .ok_or(ConstructionError::MissingParameter(key))
    }

    /// Returns the trimmed value of a parameter if it is present and non-empty.
    #[must_use]
    pub fn optional(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Shared handle to a cached device.
///
/// Handles returned for the same cached entry compare equal with
/// [`DeviceHandle::ptr_eq`]. Once the registry evicts an entry, later lookups
/// return a new handle; outstanding handles keep the old instance alive but
/// it is no longer reachable through the manager.
#[derive(Clone)]
pub struct DeviceHandle {
    id: DeviceId,
    protocol: Protocol,
    inner: Arc<Mutex<Box<dyn Device>>>,
}

impl DeviceHandle {
    pub(crate) fn new(id: DeviceId, device: Box<dyn Device>) -> Self {
        Self {
            id,
            protocol: device.protocol(),
            inner: Arc::new(Mutex::new(device)),
        }
    }

    /// The device id this handle was resolved for.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// The device protocol. Fixed for the lifetime of the instance.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The current device model.
    #[must_use]
    pub fn model(&self) -> i32 {
        self.inner.lock().model()
    }

    /// The attached device node, if any.
    #[must_use]
    pub fn device_node(&self) -> Option<String> {
        self.inner.lock().device_node().map(str::to_owned)
    }

    /// Locks the device for direct access.
    ///
    /// Do not call into the manager while holding the guard.
    /// [`Manager::set_model`](crate::Manager::set_model) on this device waits
    /// until the guard is dropped, and would deadlock on the same thread.
    pub fn lock(&self) -> MutexGuard<'_, Box<dyn Device>> {
        self.inner.lock()
    }

    /// Runs `f` against the concrete variant, if the device is a `T`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let unit = handle.downcast_with(|nexa: &Nexa| nexa.unit());
    /// ```
    pub fn downcast_with<T, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>
    where
        T: Device,
    {
        let guard = self.inner.lock();
        guard.as_any().downcast_ref::<T>().map(f)
    }

    /// Returns `true` if both handles refer to the same device instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn set_model(&self, model: i32) {
        self.inner.lock().set_model(model);
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("protocol", &self.protocol)
            .field("model", &self.model())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nexa_handle() -> DeviceHandle {
        let device = Nexa::new(1, HouseCode::Letter('A'), 1);
        DeviceHandle::new(DeviceId::new(1), Box::new(device))
    }

    #[test]
    fn require_treats_blank_as_missing() {
        let params = DeviceParameters::new().with("nexa_house", "  ");
        assert_eq!(
            params.require("nexa_house"),
            Err(ConstructionError::MissingParameter("nexa_house"))
        );
    }

    #[test]
    fn require_trims_value() {
        let params = DeviceParameters::new().with("nexa_unit", " 4 ");
        assert_eq!(params.require("nexa_unit"), Ok("4"));
    }

    #[test]
    fn handle_reports_protocol_and_model() {
        let handle = nexa_handle();
        assert_eq!(handle.id(), DeviceId::new(1));
        assert_eq!(handle.protocol(), Protocol::ArcTech);
        assert_eq!(handle.model(), 1);
    }

    #[test]
    fn set_model_keeps_identity() {
        let handle = nexa_handle();
        let alias = handle.clone();

        handle.set_model(9);

        assert!(handle.ptr_eq(&alias));
        assert_eq!(alias.model(), 9);
    }

    #[test]
    fn distinct_instances_are_not_ptr_eq() {
        assert!(!nexa_handle().ptr_eq(&nexa_handle()));
    }

    #[test]
    fn device_node_is_attachable() {
        let handle = nexa_handle();
        assert_eq!(handle.device_node(), None);

        handle.lock().set_device_node("/dev/tellstick0".to_string());
        assert_eq!(handle.device_node().as_deref(), Some("/dev/tellstick0"));
    }

    #[test]
    fn downcast_matches_variant() {
        let handle = nexa_handle();
        assert_eq!(handle.downcast_with(|nexa: &Nexa| nexa.unit()), Some(1));
        assert_eq!(handle.downcast_with(|_: &Sartano| ()), None);
    }
}
