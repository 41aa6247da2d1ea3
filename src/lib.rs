// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `TellCore` Lib - Device and controller registry for TellStick RF gateways.
//!
//! This library keeps the runtime registry behind a 433 MHz home-automation
//! gateway: which devices exist, how each one is wired, which controller
//! units are attached, and who wants to hear about incoming radio events.
//!
//! # Supported Features
//!
//! - **Lazy device cache**: Devices are built from persisted settings on first
//!   use and invalidated when their protocol changes
//! - **Device families**: Nexa/ArcTech, Waveman, Sartano, Ikea Koppla, groups
//! - **Controller registry**: TellStick units discovered once at start-up
//! - **Event callbacks**: Raw controller messages fanned out synchronously
//! - **Registry events**: Cache and model changes on a broadcast channel
//!
//! Wire-level RF encoding and USB I/O are out of scope; this crate only
//! resolves and tracks the objects those layers work with.
//!
//! # Quick Start
//!
//! ```
//! use tellcore_lib::Manager;
//! use tellcore_lib::device::Nexa;
//! use tellcore_lib::settings::{DeviceSettings, MemorySettings};
//! use tellcore_lib::types::{DeviceId, Protocol};
//!
//! # fn main() -> tellcore_lib::Result<()> {
//! let settings = MemorySettings::new().with_device(
//!     DeviceId::new(1),
//!     DeviceSettings::new(Protocol::ArcTech)
//!         .with_model(1)
//!         .with_parameter("nexa_house", "A")
//!         .with_parameter("nexa_unit", "3"),
//! );
//! let manager = Manager::new(settings);
//!
//! let lamp = manager.get_device(DeviceId::new(1))?;
//! assert_eq!(lamp.downcast_with(|nexa: &Nexa| nexa.unit()), Some(3));
//!
//! // Switching protocol evicts the cached instance.
//! manager.set_protocol(DeviceId::new(1), "waveman")?;
//! assert!(!manager.device_loaded(DeviceId::new(1)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Registry Events
//!
//! ```
//! use tellcore_lib::Manager;
//! use tellcore_lib::event::RegistryEvent;
//! use tellcore_lib::types::DeviceId;
//!
//! # fn main() -> tellcore_lib::Result<()> {
//! let manager = Manager::default();
//! let mut events = manager.subscribe();
//!
//! manager.set_model(DeviceId::new(4), 2)?;
//! assert_eq!(
//!     events.try_recv().unwrap(),
//!     RegistryEvent::model_changed(DeviceId::new(4), 2)
//! );
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod settings;
pub mod types;

pub use device::{Device, DeviceHandle};
pub use error::{ConstructionError, Error, Result, SettingsError};
pub use manager::{Manager, ManagerBuilder, ManagerConfig};
pub use types::{ControllerId, DeviceId, Protocol};
