// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device manager.
//!
//! The [`Manager`] is the composition root of the library. It owns:
//!
//! - **Device cache**: devices are built on first lookup from the settings
//!   store and kept until their protocol changes
//! - **Controllers**: discovered once when the manager is built
//! - **Device event callbacks**: raw messages are fanned out to every
//!   registered callback in registration order
//! - **Registry events**: cache and model changes are broadcast to
//!   subscribers
//!
//! A manager is usually constructed explicitly with [`Manager::builder`].
//! Hosts that need a single shared instance can use [`global`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use tellcore_lib::Manager;
//! use tellcore_lib::event::EventMessage;
//!
//! # fn main() -> tellcore_lib::Result<()> {
//! let manager = Manager::default();
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! manager.register_device_event(
//!     |_event: &EventMessage<'_>, seen: &Arc<AtomicUsize>| {
//!         seen.fetch_add(1, Ordering::SeqCst);
//!     },
//!     Arc::clone(&seen),
//! )?;
//!
//! let message = "class:command;protocol:arctech;house:A;unit:1;method:turnon;";
//! let delivery = manager.parse_message(message);
//! assert_eq!(delivery.delivered, 1);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//! manager.shutdown();
//! # Ok(())
//! # }
//! ```

mod config;
mod device_manager;
pub mod global;
mod state;

pub use config::{DEFAULT_DEVICE_NODE_SETTING, ManagerConfig};
pub use device_manager::{Manager, ManagerBuilder};
