// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event delivery.
//!
//! Two independent channels leave the manager:
//!
//! - Raw hardware messages go synchronously to the callbacks held by an
//!   [`EventBroadcaster`], in registration order.
//! - Registry lifecycle changes go to [`EventBus`] subscribers as
//!   [`RegistryEvent`]s.
//!
//! # Examples
//!
//! ```
//! use tellcore_lib::event::{EventBroadcaster, EventClassification, EventMessage};
//!
//! let mut broadcaster = EventBroadcaster::new();
//! broadcaster.register(
//!     |event: &EventMessage<'_>, prefix: &String| println!("{prefix}{}", event.message),
//!     "rx: ".to_string(),
//! );
//!
//! let delivery = broadcaster.broadcast(&EventMessage::new(
//!     EventClassification::DEVICE,
//!     "class:command;protocol:arctech;",
//! ));
//! assert_eq!(delivery.delivered, 1);
//! ```

mod callback;
mod event_bus;
mod registry_event;

pub use callback::{CallbackSnapshot, Delivery, EventBroadcaster, EventClassification, EventMessage};
pub(crate) use event_bus::DEFAULT_CHANNEL_CAPACITY;
pub use event_bus::EventBus;
pub use registry_event::RegistryEvent;
