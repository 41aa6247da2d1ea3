// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event callbacks.
//!
//! This module provides the synchronous fan-out used for raw hardware events:
//!
//! - [`EventBroadcaster`] - Ordered list of registered callbacks
//! - [`CallbackSnapshot`] - Point-in-time copy of that list used for delivery
//! - [`EventMessage`] - What each callback receives

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Classification pair forwarded with every raw event.
///
/// Event sources that cannot classify a message use
/// [`EventClassification::DEVICE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventClassification {
    /// Event class.
    pub class: i32,
    /// Event number within the class.
    pub number: i32,
}

impl EventClassification {
    /// Generic device event, `(1, 1)`.
    pub const DEVICE: Self = Self::new(1, 1);

    /// Creates a classification pair.
    #[must_use]
    pub const fn new(class: i32, number: i32) -> Self {
        Self { class, number }
    }
}

impl Default for EventClassification {
    fn default() -> Self {
        Self::DEVICE
    }
}

/// A raw event as delivered to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMessage<'a> {
    /// Event class.
    pub event_class: i32,
    /// Event number within the class.
    pub event_number: i32,
    /// The raw message text as received from the controller.
    pub message: &'a str,
}

impl<'a> EventMessage<'a> {
    /// Creates a message with the given classification.
    #[must_use]
    pub fn new(classification: EventClassification, message: &'a str) -> Self {
        Self {
            event_class: classification.class,
            event_number: classification.number,
            message,
        }
    }
}

/// Outcome of delivering one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Callbacks that returned normally.
    pub delivered: usize,
    /// Callbacks that panicked.
    pub failed: usize,
}

/// Type alias for a registered callback with its context bound in.
type DeviceEventCallback = Arc<dyn Fn(&EventMessage<'_>) + Send + Sync>;

/// Ordered list of device event callbacks.
///
/// Callbacks are delivered in registration order. Registering the same
/// function twice delivers twice. There is no unregistration: a callback
/// lives as long as the broadcaster that holds it.
#[derive(Default)]
pub struct EventBroadcaster {
    callbacks: Vec<DeviceEventCallback>,
}

impl EventBroadcaster {
    /// Creates an empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback together with its context value.
    ///
    /// The context is owned by the broadcaster and handed back to the
    /// callback by reference on every delivery.
    pub fn register<C, F>(&mut self, callback: F, context: C)
    where
        C: Send + Sync + 'static,
        F: Fn(&EventMessage<'_>, &C) + Send + Sync + 'static,
    {
        self.callbacks
            .push(Arc::new(move |event: &EventMessage<'_>| callback(event, &context)));
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Copies the current callback list for delivery outside a lock.
    #[must_use]
    pub fn snapshot(&self) -> CallbackSnapshot {
        CallbackSnapshot {
            callbacks: self.callbacks.clone(),
        }
    }

    /// Delivers a message to every callback.
    pub fn broadcast(&self, event: &EventMessage<'_>) -> Delivery {
        deliver(&self.callbacks, event)
    }
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("callback_count", &self.len())
            .finish()
    }
}

/// Point-in-time copy of a broadcaster's callbacks.
pub struct CallbackSnapshot {
    callbacks: Vec<DeviceEventCallback>,
}

impl CallbackSnapshot {
    /// Delivers a message to every callback in the snapshot.
    pub fn deliver(&self, event: &EventMessage<'_>) -> Delivery {
        deliver(&self.callbacks, event)
    }

    /// Returns the number of callbacks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns `true` if the snapshot holds no callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for CallbackSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackSnapshot")
            .field("callback_count", &self.len())
            .finish()
    }
}

/// Calls each callback in order. A panicking callback is logged and skipped
/// so the rest still receive the message. Has no effect when the crate is
/// built with `panic = "abort"`.
fn deliver(callbacks: &[DeviceEventCallback], event: &EventMessage<'_>) -> Delivery {
    let mut delivery = Delivery::default();
    for (position, callback) in callbacks.iter().enumerate() {
        match catch_unwind(AssertUnwindSafe(|| callback(event))) {
            Ok(()) => delivery.delivered += 1,
            Err(payload) => {
                delivery.failed += 1;
                tracing::error!(
                    position,
                    panic = panic_message(payload.as_ref()),
                    "Device event callback panicked"
                );
            }
        }
    }
    delivery
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
