// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting registry events.

use tokio::sync::broadcast;

use super::RegistryEvent;

/// Default channel capacity for the event bus.
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus for broadcasting registry events to multiple subscribers.
///
/// Publishing never blocks and does not need a running tokio runtime, so the
/// manager can publish from any thread. Receivers may be awaited from async
/// code or polled with `try_recv`.
///
/// # Capacity
///
/// A slow subscriber that falls more than `capacity` events behind loses the
/// oldest ones and sees `RecvError::Lagged` on its next receive.
///
/// # Examples
///
/// ```
/// use tellcore_lib::event::{EventBus, RegistryEvent};
/// use tellcore_lib::types::DeviceId;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(RegistryEvent::device_evicted(DeviceId::new(1)));
/// assert_eq!(
///     rx.try_recv().unwrap(),
///     RegistryEvent::device_evicted(DeviceId::new(1))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RegistryEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to registry events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: RegistryEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceId, Protocol};

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_and_drop_track_count() {
        let bus = EventBus::new();

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(RegistryEvent::device_evicted(DeviceId::new(1)));
    }

    #[tokio::test]
    async fn publish_delivers_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let device_id = DeviceId::new(12);
        bus.publish(RegistryEvent::device_loaded(device_id, Protocol::Waveman));

        assert_eq!(rx1.recv().await.unwrap().device_id(), Some(device_id));
        assert_eq!(rx2.recv().await.unwrap().device_id(), Some(device_id));
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }

    #[test]
    fn zero_capacity_is_usable() {
        let bus = EventBus::with_capacity(0);
        let mut rx = bus.subscribe();

        bus.publish(RegistryEvent::model_changed(DeviceId::new(2), 4));
        assert!(rx.try_recv().is_ok());
    }
}
