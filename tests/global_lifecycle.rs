// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration test for the process-wide manager.
//!
//! Kept as a single test so nothing else in this binary touches the global.

use tellcore_lib::event::EventMessage;
use tellcore_lib::manager::global;
use tellcore_lib::settings::{DeviceSettings, MemorySettings};
use tellcore_lib::{DeviceId, Error, Manager, Protocol};

#[test]
fn close_then_instance_starts_empty() {
    assert!(!global::is_initialized());
    assert!(!global::close());

    let id = DeviceId::new(1);
    let first = global::instance_or_init(|| {
        Manager::new(MemorySettings::new().with_device(
            id,
            DeviceSettings::new(Protocol::Sartano).with_parameter("sartano_code", "0000000001"),
        ))
    });
    assert!(global::is_initialized());

    // Later calls ignore the initializer and share state.
    let again = global::instance_or_init(|| panic!("initializer must not run twice"));
    first.get_device(id).unwrap();
    assert!(again.device_loaded(id));

    first
        .register_device_event(|_: &EventMessage<'_>, (): &()| {}, ())
        .unwrap();
    assert_eq!(global::instance().callback_count(), 1);

    assert!(global::close());
    assert!(!global::is_initialized());
    assert!(matches!(first.get_device(id), Err(Error::Closed)));

    let fresh = global::instance();
    assert!(!fresh.is_closed());
    assert_eq!(fresh.loaded_device_count(), 0);
    assert_eq!(fresh.callback_count(), 0);
    assert!(fresh.find_device(id).unwrap().is_none());

    assert!(global::close());
}
