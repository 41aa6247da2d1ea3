// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional process-wide manager.
//!
//! Hosts that want a single manager for the whole process can use these
//! functions instead of passing a [`Manager`] around. The instance is created
//! on first use and can be torn down with [`close`]; the next [`instance`]
//! call then starts from an empty registry.
//!
//! # Examples
//!
//! ```
//! use tellcore_lib::manager::global;
//!
//! let manager = global::instance();
//! assert!(global::is_initialized());
//!
//! global::close();
//! assert!(manager.is_closed());
//! assert!(!global::is_initialized());
//! ```

use parking_lot::Mutex;

use super::Manager;

static GLOBAL: Mutex<Option<Manager>> = parking_lot::const_mutex(None);

/// Returns the process-wide manager, creating a default one on first use.
#[must_use]
pub fn instance() -> Manager {
    instance_or_init(Manager::default)
}

/// Returns the process-wide manager, creating it with `init` on first use.
///
/// `init` runs while the global lock is held and must not call any function
/// of this module.
#[must_use]
pub fn instance_or_init(init: impl FnOnce() -> Manager) -> Manager {
    let mut slot = GLOBAL.lock();
    if slot.is_none() {
        tracing::debug!("Creating process-wide manager");
    }
    slot.get_or_insert_with(init).clone()
}

/// Shuts down and forgets the process-wide manager.
///
/// Clones obtained earlier observe the shutdown. Returns `false` if no
/// instance existed.
pub fn close() -> bool {
    let Some(manager) = GLOBAL.lock().take() else {
        return false;
    };
    manager.shutdown();
    true
}

/// Returns `true` if a process-wide manager currently exists.
#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL.lock().is_some()
}
