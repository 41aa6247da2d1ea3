// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifier and tag types shared across the library.
//!
//! # Types
//!
//! - [`DeviceId`] - Key of the device registry
//! - [`ControllerId`] - Key of the controller registry
//! - [`Protocol`] - Device family named by the stored protocol string

mod ids;
mod protocol;

pub use ids::{ControllerId, DeviceId};
pub use protocol::{Protocol, UnknownProtocolError};
