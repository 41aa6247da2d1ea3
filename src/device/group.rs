// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device groups.

use std::any::Any;

use crate::error::ConstructionError;
use crate::types::{DeviceId, Protocol};

use super::{Device, DeviceCommon, DeviceParameters};

const DEVICES_KEY: &str = "devices";

/// A virtual device that forwards commands to its member devices.
///
/// Members are stored as ids only; they are resolved through the manager
/// when a command is sent, so a group never owns its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    common: DeviceCommon,
    members: Vec<DeviceId>,
}

impl Group {
    /// Parameters read from settings for this variant.
    pub const PARAMETERS: &'static [&'static str] = &[DEVICES_KEY];

    /// Builds a group from stored parameters.
    ///
    /// `devices` is a comma-separated list of member ids in send order. A
    /// missing or empty list yields an empty group.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::InvalidParameter`] if an entry is not an
    /// integer.
    pub fn from_parameters(
        model: i32,
        params: &DeviceParameters,
    ) -> Result<Self, ConstructionError> {
        let members = match params.optional(DEVICES_KEY) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(|entry| {
                    entry.parse::<i32>().map(DeviceId::new).map_err(|_| {
                        ConstructionError::invalid(
                            DEVICES_KEY,
                            list,
                            format!("member {entry:?} is not a device id"),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            common: DeviceCommon::new(model),
            members,
        })
    }

    /// Member device ids in send order.
    #[must_use]
    pub fn members(&self) -> &[DeviceId] {
        &self.members
    }
}

impl Device for Group {
    fn protocol(&self) -> Protocol {
        Protocol::Group
    }

    fn common(&self) -> &DeviceCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut DeviceCommon {
        &mut self.common
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
