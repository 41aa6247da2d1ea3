// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Waveman devices.
//!
//! Waveman receivers share ArcTech code-switch addressing and read the same
//! `nexa_house` / `nexa_unit` parameters, but only accept house letters.

use std::any::Any;

use crate::error::ConstructionError;
use crate::types::Protocol;

use super::nexa::{HOUSE_KEY, UNIT_KEY, parse_unit};
use super::{Device, DeviceCommon, DeviceParameters, HouseCode};

/// A Waveman device, addressed by house letter and unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveman {
    common: DeviceCommon,
    house: char,
    unit: u8,
}

impl Waveman {
    /// Parameters read from settings for this variant.
    pub const PARAMETERS: &'static [&'static str] = &[HOUSE_KEY, UNIT_KEY];

    /// Builds a Waveman device from stored parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if either parameter is missing, the
    /// unit is out of range, or the house is not a letter `A`–`P`.
    pub fn from_parameters(
        model: i32,
        params: &DeviceParameters,
    ) -> Result<Self, ConstructionError> {
        let raw_house = params.require(HOUSE_KEY)?;
        let HouseCode::Letter(house) = HouseCode::parse(raw_house)? else {
            return Err(ConstructionError::invalid(
                HOUSE_KEY,
                raw_house,
                "waveman receivers only use house letters",
            ));
        };
        let unit = parse_unit(params.require(UNIT_KEY)?)?;

        Ok(Self {
            common: DeviceCommon::new(model),
            house,
            unit,
        })
    }

    /// The house letter (`A`-`P`).
    #[must_use]
    pub fn house(&self) -> char {
        self.house
    }

    /// The unit number (1-16).
    #[must_use]
    pub fn unit(&self) -> u8 {
        self.unit
    }
}

impl Device for Waveman {
    fn protocol(&self) -> Protocol {
        Protocol::Waveman
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_letter_house() {
        let params = DeviceParameters::new()
            .with(HOUSE_KEY, "d")
            .with(UNIT_KEY, "2");
        let waveman = Waveman::from_parameters(0, &params).unwrap();

        assert_eq!(waveman.house(), 'D');
        assert_eq!(waveman.unit(), 2);
        assert_eq!(waveman.protocol(), Protocol::Waveman);
    }

    #[test]
    fn rejects_learning_house() {
        let params = DeviceParameters::new()
            .with(HOUSE_KEY, "1234")
            .with(UNIT_KEY, "2");
        let err = Waveman::from_parameters(0, &params).unwrap_err();

        assert!(matches!(
            err,
            ConstructionError::InvalidParameter { key: HOUSE_KEY, .. }
        ));
    }
}
